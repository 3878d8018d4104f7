use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::Invocation;
use crate::config::RunConfig;
use crate::data::loader::{load_labels, load_matrix};
use crate::reduce::{Pca, Reducer2D, TsneReducer};
use crate::render;

// ---------------------------------------------------------------------------
// Pipeline: load → truncate → (PCA) → t-SNE → plot → save
// ---------------------------------------------------------------------------

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub points: usize,
    pub annotated: bool,
    pub output: PathBuf,
    pub image_size: (u32, u32),
}

pub fn run(invocation: &Invocation, config: &RunConfig) -> Result<RunSummary> {
    run_with(invocation, config, &TsneReducer::new(config.tsne.clone()))
}

/// Same as [`run`] with any reduction backend.
pub fn run_with(
    invocation: &Invocation,
    config: &RunConfig,
    reducer: &dyn Reducer2D,
) -> Result<RunSummary> {
    let started = Instant::now();

    let mut matrix = load_matrix(&invocation.vocab, config.delimiter)
        .with_context(|| format!("loading vocabulary matrix {}", invocation.vocab.display()))?;
    let available = matrix.len();
    let kept = matrix.truncate(invocation.points, invocation.truncation)?;
    log::info!(
        "Loaded {available} vectors of {} dims from {}, keeping {kept}",
        matrix.dims(),
        invocation.vocab.display()
    );

    // Labels are checked before the expensive part so a short file fails fast.
    let labels = match &invocation.labels {
        Some(path) => {
            let mut labels = load_labels(path)
                .with_context(|| format!("loading labels {}", path.display()))?;
            labels.truncate(kept);
            labels.ensure_covers(kept)?;
            Some(labels)
        }
        None => None,
    };

    let matrix = match config.tsne.initial_dims {
        Some(dims) if dims < matrix.dims() && matrix.len() >= 2 => Pca::new(dims)
            .reduce_matrix(&matrix)
            .context("PCA pre-reduction")?,
        _ => matrix,
    };

    let projection = reducer
        .reduce(&matrix)
        .with_context(|| format!("{} reduction", reducer.name()))?;
    if projection.len() != matrix.len() {
        anyhow::bail!(
            "{} returned {} points for {} rows",
            reducer.name(),
            projection.len(),
            matrix.len()
        );
    }

    let image_size =
        render::save_plot(&projection, labels.as_ref(), &config.plot, &invocation.output)
        .with_context(|| format!("saving plot to {}", invocation.output.display()))?;
    log::info!(
        "Wrote {}x{} plot of {kept} points to {} in {:.2?}",
        image_size.0,
        image_size.1,
        invocation.output.display(),
        started.elapsed()
    );

    if invocation.show {
        render::open_in_viewer(&invocation.output);
    }

    Ok(RunSummary {
        points: kept,
        annotated: labels.is_some(),
        output: invocation.output.clone(),
        image_size,
    })
}
