use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{PcaReducer, Reducer2D};
use crate::data::model::{EmbeddingMatrix, Projection};
use crate::error::{Result, VizError};

/// bhtsne refuses inputs where `n - 1 < 3 * perplexity`. Below this many rows
/// the largest accepted perplexity drops under 1 and the calibration diverges.
const MIN_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TsneParams {
    /// Effective number of neighbours per point.
    pub perplexity: f32,
    pub learning_rate: f32,
    pub epochs: usize,
    /// Barnes-Hut accuracy/speed trade-off; `0.0` runs the exact gradient.
    pub theta: f32,
    /// Optional PCA pre-reduction applied before t-SNE.
    pub initial_dims: Option<usize>,
}

impl Default for TsneParams {
    fn default() -> Self {
        Self {
            perplexity: 50.0,
            learning_rate: 20.0,
            epochs: 1000,
            theta: 0.0,
            initial_dims: None,
        }
    }
}

impl TsneParams {
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(VizError::Config(msg));
        if !(self.perplexity > 0.0) {
            return bad(format!("perplexity must be positive, got {}", self.perplexity));
        }
        if !(self.learning_rate > 0.0) {
            return bad(format!("learning rate must be positive, got {}", self.learning_rate));
        }
        if self.epochs == 0 {
            return bad("epochs must be at least 1".into());
        }
        if !(0.0..1.0).contains(&self.theta) {
            return bad(format!("theta must be in [0, 1), got {}", self.theta));
        }
        if matches!(self.initial_dims, Some(d) if d < 2) {
            return bad("initial dims must be at least 2".into());
        }
        Ok(())
    }

    /// Largest perplexity bhtsne accepts for `n` rows, never above the
    /// configured one.
    pub fn effective_perplexity(&self, n: usize) -> f32 {
        let ceiling = (n.saturating_sub(1)) as f32 / 3.0 * 0.999;
        self.perplexity.min(ceiling)
    }
}

// ---------------------------------------------------------------------------
// TsneReducer – adapter over the bhtsne crate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TsneReducer {
    params: TsneParams,
}

impl TsneReducer {
    pub fn new(params: TsneParams) -> Self {
        TsneReducer { params }
    }
}

impl Reducer2D for TsneReducer {
    fn name(&self) -> &'static str {
        "t-sne"
    }

    fn reduce(&self, matrix: &EmbeddingMatrix) -> Result<Projection> {
        let n = matrix.len();
        if n == 0 {
            return Err(VizError::EmptyInput);
        }
        if n < MIN_ROWS {
            log::warn!("Only {n} points; t-SNE needs at least {MIN_ROWS}, using PCA instead");
            return PcaReducer.reduce(matrix);
        }

        let perplexity = self.params.effective_perplexity(n);
        if perplexity < self.params.perplexity {
            log::warn!(
                "Perplexity {} is too large for {n} points, lowered to {perplexity:.3}",
                self.params.perplexity
            );
        }

        let samples = matrix.to_f32_rows();
        let started = Instant::now();
        let mut tsne = bhtsne::tSNE::new(&samples);
        tsne.embedding_dim(2)
            .perplexity(perplexity)
            .epochs(self.params.epochs)
            .learning_rate(self.params.learning_rate);
        if self.params.theta > 0.0 {
            tsne.barnes_hut(self.params.theta, |a: &Vec<f32>, b: &Vec<f32>| euclidean(a, b));
        } else {
            tsne.exact(|a: &Vec<f32>, b: &Vec<f32>| euclidean(a, b));
        }
        let flat: Vec<f32> = tsne.embedding();

        if flat.len() != n * 2 {
            return Err(VizError::Reduction(format!(
                "expected {} coordinates from t-SNE, got {}",
                n * 2,
                flat.len()
            )));
        }
        let projection = Projection::new(
            flat.chunks_exact(2)
                .map(|p| [f64::from(p[0]), f64::from(p[1])])
                .collect(),
        );
        if !projection.is_finite() {
            return Err(VizError::Reduction("t-SNE produced non-finite coordinates".into()));
        }

        log::info!(
            "t-SNE embedded {n} points ({} dims, perplexity {perplexity:.1}, {} epochs) in {:.2?}",
            matrix.dims(),
            self.params.epochs,
            started.elapsed()
        );
        Ok(projection)
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}
