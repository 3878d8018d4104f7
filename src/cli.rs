use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::config::RunConfig;
use crate::data::loader::Delimiter;
use crate::data::model::Truncation;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "vocab-tsne",
    version,
    about = "Project word vectors to 2D with t-SNE and plot them",
    override_usage = "vocab-tsne [OPTIONS] <VOCAB> [LABELS] <OUTPUT> <NB_OF_POINTS>"
)]
pub struct Cli {
    /// VOCAB [LABELS] OUTPUT NB_OF_POINTS; give LABELS to annotate every point
    #[arg(value_name = "ARGS", num_args = 3..=4, required = true)]
    pub args: Vec<String>,

    /// Column separator of the vocabulary file
    #[arg(long, value_enum)]
    pub delimiter: Option<Delimiter>,

    /// t-SNE perplexity
    #[arg(long)]
    pub perplexity: Option<f32>,

    /// t-SNE learning rate
    #[arg(long)]
    pub learning_rate: Option<f32>,

    /// t-SNE iterations
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Barnes-Hut theta; 0 runs exact t-SNE
    #[arg(long)]
    pub theta: Option<f32>,

    /// Reduce to this many dimensions with PCA before t-SNE
    #[arg(long)]
    pub initial_dims: Option<usize>,

    /// Canvas width in pixels (before cropping)
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels (before cropping)
    #[arg(long)]
    pub height: Option<u32>,

    /// Marker area in px²
    #[arg(long)]
    pub marker_size: Option<f64>,

    /// Colour markers from blue (first row) to red (last row)
    #[arg(long)]
    pub color_by_rank: bool,

    /// Keep the full canvas instead of cropping to the content
    #[arg(long)]
    pub no_crop: bool,

    /// Open the image in the default viewer once written
    #[arg(long)]
    pub show: bool,

    /// Fail when NB_OF_POINTS exceeds the rows in VOCAB instead of plotting them all
    #[arg(long)]
    pub strict: bool,

    /// JSON file with `delimiter`, `tsne` and `plot` sections
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// What to do, decoded from the positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub vocab: PathBuf,
    pub labels: Option<PathBuf>,
    pub output: PathBuf,
    pub points: usize,
    pub truncation: Truncation,
    pub show: bool,
}

impl Cli {
    /// Split the positionals into the annotated (4) or plain (3) form.
    pub fn invocation(&self) -> std::result::Result<Invocation, clap::Error> {
        let (vocab, labels, output, count) = match self.args.as_slice() {
            [vocab, labels, output, count] => (vocab, Some(labels), output, count),
            [vocab, output, count] => (vocab, None, output, count),
            other => {
                return Err(Cli::command().error(
                    ErrorKind::WrongNumberOfValues,
                    format!("expected 3 or 4 arguments, got {}", other.len()),
                ));
            }
        };
        let points = count.parse::<usize>().map_err(|_| {
            Cli::command().error(
                ErrorKind::ValueValidation,
                format!("nb of points must be a non-negative integer, got '{count}'"),
            )
        })?;

        Ok(Invocation {
            vocab: PathBuf::from(vocab),
            labels: labels.map(PathBuf::from),
            output: PathBuf::from(output),
            points,
            truncation: if self.strict {
                Truncation::Strict
            } else {
                Truncation::Permissive
            },
            show: self.show,
        })
    }

    /// Defaults, overlaid by `--config`, overlaid by explicit flags.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(d) = self.delimiter {
            config.delimiter = d;
        }
        let tsne = &mut config.tsne;
        if let Some(v) = self.perplexity {
            tsne.perplexity = v;
        }
        if let Some(v) = self.learning_rate {
            tsne.learning_rate = v;
        }
        if let Some(v) = self.epochs {
            tsne.epochs = v;
        }
        if let Some(v) = self.theta {
            tsne.theta = v;
        }
        if self.initial_dims.is_some() {
            tsne.initial_dims = self.initial_dims;
        }
        let plot = &mut config.plot;
        if let Some(v) = self.width {
            plot.width = v;
        }
        if let Some(v) = self.height {
            plot.height = v;
        }
        if let Some(v) = self.marker_size {
            plot.marker_size = v;
        }
        if self.color_by_rank {
            plot.color_by_rank = true;
        }
        if self.no_crop {
            plot.crop = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("vocab-tsne").chain(args.iter().copied()))
    }

    #[test]
    fn four_positionals_select_the_annotated_form() {
        let inv = parse(&["vocab.txt", "labels.txt", "out.png", "500"])
            .unwrap()
            .invocation()
            .unwrap();
        assert_eq!(inv.vocab, PathBuf::from("vocab.txt"));
        assert_eq!(inv.labels, Some(PathBuf::from("labels.txt")));
        assert_eq!(inv.output, PathBuf::from("out.png"));
        assert_eq!(inv.points, 500);
        assert_eq!(inv.truncation, Truncation::Permissive);
    }

    #[test]
    fn three_positionals_select_the_plain_form() {
        let inv = parse(&["vocab.txt", "out.png", "10", "--strict"])
            .unwrap()
            .invocation()
            .unwrap();
        assert!(inv.labels.is_none());
        assert_eq!(inv.output, PathBuf::from("out.png"));
        assert_eq!(inv.truncation, Truncation::Strict);
    }

    #[test]
    fn too_few_positionals_is_a_usage_error() {
        let err = parse(&["vocab.txt", "out.png"]).unwrap_err();
        assert!(err.render().to_string().contains("Usage"));
    }

    #[test]
    fn too_many_positionals_is_rejected() {
        assert!(parse(&["a", "b", "c", "4", "e"]).is_err());
    }

    #[test]
    fn point_count_must_be_an_integer() {
        let err = parse(&["vocab.txt", "out.png", "many"])
            .unwrap()
            .invocation()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "v",
            "o.png",
            "5",
            "--perplexity",
            "5",
            "--theta",
            "0.5",
            "--delimiter",
            "comma",
            "--color-by-rank",
            "--no-crop",
            "--initial-dims",
            "10",
        ])
        .unwrap();
        let config = cli.run_config().unwrap();
        assert_eq!(config.tsne.perplexity, 5.0);
        assert_eq!(config.tsne.theta, 0.5);
        assert_eq!(config.tsne.learning_rate, 20.0);
        assert_eq!(config.tsne.initial_dims, Some(10));
        assert_eq!(config.delimiter, Delimiter::Comma);
        assert!(config.plot.color_by_rank);
        assert!(!config.plot.crop);
    }

    #[test]
    fn invalid_flag_values_fail_validation() {
        let cli = parse(&["v", "o.png", "5", "--epochs", "0"]).unwrap();
        assert!(cli.run_config().is_err());
    }

    #[test]
    fn flags_win_over_config_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tsne": {{ "perplexity": 12.0, "epochs": 250 }} }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["v", "o.png", "5", "--config", &path, "--perplexity", "7"]).unwrap();
        let config = cli.run_config().unwrap();
        assert_eq!(config.tsne.perplexity, 7.0);
        assert_eq!(config.tsne.epochs, 250);
    }
}
