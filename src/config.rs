use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::loader::Delimiter;
use crate::error::{Result, VizError};
use crate::reduce::TsneParams;
use crate::render::PlotStyle;

// ---------------------------------------------------------------------------
// RunConfig – tunables shared by both CLI forms
// ---------------------------------------------------------------------------

/// Everything the pipeline needs besides the file paths and point count.
///
/// Resolution order: built-in defaults, then an optional JSON file, then
/// command-line flags. A partial JSON file is fine:
///
/// ```json
/// { "tsne": { "perplexity": 30.0 }, "plot": { "color_by_rank": true } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub delimiter: Delimiter,
    pub tsne: TsneParams,
    pub plot: PlotStyle,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| VizError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = serde_json::from_str(&text)
            .map_err(|e| VizError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tsne.validate()?;
        self.plot.validate()
    }
}
