//! Dimensionality reduction down to the plane.

pub mod pca;
pub mod tsne;

use crate::data::model::{EmbeddingMatrix, Projection};
use crate::error::Result;

pub use pca::{Pca, PcaReducer};
pub use tsne::{TsneParams, TsneReducer};

/// A backend that maps an N × D matrix to N × 2 coordinates.
///
/// Implementations must return exactly one point per input row, in order.
pub trait Reducer2D {
    fn name(&self) -> &'static str;

    fn reduce(&self, matrix: &EmbeddingMatrix) -> Result<Projection>;
}
