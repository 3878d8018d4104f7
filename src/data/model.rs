use std::fmt;

use crate::error::{Result, VizError};

// ---------------------------------------------------------------------------
// MatrixHeader – the first line of a saved vocabulary matrix
// ---------------------------------------------------------------------------

/// Shape line written by EJML's `saveToFileCSV`: `<rows> <cols> <type>`.
///
/// The loader always skips the first line; this is only kept when the line
/// actually has that form, so the body can be checked against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixHeader {
    pub rows: usize,
    pub cols: usize,
    /// Element type tag, `real` in every file we have seen.
    pub kind: String,
}

impl MatrixHeader {
    /// Parse a header line, returning `None` for anything that is not a shape line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty());
        let rows = fields.next()?.parse().ok()?;
        let cols = fields.next()?.parse().ok()?;
        let kind = fields.next()?.to_string();
        if fields.next().is_some() || kind.parse::<f64>().is_ok() {
            return None;
        }
        Some(MatrixHeader { rows, cols, kind })
    }
}

impl fmt::Display for MatrixHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rows, self.cols, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Truncation policy
// ---------------------------------------------------------------------------

/// What [`EmbeddingMatrix::truncate`] does when asked for more rows than it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    /// Keep every available row.
    #[default]
    Permissive,
    /// Fail with [`VizError::TooFewRows`].
    Strict,
}

// ---------------------------------------------------------------------------
// EmbeddingMatrix – one row per vocabulary entry
// ---------------------------------------------------------------------------

/// Dense row-major matrix of word vectors. Every row has `dims` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    rows: Vec<Vec<f64>>,
    dims: usize,
    header: Option<MatrixHeader>,
}

impl EmbeddingMatrix {
    /// Build a matrix from rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dims = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dims) {
            return Err(VizError::RaggedRow {
                path: "<memory>".into(),
                line: i + 1,
                expected: dims,
                found: row.len(),
            });
        }
        Ok(EmbeddingMatrix {
            rows,
            dims,
            header: None,
        })
    }

    pub(crate) fn with_header(mut self, header: Option<MatrixHeader>) -> Self {
        self.header = header;
        self
    }

    /// Number of rows (points).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Original dimensionality of each row.
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    pub fn header(&self) -> Option<&MatrixHeader> {
        self.header.as_ref()
    }

    /// Keep only the first `n` rows. Returns the number of rows kept.
    pub fn truncate(&mut self, n: usize, policy: Truncation) -> Result<usize> {
        if n > self.rows.len() {
            match policy {
                Truncation::Strict => {
                    return Err(VizError::TooFewRows {
                        requested: n,
                        available: self.rows.len(),
                    });
                }
                Truncation::Permissive => {
                    log::warn!(
                        "Requested {n} points but the matrix only has {} rows; plotting all",
                        self.rows.len()
                    );
                }
            }
        }
        self.rows.truncate(n);
        Ok(self.rows.len())
    }

    /// Rows converted to `f32`, the precision the t-SNE backend runs in.
    pub fn to_f32_rows(&self) -> Vec<Vec<f32>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&v| v as f32).collect())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Labels – one string per matrix row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new(labels: Vec<String>) -> Self {
        Labels(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn truncate(&mut self, n: usize) {
        self.0.truncate(n);
    }

    /// Every plotted point needs a label; surplus labels are fine.
    pub fn ensure_covers(&self, points: usize) -> Result<()> {
        if self.0.len() < points {
            return Err(VizError::LabelMismatch {
                points,
                labels: self.0.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Projection – the 2D output of a reducer
// ---------------------------------------------------------------------------

/// Inclusive data-space extent of a projection, padded for plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// N × 2 coordinates; row `i` belongs to matrix row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    points: Vec<[f64; 2]>,
}

impl Projection {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Projection { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p[0].is_finite() && p[1].is_finite())
    }

    /// Data extent grown by `margin` (a fraction of the span) on each side.
    /// Degenerate spans are widened to 1.0 so the chart range is never empty.
    pub fn bounds(&self, margin: f64) -> Option<Bounds> {
        if self.points.is_empty() {
            return None;
        }
        let axis = |k: usize| {
            let min = self.points.iter().map(|p| p[k]).fold(f64::INFINITY, f64::min);
            let max = self.points.iter().map(|p| p[k]).fold(f64::NEG_INFINITY, f64::max);
            let span = max - min;
            if span.abs() < f64::EPSILON {
                (min - 0.5, max + 0.5)
            } else {
                (min - span * margin, max + span * margin)
            }
        };
        Some(Bounds { x: axis(0), y: axis(1) })
    }
}
