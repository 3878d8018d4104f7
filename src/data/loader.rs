use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::model::{EmbeddingMatrix, Labels, MatrixHeader};
use crate::error::{Result, VizError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Column separator of the vocabulary matrix file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Runs of spaces or tabs (what `saveToFileCSV` writes).
    #[default]
    Whitespace,
    /// Comma-separated values.
    Comma,
}

/// Load a vocabulary matrix. The first line is always treated as a header
/// and skipped; blank lines and `#` comments in the body are ignored.
pub fn load_matrix(path: &Path, delimiter: Delimiter) -> Result<EmbeddingMatrix> {
    let matrix = match delimiter {
        Delimiter::Whitespace => load_whitespace(path)?,
        Delimiter::Comma => load_csv(path)?,
    };

    if let Some(header) = matrix.header() {
        if header.cols != matrix.dims() || header.rows != matrix.len() {
            log::warn!(
                "{}: header '{header}' disagrees with the body ({} rows x {} dims)",
                path.display(),
                matrix.len(),
                matrix.dims()
            );
        }
    }
    log::debug!(
        "Loaded {} rows x {} dims from {}",
        matrix.len(),
        matrix.dims(),
        path.display()
    );
    Ok(matrix)
}

/// Load one label per line, surrounding whitespace stripped, order kept.
pub fn load_labels(path: &Path) -> Result<Labels> {
    let text = read_text(path)?;
    let labels = text.lines().map(|line| line.trim().to_string()).collect();
    Ok(Labels::new(labels))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| VizError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Whitespace loader
// ---------------------------------------------------------------------------

fn load_whitespace(path: &Path) -> Result<EmbeddingMatrix> {
    let text = read_text(path)?;
    let mut lines = text.lines();
    let header_line = lines.next().ok_or_else(|| VizError::EmptyFile {
        path: path.to_path_buf(),
    })?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    // Line numbers are 1-based and count the header.
    for (idx, raw) in lines.enumerate() {
        let line_no = idx + 2;
        let body = strip_comment(raw);
        if body.trim().is_empty() {
            continue;
        }
        let row = parse_fields(body.split_whitespace(), path, line_no)?;
        check_width(&mut width, row.len(), path, line_no)?;
        rows.push(row);
    }

    Ok(EmbeddingMatrix::from_rows(rows)?.with_header(MatrixHeader::parse(header_line)))
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<EmbeddingMatrix> {
    let text = read_text(path)?;
    if text.lines().next().is_none() {
        return Err(VizError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let csv_err = |source: csv::Error| VizError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let header_line = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .collect::<Vec<_>>()
        .join(" ");

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let line_no = record.position().map_or(0, |p| p.line() as usize);
        if record.iter().all(str::is_empty) {
            continue;
        }
        let mut fields: Vec<&str> = record.iter().collect();
        // A trailing comma leaves an empty last field; any other empty field
        // is a missing value and fails to parse.
        if fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        let row = parse_fields(fields.into_iter(), path, line_no)?;
        check_width(&mut width, row.len(), path, line_no)?;
        rows.push(row);
    }

    Ok(EmbeddingMatrix::from_rows(rows)?.with_header(MatrixHeader::parse(&header_line)))
}

// -- shared helpers --

fn parse_fields<'a>(
    fields: impl Iterator<Item = &'a str>,
    path: &Path,
    line: usize,
) -> Result<Vec<f64>> {
    fields
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| VizError::Parse {
                path: path.to_path_buf(),
                line,
                token: tok.to_string(),
            })
        })
        .collect()
}

fn check_width(width: &mut Option<usize>, found: usize, path: &Path, line: usize) -> Result<()> {
    match *width {
        None => {
            *width = Some(found);
            Ok(())
        }
        Some(expected) if expected == found => Ok(()),
        Some(expected) => Err(VizError::RaggedRow {
            path: path.to_path_buf(),
            line,
            expected,
            found,
        }),
    }
}
