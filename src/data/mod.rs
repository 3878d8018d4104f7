/// Data layer: core types and file loading.
///
/// Architecture:
/// ```text
///  vocab.txt            labels.txt
///      │                    │
///      ▼                    ▼
///   ┌──────────────────────────┐
///   │  loader                   │  skip header, parse rows / lines
///   └──────────────────────────┘
///      │                    │
///      ▼                    ▼
///   EmbeddingMatrix       Labels      truncate to the first N
///      │
///      ▼
///   reduce ──► Projection (N × 2)
/// ```

pub mod loader;
pub mod model;
