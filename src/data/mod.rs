/// Data layer: core types, loading, and writing.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SampleTable (shape validated)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SampleTable │  x-axis + dataset columns
///   └─────────────┘
///        │  integrate::integrate_with, once per BoundRange
///        ▼
///   ┌─────────────┐
///   │ ResultTable │  ranges × datasets
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  ResultTable → .csv / .tsv / .json / .parquet
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
