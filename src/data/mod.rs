/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PenguinTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ PenguinTable │  Vec<Penguin>, species index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  body mass < threshold → row indices
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ summary  │   │ density  │  per-species count / KDE curves
///   └──────────┘   └──────────┘
/// ```

pub mod density;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
