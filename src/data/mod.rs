/// Data layer: core types, loading, registry, filtering and transforms.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  Dataset { current, baseline }, unique names
///   └──────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌──────────┐          ┌───────────┐
///   │  filter   │          │ transform │  log(current) → current,
///   └──────────┘          └───────────┘  old current → baseline
///   baseline + expressions → current
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod registry;
pub mod transform;
