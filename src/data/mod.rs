/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (all cells as text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter   │ ◄── │ condition │  "price>=100" → (price, >=, 100)
///   └──────────┘     └───────────┘
///        │  rows passing the condition, original order
///        ▼
///   ┌───────────┐
///   │ aggregate │  avg / min / max / sum / count → AggregationResult
///   └───────────┘
/// ```

pub mod aggregate;
pub mod condition;
pub mod filter;
pub mod loader;
pub mod model;
