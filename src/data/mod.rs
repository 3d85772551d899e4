/// Data layer: core types, loading, and export.
///
/// Architecture:
/// ```text
///  .mseed
///    │
///    ▼
///   ┌──────────┐
///   │  loader   │  libmseed records → trace list → traces
///   └──────────┘
///    │
///    ▼
///   ┌──────────┐
///   │  Stream   │  Vec<Trace>, non-empty only
///   └──────────┘
///    │
///    ▼
///   ┌──────────┐
///   │  export   │  trace → CSV, stats → JSON
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod model;
