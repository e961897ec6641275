/// Data layer: core types, document extraction, and reference resolution.
///
/// Architecture:
/// ```text
///  drink .xml            category .xml
///        │                     │
///        ▼                     ▼
///   ┌──────────┐         ┌──────────┐
///   │  loader   │         │ category  │  name → identifier
///   └──────────┘         └──────────┘
///        │  ▲                  │
///        │  └── baseline       │   dark/white → one broadcast profile
///        ▼                     ▼
///   ┌──────────────┐   ┌────────────────┐
///   │ SampleRecord  │   │ CategoryTriple  │
///   └──────────────┘   └────────────────┘
/// ```

pub mod baseline;
pub mod category;
pub mod loader;
pub mod model;
