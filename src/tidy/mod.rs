/// Tidy output: column selection and row emission.
///
/// ```text
///   ColumnSelection ──► columns::resolve_columns ──► Vec<Column>
///                                                       │
///   SampleRecord + CategoryTriple ──► writer::TidyWriter ◄┘ ──► CSV sink
/// ```

pub mod columns;
pub mod writer;
