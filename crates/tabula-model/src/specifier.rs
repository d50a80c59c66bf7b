//! Column specifiers.

/// Identifies a table column by position, accessor, or header text.
///
/// Lookups by accessor resolve through the table's accessor mapping;
/// lookups by header resolve through the header row and require the
/// table to carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSpecifier<'a> {
    /// Zero-based column index.
    Index(usize),
    /// Accessor name registered on the table.
    Accessor(&'a str),
    /// Header cell text.
    Header(&'a str),
}

impl From<usize> for ColumnSpecifier<'static> {
    fn from(index: usize) -> Self {
        ColumnSpecifier::Index(index)
    }
}
