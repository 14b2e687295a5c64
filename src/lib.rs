// Marker scanning module
pub mod marker;

// Document I/O module
pub mod document;

// Counting engine module
pub mod count;

// Renumbering engine module
pub mod renumber;

// Re-exports
pub use marker::{MarkerKind, MarkerOccurrence, extract_number, scan_line};
pub use document::{
    Document, DocumentError, append_report, list_documents, read_document, write_document,
};
pub use count::{FolioCount, Report, count, format_report};
pub use renumber::{Renumberer, renumber};
