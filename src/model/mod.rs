//! Data model for outlines, paragraphs and document metadata.

mod metadata;
mod outline;
mod paragraph;

pub use metadata::{DocumentMetadata, DocumentSummary, IngestOutcome};
pub use outline::{HeadingLevel, Outline, OutlineEntry};
pub use paragraph::{Paragraph, ParagraphMeta};
