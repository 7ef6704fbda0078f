//! PDF page access module.

mod layout;
mod lopdf_source;
mod source;

pub use lopdf_source::LopdfSource;
pub use source::{LayoutLine, LayoutSpan, PageSource};
