//! Declarative document model.
//!
//! This module defines the content tree handed to the compiler: sections own
//! block-level nodes, paragraphs own text runs, tables own rows of cells, and
//! cells own further blocks. Nodes carry formatting verbatim; nothing here
//! resolves styles or geometry.

mod document;
mod paragraph;
mod section;
mod table;

pub use document::*;
pub use paragraph::*;
pub use section::*;
pub use table::*;
