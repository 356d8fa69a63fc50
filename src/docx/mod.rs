//! WordprocessingML (.docx) parts.
//!
//! Style and list registries together with the writers for the parts they
//! produce: `word/styles.xml`, `word/numbering.xml` and `word/document.xml`.

pub mod numbering;
pub mod styles;
mod writer;

pub use numbering::{
    Indent, LevelFormat, ListCounters, Marker, NumberingDefinition, NumberingLevel,
    NumberingRegistry,
};
pub use styles::{EffectiveStyle, StyleDefinition, StyleRegistry, ROOT_STYLE_ID};

pub(crate) use writer::write_package;
