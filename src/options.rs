//! Package compilation options.

use crate::layout::{LayoutDefaults, ResolvedMargins};

/// How package parts are stored in the zip container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression
    Stored,
    /// Deflate, as word processors write
    #[default]
    Deflated,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Stored => zip::CompressionMethod::Stored,
            Compression::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

/// Options for compiling a document into a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    /// Compression of package parts
    pub compression: Compression,

    /// Indent XML parts (larger output, easier to diff)
    pub pretty_xml: bool,

    /// Cell margins used when neither a cell nor its table sets one
    pub default_cell_margins: ResolvedMargins,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            pretty_xml: false,
            default_cell_margins: ResolvedMargins::default(),
        }
    }
}

impl PackOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for inspecting output: stored parts, indented XML.
    pub fn debug() -> Self {
        Self {
            compression: Compression::Stored,
            pretty_xml: true,
            ..Default::default()
        }
    }

    /// Set compression.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Enable or disable indented XML.
    pub fn with_pretty_xml(mut self, pretty: bool) -> Self {
        self.pretty_xml = pretty;
        self
    }

    /// Set the fallback cell margins.
    pub fn with_default_cell_margins(mut self, margins: ResolvedMargins) -> Self {
        self.default_cell_margins = margins;
        self
    }

    pub(crate) fn layout_defaults(&self) -> LayoutDefaults {
        LayoutDefaults {
            cell_margins: self.default_cell_margins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = PackOptions::default();
        assert_eq!(opts.compression, Compression::Deflated);
        assert!(!opts.pretty_xml);
        assert_eq!(opts.default_cell_margins.left, 108);
        assert_eq!(opts.default_cell_margins.top, 0);
    }

    #[test]
    fn test_builder_chain() {
        let margins = ResolvedMargins {
            top: 80,
            bottom: 80,
            left: 120,
            right: 120,
        };
        let opts = PackOptions::new()
            .with_compression(Compression::Stored)
            .with_pretty_xml(true)
            .with_default_cell_margins(margins);
        assert_eq!(opts.compression, Compression::Stored);
        assert!(opts.pretty_xml);
        assert_eq!(opts.layout_defaults().cell_margins, margins);
    }

    #[test]
    fn test_debug_preset() {
        let opts = PackOptions::debug();
        assert_eq!(opts.compression, Compression::Stored);
        assert!(opts.pretty_xml);
    }
}
