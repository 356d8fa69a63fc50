//! Section (page setup) properties.

use serde::{Deserialize, Serialize};

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub(crate) fn ooxml_value(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Page size in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// US Letter, 8.5" x 11".
    pub const LETTER: PageSize = PageSize {
        width: 12240,
        height: 15840,
    };

    /// A4, 210mm x 297mm.
    pub const A4: PageSize = PageSize {
        width: 11906,
        height: 16838,
    };

    /// US Legal, 8.5" x 14".
    pub const LEGAL: PageSize = PageSize {
        width: 12240,
        height: 20160,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
    /// Distance from the page top to the header
    #[serde(default = "default_header_distance")]
    pub header: u32,
    /// Distance from the page bottom to the footer
    #[serde(default = "default_header_distance")]
    pub footer: u32,
    #[serde(default)]
    pub gutter: u32,
}

fn default_header_distance() -> u32 {
    720
}

impl PageMargins {
    /// The same margin on all four sides.
    pub fn uniform(margin: u32) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
            ..Default::default()
        }
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1440,
            bottom: 1440,
            left: 1440,
            header: 720,
            footer: 720,
            gutter: 0,
        }
    }
}

/// Page setup of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Page size as declared (width and height are not swapped for landscape)
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: PageMargins,
}

impl SectionProperties {
    /// Create section properties for a page size with default margins.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Use landscape orientation.
    pub fn landscape(mut self) -> Self {
        self.orientation = Orientation::Landscape;
        self
    }

    /// Set margins.
    pub fn margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }
}
