//! Page geometry of a section.

use crate::error::{Error, Result};
use crate::model::{Orientation, PageMargins, SectionProperties};
use serde::Serialize;

/// Absolute page geometry of one section, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedGeometry {
    /// Page width as laid out (the long edge in landscape)
    pub page_width: u32,
    /// Page height as laid out
    pub page_height: u32,
    pub orientation: Orientation,
    pub margins: PageMargins,
    /// Usable width between the left and right margins
    pub content_width: u32,
}

impl ResolvedGeometry {
    /// Usable height between the top and bottom margins.
    pub fn content_height(&self) -> u32 {
        self.page_height - self.margins.top - self.margins.bottom
    }
}

/// Resolve the page geometry of a section.
///
/// A landscape section whose declared size is portrait-shaped has its edges
/// swapped so that the width is the long edge.
pub fn resolve(props: &SectionProperties) -> Result<ResolvedGeometry> {
    let size = props.page_size;
    if size.width == 0 || size.height == 0 {
        return Err(Error::InvalidPageGeometry(format!(
            "page size {}x{} has a zero edge",
            size.width, size.height
        )));
    }

    let (page_width, page_height) = match props.orientation {
        Orientation::Landscape if size.width < size.height => (size.height, size.width),
        _ => (size.width, size.height),
    };

    let margins = props.margins;
    let horizontal = u64::from(margins.left) + u64::from(margins.right) + u64::from(margins.gutter);
    if horizontal >= u64::from(page_width) {
        return Err(Error::InvalidPageGeometry(format!(
            "horizontal margins {} leave no room on a page {} wide",
            horizontal, page_width
        )));
    }
    let vertical = u64::from(margins.top) + u64::from(margins.bottom);
    if vertical >= u64::from(page_height) {
        return Err(Error::InvalidPageGeometry(format!(
            "vertical margins {} leave no room on a page {} high",
            vertical, page_height
        )));
    }

    Ok(ResolvedGeometry {
        page_width,
        page_height,
        orientation: props.orientation,
        margins,
        content_width: page_width - horizontal as u32,
    })
}
