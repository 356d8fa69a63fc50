//! Measurement units used throughout the document model.
//!
//! All lengths are stored in twips (DXA, 1/20 of a point, 1/1440 inch) unless
//! noted otherwise. Font sizes are half-points and border widths are eighths
//! of a point, matching WordprocessingML.

use serde::{Deserialize, Serialize};

/// Twips per inch.
pub const TWIPS_PER_INCH: u32 = 1440;

/// Twips per typographic point.
pub const TWIPS_PER_POINT: u32 = 20;

/// Convert inches to twips, rounding to the nearest twip.
pub fn inches(value: f64) -> u32 {
    (value * TWIPS_PER_INCH as f64).round().max(0.0) as u32
}

/// Convert points to twips, rounding to the nearest twip.
pub fn points(value: f64) -> u32 {
    (value * TWIPS_PER_POINT as f64).round().max(0.0) as u32
}

/// Convert millimetres to twips, rounding to the nearest twip.
pub fn millimetres(value: f64) -> u32 {
    inches(value / 25.4)
}

/// A width as declared by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum WidthSpec {
    /// Let the consumer decide.
    #[default]
    Auto,
    /// Absolute width in twips.
    Dxa(u32),
    /// Percentage of the reference width (0-100).
    Percent(u16),
}

impl WidthSpec {
    /// Resolve to an absolute width against a reference width in twips.
    ///
    /// Returns `None` for [`WidthSpec::Auto`].
    pub fn to_twips(self, reference: u32) -> Option<u32> {
        match self {
            WidthSpec::Auto => None,
            WidthSpec::Dxa(w) => Some(w),
            WidthSpec::Percent(p) => {
                let p = u64::from(p.min(100));
                Some((u64::from(reference) * p / 100) as u32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(inches(1.0), 1440);
        assert_eq!(inches(8.5), 12240);
        assert_eq!(points(12.0), 240);
        assert_eq!(millimetres(210.0), 11906);
        assert_eq!(inches(-1.0), 0);
    }

    #[test]
    fn test_width_spec() {
        assert_eq!(WidthSpec::Auto.to_twips(9000), None);
        assert_eq!(WidthSpec::Dxa(2800).to_twips(9000), Some(2800));
        assert_eq!(WidthSpec::Percent(50).to_twips(9360), Some(4680));
        assert_eq!(WidthSpec::Percent(250).to_twips(9360), Some(9360));
    }
}
