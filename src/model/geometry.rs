//! Slide geometry in English Metric Units.

use serde::{Deserialize, Serialize};

/// English Metric Unit, 1/914400 inch.
pub type Emu = i64;

/// EMUs per inch.
pub const EMU_PER_INCH: Emu = 914_400;

/// EMUs per typographic point.
pub const EMU_PER_POINT: Emu = 12_700;

/// Convert inches to EMU.
pub fn inches(value: f64) -> Emu {
    (value * EMU_PER_INCH as f64).round() as Emu
}

/// Convert points to EMU.
pub fn points(value: f64) -> Emu {
    (value * EMU_PER_POINT as f64).round() as Emu
}

/// Convert a pixel length to EMU at the given resolution.
pub fn pixels_to_emu(pixels: u32, dpi: f64) -> Emu {
    if dpi <= 0.0 {
        return 0;
    }
    (pixels as f64 * EMU_PER_INCH as f64 / dpi).round() as Emu
}

/// An axis-aligned rectangle on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    /// Create a rectangle from EMU values.
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle from inch values.
    pub fn from_inches(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(inches(left), inches(top), inches(width), inches(height))
    }

    /// Right edge.
    pub fn right(&self) -> Emu {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> Emu {
        self.top + self.height
    }

    /// Check if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Slide dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: Emu,
    pub height: Emu,
}

impl SlideSize {
    /// 13.33 x 7.5 inch widescreen slide.
    pub fn widescreen() -> Self {
        Self {
            width: inches(13.33),
            height: inches(7.5),
        }
    }

    /// 10 x 7.5 inch standard slide.
    pub fn standard() -> Self {
        Self {
            width: inches(10.0),
            height: inches(7.5),
        }
    }

    /// Full-slide rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::widescreen()
    }
}
