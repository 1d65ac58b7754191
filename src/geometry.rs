//! Page and tile dimensions. All lengths are PDF points (1 pt = 1/72 inch).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const POINTS_PER_INCH: f32 = 72.0;

/// Default page margin in points.
pub const PAGE_MARGIN_PT: f32 = 24.0;

/// US Letter in inches (width, height).
pub const US_LETTER_IN: (f32, f32) = (8.5, 11.0);

/// Standard playing card in inches (width, height).
pub const PLAYING_CARD_IN: (f32, f32) = (2.5, 3.7);

/// Smallest tile edge accepted, in points.
pub const MIN_TILE_PT: f32 = 1.0;

/// Convert inches to points.
pub fn inches(value: f32) -> f32 {
    value * POINTS_PER_INCH
}

/// Page orientation; `Landscape` swaps width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// Height > width (default).
    #[default]
    Portrait,
    Landscape,
}

/// A physical page with a uniform margin on all four sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    width: f32,
    height: f32,
    margin: f32,
}

impl PageGeometry {
    /// Validated constructor.
    ///
    /// Width and height must be positive and the margin non-negative, with
    /// room left over on both axes once the margin is taken off each side.
    pub fn new(width: f32, height: f32, margin: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && margin.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "page dimensions must be finite (width={width}, height={height}, margin={margin})"
            )));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "page width and height must be positive (got {width}x{height})"
            )));
        }
        if margin < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "margin must not be negative (got {margin})"
            )));
        }
        if margin * 2.0 >= width || margin * 2.0 >= height {
            return Err(Error::InvalidGeometry(format!(
                "margin {margin} leaves no printable area on a {width}x{height} page"
            )));
        }
        Ok(Self {
            width,
            height,
            margin,
        })
    }

    /// US Letter portrait with the default margin.
    pub fn us_letter() -> Self {
        Self {
            width: inches(US_LETTER_IN.0),
            height: inches(US_LETTER_IN.1),
            margin: PAGE_MARGIN_PT,
        }
    }

    /// The same page turned on its side.
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
            margin: self.margin,
        }
    }

    pub fn oriented(&self, orientation: PageOrientation) -> Self {
        match orientation {
            PageOrientation::Portrait => *self,
            PageOrientation::Landscape => self.rotated(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

/// Footprint reserved for one card image on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    width: f32,
    height: f32,
}

impl Tile {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "tile width and height must be positive (got {width}x{height})"
            )));
        }
        if width < MIN_TILE_PT || height < MIN_TILE_PT {
            return Err(Error::InvalidGeometry(format!(
                "tile edges must be at least {MIN_TILE_PT} pt (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    /// Tile sized in inches rather than points.
    pub fn from_inches(width_in: f32, height_in: f32) -> Result<Self> {
        Self::new(inches(width_in), inches(height_in))
    }

    pub fn playing_card() -> Self {
        Self {
            width: inches(PLAYING_CARD_IN.0),
            height: inches(PLAYING_CARD_IN.1),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}
