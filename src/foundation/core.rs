pub use kurbo::Size;

/// A 2D point as it appears on the wire (`{"pointX": .., "pointY": ..}`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    #[serde(rename = "pointX")]
    pub x: f64,
    /// Vertical coordinate.
    #[serde(rename = "pointY")]
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates multiplied by `k`.
    pub fn scaled(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }

    /// Midpoint between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Axis-aligned rectangle in `{x, y, width, height}` form.
///
/// Used both for pixel rectangles (hyperlink targets) and for normalized
/// `[0, 1]` source-image crops (`contentsRect`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectValue {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl RectValue {
    /// Construct a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// All four components multiplied by `k`.
    pub fn scaled(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            width: self.width * k,
            height: self.height * k,
        }
    }

    /// `true` when the crop covers the whole source image (single-tile).
    pub fn is_unit(self) -> bool {
        self.width == 1.0 && self.height == 1.0
    }

    /// Tile column/row this crop selects, inferred from its offset over its extent.
    pub fn grid_cell(self) -> (u32, u32) {
        (cell_index(self.x, self.width), cell_index(self.y, self.height))
    }
}

fn cell_index(offset: f64, extent: f64) -> u32 {
    if extent <= 0.0 || !extent.is_finite() {
        return 0;
    }
    let idx = (offset / extent).round();
    if idx.is_finite() && idx > 0.0 {
        idx.min(f64::from(u32::MAX - 1)) as u32
    } else {
        0
    }
}
