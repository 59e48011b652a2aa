use crate::{
    foundation::core::{Point, RectValue, Size},
    foundation::error::{ShowError, ShowResult},
    model::script::Layer,
    quirks::names,
};

/// Effects whose layer tree is a grid of cropped tiles that must be re-cut on rescale.
pub const TILE_EFFECTS: [&str; 2] = [names::BLINDS, names::MOSAIC_FLIP];

/// Largest column or row count a tile grid may have.
pub const MAX_TILE_CELLS: u32 = 1024;

/// `true` for effect names laid out as a tile grid.
pub fn is_tile_effect(name: &str) -> bool {
    TILE_EFFECTS.contains(&name)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Column/row counts of a tile grid.
pub struct TileGrid {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl TileGrid {
    /// Infer the grid from sibling tile crops: max observed column/row index + 1.
    ///
    /// Layers without a crop rectangle do not contribute. A crop that is not finite, or
    /// that selects a cell beyond [`MAX_TILE_CELLS`], is a structure error.
    pub fn infer(tiles: &[Layer]) -> ShowResult<Self> {
        let (mut max_col, mut max_row) = (0, 0);
        for rect in tiles.iter().filter_map(|l| l.initial_state.contents_rect) {
            let finite = [rect.x, rect.y, rect.width, rect.height]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(ShowError::structure(format!(
                    "tile crop {rect:?} is not finite"
                )));
            }
            let (col, row) = rect.grid_cell();
            if col >= MAX_TILE_CELLS || row >= MAX_TILE_CELLS {
                return Err(ShowError::structure(format!(
                    "tile crop {rect:?} selects cell ({col}, {row}) outside a \
                     {MAX_TILE_CELLS}x{MAX_TILE_CELLS} grid"
                )));
            }
            max_col = max_col.max(col);
            max_row = max_row.max(row);
        }
        Ok(Self {
            cols: max_col + 1,
            rows: max_row + 1,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Pixel placement and source crop of one tile.
pub struct TilePlacement {
    /// Tile size in pixels.
    pub size: Size,
    /// Tile center (layers are center-anchored).
    pub position: Point,
    /// Normalized crop selecting this tile's region of the source image.
    pub contents_rect: RectValue,
}

/// Placement of tile `(col, row)` in a `grid` cut from a `show`-sized image.
///
/// Tiles are `floor(show / count)` wide/tall; the last column and row absorb the
/// remainder so the grid covers the show exactly.
pub fn tile_rect(show: Size, col: u32, row: u32, grid: TileGrid) -> TilePlacement {
    let (width, tile_w) = span(show.width, col, grid.cols);
    let (height, tile_h) = span(show.height, row, grid.rows);
    let x = tile_w * f64::from(col);
    let y = tile_h * f64::from(row);
    TilePlacement {
        size: Size::new(width, height),
        position: Point::new(x + width / 2.0, y + height / 2.0),
        contents_rect: RectValue::new(
            x / show.width,
            y / show.height,
            width / show.width,
            height / show.height,
        ),
    }
}

/// `(this tile's extent, regular tile extent)` along one axis.
fn span(total: f64, idx: u32, count: u32) -> (f64, f64) {
    let count = count.max(1);
    let regular = (total / f64::from(count)).floor();
    if idx.saturating_add(1) == count {
        (total - regular * f64::from(count - 1), regular)
    } else {
        (regular, regular)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scale/tiles.rs"]
mod tests;
