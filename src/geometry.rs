//! Points, rectangles and grid geometry

use crate::error::{PadError, Result};
use serde::{Deserialize, Serialize};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Translate by `-dx, -dy`
    pub fn offset_by(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x - dx, self.y - dy)
    }
}

/// Axis-aligned rectangle in surface or screen units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Integer pixel block `[x0, x1) x [y0, y1)` on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBlock {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelBlock {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

/// Address of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub col: u32,
    pub row: u32,
}

impl CellIndex {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Row-major buffer index for a grid `cols` wide
    #[inline]
    pub fn to_index(self, cols: u32) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }
}

/// The parameterization the grid is derived from.
///
/// Exactly one form is authoritative; the other is recomputed from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSpec {
    /// Fixed cell counts; cell size follows the surface size
    Cells { cols: u32, rows: u32 },
    /// Fixed cell edge length; cell counts follow the surface size
    CellSize { size: u32 },
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec::Cells { cols: 10, rows: 10 }
    }
}

/// Grid layout over a surface, derived from a [`GridSpec`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    spec: GridSpec,
    surface_width: u32,
    surface_height: u32,
    cols: u32,
    rows: u32,
    cell_width: f32,
    cell_height: f32,
}

impl GridGeometry {
    /// Derive the grid for a surface. Rejects anything that would give an empty grid.
    pub fn new(surface_width: u32, surface_height: u32, spec: GridSpec) -> Result<Self> {
        if surface_width == 0 || surface_height == 0 {
            return Err(PadError::InvalidGeometry(format!(
                "surface must be non-empty, got {}x{}",
                surface_width, surface_height
            )));
        }

        let (cols, rows, cell_width, cell_height) = match spec {
            GridSpec::Cells { cols, rows } => {
                if cols == 0 || rows == 0 {
                    return Err(PadError::InvalidGeometry(format!(
                        "grid must have at least one cell, got {}x{}",
                        cols, rows
                    )));
                }
                // Every cell must cover at least one surface pixel
                if cols > surface_width || rows > surface_height {
                    return Err(PadError::InvalidGeometry(format!(
                        "{}x{} grid is finer than the {}x{} surface",
                        cols, rows, surface_width, surface_height
                    )));
                }
                (
                    cols,
                    rows,
                    surface_width as f32 / cols as f32,
                    surface_height as f32 / rows as f32,
                )
            },
            GridSpec::CellSize { size } => {
                if size == 0 {
                    return Err(PadError::InvalidGeometry(
                        "cell size must be positive".to_string(),
                    ));
                }
                (
                    surface_width.div_ceil(size),
                    surface_height.div_ceil(size),
                    size as f32,
                    size as f32,
                )
            },
        };

        if cols.checked_mul(rows).is_none() {
            return Err(PadError::InvalidGeometry(format!(
                "{}x{} grid has too many cells",
                cols, rows
            )));
        }

        Ok(Self {
            spec,
            surface_width,
            surface_height,
            cols,
            rows,
            cell_width,
            cell_height,
        })
    }

    #[inline]
    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    #[inline]
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    #[inline]
    pub fn surface_width(&self) -> u32 {
        self.surface_width
    }

    #[inline]
    pub fn surface_height(&self) -> u32 {
        self.surface_height
    }

    /// Number of cells (`rows * cols`)
    #[inline]
    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i64 && row < self.rows as i64
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| CellIndex::new(col, row)))
    }

    /// Cell containing the integer surface pixel `(px, py)`, clamped into the grid
    pub fn cell_at_pixel(&self, px: u32, py: u32) -> CellIndex {
        CellIndex::new(
            self.slot(px, self.surface_width, self.cols),
            self.slot(py, self.surface_height, self.rows),
        )
    }

    /// Screen-space footprint of a cell.
    ///
    /// Edges sit at `ceil(n * extent / count)`, so the block holds exactly the pixels
    /// [`cell_at_pixel`](Self::cell_at_pixel) maps to this cell. Partial trailing
    /// cells are clipped to the surface.
    pub fn cell_block(&self, cell: CellIndex) -> PixelBlock {
        PixelBlock {
            x0: self.edge(cell.col, self.surface_width, self.cols),
            y0: self.edge(cell.row, self.surface_height, self.rows),
            x1: self.edge(cell.col + 1, self.surface_width, self.cols),
            y1: self.edge(cell.row + 1, self.surface_height, self.rows),
        }
    }

    fn edge(&self, n: u32, extent: u32, count: u32) -> u32 {
        match self.spec {
            GridSpec::Cells { .. } => {
                (u64::from(n) * u64::from(extent)).div_ceil(u64::from(count)) as u32
            },
            GridSpec::CellSize { size } => n.saturating_mul(size).min(extent),
        }
    }

    fn slot(&self, p: u32, extent: u32, count: u32) -> u32 {
        let n = match self.spec {
            GridSpec::Cells { .. } => (u64::from(p) * u64::from(count) / u64::from(extent)) as u32,
            GridSpec::CellSize { size } => p / size,
        };
        n.min(count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_spec_derives_cell_size() {
        let g = GridGeometry::new(560, 560, GridSpec::Cells { cols: 28, rows: 28 }).unwrap();
        assert_eq!(g.cell_width(), 20.0);
        assert_eq!(g.cell_height(), 20.0);
        assert_eq!(g.len(), 784);
    }

    #[test]
    fn test_cell_size_spec_derives_counts() {
        let g = GridGeometry::new(500, 500, GridSpec::CellSize { size: 20 }).unwrap();
        assert_eq!((g.cols(), g.rows()), (25, 25));
        let g = GridGeometry::new(500, 500, GridSpec::CellSize { size: 25 }).unwrap();
        assert_eq!((g.cols(), g.rows()), (20, 20));
    }

    #[test]
    fn test_partial_trailing_cell_is_clipped() {
        let g = GridGeometry::new(560, 560, GridSpec::CellSize { size: 25 }).unwrap();
        assert_eq!(g.cols(), 23);
        let last = g.cell_block(CellIndex::new(22, 0));
        assert_eq!((last.x0, last.x1), (550, 560));
    }

    #[test]
    fn test_rejects_empty_geometry() {
        assert!(GridGeometry::new(560, 560, GridSpec::CellSize { size: 0 }).is_err());
        assert!(GridGeometry::new(560, 560, GridSpec::Cells { cols: 0, rows: 4 }).is_err());
        assert!(GridGeometry::new(0, 560, GridSpec::default()).is_err());
    }

    #[test]
    fn test_rejects_grid_finer_than_surface() {
        let err = GridGeometry::new(560, 560, GridSpec::Cells { cols: 70000, rows: 70000 });
        assert!(matches!(err, Err(PadError::InvalidGeometry(_))));
        assert!(GridGeometry::new(560, 560, GridSpec::Cells { cols: 561, rows: 1 }).is_err());
        assert!(GridGeometry::new(560, 560, GridSpec::Cells { cols: 560, rows: 560 }).is_ok());
    }

    #[test]
    fn test_cell_count_overflow_is_rejected() {
        let err = GridGeometry::new(u32::MAX, u32::MAX, GridSpec::Cells { cols: 70000, rows: 70000 });
        assert!(matches!(err, Err(PadError::InvalidGeometry(_))));
        let err = GridGeometry::new(u32::MAX, u32::MAX, GridSpec::CellSize { size: 1 });
        assert!(matches!(err, Err(PadError::InvalidGeometry(_))));
    }

    #[test]
    fn test_index_math_does_not_wrap() {
        assert_eq!(CellIndex::new(5, 70000).to_index(70000), 70000usize * 70000 + 5);
        let g = GridGeometry::new(u32::MAX, 1, GridSpec::CellSize { size: 1 }).unwrap();
        assert_eq!(g.len(), u32::MAX as usize);
    }

    #[test]
    fn test_cell_blocks_tile_the_surface() {
        let g = GridGeometry::new(400, 400, GridSpec::Cells { cols: 28, rows: 28 }).unwrap();
        let total: usize = g.cells().map(|c| g.cell_block(c).area()).sum();
        assert_eq!(total, 400 * 400);
        // Every pixel falls into the block of the cell it maps to
        for x in 0..400u32 {
            let cell = g.cell_at_pixel(x, x);
            let block = g.cell_block(cell);
            assert!(x >= block.x0 && x < block.x1, "pixel {} outside column {}", x, cell.col);
            assert!(x >= block.y0 && x < block.y1, "pixel {} outside row {}", x, cell.row);
        }
    }

    #[test]
    fn test_midpoint() {
        let m = Point::new(0.0, 0.0).midpoint(&Point::new(10.0, 4.0));
        assert_eq!(m, Point::new(5.0, 2.0));
    }
}
