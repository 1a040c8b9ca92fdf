//! The authoritative cell buffer

use crate::color::Color;
use crate::geometry::{CellIndex, GridGeometry, GridSpec};
use crate::error::Result;

/// Value every cell holds after construction, resize and reset
pub const BASELINE: Color = Color::TRANSPARENT;

/// Row-major grid of cell colors, `index = row * cols + col`.
///
/// `cells.len() == geometry.len()` at all times; the buffer is replaced wholesale on
/// resize so no borrow of the old cells can survive it.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    geometry: GridGeometry,
    cells: Vec<Color>,
}

impl PixelGrid {
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            cells: vec![BASELINE; geometry.len()],
            geometry,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Re-derive the geometry from a new spec and reallocate every cell to baseline.
    ///
    /// On error the grid is left untouched.
    pub fn resize(&mut self, spec: GridSpec) -> Result<()> {
        let geometry = GridGeometry::new(
            self.geometry.surface_width(),
            self.geometry.surface_height(),
            spec,
        )?;
        self.cells = vec![BASELINE; geometry.len()];
        self.geometry = geometry;
        Ok(())
    }

    /// Every cell back to baseline, geometry unchanged
    pub fn reset(&mut self) {
        self.cells.fill(BASELINE);
    }

    /// Color of an in-grid cell
    #[inline]
    pub fn cell(&self, cell: CellIndex) -> Color {
        self.cells[cell.to_index(self.geometry.cols())]
    }

    #[inline]
    pub fn set_cell(&mut self, cell: CellIndex, color: Color) {
        let idx = cell.to_index(self.geometry.cols());
        self.cells[idx] = color;
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Whether every cell holds the baseline value
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| *c == BASELINE)
    }
}
