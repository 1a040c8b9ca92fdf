//! Paints the grid onto the display surface

use crate::color::Color;
use crate::geometry::CellIndex;
use crate::grid::PixelGrid;
use crate::surface::DisplaySurface;

/// Alternating checkerboard colors behind the cells
pub const BACKGROUND: [Color; 2] = [Color::rgb(35, 35, 35), Color::rgb(0, 0, 0)];

/// Checkerboard color of a cell
#[inline]
pub fn checker(cell: CellIndex) -> Color {
    BACKGROUND[((cell.col + cell.row + 1) % 2) as usize]
}

/// Cell color as it appears on screen: the cell composited over its checker square
#[inline]
pub fn shade(grid: &PixelGrid, cell: CellIndex) -> Color {
    grid.cell(cell).over(checker(cell))
}

pub fn paint_cell<S: DisplaySurface>(surface: &mut S, grid: &PixelGrid, cell: CellIndex) {
    surface.fill_rect(grid.geometry().cell_block(cell), shade(grid, cell));
}

/// Repaint every cell, covering the whole surface
pub fn paint_all<S: DisplaySurface>(surface: &mut S, grid: &PixelGrid) {
    for cell in grid.geometry().cells() {
        paint_cell(surface, grid, cell);
    }
}
