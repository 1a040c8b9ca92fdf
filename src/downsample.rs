//! Block-average a full-resolution surface into grid cells

use crate::color::Color;
use crate::grid::PixelGrid;
use crate::surface::DisplaySurface;

/// Mean color of a set of pixels.
///
/// Alpha is the plain mean. Color channels are weighted by alpha so transparent
/// pixels do not pull partially covered cells toward black. No pixels, or no
/// coverage at all, gives [`Color::TRANSPARENT`].
pub fn average(pixels: &[Color]) -> Color {
    if pixels.is_empty() {
        return Color::TRANSPARENT;
    }

    let (mut r, mut g, mut b, mut a) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for px in pixels {
        let w = f64::from(px.alpha());
        r += f64::from(px.red()) * w;
        g += f64::from(px.green()) * w;
        b += f64::from(px.blue()) * w;
        a += w;
    }
    if a <= 0.0 {
        return Color::TRANSPARENT;
    }

    Color::new(
        (r / a) as f32,
        (g / a) as f32,
        (b / a) as f32,
        (a / pixels.len() as f64) as f32,
    )
}

/// Writes the mean color of every cell's footprint on `source` into the grid
pub fn composite<S: DisplaySurface>(source: &S, grid: &mut PixelGrid) {
    let geometry = *grid.geometry();
    for cell in geometry.cells() {
        let block = geometry.cell_block(cell);
        grid.set_cell(cell, average(&source.read_block(block)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PixelBuffer;
    use crate::geometry::{CellIndex, GridGeometry, GridSpec, PixelBlock};
    use proptest::prelude::*;

    #[test]
    fn test_empty_and_transparent_average() {
        assert_eq!(average(&[]), Color::TRANSPARENT);
        assert_eq!(average(&[Color::TRANSPARENT; 4]), Color::TRANSPARENT);
    }

    #[test]
    fn test_half_covered_keeps_color() {
        let px = [Color::WHITE, Color::TRANSPARENT, Color::WHITE, Color::TRANSPARENT];
        let avg = average(&px);
        assert_eq!((avg.red(), avg.green(), avg.blue()), (255, 255, 255));
        assert!((avg.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_faint_coverage_stays_visible() {
        let mut px = vec![Color::TRANSPARENT; 400];
        px[0] = Color::WHITE.with_alpha(1.0 / 255.0);
        assert!(average(&px).alpha() > 0.0);
    }

    #[test]
    fn test_composite_fills_only_covered_cells() {
        let mut surface = PixelBuffer::with_size(40, 40);
        surface.fill_rect(PixelBlock { x0: 0, y0: 0, x1: 10, y1: 10 }, Color::rgb(200, 0, 0));
        let mut grid =
            PixelGrid::new(GridGeometry::new(40, 40, GridSpec::CellSize { size: 20 }).unwrap());
        composite(&surface, &mut grid);

        let hit = grid.cell(CellIndex::new(0, 0));
        assert_eq!(hit.red(), 200);
        assert!((hit.alpha() - 0.25).abs() < 1e-6);
        assert_eq!(grid.cell(CellIndex::new(1, 0)), Color::TRANSPARENT);
        assert_eq!(grid.cell(CellIndex::new(1, 1)), Color::TRANSPARENT);
    }

    proptest! {
        #[test]
        fn prop_uniform_block_averages_to_itself(
            r in 0u8..=255,
            g in 0u8..=255,
            b in 0u8..=255,
            a in 1u8..=255,
            n in 1usize..500,
        ) {
            let c = Color::from_rgba8([r, g, b, a]);
            let avg = average(&vec![c; n]);
            prop_assert_eq!(avg.to_rgba8(), c.to_rgba8());
        }
    }
}
