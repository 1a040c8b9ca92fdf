//! Pointer space to grid cell mapping

use crate::geometry::{CellIndex, GridGeometry, Point};

/// Bezel compensation applied to every pointer sample
pub const DEFAULT_MARGIN: f32 = 10.0;

/// Converts pointer positions into grid cells.
///
/// A position is first made surface-local (device margin, then the surface origin are
/// subtracted) and bounds-checked against the surface before any division happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    margin: f32,
}

impl CoordinateMapper {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Surface-local position of an absolute pointer position
    pub fn to_local(&self, point: Point, origin: Point) -> Point {
        point
            .offset_by(self.margin, self.margin)
            .offset_by(origin.x, origin.y)
    }

    /// Whether a surface-local point lies inside `[0, width) x [0, height)`
    pub fn in_surface(&self, local: Point, geometry: &GridGeometry) -> bool {
        local.x >= 0.0
            && local.y >= 0.0
            && local.x < geometry.surface_width() as f32
            && local.y < geometry.surface_height() as f32
    }

    /// Cell under an absolute pointer position, or `None` when it falls off the surface.
    ///
    /// `None` is a no-op signal: callers skip the sample.
    pub fn map_to_cell(
        &self,
        point: Point,
        origin: Point,
        geometry: &GridGeometry,
    ) -> Option<CellIndex> {
        self.local_to_cell(self.to_local(point, origin), geometry)
    }

    /// Cell under a point that is already surface-local
    pub fn local_to_cell(&self, local: Point, geometry: &GridGeometry) -> Option<CellIndex> {
        if !self.in_surface(local, geometry) {
            return None;
        }
        // Sub-pixel positions resolve to the device pixel they sit in
        Some(geometry.cell_at_pixel(local.x.floor() as u32, local.y.floor() as u32))
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}
