//! Full-resolution offscreen layer for smoothed strokes

use crate::display::PixelBuffer;
use crate::smoother::{Stroke, StrokeSmoother};
use crate::surface::DisplaySurface;

/// Offscreen RGBA layer the size of the display surface.
///
/// `committed` holds finished strokes, `live` is `committed` plus the stroke in
/// progress. Each redraw starts from the committed layer, so re-rendering a growing
/// stroke never accumulates coverage.
#[derive(Debug, Clone)]
pub struct ShadowSurface {
    committed: PixelBuffer,
    live: PixelBuffer,
}

impl ShadowSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            committed: PixelBuffer::with_size(width, height),
            live: PixelBuffer::with_size(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.live.width()
    }

    pub fn height(&self) -> u32 {
        self.live.height()
    }

    /// Current contents, including the stroke in progress
    pub fn live(&self) -> &PixelBuffer {
        &self.live
    }

    /// Replace the in-progress stroke with a fresh rendering of `stroke`
    pub fn redraw(&mut self, smoother: &StrokeSmoother, stroke: &Stroke) {
        self.live.copy_from(&self.committed);
        smoother.render(stroke, &mut self.live);
    }

    /// Keep the in-progress stroke
    pub fn commit(&mut self) {
        self.committed.copy_from(&self.live);
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.live.clear();
    }
}
