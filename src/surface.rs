//! Collaborator interfaces between the engine and whatever displays it

use crate::color::Color;
use crate::error::Result;
use crate::geometry::PixelBlock;

/// Size of the surface a factory should create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

/// A pixel-addressable drawing target.
///
/// Blocks are clipped to the surface; reads return pixels row-major.
pub trait DisplaySurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_rect(&mut self, block: PixelBlock, color: Color);

    fn read_block(&self, block: PixelBlock) -> Vec<Color>;

    fn write_block(&mut self, block: PixelBlock, pixels: &[Color]);

    /// Every pixel back to transparent
    fn clear(&mut self) {
        let block = PixelBlock {
            x0: 0,
            y0: 0,
            x1: self.width(),
            y1: self.height(),
        };
        let blank = vec![Color::TRANSPARENT; block.area()];
        self.write_block(block, &blank);
    }
}

/// Creates the display surface at engine construction
pub trait SurfaceFactory {
    type Surface: DisplaySurface;

    fn create(&self, config: &SurfaceConfig) -> Result<Self::Surface>;
}

/// Receives the display surface each time the engine is rendered into it
pub trait SurfaceContainer<S: DisplaySurface> {
    fn append(&mut self, surface: &S) -> Result<()>;
}

/// Container that keeps a copy of every surface appended to it
impl<S: DisplaySurface + Clone> SurfaceContainer<S> for Vec<S> {
    fn append(&mut self, surface: &S) -> Result<()> {
        self.push(surface.clone());
        Ok(())
    }
}
