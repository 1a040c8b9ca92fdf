//! Pixelated freehand drawing.
//!
//! Pointer strokes over a display surface are turned into a coarse grid of
//! color/intensity cells, e.g. the 28x28 input of a digit classifier. Samples either
//! stamp a 3x3 brush straight into the grid, or are drawn as a smoothed path on a
//! full-resolution shadow layer that is block-averaged into the grid.

pub mod brush;
pub mod color;
pub mod config;
#[cfg(unix)]
pub mod control;
pub mod display;
pub mod downsample;
pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod mapper;
pub mod publish;
pub mod render;
pub mod shadow;
pub mod smoother;
pub mod surface;

pub use brush::{BlendMode, BrushStamper};
pub use color::Color;
pub use config::{PadConfig, Pipeline};
pub use display::{BufferFactory, PixelBuffer};
pub use engine::PixelPad;
pub use error::{PadError, Result};
pub use events::PointerEvent;
pub use export::PixelSnapshot;
pub use geometry::{CellIndex, GridGeometry, GridSpec, PixelBlock, Point, Rect};
pub use grid::PixelGrid;
pub use mapper::CoordinateMapper;
pub use surface::{DisplaySurface, SurfaceConfig, SurfaceContainer, SurfaceFactory};
