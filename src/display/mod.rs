mod pixel_buffer;
#[cfg(feature = "window")]
mod window;

pub use pixel_buffer::{BufferFactory, PixelBuffer};
#[cfg(feature = "window")]
pub use window::{Display, InputEvent, MouseButtonKind, Presenter, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 560;
pub const DEFAULT_HEIGHT: u32 = 560;
