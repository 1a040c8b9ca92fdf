//! The drawing pad: pointer input in, pixel grid out

use crate::brush::{neighborhood, BrushStamper};
use crate::color::Color;
use crate::config::{PadConfig, Pipeline};
use crate::display::PixelBuffer;
use crate::downsample;
use crate::error::{PadError, Result};
use crate::events::{PointerEvent, PointerKind, Subscriptions};
use crate::export::{self, PixelSnapshot};
use crate::geometry::{CellIndex, GridGeometry, GridSpec, Point};
use crate::grid::PixelGrid;
use crate::mapper::CoordinateMapper;
use crate::render;
use crate::shadow::ShadowSurface;
use crate::smoother::{Stroke, StrokeSmoother};
use crate::surface::{DisplaySurface, SurfaceConfig, SurfaceContainer, SurfaceFactory};
use tracing::{debug, trace};

/// A pixelated drawing surface.
///
/// Owns the display surface, the authoritative grid and (for the smoothed pipeline)
/// the full-resolution shadow layer. Every operation runs to completion and leaves the
/// display consistent with the grid.
pub struct PixelPad<S: DisplaySurface> {
    config: PadConfig,
    surface: S,
    grid: PixelGrid,
    mapper: CoordinateMapper,
    stamper: BrushStamper,
    smoother: StrokeSmoother,
    shadow: ShadowSurface,
    /// `Some` between pointer-down and pointer-up
    stroke: Option<Stroke>,
    subscriptions: Subscriptions,
}

impl<S: DisplaySurface> PixelPad<S> {
    /// Create the pad and its display surface, painted with the empty grid
    pub fn new<F>(config: PadConfig, factory: &F) -> Result<Self>
    where
        F: SurfaceFactory<Surface = S>,
    {
        config.validate()?;
        let surface = factory.create(&SurfaceConfig {
            width: config.width,
            height: config.height,
        })?;
        let (width, height) = (surface.width(), surface.height());
        let geometry = GridGeometry::new(width, height, config.grid)?;

        let mut pad = Self {
            grid: PixelGrid::new(geometry),
            mapper: CoordinateMapper::new(config.margin),
            stamper: BrushStamper::new(config.blend),
            smoother: StrokeSmoother::new(config.brush_size, config.paint_color),
            shadow: ShadowSurface::new(width, height),
            stroke: None,
            subscriptions: Subscriptions::default(),
            surface,
            config,
        };
        pad.repaint();
        debug!(
            cols = geometry.cols(),
            rows = geometry.rows(),
            pipeline = ?pad.config.pipeline,
            "pixel pad ready"
        );
        Ok(pad)
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GridGeometry {
        self.grid.geometry()
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Shadow layer contents, including any stroke in progress
    pub fn shadow(&self) -> &PixelBuffer {
        self.shadow.live()
    }

    /// Whether a pointer is currently down
    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Hand the display surface to a container
    pub fn render<C: SurfaceContainer<S>>(&self, container: &mut C) -> Result<()> {
        container.append(&self.surface)
    }

    /// Clear every cell and the shadow layer, drop any stroke and repaint
    pub fn reset(&mut self) {
        self.grid.reset();
        self.shadow.clear();
        self.stroke = None;
        self.repaint();
        debug!("pixel pad reset");
    }

    /// Switch to square cells of `size` pixels; cell counts follow the surface
    pub fn set_pixel_size(&mut self, size: u32) -> Result<()> {
        self.set_grid(GridSpec::CellSize { size })
    }

    /// Switch to a fixed number of columns and rows; cell size follows the surface
    pub fn set_grid_dimensions(&mut self, cols: u32, rows: u32) -> Result<()> {
        self.set_grid(GridSpec::Cells { cols, rows })
    }

    /// Re-derive the grid. Destructive: cells, shadow and any stroke are discarded.
    ///
    /// Asking for the grid already in place changes nothing. A rejected spec leaves the
    /// current grid untouched.
    pub fn set_grid(&mut self, spec: GridSpec) -> Result<()> {
        if spec == self.grid.geometry().spec() {
            return Ok(());
        }
        self.grid.resize(spec)?;
        self.config.grid = spec;
        self.shadow.clear();
        self.stroke = None;
        self.repaint();
        debug!(
            cols = self.grid.geometry().cols(),
            rows = self.grid.geometry().rows(),
            "grid resized"
        );
        Ok(())
    }

    /// Stroke width of the smoothed pipeline, in surface pixels
    pub fn set_brush_size(&mut self, size: f32) -> Result<()> {
        if !(size.is_finite() && size > 0.0) {
            return Err(PadError::InvalidGeometry(format!(
                "brush size must be positive, got {}",
                size
            )));
        }
        self.config.brush_size = size;
        self.smoother.set_width(size);
        Ok(())
    }

    /// Row-major intensities, `rows * cols` long
    pub fn pixels(&self) -> Vec<f32> {
        export::export_pixels(&self.grid)
    }

    pub fn colors(&self) -> Vec<Color> {
        export::export_colors(&self.grid)
    }

    pub fn snapshot(&self) -> PixelSnapshot {
        PixelSnapshot::capture(&self.grid)
    }

    /// Stamp the brush at a position relative to the surface's top-left corner.
    ///
    /// The device margin still applies. Positions off the surface are ignored.
    pub fn draw_pixel(&mut self, point: Point, color: Color) {
        match self.mapper.map_to_cell(point, Point::default(), self.grid.geometry()) {
            Some(cell) => self.stamp(cell, color),
            None => trace!(x = point.x, y = point.y, "sample off surface"),
        }
    }

    pub fn on_pointer_down(&mut self, callback: impl FnMut(&PointerEvent) + 'static) {
        self.subscriptions.set(PointerKind::Down, Box::new(callback));
    }

    /// Only invoked for moves while a stroke is in progress
    pub fn on_pointer_move(&mut self, callback: impl FnMut(&PointerEvent) + 'static) {
        self.subscriptions.set(PointerKind::Move, Box::new(callback));
    }

    pub fn on_pointer_up(&mut self, callback: impl FnMut(&PointerEvent) + 'static) {
        self.subscriptions.set(PointerKind::Up, Box::new(callback));
    }

    /// Start a stroke
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.stroke = Some(Stroke::default());
        self.sample(event);
        self.subscriptions.notify(PointerKind::Down, event);
    }

    /// Extend the current stroke; ignored when no pointer is down
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if self.stroke.is_none() {
            return;
        }
        self.sample(event);
        self.subscriptions.notify(PointerKind::Move, event);
    }

    /// Finish the current stroke
    pub fn pointer_up(&mut self, event: &PointerEvent) {
        if let Some(stroke) = self.stroke.take() {
            if self.config.pipeline == Pipeline::Smoothed {
                self.shadow.commit();
            }
            debug!(samples = stroke.len(), "stroke finished");
        }
        self.subscriptions.notify(PointerKind::Up, event);
    }

    fn sample(&mut self, event: &PointerEvent) {
        let origin = event.bounding_box().origin();
        let local = self.mapper.to_local(event.position(), origin);
        if !self.mapper.in_surface(local, self.grid.geometry()) {
            trace!(x = event.x, y = event.y, "sample off surface");
            return;
        }

        match self.config.pipeline {
            Pipeline::Direct => {
                if let Some(stroke) = self.stroke.as_mut() {
                    stroke.push(local);
                }
                if let Some(cell) = self.mapper.local_to_cell(local, self.grid.geometry()) {
                    self.stamp(cell, self.config.paint_color);
                }
            },
            Pipeline::Smoothed => {
                let Some(stroke) = self.stroke.as_mut() else {
                    return;
                };
                stroke.push(local);
                self.shadow.redraw(&self.smoother, stroke);
                downsample::composite(self.shadow.live(), &mut self.grid);
                self.repaint();
            },
        }
    }

    fn stamp(&mut self, cell: CellIndex, color: Color) {
        self.stamper.stamp(&mut self.grid, cell, color);
        let geometry = *self.grid.geometry();
        for (touched, _) in neighborhood(cell, &geometry) {
            render::paint_cell(&mut self.surface, &self.grid, touched);
        }
    }

    fn repaint(&mut self) {
        render::paint_all(&mut self.surface, &self.grid);
    }
}

impl<S: DisplaySurface> std::fmt::Debug for PixelPad<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelPad")
            .field("config", &self.config)
            .field("geometry", self.grid.geometry())
            .field("stroke", &self.stroke)
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}
