use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use pixelpad::display::{Display, InputEvent, MouseButtonKind, PixelBuffer, Presenter, RenderTarget};
use pixelpad::publish::{SnapshotPublisher, DEFAULT_PORT, DEFAULT_TOPIC};
use pixelpad::{
    BlendMode, BufferFactory, GridSpec, PadConfig, PixelPad, Pipeline, PointerEvent, Rect, Result,
};
use sdl2::keyboard::Keycode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use pixelpad::control::{Command, Controller, DEFAULT_SOCKET_PATH};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlendArg {
    Additive,
    Fade,
}

impl From<BlendArg> for BlendMode {
    fn from(arg: BlendArg) -> Self {
        match arg {
            BlendArg::Additive => BlendMode::Additive,
            BlendArg::Fade => BlendMode::AlphaFade,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pixelpad")]
#[command(version)]
#[command(about = "Draw on a pixelated grid with the mouse", long_about = None)]
struct Args {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Grid columns (with --rows)
    #[arg(long, requires = "rows", conflicts_with = "pixel_size")]
    cols: Option<u32>,

    /// Grid rows (with --cols)
    #[arg(long, requires = "cols")]
    rows: Option<u32>,

    /// Square cell size in pixels instead of fixed columns and rows
    #[arg(short = 'p', long)]
    pixel_size: Option<u32>,

    /// Stroke width of the smoothed pipeline
    #[arg(short = 'b', long)]
    brush_size: Option<f32>,

    /// Brush falloff preset
    #[arg(long, value_enum)]
    blend: Option<BlendArg>,

    /// Draw smoothed strokes and downsample them instead of stamping cells
    #[arg(short, long)]
    smooth: bool,

    /// Bezel subtracted from pointer positions (default 0 without a config file)
    #[arg(long)]
    margin: Option<f32>,

    /// Disable VSync for uncapped framerate
    #[arg(long)]
    no_vsync: bool,

    /// Publish a snapshot to this MQTT broker after every stroke
    #[arg(long)]
    mqtt_host: Option<String>,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    mqtt_port: u16,

    #[arg(long, default_value = DEFAULT_TOPIC)]
    mqtt_topic: String,

    /// Listen for commands on a Unix socket
    #[cfg(unix)]
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_SOCKET_PATH)]
    control: Option<PathBuf>,

    /// Where E writes the snapshot
    #[arg(short, long, default_value = "snapshot.json")]
    export: PathBuf,
}

impl Args {
    fn pad_config(&self) -> Result<PadConfig> {
        let mut config = match &self.config {
            Some(path) => PadConfig::load(path)?,
            // SDL reports window-relative positions, there is no bezel to remove
            None => PadConfig {
                margin: 0.0,
                ..PadConfig::default()
            },
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let (Some(cols), Some(rows)) = (self.cols, self.rows) {
            config.grid = GridSpec::Cells { cols, rows };
        }
        if let Some(size) = self.pixel_size {
            config.grid = GridSpec::CellSize { size };
        }
        if let Some(brush) = self.brush_size {
            config.brush_size = brush;
        }
        if let Some(blend) = self.blend {
            config.blend = blend.into();
        }
        if self.smooth {
            config.pipeline = Pipeline::Smoothed;
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }

        config.validate()?;
        Ok(config)
    }
}

/// One step finer or coarser along whichever parameterization the grid uses
fn step_grid(pad: &mut PixelPad<PixelBuffer>, finer: bool) -> Result<()> {
    match pad.geometry().spec() {
        GridSpec::CellSize { size } => {
            let size = if finer { size.saturating_sub(1) } else { size + 1 };
            if size > 0 {
                pad.set_pixel_size(size)?;
            }
        },
        GridSpec::Cells { cols, rows } => {
            let (cols, rows) = if finer {
                (cols + 1, rows + 1)
            } else {
                (cols.saturating_sub(1), rows.saturating_sub(1))
            };
            if cols > 0 && rows > 0 {
                pad.set_grid_dimensions(cols, rows)?;
            }
        },
    }
    info!(
        cols = pad.geometry().cols(),
        rows = pad.geometry().rows(),
        "grid changed"
    );
    Ok(())
}

fn step_brush(pad: &mut PixelPad<PixelBuffer>, delta: f32) -> Result<()> {
    let size = (pad.config().brush_size + delta).max(1.0);
    pad.set_brush_size(size)?;
    info!(brush_size = size, "brush changed");
    Ok(())
}

fn export(pad: &PixelPad<PixelBuffer>, path: &Path) {
    match pad.snapshot().save(path) {
        Ok(()) => println!("Snapshot saved to {}", path.display()),
        Err(e) => warn!(error = %e, "failed to export snapshot"),
    }
}

/// Apply a remote command; returns false when the app should quit
#[cfg(unix)]
fn apply_command(pad: &mut PixelPad<PixelBuffer>, cmd: Command, export_path: &Path) -> bool {
    let result = match cmd {
        Command::Reset => {
            pad.reset();
            Ok(())
        },
        Command::PixelSize(size) => pad.set_pixel_size(size),
        Command::Grid(cols, rows) => pad.set_grid_dimensions(cols, rows),
        Command::Brush(size) => pad.set_brush_size(size),
        Command::Export => {
            export(pad, export_path);
            Ok(())
        },
        Command::Quit => return false,
    };
    if let Err(e) = result {
        warn!(error = %e, "control command rejected");
    }
    true
}

/// `RUST_LOG` directives when set and valid, otherwise `info`
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let args = Args::parse();
    let config = args.pad_config()?;
    let (width, height) = (config.width, config.height);

    let (mut display, texture_creator) =
        Display::with_options("pixelpad", width, height, !args.no_vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut pad = PixelPad::new(config, &BufferFactory)?;
    let bounds = Rect::new(0.0, 0.0, display.width() as f32, display.height() as f32);

    let publisher = match &args.mqtt_host {
        Some(host) => Some(SnapshotPublisher::new(host, args.mqtt_port, &args.mqtt_topic)?),
        None => None,
    };
    let stroke_done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&stroke_done);
    pad.on_pointer_up(move |_| flag.set(true));

    #[cfg(unix)]
    let controller = match &args.control {
        Some(path) => Some(Controller::new(path)?),
        None => None,
    };

    println!("=== pixelpad ===");
    println!(
        "Surface: {}x{}  Grid: {}x{}  Pipeline: {:?}",
        width,
        height,
        pad.geometry().cols(),
        pad.geometry().rows(),
        pad.config().pipeline
    );
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Left drag  - Draw");
    println!("  R / C      - Reset");
    println!("  + / -      - Finer / coarser grid");
    println!("  [ / ]      - Smaller / larger brush");
    println!("  E          - Export snapshot to {}", args.export.display());
    println!("  Escape     - Quit");
    #[cfg(unix)]
    {
        if let Some(c) = &controller {
            println!("Control socket: {}", c.socket_path().display());
        }
    }

    'main: loop {
        for event in display.poll_events() {
            let result = match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::R | Keycode::C) => {
                    pad.reset();
                    Ok(())
                },
                InputEvent::KeyDown(Keycode::Plus | Keycode::Equals | Keycode::KpPlus) => {
                    step_grid(&mut pad, true)
                },
                InputEvent::KeyDown(Keycode::Minus | Keycode::KpMinus) => step_grid(&mut pad, false),
                InputEvent::KeyDown(Keycode::LeftBracket) => step_brush(&mut pad, -2.0),
                InputEvent::KeyDown(Keycode::RightBracket) => step_brush(&mut pad, 2.0),
                InputEvent::KeyDown(Keycode::E) => {
                    export(&pad, &args.export);
                    Ok(())
                },
                InputEvent::KeyDown(_) => Ok(()),
                InputEvent::MouseDown {
                    x,
                    y,
                    button: MouseButtonKind::Left,
                } => {
                    pad.pointer_down(&PointerEvent::new(x as f32, y as f32, bounds));
                    Ok(())
                },
                InputEvent::MouseMove { x, y } => {
                    pad.pointer_move(&PointerEvent::new(x as f32, y as f32, bounds));
                    Ok(())
                },
                InputEvent::MouseUp {
                    x,
                    y,
                    button: MouseButtonKind::Left,
                } => {
                    pad.pointer_up(&PointerEvent::new(x as f32, y as f32, bounds));
                    Ok(())
                },
                InputEvent::MouseDown { .. } | InputEvent::MouseUp { .. } => Ok(()),
            };
            if let Err(e) = result {
                warn!(error = %e, "input ignored");
            }
        }

        #[cfg(unix)]
        {
            if let Some(c) = &controller {
                for cmd in c.poll() {
                    if !apply_command(&mut pad, cmd, &args.export) {
                        break 'main;
                    }
                }
            }
        }

        if stroke_done.replace(false) {
            if let Some(publisher) = &publisher {
                if let Err(e) = publisher.publish(&pad.snapshot()) {
                    warn!(error = %e, "snapshot not published");
                }
            }
        }

        pad.render(&mut Presenter {
            display: &mut display,
            target: &mut target,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_honors_rust_log() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(log_filter(Some("pixelpad=trace")).to_string(), "pixelpad=trace");
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
    }
}
