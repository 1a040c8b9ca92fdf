use crate::brush::BlendMode;
use crate::color::Color;
use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{PadError, Result};
use crate::geometry::{GridGeometry, GridSpec};
use crate::mapper::DEFAULT_MARGIN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How pointer samples reach the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    /// Each sample stamps the brush straight into its cell
    #[default]
    Direct,
    /// Samples are drawn as a smooth path at full resolution, then downsampled
    Smoothed,
}

/// Engine configuration; every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    pub width: u32,
    pub height: u32,
    pub grid: GridSpec,
    /// Stroke width in surface pixels (smoothed pipeline)
    pub brush_size: f32,
    /// Device bezel subtracted from every pointer position
    pub margin: f32,
    pub paint_color: Color,
    pub blend: BlendMode,
    pub pipeline: Pipeline,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            grid: GridSpec::default(),
            brush_size: 20.0,
            margin: DEFAULT_MARGIN,
            paint_color: Color::WHITE,
            blend: BlendMode::default(),
            pipeline: Pipeline::default(),
        }
    }
}

impl PadConfig {
    /// Reject configurations that cannot produce a drawable grid
    pub fn validate(&self) -> Result<()> {
        GridGeometry::new(self.width, self.height, self.grid)?;
        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            return Err(PadError::InvalidGeometry(format!(
                "brush size must be positive, got {}",
                self.brush_size
            )));
        }
        Ok(())
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| PadError::ConfigIo {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PadError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PadConfig::default();
        assert_eq!((c.width, c.height), (560, 560));
        assert_eq!(c.grid, GridSpec::Cells { cols: 10, rows: 10 });
        assert_eq!(c.margin, 10.0);
        assert_eq!(c.pipeline, Pipeline::Direct);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c: PadConfig =
            serde_json::from_str(r#"{"grid": {"cell_size": {"size": 20}}, "pipeline": "smoothed"}"#)
                .unwrap();
        assert_eq!(c.grid, GridSpec::CellSize { size: 20 });
        assert_eq!(c.pipeline, Pipeline::Smoothed);
        assert_eq!(c.brush_size, 20.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let c = PadConfig {
            grid: GridSpec::Cells { cols: 0, rows: 28 },
            ..PadConfig::default()
        };
        assert!(matches!(c.validate(), Err(PadError::InvalidGeometry(_))));
        let c = PadConfig {
            brush_size: 0.0,
            ..PadConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("pixelpad-config-{}.json", std::process::id()));
        let c = PadConfig {
            blend: BlendMode::AlphaFade,
            paint_color: Color::rgb(10, 200, 30),
            ..PadConfig::default()
        };
        c.save(&path).unwrap();
        assert_eq!(PadConfig::load(&path).unwrap(), c);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PadConfig::load("/nonexistent/pixelpad.json").unwrap_err();
        assert!(matches!(err, PadError::ConfigIo { .. }));
    }
}
