//! Owned snapshots of the grid for downstream consumers

use crate::color::Color;
use crate::error::{PadError, Result};
use crate::grid::PixelGrid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Row-major intensities, `luma * alpha` per cell (0.0-255.0)
pub fn export_pixels(grid: &PixelGrid) -> Vec<f32> {
    grid.cells().iter().map(|c| c.intensity()).collect()
}

/// Row-major copy of every cell color
pub fn export_colors(grid: &PixelGrid) -> Vec<Color> {
    grid.cells().to_vec()
}

/// Grid intensities together with the shape they were taken from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelSnapshot {
    pub cols: u32,
    pub rows: u32,
    pub values: Vec<f32>,
}

impl PixelSnapshot {
    pub fn capture(grid: &PixelGrid) -> Self {
        Self {
            cols: grid.geometry().cols(),
            rows: grid.geometry().rows(),
            values: export_pixels(grid),
        }
    }

    /// Values scaled to 0.0-1.0, ready for a classifier input layer
    pub fn normalized(&self) -> Vec<f32> {
        self.values.iter().map(|v| v / 255.0).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| PadError::ConfigIo {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PadError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
