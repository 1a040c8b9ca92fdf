//! Neighbor-weighted brush stamp

use crate::color::Color;
use crate::geometry::{CellIndex, GridGeometry};
use crate::grid::PixelGrid;
use serde::{Deserialize, Serialize};

/// How a stamp's strength falls off across the 3x3 neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Flat multipliers: 1.0 center, 0.2 edge, 0.1 diagonal
    #[default]
    Additive,
    /// Opacity fade: none at the center, `fade(0.5)` on edges, `fade(0.8)` on diagonals
    AlphaFade,
}

impl BlendMode {
    /// Contribution a stamp of `color` adds to a neighbor of the given class
    pub fn contribution(self, color: Color, falloff: Falloff) -> f32 {
        match self {
            BlendMode::Additive => color.intensity() * falloff.weight(),
            BlendMode::AlphaFade => {
                let faded = color.fade(falloff.fade_ratio());
                faded.luma() * faded.alpha()
            },
        }
    }
}

/// Position of a neighbor relative to the stamped cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falloff {
    Center,
    /// Shares the center's row or column
    Edge,
    Diagonal,
}

impl Falloff {
    pub fn classify(dc: i64, dr: i64) -> Self {
        match (dc, dr) {
            (0, 0) => Falloff::Center,
            (0, _) | (_, 0) => Falloff::Edge,
            _ => Falloff::Diagonal,
        }
    }

    /// Multiplier for [`BlendMode::Additive`]
    pub fn weight(self) -> f32 {
        match self {
            Falloff::Center => 1.0,
            Falloff::Edge => 0.2,
            Falloff::Diagonal => 0.1,
        }
    }

    /// Fade ratio for [`BlendMode::AlphaFade`]
    pub fn fade_ratio(self) -> f32 {
        match self {
            Falloff::Center => 0.0,
            Falloff::Edge => 0.5,
            Falloff::Diagonal => 0.8,
        }
    }
}

/// In-grid cells of the 3x3 neighborhood around `center`, row-major
pub fn neighborhood(
    center: CellIndex,
    geometry: &GridGeometry,
) -> impl Iterator<Item = (CellIndex, Falloff)> + '_ {
    let (cc, cr) = (center.col as i64, center.row as i64);
    (-1..=1i64)
        .flat_map(move |dr| (-1..=1i64).map(move |dc| (dc, dr)))
        .filter(move |&(dc, dr)| geometry.contains(cc + dc, cr + dr))
        .map(move |(dc, dr)| {
            let cell = CellIndex::new((cc + dc) as u32, (cr + dr) as u32);
            (cell, Falloff::classify(dc, dr))
        })
}

/// Writes weighted brush contributions into the grid.
///
/// Cell values only ever grow, saturating at 255; the stamped cell becomes an opaque
/// gray of its new intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrushStamper {
    mode: BlendMode,
}

impl BrushStamper {
    pub fn new(mode: BlendMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    pub fn stamp(&self, grid: &mut PixelGrid, center: CellIndex, color: Color) {
        let geometry = *grid.geometry();
        for (cell, falloff) in neighborhood(center, &geometry) {
            let old = grid.cell(cell).intensity();
            let value = (old + self.mode.contribution(color, falloff)).clamp(0.0, 255.0);
            // Rounding to the u8 channel must not drop below the stored value
            let value = value.max(old.round());
            grid.set_cell(cell, Color::gray(value));
        }
    }
}
