//! Immutable RGBA color value.
//!
//! Channels are 8-bit; alpha is a fraction in [0.0, 1.0]. Every constructor clamps,
//! and every operation returns a new value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Luma weights used for the grayscale projection
const LUMA_R: f32 = 0.3;
const LUMA_G: f32 = 0.59;
const LUMA_B: f32 = 0.11;

/// RGBA color with 8-bit channels and fractional alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: f32,
}

#[inline]
fn clamp_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn clamp_alpha(a: f32) -> f32 {
    if a.is_nan() {
        return 0.0;
    }
    a.clamp(0.0, 1.0)
}

impl Color {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0.0 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 1.0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 1.0 };

    /// Create a color from unclamped channel values (rounded and clamped to 0-255, alpha to 0-1)
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_alpha(a),
        }
    }

    /// Opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque gray of the given level (clamped to 0-255)
    pub fn gray(level: f32) -> Self {
        let v = clamp_channel(level);
        Self::rgb(v, v, v)
    }

    /// Build from a packed [r, g, b, a] byte quad
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self {
            r,
            g,
            b,
            a: a as f32 / 255.0,
        }
    }

    /// Pack into an [r, g, b, a] byte quad
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, clamp_channel(self.a * 255.0)]
    }

    #[inline]
    pub fn red(self) -> u8 {
        self.r
    }

    #[inline]
    pub fn green(self) -> u8 {
        self.g
    }

    #[inline]
    pub fn blue(self) -> u8 {
        self.b
    }

    #[inline]
    pub fn alpha(self) -> f32 {
        self.a
    }

    /// Same color with a different (clamped) alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: clamp_alpha(a),
            ..self
        }
    }

    /// Reduce opacity by `ratio` of its current value (`fade(0.5)` halves alpha)
    pub fn fade(self, ratio: f32) -> Self {
        self.with_alpha(self.a - self.a * ratio)
    }

    /// Weighted luma of the RGB channels, 0.0-255.0
    pub fn luma(self) -> f32 {
        (self.r as f32 * LUMA_R + self.g as f32 * LUMA_G + self.b as f32 * LUMA_B).clamp(0.0, 255.0)
    }

    /// Gray projection, alpha preserved
    pub fn grayscale(self) -> Self {
        Self::gray(self.luma()).with_alpha(self.a)
    }

    /// Luma scaled by alpha; the scalar a cell contributes to an intensity export
    pub fn intensity(self) -> f32 {
        self.luma() * self.a
    }

    /// Composite this color over an opaque backdrop (source-over)
    pub fn over(self, backdrop: Self) -> Self {
        let a = self.a;
        let inv = 1.0 - a;
        Self::new(
            self.r as f32 * a + backdrop.r as f32 * inv,
            self.g as f32 * a + backdrop.g as f32 * inv,
            self.b as f32 * a + backdrop.b as f32 * inv,
            1.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        [c.r as f32, c.g as f32, c.b as f32, c.a]
    }
}

/// CSS-style serialization used for painting, e.g. `rgba(35, 35, 35, 1)`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clamps_channels() {
        let c = Color::new(300.0, -12.0, 127.6, 1.5);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn test_fade_scales_alpha() {
        let c = Color::WHITE.fade(0.5);
        assert!((c.alpha() - 0.5).abs() < 1e-6);
        let d = Color::WHITE.fade(0.8);
        assert!((d.alpha() - 0.2).abs() < 1e-6);
        // Source color is untouched
        assert_eq!(Color::WHITE.alpha(), 1.0);
    }

    #[test]
    fn test_grayscale_of_gray_is_identity() {
        let g = Color::gray(200.0);
        assert_eq!(g.grayscale().to_rgba8(), [200, 200, 200, 255]);
        assert!((g.intensity() - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_grayscale_weights() {
        let red = Color::rgb(255, 0, 0).grayscale();
        assert!((76..=77).contains(&red.red()));
        assert_eq!(red.green(), red.blue());
    }

    #[test]
    fn test_over_blends_by_alpha() {
        let half_white = Color::WHITE.with_alpha(0.5);
        let out = half_white.over(Color::BLACK);
        assert_eq!(out.to_rgba8(), [128, 128, 128, 255]);
        assert_eq!(Color::TRANSPARENT.over(Color::gray(35.0)), Color::gray(35.0));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Color::gray(35.0).to_string(), "rgba(35, 35, 35, 1)");
        assert_eq!(Color::WHITE.fade(0.5).to_string(), "rgba(255, 255, 255, 0.5)");
    }

    #[test]
    fn test_serde_array_form() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,1.0]");
        let back: Color = serde_json::from_str("[400, 2, 3, 0.25]").unwrap();
        assert_eq!(back.to_rgba8(), [255, 2, 3, 64]);
    }

    proptest! {
        #[test]
        fn prop_new_always_in_range(r in -500.0f32..500.0, g in -500.0f32..500.0, b in -500.0f32..500.0, a in -2.0f32..2.0) {
            let c = Color::new(r, g, b, a);
            prop_assert!(c.alpha() >= 0.0 && c.alpha() <= 1.0);
            prop_assert!(c.intensity() >= 0.0 && c.intensity() <= 255.0);
        }

        #[test]
        fn prop_fade_never_raises_alpha(a in 0.0f32..1.0, ratio in 0.0f32..1.0) {
            let c = Color::WHITE.with_alpha(a);
            prop_assert!(c.fade(ratio).alpha() <= c.alpha());
        }
    }
}
