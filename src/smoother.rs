//! Quadratic midpoint smoothing of pointer strokes

use crate::color::Color;
use crate::display::PixelBuffer;
use crate::geometry::Point;

/// Line segments per flattened quadratic curve
const CURVE_STEPS: u32 = 16;

/// Surface-local samples of one drag, from pointer-down to pointer-up.
///
/// Samples that fell outside the surface are never recorded, so a stroke may be empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    samples: Vec<Point>,
}

impl Stroke {
    pub fn push(&mut self, sample: Point) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[Point] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Renders strokes as smooth anti-aliased paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSmoother {
    width: f32,
    color: Color,
}

impl StrokeSmoother {
    /// Paint is always drawn opaque
    pub fn new(width: f32, color: Color) -> Self {
        Self {
            width,
            color: color.with_alpha(1.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Flattened path through the stroke's samples.
    ///
    /// Starts at the first sample, curves through each sample toward the midpoint of
    /// the next pair, then runs straight to the last sample. Returned as consecutive
    /// `(from, to)` segments; a single sample gives one zero-length segment.
    pub fn path(stroke: &Stroke) -> Vec<(Point, Point)> {
        let samples = stroke.samples();
        let Some(&first) = samples.first() else {
            return Vec::new();
        };
        if samples.len() == 1 {
            return vec![(first, first)];
        }

        let mut segs = Vec::new();
        let mut cursor = first;
        for pair in samples.windows(2) {
            let control = pair[0];
            let end = pair[0].midpoint(&pair[1]);
            let mut prev = cursor;
            for step in 1..=CURVE_STEPS {
                let t = step as f32 / CURVE_STEPS as f32;
                let mt = 1.0 - t;
                let next = Point::new(
                    mt * mt * cursor.x + 2.0 * mt * t * control.x + t * t * end.x,
                    mt * mt * cursor.y + 2.0 * mt * t * control.y + t * t * end.y,
                );
                segs.push((prev, next));
                prev = next;
            }
            cursor = end;
        }
        if let Some(&last) = samples.last() {
            segs.push((cursor, last));
        }
        segs
    }

    /// Draw the whole stroke onto `target`
    pub fn render(&self, stroke: &Stroke, target: &mut PixelBuffer) {
        for (from, to) in Self::path(stroke) {
            target.stroke_segment(from, to, self.width, self.color);
        }
    }
}
