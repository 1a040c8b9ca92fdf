//! End-to-end drawing scenarios against the in-memory surface

use pixelpad::{
    BlendMode, BufferFactory, CellIndex, Color, CoordinateMapper, DisplaySurface, GridSpec,
    PadConfig, PadError, Pipeline, PixelBuffer, PixelPad, Point, PointerEvent, Rect,
};
use proptest::prelude::*;

fn pad(config: PadConfig) -> PixelPad<PixelBuffer> {
    PixelPad::new(config, &BufferFactory).unwrap()
}

fn mnist_pad() -> PixelPad<PixelBuffer> {
    pad(PadConfig {
        grid: GridSpec::Cells { cols: 28, rows: 28 },
        ..PadConfig::default()
    })
}

fn event(pad: &PixelPad<PixelBuffer>, x: f32, y: f32) -> PointerEvent {
    let w = pad.config().width as f32;
    let h = pad.config().height as f32;
    PointerEvent::new(x, y, Rect::new(0.0, 0.0, w, h))
}

fn drag(pad: &mut PixelPad<PixelBuffer>, points: &[(f32, f32)]) {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return;
    };
    let down = event(pad, x0, y0);
    pad.pointer_down(&down);
    for &(x, y) in rest {
        let ev = event(pad, x, y);
        pad.pointer_move(&ev);
    }
    let (xn, yn) = points[points.len() - 1];
    let up = event(pad, xn, yn);
    pad.pointer_up(&up);
}

#[test]
fn scenario_a_center_press_lands_on_middle_cell() {
    let mut p = mnist_pad();
    let cell = CoordinateMapper::default().map_to_cell(
        Point::new(290.0, 290.0),
        Point::default(),
        p.geometry(),
    );
    assert_eq!(cell, Some(CellIndex::new(14, 14)));

    let ev = event(&p, 290.0, 290.0);
    p.pointer_down(&ev);
    let px = p.pixels();
    let max = px.iter().copied().fold(0.0f32, f32::max);
    assert_eq!(px[14 * 28 + 14], max);
    assert!(max > 0.0);
}

#[test]
fn scenario_b_reset_after_drawing_is_blank() {
    let mut p = mnist_pad();
    drag(&mut p, &[(100.0, 100.0), (150.0, 200.0), (300.0, 250.0), (400.0, 400.0)]);
    assert!(p.pixels().iter().any(|v| *v > 0.0));

    p.reset();
    assert!(p.pixels().iter().all(|v| *v == 0.0));
    assert!(p.colors().iter().all(|c| *c == Color::TRANSPARENT));
    // Display shows only the checkerboard again
    assert_eq!(p.surface().get_pixel_rgba(5, 5), Some((0, 0, 0, 255)));
    assert_eq!(p.surface().get_pixel_rgba(25, 5), Some((35, 35, 35, 255)));
}

#[test]
fn scenario_c_pixel_size_changes_are_clean() {
    let mut p = pad(PadConfig {
        width: 500,
        height: 500,
        ..PadConfig::default()
    });
    p.set_pixel_size(20).unwrap();
    assert_eq!((p.geometry().cols(), p.geometry().rows()), (25, 25));
    assert_eq!(p.pixels().len(), 625);

    drag(&mut p, &[(60.0, 60.0), (200.0, 200.0)]);
    assert!(p.pixels().iter().any(|v| *v > 0.0));

    p.set_pixel_size(25).unwrap();
    assert_eq!((p.geometry().cols(), p.geometry().rows()), (20, 20));
    let px = p.pixels();
    assert_eq!(px.len(), 400);
    assert!(px.iter().all(|v| *v == 0.0));
}

#[test]
fn scenario_d_smoothed_drag_marks_exactly_crossed_cells() {
    let mut p = pad(PadConfig {
        grid: GridSpec::Cells { cols: 28, rows: 28 },
        pipeline: Pipeline::Smoothed,
        brush_size: 12.0,
        ..PadConfig::default()
    });
    let samples = [
        (110.0, 110.0),
        (160.0, 120.0),
        (210.0, 140.0),
        (260.0, 150.0),
        (310.0, 170.0),
    ];
    drag(&mut p, &samples);

    let geometry = *p.geometry();
    let mapper = CoordinateMapper::new(p.config().margin);
    let colors = p.colors();
    for cell in geometry.cells() {
        let covered = p
            .shadow()
            .read_block(geometry.cell_block(cell))
            .iter()
            .any(|px| px.alpha() > 0.0);
        let alpha = colors[cell.to_index(geometry.cols())].alpha();
        assert_eq!(alpha > 0.0, covered, "cell {:?}", cell);
    }

    for (x, y) in samples {
        let cell = mapper
            .map_to_cell(Point::new(x, y), Point::default(), &geometry)
            .unwrap();
        assert!(colors[cell.to_index(geometry.cols())].alpha() > 0.0);
    }
    // Nowhere near the stroke
    assert_eq!(colors[CellIndex::new(2, 25).to_index(28)].alpha(), 0.0);
    assert_eq!(colors[CellIndex::new(25, 2).to_index(28)].alpha(), 0.0);
}

#[test]
fn smoothed_strokes_accumulate_across_drags() {
    let mut p = pad(PadConfig {
        pipeline: Pipeline::Smoothed,
        ..PadConfig::default()
    });
    drag(&mut p, &[(60.0, 60.0), (120.0, 60.0)]);
    let first = p.pixels();
    drag(&mut p, &[(400.0, 400.0), (450.0, 420.0)]);
    let second = p.pixels();
    for (a, b) in first.iter().zip(&second) {
        if *a > 0.0 {
            assert!(*b > 0.0);
        }
    }
    assert!(second.iter().filter(|v| **v > 0.0).count() > first.iter().filter(|v| **v > 0.0).count());
}

#[test]
fn single_stamp_falls_off_from_center() {
    for blend in [BlendMode::Additive, BlendMode::AlphaFade] {
        let mut p = pad(PadConfig {
            grid: GridSpec::Cells { cols: 28, rows: 28 },
            blend,
            ..PadConfig::default()
        });
        p.draw_pixel(Point::new(290.0, 290.0), Color::WHITE);
        let px = p.pixels();
        let at = |col: usize, row: usize| px[row * 28 + col];
        let (center, edge, diagonal) = (at(14, 14), at(14, 13), at(13, 13));
        assert!(center > edge, "{:?}", blend);
        assert!(edge > diagonal, "{:?}", blend);
        assert!(diagonal > 0.0, "{:?}", blend);
        assert_eq!(at(16, 14), 0.0);
    }
}

#[test]
fn move_callback_fires_only_while_drawing() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut p = mnist_pad();
    let log = Rc::new(RefCell::new(Vec::new()));
    let (down, moved, up) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
    p.on_pointer_down(move |_| down.borrow_mut().push("down"));
    p.on_pointer_move(move |_| moved.borrow_mut().push("move"));
    p.on_pointer_up(move |_| up.borrow_mut().push("up"));

    let ev = event(&p, 200.0, 200.0);
    p.pointer_move(&ev);
    drag(&mut p, &[(200.0, 200.0), (210.0, 200.0), (220.0, 200.0)]);
    p.pointer_move(&ev);

    assert_eq!(*log.borrow(), vec!["down", "move", "move", "up"]);
}

#[test]
fn oversized_grid_is_rejected_not_allocated() {
    let config = PadConfig {
        grid: GridSpec::Cells { cols: 70000, rows: 70000 },
        ..PadConfig::default()
    };
    assert!(matches!(config.validate(), Err(PadError::InvalidGeometry(_))));
    let err = PixelPad::new(config, &BufferFactory);
    assert!(matches!(err, Err(PadError::InvalidGeometry(_))));

    let mut p = mnist_pad();
    p.draw_pixel(Point::new(290.0, 290.0), Color::WHITE);
    assert!(p.set_grid_dimensions(70000, 70000).is_err());
    assert_eq!((p.geometry().cols(), p.geometry().rows()), (28, 28));
    assert!(p.pixels().iter().any(|v| *v > 0.0));
}

#[test]
fn oversized_surface_is_unavailable() {
    let config = PadConfig {
        width: 40000,
        height: 40000,
        ..PadConfig::default()
    };
    let err = PixelPad::new(config, &BufferFactory);
    assert!(matches!(err, Err(PadError::SurfaceUnavailable(_))));
}

proptest! {
    #[test]
    fn prop_cells_stay_in_range(
        blend in prop_oneof![Just(BlendMode::Additive), Just(BlendMode::AlphaFade)],
        strokes in prop::collection::vec(
            prop::collection::vec((0.0f32..600.0, 0.0f32..600.0), 1..8),
            1..6,
        ),
    ) {
        let mut p = pad(PadConfig {
            grid: GridSpec::Cells { cols: 28, rows: 28 },
            blend,
            ..PadConfig::default()
        });
        for stroke in &strokes {
            drag(&mut p, stroke);
        }
        for v in p.pixels() {
            prop_assert!((0.0..=255.0).contains(&v));
        }
    }

    #[test]
    fn prop_resize_matches_grid_shape(cols in 1u32..64, rows in 1u32..64, size in 1u32..100) {
        let mut p = mnist_pad();
        p.draw_pixel(Point::new(200.0, 200.0), Color::WHITE);

        p.set_grid_dimensions(cols, rows).unwrap();
        prop_assert_eq!(p.pixels().len(), (cols * rows) as usize);

        p.set_pixel_size(size).unwrap();
        let expected = 560u32.div_ceil(size).pow(2) as usize;
        prop_assert_eq!(p.pixels().len(), expected);
        prop_assert!(p.pixels().iter().all(|v| *v == 0.0));
    }
}
