mod support;

use gearpath::float_types::Real;
use gearpath::pen::{BoundsPen, PathCommand, Pen, RecordPen, Transform2, TransformPen};

use crate::support::approx_eq;

#[test]
fn record_pen_drops_near_duplicate_points() {
    let mut pen = RecordPen::new();
    pen.move_to(0.0, 0.0);
    pen.arc_to(1e-8, 0.0, 0.5); // squared distance 1e-16
    assert_eq!(pen.commands().len(), 1);
}

#[test]
fn record_pen_clamps_turn_on_tiny_steps() {
    let mut pen = RecordPen::new();
    pen.move_to(0.0, 0.0);
    pen.arc_to(1e-5, 0.0, 0.3); // squared distance 1e-10
    match pen.commands()[1] {
        PathCommand::ArcTo { turn, .. } => assert_eq!(turn, 0.0),
        _ => panic!("expected an arc"),
    }
}

#[test]
#[should_panic(expected = "no current point")]
fn arc_without_current_point_is_a_caller_bug() {
    let mut pen = RecordPen::new();
    pen.arc_to(1.0, 0.0, 0.0);
}

#[test]
fn quarter_rotations_snap_to_exact_axes() {
    let xf = Transform2::identity().rotated_deg(90.0);
    let (x, y) = xf.apply(1.0, 0.0);
    assert_eq!(x, 0.0);
    assert_eq!(y, 1.0);

    let (x, y) = Transform2::identity().rotated_deg(-270.0).apply(0.0, 2.0);
    assert_eq!(x, -2.0);
    assert_eq!(y, 0.0);
}

#[test]
fn composed_transform_matches_direct_computation() {
    let (a, b) = (3.0, -2.0);
    let theta: Real = 37.0;
    let s = 1.7;
    let xf = Transform2::identity()
        .translated(a, b)
        .rotated_deg(theta)
        .scaled(s, false);

    let (px, py) = (0.6, -1.1);
    let (gx, gy) = xf.apply(px, py);

    // scale, then rotate, then translate
    let (sx, sy) = (px * s, py * s);
    let (sin, cos) = theta.to_radians().sin_cos();
    let (rx, ry) = (sx * cos - sy * sin, sx * sin + sy * cos);
    let (ex, ey) = (rx + a, ry + b);

    assert!(approx_eq(gx, ex, 1e-12), "{gx} vs {ex}");
    assert!(approx_eq(gy, ey, 1e-12), "{gy} vs {ey}");
}

#[test]
fn flipping_scale_negates_arc_turns() {
    let mut rec = RecordPen::new();
    let mut pen = TransformPen::new(&mut rec);
    pen.scale(1.0, true);
    pen.move_to(0.0, 0.0);
    pen.arc_to(1.0, 0.0, 0.5);
    match rec.commands()[1] {
        PathCommand::ArcTo { turn, .. } => assert_eq!(turn, -0.5),
        _ => panic!("expected an arc"),
    }
}

#[test]
fn fork_leaves_the_original_transform_alone() {
    let mut rec = RecordPen::new();
    let mut pen = TransformPen::new(&mut rec);
    pen.translate(1.0, 0.0);
    {
        let mut fork = pen.fork();
        fork.rotate(90.0);
        fork.move_to(1.0, 0.0);
    }
    pen.move_to(1.0, 0.0);
    let cmds = rec.commands();
    // fork: rotate then translate -> (1, 1); original: just translate -> (2, 0)
    assert_eq!(cmds[0], PathCommand::MoveTo { x: 1.0, y: 1.0 });
    assert_eq!(cmds[1], PathCommand::MoveTo { x: 2.0, y: 0.0 });
}

#[test]
fn bounds_include_arc_bulge() {
    let mut pen = BoundsPen::new();
    pen.move_to(1.0, 0.0);
    // Upper semicircle about the origin: bulges to y = 1 between endpoints.
    pen.arc_to(-1.0, 0.0, std::f64::consts::PI as Real);
    let (min, max) = pen.bounds().unwrap();
    assert!(approx_eq(min.x, -1.0, 1e-12));
    assert!(approx_eq(max.x, 1.0, 1e-12));
    assert!(approx_eq(min.y, 0.0, 1e-12));
    assert!(approx_eq(max.y, 1.0, 1e-12));
}

#[test]
fn bounds_of_lines_come_from_endpoints() {
    let mut pen = BoundsPen::new();
    pen.move_to(-2.0, 3.0);
    pen.arc_to(5.0, -1.0, 0.0);
    let (min, max) = pen.bounds().unwrap();
    assert_eq!((min.x, min.y), (-2.0, -1.0));
    assert_eq!((max.x, max.y), (5.0, 3.0));
}
