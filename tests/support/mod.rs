//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use gearpath::float_types::Real;
use gearpath::pen::{arc_center, PathCommand};
use nalgebra::Point2;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Flattens recorded pen commands into a dense polyline, splitting arcs at
/// `step` radians.
pub fn tessellate(commands: &[PathCommand], step: Real) -> Vec<Point2<Real>> {
    let mut pts: Vec<Point2<Real>> = Vec::new();
    let mut cur: Option<Point2<Real>> = None;
    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo { x, y } => {
                cur = Some(Point2::new(x, y));
                pts.push(Point2::new(x, y));
            },
            PathCommand::ArcTo { x, y, turn } => {
                let p0 = cur.expect("arc with no current point");
                let p1 = Point2::new(x, y);
                if let Some((c, r)) = arc_center(p0, p1, turn) {
                    let from = p0 - c;
                    let start = from.y.atan2(from.x);
                    let n = (turn.abs() / step).ceil().max(1.0) as usize;
                    for i in 1..n {
                        let ang = start + turn * (i as Real) / (n as Real);
                        pts.push(Point2::new(
                            c.x + r.abs() * ang.cos(),
                            c.y + r.abs() * ang.sin(),
                        ));
                    }
                }
                pts.push(p1);
                cur = Some(p1);
            },
        }
    }
    pts
}

/// Smallest distance from `p` to the polyline through `pts`.
pub fn distance_to_polyline(p: Point2<Real>, pts: &[Point2<Real>]) -> Real {
    let mut best = Real::INFINITY;
    for seg in pts.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let ab = b - a;
        let len2 = ab.norm_squared();
        let t = if len2 > 0.0 {
            ((p - a).dot(&ab) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = a + ab * t;
        best = best.min((p - closest).norm());
    }
    best
}

/// Number of `ArcTo` commands in a recording.
pub fn arc_count(commands: &[PathCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, PathCommand::ArcTo { .. }))
        .count()
}
