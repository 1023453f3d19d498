//! The unified 2D path sink all geometry is drawn against.
//!
//! A path is a `move_to` followed by `arc_to`s. `arc_to(x, y, turn)` sweeps
//! a circular arc from the current point to `(x, y)`; `turn` is the signed
//! total rotation of the tangent along the way, so `turn == 0` is a straight
//! line and positive turn rotates the tangent from +x toward +y.

use crate::float_types::{
    Real, DUP_DISCARD_SQ, EPSILON, FRAC_PI_2, LINE_TURN, TAU, TURN_CLAMP_SQ,
};
use nalgebra::{Matrix3, Point2, Vector2, Vector3};

/// A 2D path sink.
///
/// Every `arc_to` must have a defined current point, established by a prior
/// `move_to` or the endpoint of the previous `arc_to`. Violations are caller
/// bugs and panic.
pub trait Pen {
    /// Start a new subpath at `(x, y)`.
    fn move_to(&mut self, x: Real, y: Real);

    /// Arc from the current point to `(x, y)`, turning the tangent by `turn`
    /// radians along the way. `|turn| < 1e-5` is semantically a line.
    fn arc_to(&mut self, x: Real, y: Real, turn: Real);
}

/// One recorded pen command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo { x: Real, y: Real },
    ArcTo { x: Real, y: Real, turn: Real },
}

/// Recovers the center and signed radius of the arc from `p0` to `p1` with
/// the given turn. Returns `None` for straight lines.
///
/// The signed radius is positive when the center lies to the left of the
/// chord (counter-clockwise sweep).
pub fn arc_center(p0: Point2<Real>, p1: Point2<Real>, turn: Real) -> Option<(Point2<Real>, Real)> {
    if turn.abs() < LINE_TURN {
        return None;
    }
    let chord = p1 - p0;
    let len = chord.norm();
    if len < EPSILON {
        return None;
    }
    let half = 0.5 * turn;
    let r = len / (2.0 * half.sin());
    let mid = Point2::from((p0.coords + p1.coords) * 0.5);
    let perp = Vector2::new(-chord.y, chord.x) / len;
    Some((mid + perp * (r * half.cos()), r))
}

/// True when `ang` lies on the arc that starts at angle `start` and sweeps
/// by `sweep` (signed, radians).
fn angle_in_sweep(start: Real, sweep: Real, ang: Real) -> bool {
    if sweep >= 0.0 {
        (ang - start).rem_euclid(TAU) <= sweep
    } else {
        (start - ang).rem_euclid(TAU) <= -sweep
    }
}

/// A pen that buffers commands for later replay.
///
/// Near-duplicate points are filtered on the way in: a step with squared
/// length under 1e-8 keeps its endpoint but loses its turn, and one under
/// 1e-14 is dropped outright.
#[derive(Clone, Debug, Default)]
pub struct RecordPen {
    commands: Vec<PathCommand>,
    cur: Option<Point2<Real>>,
}

impl RecordPen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<PathCommand> {
        self.commands
    }

    /// Replays the recorded commands into another pen.
    pub fn replay(&self, pen: &mut dyn Pen) {
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { x, y } => pen.move_to(x, y),
                PathCommand::ArcTo { x, y, turn } => pen.arc_to(x, y, turn),
            }
        }
    }
}

impl Pen for RecordPen {
    fn move_to(&mut self, x: Real, y: Real) {
        self.cur = Some(Point2::new(x, y));
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    fn arc_to(&mut self, x: Real, y: Real, turn: Real) {
        let cur = self.cur.expect("arc_to with no current point");
        let p = Point2::new(x, y);
        let d2 = (p - cur).norm_squared();
        if d2 < DUP_DISCARD_SQ {
            return;
        }
        let turn = if d2 < TURN_CLAMP_SQ { 0.0 } else { turn };
        self.cur = Some(p);
        self.commands.push(PathCommand::ArcTo { x, y, turn });
    }
}

/// Tracks the axis-aligned bounding box of everything drawn through it,
/// including the bulge of arcs past their endpoints.
#[derive(Clone, Debug, Default)]
pub struct BoundsPen {
    bounds: Option<(Point2<Real>, Point2<Real>)>,
    cur: Option<Point2<Real>>,
}

impl BoundsPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(min, max)` corners of everything drawn so far, or `None` if nothing
    /// has been drawn.
    pub fn bounds(&self) -> Option<(Point2<Real>, Point2<Real>)> {
        self.bounds
    }

    fn expand(&mut self, p: Point2<Real>) {
        match &mut self.bounds {
            None => self.bounds = Some((p, p)),
            Some((min, max)) => {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            },
        }
    }
}

impl Pen for BoundsPen {
    fn move_to(&mut self, x: Real, y: Real) {
        let p = Point2::new(x, y);
        self.cur = Some(p);
        self.expand(p);
    }

    fn arc_to(&mut self, x: Real, y: Real, turn: Real) {
        let cur = self.cur.expect("arc_to with no current point");
        let p = Point2::new(x, y);
        self.expand(p);
        if let Some((c, r)) = arc_center(cur, p, turn) {
            // An arc can bulge past both endpoints; the extrema lie where it
            // crosses the cardinal directions from its center.
            let r = r.abs();
            let from = cur - c;
            let start = from.y.atan2(from.x);
            for k in 0..4 {
                let ang = k as Real * FRAC_PI_2;
                if angle_in_sweep(start, turn, ang) {
                    self.expand(c + Vector2::new(ang.cos(), ang.sin()) * r);
                }
            }
        }
        self.cur = Some(p);
    }
}

/// A composed 2D affine transform.
///
/// Rotations by exact multiples of 90° snap to exact `{0, ±1}` axis
/// components so that rectilinear geometry stays rectilinear.
#[derive(Clone, Copy, Debug)]
pub struct Transform2 {
    m: Matrix3<Real>,
    flip: bool,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2 {
    pub fn identity() -> Self {
        Self { m: Matrix3::identity(), flip: false }
    }

    /// Composes a rotation by `deg` degrees (counter-clockwise).
    #[must_use]
    pub fn rotated_deg(self, deg: Real) -> Self {
        let quarter = deg / 90.0;
        let (s, c) = if quarter == quarter.trunc() && quarter.abs() < 1e15 {
            match (quarter as i64).rem_euclid(4) {
                0 => (0.0, 1.0),
                1 => (1.0, 0.0),
                2 => (0.0, -1.0),
                _ => (-1.0, 0.0),
            }
        } else {
            deg.to_radians().sin_cos()
        };
        let rot = Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
        Self { m: self.m * rot, flip: self.flip }
    }

    /// Composes a translation.
    #[must_use]
    pub fn translated(self, x: Real, y: Real) -> Self {
        let t = Matrix3::new(1.0, 0.0, x, 0.0, 1.0, y, 0.0, 0.0, 1.0);
        Self { m: self.m * t, flip: self.flip }
    }

    /// Composes a uniform scale, optionally mirroring across the x axis.
    #[must_use]
    pub fn scaled(self, factor: Real, flip_y: bool) -> Self {
        let sy = if flip_y { -factor } else { factor };
        let s = Matrix3::new(factor, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0);
        Self { m: self.m * s, flip: self.flip ^ flip_y }
    }

    /// Applies the transform to a point.
    pub fn apply(&self, x: Real, y: Real) -> (Real, Real) {
        let v = self.m * Vector3::new(x, y, 1.0);
        (v.x, v.y)
    }

    /// True when the transform reverses orientation, which negates arc turns.
    pub fn flips(&self) -> bool {
        self.flip
    }
}

/// A pen wrapper that applies a [`Transform2`] before delegating.
pub struct TransformPen<'a> {
    xf: Transform2,
    inner: &'a mut dyn Pen,
}

impl<'a> TransformPen<'a> {
    pub fn new(inner: &'a mut dyn Pen) -> Self {
        Self { xf: Transform2::identity(), inner }
    }

    pub fn with_transform(inner: &'a mut dyn Pen, xf: Transform2) -> Self {
        Self { xf, inner }
    }

    pub fn rotate(&mut self, deg: Real) {
        self.xf = self.xf.rotated_deg(deg);
    }

    pub fn translate(&mut self, x: Real, y: Real) {
        self.xf = self.xf.translated(x, y);
    }

    pub fn scale(&mut self, factor: Real, flip_y: bool) {
        self.xf = self.xf.scaled(factor, flip_y);
    }

    pub fn transform(&self) -> &Transform2 {
        &self.xf
    }

    /// A pen sharing this pen's sink, with an independent copy of the
    /// current transform. The original is unusable while the fork lives.
    pub fn fork(&mut self) -> TransformPen<'_> {
        TransformPen { xf: self.xf, inner: &mut *self.inner }
    }
}

impl Pen for TransformPen<'_> {
    fn move_to(&mut self, x: Real, y: Real) {
        let (x, y) = self.xf.apply(x, y);
        self.inner.move_to(x, y);
    }

    fn arc_to(&mut self, x: Real, y: Real, turn: Real) {
        let (x, y) = self.xf.apply(x, y);
        let turn = if self.xf.flips() { -turn } else { turn };
        self.inner.arc_to(x, y, turn);
    }
}
