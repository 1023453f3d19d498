//! The gear cutter: turns a rack path into polar cut segments.
//!
//! The cutter is itself a [`Pen`]. The rack profile is drawn into it in the
//! blank frame (blank axis at the origin, rack wholly on the +x side, rack
//! travel along +y), and every feature of the path becomes a cut:
//!
//! - each edge endpoint becomes a point-involute cut of the vertex,
//! - each edge parallel to the travel direction becomes a constant-radius
//!   cut,
//! - each sloped edge becomes a moving-point cut along its line of action.
//!
//! Feeding a vertex at `x <= 0` or an edge with curvature is a caller bug
//! and panics.

use crate::cut::{CircleCut, ConstantRadiusCut, CutCurve};
use crate::float_types::{Real, MAX_EDGE_TURN, PI, TAU};
use crate::pen::Pen;
use hashbrown::HashMap;
use nalgebra::Point2;

/// A cut curve restricted to an angular span on the blank.
///
/// Angles are in *teeth* (1 tooth = 2π/N radians). `rot` shifts the curve
/// about the blank axis by that many teeth: the curve's own θ at tooth
/// angle `a` is `(a − rot)·(2π/N)`.
#[derive(Clone, Copy, Debug)]
pub struct CutSegment {
    pub start: Real,
    pub end: Real,
    /// Index into the owning cutter's curve table.
    pub curve: u32,
    pub rot: Real,
    /// Drawing tolerance for this cut (face or fillet).
    pub tol: Real,
}

/// Accumulates the cuts of one tooth of rolling motion.
pub struct GearCutter {
    pitch_radius: Real,
    /// Blank rotation per tooth, radians.
    dad_tooth: Real,
    /// Rack advance per tooth.
    dyd_tooth: Real,
    face_tol: Real,
    fillet_tol: Real,
    cur: Option<Point2<Real>>,
    curves: Vec<CutCurve>,
    segments: Vec<CutSegment>,
    point_curves: HashMap<u64, u32>,
    flat_curves: HashMap<u64, u32>,
    /// Vertices already sighted, with their point-cut segment, for
    /// tolerance promotion on the second sighting.
    point_sightings: Vec<(Point2<Real>, usize)>,
}

/// Feature-independent memo key width.
#[allow(clippy::unnecessary_cast)]
#[inline]
fn key_bits(v: Real) -> u64 {
    v.to_bits() as u64
}

impl GearCutter {
    pub fn new(n_teeth: u32, pitch_radius: Real, face_tol: Real, fillet_tol: Real) -> Self {
        assert!(n_teeth >= 4, "need at least 4 teeth for a valid gear");
        assert!(pitch_radius > 0.0, "pitch radius must be positive");
        assert!(face_tol > 0.0 && fillet_tol > 0.0, "tolerances must be positive");
        let dad_tooth = TAU / n_teeth as Real;
        Self {
            pitch_radius,
            dad_tooth,
            dyd_tooth: dad_tooth * pitch_radius,
            face_tol,
            fillet_tol,
            cur: None,
            curves: Vec::new(),
            segments: Vec::new(),
            point_curves: HashMap::new(),
            flat_curves: HashMap::new(),
            point_sightings: Vec::new(),
        }
    }

    /// Blank rotation per tooth, radians.
    pub fn dad_tooth(&self) -> Real {
        self.dad_tooth
    }

    /// The accumulated curves and segments.
    pub fn finish(self) -> (Vec<CutCurve>, Vec<CutSegment>, Real) {
        log::debug!(
            "cutter produced {} curves, {} segments",
            self.curves.len(),
            self.segments.len()
        );
        (self.curves, self.segments, self.dad_tooth)
    }

    fn push_curve(&mut self, curve: CutCurve) -> u32 {
        let id = self.curves.len() as u32;
        self.curves.push(curve);
        id
    }

    /// The memoized point-involute curve of a vertex at radius `x`. The
    /// canonical curve is for a vertex crossing y = 0 at blank angle 0; any
    /// other crossing is the same curve rotated.
    fn point_curve(&mut self, x: Real) -> u32 {
        if let Some(&id) = self.point_curves.get(&key_bits(x)) {
            return id;
        }
        // Sweep the vertex across one full blank revolution so neighboring
        // teeth's action reaches this tooth's window once wrapped.
        let reach = PI * self.pitch_radius;
        let curve = CircleCut::new(
            -PI,
            Point2::new(x, -reach),
            PI,
            Point2::new(x, reach),
        );
        let id = self.push_curve(CutCurve::Circle(curve));
        self.point_curves.insert(key_bits(x), id);
        id
    }

    fn add_point_cut(&mut self, p: Point2<Real>) {
        assert!(
            p.x > 0.0,
            "rack vertex at x = {} but the rack must lie wholly on the +x side of the blank axis",
            p.x
        );
        // Second sighting of a vertex means it is shared between two edges,
        // so it carves working face rather than a terminal fillet. The path
        // carries one pitch of a periodic profile, so the seam vertex's
        // second sighting arrives one whole pitch away in y; it pairs the
        // same way, and needs no segment of its own because window wrapping
        // already replicates the curve across every whole-tooth shift.
        for &(q, si) in &self.point_sightings {
            if p.x != q.x {
                continue;
            }
            let seam = ((p.y - q.y).abs() - self.dyd_tooth).abs() < 1e-9;
            if p == q || seam {
                self.segments[si].tol = self.face_tol;
                return;
            }
        }
        let curve = self.point_curve(p.x);
        let (th_lo, th_hi) = match &self.curves[curve as usize] {
            CutCurve::Circle(c) => c.theta_range(),
            CutCurve::ConstantRadius(_) => unreachable!(),
        };
        let rot = p.y / self.dyd_tooth;
        let seg = CutSegment {
            start: rot + th_lo / self.dad_tooth,
            end: rot + th_hi / self.dad_tooth,
            curve,
            rot,
            tol: self.fillet_tol,
        };
        self.point_sightings.push((p, self.segments.len()));
        self.segments.push(seg);
    }

    /// A vertical edge (constant x) cuts a plain circle at that radius over
    /// the teeth-span its y extent corresponds to.
    fn add_flat_cut(&mut self, x: Real, y_a: Real, y_b: Real) {
        let id = match self.flat_curves.get(&key_bits(x)) {
            Some(&id) => id,
            None => {
                let id = self.push_curve(CutCurve::ConstantRadius(ConstantRadiusCut { r: x }));
                self.flat_curves.insert(key_bits(x), id);
                id
            },
        };
        self.segments.push(CutSegment {
            start: y_a.min(y_b) / self.dyd_tooth,
            end: y_a.max(y_b) / self.dyd_tooth,
            curve: id,
            rot: 0.0,
            tol: self.face_tol,
        });
    }

    /// A sloped edge's contact point travels along the line of action
    /// through the pitch point, at the rack velocity's component
    /// perpendicular to the edge.
    fn add_flank_cut(&mut self, from: Point2<Real>, to: Point2<Real>) {
        let xp = self.pitch_radius;
        let edge = to - from;

        // Where the edge line crosses the pitch radius, and the time (in
        // teeth) at which that crossing reaches y = 0; that instant fixes
        // the rotational phase of the cut.
        let y0p = edge.y * (xp - from.x) / edge.x + from.y;
        let tp = -y0p / self.dyd_tooth;

        let along = self.dyd_tooth * edge.y / edge.norm_squared();
        let dxdt = -along * edge.x;
        let dydt = self.dyd_tooth - along * edge.y;

        let t0 = (from.x - xp) / dxdt;
        let t1 = (to.x - xp) / dxdt;

        let curve = CircleCut::new(
            (t0 + tp) * self.dad_tooth,
            Point2::new(from.x, t0 * dydt),
            (t1 + tp) * self.dad_tooth,
            Point2::new(to.x, t1 * dydt),
        );
        let (th_lo, th_hi) = curve.theta_range();
        let id = self.push_curve(CutCurve::Circle(curve));
        self.segments.push(CutSegment {
            start: th_lo / self.dad_tooth,
            end: th_hi / self.dad_tooth,
            curve: id,
            rot: 0.0,
            tol: self.face_tol,
        });
    }
}

impl Pen for GearCutter {
    fn move_to(&mut self, x: Real, y: Real) {
        self.cur = Some(Point2::new(x, y));
    }

    fn arc_to(&mut self, x: Real, y: Real, turn: Real) {
        let from = self.cur.expect("arc_to with no current point");
        assert!(
            turn.abs() <= MAX_EDGE_TURN,
            "gear cutter requires straight rack edges (turn = {turn})"
        );
        let to = Point2::new(x, y);
        self.cur = Some(to);
        if (to - from).norm_squared() == 0.0 {
            return;
        }

        self.add_point_cut(from);
        self.add_point_cut(to);

        if from.x == to.x {
            self.add_flat_cut(from.x, from.y, to.y);
        } else if from.y == to.y {
            // An edge aligned with the radial direction sweeps nothing its
            // endpoints don't already cut.
        } else {
            self.add_flank_cut(from, to);
        }
    }
}
