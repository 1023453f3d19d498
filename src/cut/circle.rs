//! The moving-point cut curve.
//!
//! A point `P(t) = P₀ + t·(dx, dy)` travels through the fixed frame while
//! the blank rotates uniformly from `a₀` by `da`, `t ∈ [0, 1]`. In blank
//! coordinates the point traces the polar curve
//!
//! ```text
//! θ(t) = atan2(y(t), x(t)) − a(t)        r(t) = |P(t)|
//! ```
//!
//! Differentiating, `x·ẏ − y·ẋ` is independent of `t` (call it `DNUM`), so
//!
//! ```text
//! dθ/dt = DNUM / r²(t) − da
//! ```
//!
//! vanishes exactly where `r²(t) = DNUM/da`. With `r²(t) = |P₀|² + DB·t +
//! DA·t²` (`DA = dx² + dy²`, `DB = 2·P₀·(dx, dy)`) that is a quadratic in
//! `t` whose discriminant decides whether the curve *reverses*: between the
//! two roots the blank-frame angular motion runs backwards, the curve folds
//! into a pair of cusps, and two branches coexist over the same θ span. The
//! inner (smaller-radius) branch is the one a cutting operation leaves
//! behind.
//!
//! Every θ → t inversion here is a float binary search on the relevant
//! monotone branch; the achievable accuracy is the floating-point format,
//! not a series truncation.

use crate::biarc::{self, PathSample};
use crate::float_types::{Real, CUSP_SPEED_SQ, EPSILON};
use crate::pen::Pen;
use crate::search::search;
use nalgebra::{Point2, Vector2};

/// Forced subdivision near the top of the sampling recursion; a single
/// midpoint probe can miss an S-shaped wiggle.
const MIN_SUBDIV_DEPTH: u32 = 2;
const MAX_SUBDIV_DEPTH: u32 = 40;

/// The interval of `t` where the blank-frame angular velocity runs
/// backwards, bounded by cusps.
#[derive(Clone, Copy, Debug)]
struct Reversal {
    t_start: Real,
    t_end: Real,
}

#[derive(Clone, Debug)]
pub struct CircleCut {
    x0: Real,
    y0: Real,
    dx: Real,
    dy: Real,
    a0: Real,
    da: Real,
    /// x·ẏ − y·ẋ, constant along the motion.
    dnum: Real,
    /// Quadratic coefficients of r²(t) above |P₀|².
    qa: Real,
    qb: Real,
    p0_sq: Real,
    reversal: Option<Reversal>,
}

impl CircleCut {
    /// Builds the cut from its two endpoints: blank angle and fixed-frame
    /// point at `t = 0` and `t = 1`.
    pub fn new(a_from: Real, p_from: Point2<Real>, a_to: Real, p_to: Point2<Real>) -> Self {
        let (x0, y0) = (p_from.x, p_from.y);
        let dx = p_to.x - x0;
        let dy = p_to.y - y0;
        let a0 = a_from;
        let da = a_to - a_from;

        let dnum = x0 * dy - y0 * dx;
        let qa = dx * dx + dy * dy;
        let qb = 2.0 * (x0 * dx + y0 * dy);
        let p0_sq = x0 * x0 + y0 * y0;

        let mut reversal = None;
        if qa > 0.0 && da != 0.0 {
            let disc = qb * qb - 4.0 * qa * (p0_sq - dnum / da);
            if disc > 0.0 {
                let sq = disc.sqrt();
                let t_start = (-qb - sq) / (2.0 * qa);
                let t_end = (-qb + sq) / (2.0 * qa);
                // Only a reversal overlapping the swept interval splits the
                // curve into branches.
                if t_end > 0.0 && t_start < 1.0 {
                    reversal = Some(Reversal { t_start, t_end });
                }
            }
        }

        Self { x0, y0, dx, dy, a0, da, dnum, qa, qb, p0_sq, reversal }
    }

    #[inline]
    fn point_at(&self, t: Real) -> Point2<Real> {
        Point2::new(self.x0 + t * self.dx, self.y0 + t * self.dy)
    }

    #[inline]
    fn radius_at(&self, t: Real) -> Real {
        (self.p0_sq + t * (self.qb + t * self.qa)).max(0.0).sqrt()
    }

    /// Blank-local angle of the cut point at `t`.
    pub fn theta_at(&self, t: Real) -> Real {
        let p = self.point_at(t);
        p.y.atan2(p.x) - (self.a0 + t * self.da)
    }

    /// The cut point at `t` in blank coordinates.
    fn blank_point_at(&self, t: Real) -> Point2<Real> {
        let p = self.point_at(t);
        let (s, c) = (self.a0 + t * self.da).sin_cos();
        Point2::new(c * p.x + s * p.y, -s * p.x + c * p.y)
    }

    /// Cusp parameters inside `(0, 1)`, ascending. Zero, one or two.
    fn cusps(&self) -> [Option<Real>; 2] {
        let mut out = [None, None];
        if let Some(rev) = self.reversal {
            let mut n = 0;
            for t in [rev.t_start, rev.t_end] {
                if t > 0.0 && t < 1.0 {
                    out[n] = Some(t);
                    n += 1;
                }
            }
        }
        out
    }

    /// Monotone-θ branches of the sweep, as `t` intervals in sweep order.
    fn branches(&self) -> Vec<(Real, Real)> {
        let mut bounds = vec![0.0];
        for t in self.cusps().into_iter().flatten() {
            bounds.push(t);
        }
        bounds.push(1.0);
        bounds.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// The θ values at which a radius lookup crosses between branches,
    /// restricted to strictly inside `(lo, hi)`.
    pub fn discontinuities(&self, lo: Real, hi: Real) -> Vec<Real> {
        self.cusps()
            .into_iter()
            .flatten()
            .map(|t| self.theta_at(t))
            .filter(|&th| th > lo && th < hi)
            .collect()
    }

    /// The full θ span reached by the sweep.
    pub fn theta_range(&self) -> (Real, Real) {
        let mut lo = Real::INFINITY;
        let mut hi = Real::NEG_INFINITY;
        for t in [Some(0.0), Some(1.0), self.cusps()[0], self.cusps()[1]]
            .into_iter()
            .flatten()
        {
            let th = self.theta_at(t);
            lo = lo.min(th);
            hi = hi.max(th);
        }
        (lo, hi)
    }

    /// Radius at blank-local angle `theta`.
    ///
    /// Where the reversal makes two branches coexist, the inner (reversal)
    /// branch answers: it has the smaller radius, so it is the one a cut
    /// leaves on the blank.
    pub fn get_r(&self, theta: Real) -> Real {
        self.radius_at(self.solve_t(theta))
    }

    /// Inverts θ(t) = theta on the appropriate monotone branch.
    ///
    /// Where branches overlap in θ, the preimage with the smaller radius
    /// answers: that is the branch a cut leaves behind on the blank.
    fn solve_t(&self, theta: Real) -> Real {
        let branches = self.branches();
        let slack = 1e-9 * (1.0 + theta.abs());

        let mut best: Option<(Real, Real)> = None; // (radius, t)
        for &(ta, tb) in &branches {
            let (th_a, th_b) = (self.theta_at(ta), self.theta_at(tb));
            let (lo, hi) = if th_a <= th_b { (th_a, th_b) } else { (th_b, th_a) };
            if theta >= lo - slack && theta <= hi + slack {
                let t = self.solve_on(ta, tb, theta);
                let r = self.radius_at(t);
                if best.map_or(true, |(br, _)| r < br) {
                    best = Some((r, t));
                }
            }
        }
        if let Some((_, t)) = best {
            return t;
        }

        // Out of range (the caller clamped a span a hair past the sweep):
        // the nearest branch endpoint is the best answer available.
        let mut nearest = (Real::INFINITY, 0.0);
        for &(ta, tb) in &branches {
            for t in [ta, tb] {
                let d = (self.theta_at(t) - theta).abs();
                if d < nearest.0 {
                    nearest = (d, t);
                }
            }
        }
        nearest.1
    }

    /// θ is monotone on `[ta, tb]`; bracket the preimage of `theta`.
    fn solve_on(&self, ta: Real, tb: Real, theta: Real) -> Real {
        let increasing = self.theta_at(tb) >= self.theta_at(ta);
        let (l, h) = search(ta, tb, |t| {
            if increasing {
                self.theta_at(t) <= theta
            } else {
                self.theta_at(t) >= theta
            }
        });
        0.5 * (l + h)
    }

    /// Point and traversal tangent at `t`, in blank coordinates. `dir` is
    /// the sign of dt along the traversal.
    fn sample_at(&self, t: Real, dir: Real) -> PathSample {
        let p = self.point_at(t);
        let (s, c) = (self.a0 + t * self.da).sin_cos();
        let point = Point2::new(c * p.x + s * p.y, -s * p.x + c * p.y);

        // Blank-frame velocity: rotate (Ṗ − ȧ·J·P) back by the blank angle.
        let vx = self.dx + self.da * p.y;
        let vy = self.dy - self.da * p.x;
        let v = Vector2::new(c * vx + s * vy, -s * vx + c * vy);

        let speed_sq = v.norm_squared();
        let tangent = if speed_sq < CUSP_SPEED_SQ {
            // At a cusp the motion is momentarily radial.
            let r = point.coords.norm();
            let radial = if r > EPSILON {
                point.coords / r
            } else {
                Vector2::new(1.0, 0.0)
            };
            radial * (self.qb + 2.0 * self.qa * t).signum() * dir
        } else {
            v / speed_sq.sqrt() * dir
        };
        PathSample { point, tangent }
    }

    /// Deviation-bounded subdivision of `(ta, tb)`, pushing interior samples
    /// in traversal order. Endpoint samples are the caller's.
    #[allow(clippy::too_many_arguments)]
    fn subdivide(
        &self,
        ta: Real,
        pa: Point2<Real>,
        tb: Real,
        pb: Point2<Real>,
        dev_sq_max: Real,
        dir: Real,
        depth: u32,
        out: &mut Vec<PathSample>,
    ) {
        // Traversal may run in either direction of t.
        let tm = 0.5 * (ta + tb);
        let between = (ta < tm && tm < tb) || (tb < tm && tm < ta);
        if !between || depth >= MAX_SUBDIV_DEPTH {
            return;
        }
        let pm = self.blank_point_at(tm);
        let chord_mid = Point2::from((pa.coords + pb.coords) * 0.5);
        if depth >= MIN_SUBDIV_DEPTH && (pm - chord_mid).norm_squared() <= dev_sq_max {
            return;
        }
        self.subdivide(ta, pa, tm, pm, dev_sq_max, dir, depth + 1, out);
        out.push(self.sample_at(tm, dir));
        self.subdivide(tm, pm, tb, pb, dev_sq_max, dir, depth + 1, out);
    }

    /// Samples the monotone stretch between two θ values and emits its biarc
    /// fit.
    fn draw_monotone(
        &self,
        pen: &mut dyn Pen,
        th_a: Real,
        th_b: Real,
        tol: Real,
        initial_move: bool,
    ) {
        let ta = self.solve_t(th_a);
        let tb = self.solve_t(th_b);
        let dir = if tb >= ta { 1.0 } else { -1.0 };

        let mut samples = Vec::new();
        samples.push(self.sample_at(ta, dir));

        // Splitting at the radius extremum keeps each sampled stretch free
        // of fold-backs in r.
        let dev_sq_max = tol * tol * 0.25;
        let t_mid = if self.qa > 0.0 { -self.qb / (2.0 * self.qa) } else { ta };
        let (lo, hi) = if ta <= tb { (ta, tb) } else { (tb, ta) };
        let stops = if t_mid > lo && t_mid < hi {
            vec![ta, t_mid, tb]
        } else {
            vec![ta, tb]
        };
        for w in stops.windows(2) {
            let (sa, sb) = (w[0], w[1]);
            let pa = self.blank_point_at(sa);
            let pb = self.blank_point_at(sb);
            self.subdivide(sa, pa, sb, pb, dev_sq_max, dir, 0, &mut samples);
            if sb != tb {
                samples.push(self.sample_at(sb, dir));
            }
        }
        samples.push(self.sample_at(tb, dir));

        biarc::draw_fitted(pen, &samples, tol, initial_move);
    }

    /// Draws the curve from `th_from` to `th_to`, splitting at any branch
    /// transition in between so every fitted stretch is monotone in θ.
    pub fn draw_segment(
        &self,
        pen: &mut dyn Pen,
        th_from: Real,
        th_to: Real,
        tol: Real,
        initial_move: bool,
    ) {
        let (lo, hi) = if th_from <= th_to { (th_from, th_to) } else { (th_to, th_from) };
        let mut splits = self.discontinuities(lo, hi);
        splits.sort_by(Real::total_cmp);
        if th_from > th_to {
            splits.reverse();
        }

        let mut stops = Vec::with_capacity(splits.len() + 2);
        stops.push(th_from);
        stops.extend(splits);
        stops.push(th_to);

        let mut first = initial_move;
        for w in stops.windows(2) {
            if (w[1] - w[0]).abs() < EPSILON {
                continue;
            }
            self.draw_monotone(pen, w[0], w[1], tol, first);
            first = false;
        }
    }
}
