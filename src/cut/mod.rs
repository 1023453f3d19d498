//! Polar cut curves: the loci carved on the rotating blank by single
//! features of the moving rack.

pub mod circle;

pub use circle::CircleCut;

use crate::float_types::Real;
use crate::pen::Pen;

/// A curve on the blank, polar in the blank-local angle θ (radians).
///
/// Two variants cover every feature of a piecewise-linear rack: an edge
/// parallel to the rack's travel carves a circle about the blank axis, and
/// everything else (a rack vertex, or a sloped edge's line-of-action sweep)
/// carves a [`CircleCut`].
#[derive(Clone, Debug)]
pub enum CutCurve {
    ConstantRadius(ConstantRadiusCut),
    Circle(CircleCut),
}

/// A cut at a fixed distance from the blank axis.
#[derive(Clone, Copy, Debug)]
pub struct ConstantRadiusCut {
    pub r: Real,
}

impl ConstantRadiusCut {
    /// Draws the arc between two blank-local angles, exactly.
    pub fn draw_segment(&self, pen: &mut dyn Pen, th_from: Real, th_to: Real, initial_move: bool) {
        if initial_move {
            pen.move_to(self.r * th_from.cos(), self.r * th_from.sin());
        }
        pen.arc_to(self.r * th_to.cos(), self.r * th_to.sin(), th_to - th_from);
    }
}

impl CutCurve {
    /// Radius at blank-local angle `theta`.
    pub fn get_r(&self, theta: Real) -> Real {
        match self {
            CutCurve::ConstantRadius(c) => c.r,
            CutCurve::Circle(c) => c.get_r(theta),
        }
    }

    /// Angles strictly inside `(lo, hi)` where the curve switches branch.
    /// Radius lookups on either side of such an angle resolve to different
    /// monotone pieces of the underlying motion.
    pub fn discontinuities(&self, lo: Real, hi: Real) -> Vec<Real> {
        match self {
            CutCurve::ConstantRadius(_) => Vec::new(),
            CutCurve::Circle(c) => c.discontinuities(lo, hi),
        }
    }

    /// Draws the curve between two blank-local angles within `tol`.
    pub fn draw_segment(
        &self,
        pen: &mut dyn Pen,
        th_from: Real,
        th_to: Real,
        tol: Real,
        initial_move: bool,
    ) {
        match self {
            CutCurve::ConstantRadius(c) => c.draw_segment(pen, th_from, th_to, initial_move),
            CutCurve::Circle(c) => c.draw_segment(pen, th_from, th_to, tol, initial_move),
        }
    }
}
