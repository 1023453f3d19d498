//! Minimal tangent-continuous arc runs for sampled curves.
//!
//! A biarc is a pair of circular arcs sharing a tangent at their joint. For
//! two endpoints with unit tangents, the *incenter-connecting* biarc fixes
//! the joint tangent to the unit chord direction, which makes the split
//! solvable in closed form and keeps the curvature jump at the joint small.
//!
//! Given a dense point-and-tangent sampling of a smooth curve, [`select`]
//! chooses a minimum-cardinality subsequence whose pairwise biarcs stay
//! within tolerance of every skipped sample, and [`draw_fitted`] emits the
//! result as `arc_to` pairs.

use crate::float_types::{Real, EPSILON, LINE_TURN};
use crate::pen::Pen;
use nalgebra::{Point2, Vector2};

/// A point on a curve with its unit tangent, oriented along the direction of
/// traversal.
#[derive(Clone, Copy, Debug)]
pub struct PathSample {
    pub point: Point2<Real>,
    pub tangent: Vector2<Real>,
}

#[inline]
fn cross(a: Vector2<Real>, b: Vector2<Real>) -> Real {
    a.x * b.y - a.y * b.x
}

#[inline]
fn perp(v: Vector2<Real>) -> Vector2<Real> {
    Vector2::new(-v.y, v.x)
}

/// The joint of the incenter-connecting biarc from `s0` to `s1`.
///
/// The joint tangent is the unit chord direction `t_m`; the joint point is
/// `p0 + a0·(t0 + t_m)`, with `a0` (and the matching `a1` from the far end)
/// solved from `a0·(t0 + t_m) + a1·(t1 + t_m) = p1 − p0`.
///
/// Returns `None` when the tangents are near-antiparallel (a curvature sign
/// reversal inside the pair); callers partition curves at such points before
/// fitting.
pub fn biarc_joint(s0: &PathSample, s1: &PathSample) -> Option<PathSample> {
    let chord = s1.point - s0.point;
    let len = chord.norm();
    if len < EPSILON {
        return None;
    }
    let tm = chord / len;
    let u = s0.tangent + tm;
    let v = s1.tangent + tm;
    let det = cross(u, v);
    if det.abs() < 1e-12 {
        // Either everything is collinear (a straight biarc, joint at the
        // chord midpoint) or the tangents fold back on the chord.
        if cross(tm, s0.tangent).abs() < 1e-9 && cross(tm, s1.tangent).abs() < 1e-9 {
            return Some(PathSample {
                point: Point2::from((s0.point.coords + s1.point.coords) * 0.5),
                tangent: tm,
            });
        }
        return None;
    }
    let a0 = cross(chord, v) / det;
    let joint = s0.point + u * a0;
    if !(joint.x.is_finite() && joint.y.is_finite()) {
        return None;
    }
    Some(PathSample { point: joint, tangent: tm })
}

/// Distance from `p` to the arc through `(pa, ta) → (pb, tb)`.
///
/// The arc's center follows from the two point-tangent pairs:
/// `R = |c|² / ((tb − ta)⊥ · c)` and `C = (pa + pb)/2 − R·(ta + tb)⊥/2`
/// with `c = pb − pa`. When the denominator vanishes relative to the chord
/// the arc is a line, and the perpendicular distance to the chord along the
/// averaged tangent is used instead.
fn arc_deviation(p: Point2<Real>, pa: &PathSample, pb: &PathSample) -> Real {
    let c = pb.point - pa.point;
    let len2 = c.norm_squared();
    let denom = perp(pb.tangent - pa.tangent).dot(&c);
    if len2 >= denom.abs() * 1e8 {
        let dir = pa.tangent + pb.tangent;
        let n = dir.norm();
        if n < EPSILON {
            return (p - pa.point).norm();
        }
        return cross(dir / n, p - pa.point).abs();
    }
    let r = len2 / denom;
    let mid = (pa.point.coords + pb.point.coords) * 0.5;
    let center = Point2::from(mid - perp(pa.tangent + pb.tangent) * (r * 0.5));
    ((p - center).norm() - r.abs()).abs()
}

/// Distance from `p` to the biarc `(s0, joint, s1)`: samples past the
/// joint's chord projection measure against the second arc.
fn biarc_deviation(
    p: Point2<Real>,
    s0: &PathSample,
    s1: &PathSample,
    joint: &PathSample,
) -> Real {
    let c = s1.point - s0.point;
    let p_along = (p - s0.point).dot(&c);
    let j_along = (joint.point - s0.point).dot(&c);
    if p_along > j_along {
        arc_deviation(p, joint, s1)
    } else {
        arc_deviation(p, s0, joint)
    }
}

/// Worst deviation of the interior samples from the biarc `j → i`, or `None`
/// when the biarc split fails. Bails out early past `tol`.
fn span_error(samples: &[PathSample], j: usize, i: usize, tol: Real) -> Option<Real> {
    let joint = biarc_joint(&samples[j], &samples[i])?;
    let mut worst: Real = 0.0;
    for s in &samples[j + 1..i] {
        worst = worst.max(biarc_deviation(s.point, &samples[j], &samples[i], &joint));
        if worst > tol {
            break;
        }
    }
    Some(worst)
}

/// Chooses the indices of a minimum-cardinality subsequence of `samples`
/// (always including the first and last) whose pairwise biarcs deviate from
/// every skipped sample by at most `tolerance`.
///
/// Dynamic program over sample positions: minimize biarc count, tiebreak on
/// the worst deviation of the whole chain. A sliding scan-start prunes
/// predecessors that have already failed to reach a later position, since
/// growing a span never shrinks its error.
pub fn select(samples: &[PathSample], tolerance: Real) -> Vec<usize> {
    let n = samples.len();
    if n <= 2 {
        return (0..n).collect();
    }

    #[derive(Clone, Copy)]
    struct Node {
        count: u32,
        err: Real,
        pred: usize,
    }
    let unreached = Node { count: u32::MAX, err: Real::INFINITY, pred: usize::MAX };
    let mut nodes = vec![unreached; n];
    nodes[0] = Node { count: 0, err: 0.0, pred: usize::MAX };

    let mut next_scan_start = 0usize;
    for i in 1..n {
        let mut best: Option<Node> = None;
        let mut first_feasible = i - 1;
        for j in next_scan_start..i {
            if nodes[j].count == u32::MAX {
                continue;
            }
            let err = match span_error(samples, j, i, tolerance) {
                Some(e) if e <= tolerance => e,
                _ => continue,
            };
            first_feasible = first_feasible.min(j);
            let cand = Node {
                count: nodes[j].count + 1,
                err: nodes[j].err.max(err),
                pred: j,
            };
            let better = match best {
                None => true,
                Some(b) => cand.count < b.count || (cand.count == b.count && cand.err < b.err),
            };
            if better {
                best = Some(cand);
            }
        }
        // Adjacent samples are always representable (their biarc has no
        // interior sample to miss), so reachability only fails when even the
        // adjacent split degenerates; chain it straight through regardless.
        nodes[i] = best.unwrap_or(Node {
            count: nodes[i - 1].count.saturating_add(1),
            err: nodes[i - 1].err,
            pred: i - 1,
        });
        next_scan_start = first_feasible;
    }

    let mut picks = vec![n - 1];
    let mut at = n - 1;
    while nodes[at].pred != usize::MAX {
        at = nodes[at].pred;
        picks.push(at);
    }
    picks.reverse();
    debug_assert_eq!(picks[0], 0);
    picks
}

/// Fits `samples` within `tolerance` and emits the chosen biarcs.
///
/// With `initial_move`, starts with a `move_to` to the first sample;
/// otherwise the pen's current point is assumed to already sit there.
pub fn draw_fitted(pen: &mut dyn Pen, samples: &[PathSample], tolerance: Real, initial_move: bool) {
    let Some(first) = samples.first() else {
        return;
    };
    if initial_move {
        pen.move_to(first.point.x, first.point.y);
    }
    if samples.len() < 2 {
        return;
    }
    let picks = select(samples, tolerance);
    log::trace!("biarc fit kept {} of {} samples", picks.len(), samples.len());
    for pair in picks.windows(2) {
        let s0 = &samples[pair[0]];
        let s1 = &samples[pair[1]];
        match biarc_joint(s0, s1) {
            Some(joint) => {
                let turn0 = cross(s0.tangent, joint.tangent).clamp(-1.0, 1.0).asin();
                let turn1 = cross(joint.tangent, s1.tangent).clamp(-1.0, 1.0).asin();
                if turn0.abs() < LINE_TURN && turn1.abs() < LINE_TURN {
                    pen.arc_to(s1.point.x, s1.point.y, 0.0);
                } else {
                    pen.arc_to(joint.point.x, joint.point.y, turn0);
                    pen.arc_to(s1.point.x, s1.point.y, turn1);
                }
            },
            // Degenerate pair: fall back to the chord.
            None => pen.arc_to(s1.point.x, s1.point.y, 0.0),
        }
    }
}
