//! Tightest-bracket binary search over floating-point ranges.
//!
//! Every non-trivial equality in this crate (branch inversion on cut curves,
//! envelope crossover angles) is established by bracketing a monotone
//! predicate down to adjacent representable values, never by an analytic
//! inverse.

use crate::float_types::Real;

/// Finds the tightest representable pair `(l, h)` with `pred(l) == true` and
/// `pred(h) == false`, given a monotone predicate that is true at `lo`.
///
/// Preconditions (asserted by the caller, not here):
/// - `pred` is monotone over `[lo, hi]`: true on a prefix, false on the rest.
/// - `pred(lo) == true` and `pred(hi) == false`.
/// - When `lo < 0.0 < hi`, `pred(0.0)` must be defined; it is evaluated once
///   to decide which side of zero the crossing lies on.
///
/// Returns `(lo, hi)` unchanged when `lo >= hi`. A non-monotone predicate
/// produces an unspecified but in-range result; the routine always
/// terminates because every step strictly shrinks the bracket.
///
/// Plain midpoint bisection converges one exponent bit at a time when the
/// range spans many binary orders of magnitude (consider `[1e-300, 1e-3]`),
/// so ranges with a small `lo/hi` ratio are first contracted along the
/// ladder `hi * 0.25^(2^k)`.
pub fn search<F>(lo: Real, hi: Real, mut pred: F) -> (Real, Real)
where
    F: FnMut(Real) -> bool,
{
    if !(lo < hi) {
        return (lo, hi);
    }
    if lo < 0.0 {
        if hi > 0.0 {
            if pred(0.0) {
                return search_pos(0.0, hi, &mut pred);
            }
            return search_neg(lo, 0.0, &mut pred);
        }
        return search_neg(lo, hi, &mut pred);
    }
    search_pos(lo, hi, &mut pred)
}

/// Mirror a non-positive range through `x ↦ -x` so the positive-range
/// machinery applies. The mirrored predicate is negated, which keeps the
/// "true at the low end" orientation.
fn search_neg<F>(lo: Real, hi: Real, pred: &mut F) -> (Real, Real)
where
    F: FnMut(Real) -> bool,
{
    let (l, h) = search_pos(-hi, -lo, &mut |x| !pred(-x));
    (-h, -l)
}

/// `0 <= lo < hi`. Contract the exponent range, then bisect.
fn search_pos<F>(lo: Real, hi: Real, pred: &mut F) -> (Real, Real)
where
    F: FnMut(Real) -> bool,
{
    if lo < hi * 0.25 {
        let mut factor: Real = 0.25;
        let mut upper = hi;
        loop {
            let m = hi * factor;
            if !(m > lo) {
                // The ladder stepped past `lo` (or underflowed to zero);
                // whatever remains of the range is bisected directly.
                break;
            }
            if pred(m) {
                return search_pos(m, upper, pred);
            }
            upper = m;
            factor *= factor;
            if factor == 0.0 {
                break;
            }
        }
        return bisect(lo, upper, pred);
    }
    bisect(lo, hi, pred)
}

fn bisect<F>(mut lo: Real, mut hi: Real, pred: &mut F) -> (Real, Real)
where
    F: FnMut(Real) -> bool,
{
    loop {
        let mid = 0.5 * lo + 0.5 * hi;
        if !(lo < mid && mid < hi) {
            return (lo, hi);
        }
        if pred(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
}
