//! Lower-envelope normalization of polar cut segments.
//!
//! The cutter publishes a multiset of cut segments for one tooth. At every
//! blank angle the *smallest* radius among the active cuts is the material
//! boundary; this module reduces the multiset to an ordered list of
//! disjoint envelope segments, each tagged with the winning cut.
//!
//! The sweep works on a dense grid of probe angles strictly between event
//! angles (segment boundaries and branch transitions), so no probe ever
//! lands on a discontinuity. The winner is tracked as a *candidate set* of
//! cuts within [`BOTTOM_TOLERANCE`] of the minimum; a change of winner is
//! detected when the running intersection of candidate sets empties, and
//! the exact crossover angle is then recovered by float binary search.

use crate::cut::CutCurve;
use crate::cutter::CutSegment;
use crate::float_types::{Real, BOTTOM_TOLERANCE, EVENT_MARGIN, PROBE_SPACING};
use crate::search::search;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Canonical tooth window: `(-HALF_WINDOW, +HALF_WINDOW]` in teeth.
const HALF_WINDOW: Real = 0.5;

/// Segments shorter than this (in teeth) are degenerate and dropped.
const MIN_SPAN: Real = 1e-12;

/// Heap key: ascending start angle, index as tiebreak for determinism.
#[derive(PartialEq)]
struct ByStart(Real, usize);

impl Eq for ByStart {}

impl PartialOrd for ByStart {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByStart {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0).then_with(|| self.1.cmp(&other.1))
    }
}

/// Wraps every input segment into the canonical tooth window.
///
/// A span is replicated once per integer shift that lands any part of it in
/// the window; each copy is clipped and its rotation adjusted by the shift.
/// This is what lets a cut from a neighboring tooth of the rack carve this
/// tooth's window.
fn wrap_into_window(segments: &[CutSegment]) -> Vec<CutSegment> {
    let mut wrapped = Vec::new();
    for seg in segments {
        if !(seg.end - seg.start > MIN_SPAN) {
            continue;
        }
        let k_min = (seg.start - HALF_WINDOW).floor() as i64 + 1;
        let k_max = (seg.end + HALF_WINDOW).ceil() as i64 - 1;
        for k in k_min..=k_max {
            let shift = k as Real;
            let start = (seg.start - shift).max(-HALF_WINDOW);
            let end = (seg.end - shift).min(HALF_WINDOW);
            if end - start > MIN_SPAN {
                wrapped.push(CutSegment {
                    start,
                    end,
                    rot: seg.rot - shift,
                    ..*seg
                });
            }
        }
    }
    wrapped
}

/// Reduces cut segments to the ordered, disjoint envelope of one tooth.
pub fn normalize(
    curves: &[CutCurve],
    segments: &[CutSegment],
    dad_tooth: Real,
) -> Vec<CutSegment> {
    let wrapped = wrap_into_window(segments);

    let r_at = |seg: &CutSegment, a: Real| -> Real {
        curves[seg.curve as usize].get_r((a - seg.rot) * dad_tooth)
    };

    // Event angles: every boundary and every branch transition, so probes
    // can stay clear of all of them.
    let mut events = vec![-HALF_WINDOW, HALF_WINDOW];
    for seg in &wrapped {
        events.push(seg.start);
        events.push(seg.end);
        let lo = (seg.start - seg.rot) * dad_tooth;
        let hi = (seg.end - seg.rot) * dad_tooth;
        for th in curves[seg.curve as usize].discontinuities(lo, hi) {
            events.push(th / dad_tooth + seg.rot);
        }
    }
    events.retain(|a| (-HALF_WINDOW..=HALF_WINDOW).contains(a));
    events.sort_by(Real::total_cmp);
    events.dedup();

    let mut heap: BinaryHeap<Reverse<ByStart>> = wrapped
        .iter()
        .enumerate()
        .map(|(i, seg)| Reverse(ByStart(seg.start, i)))
        .collect();

    let mut active: Vec<usize> = Vec::new();
    let mut running: Vec<usize> = Vec::new();
    let mut rep: Option<usize> = None;
    let mut piece_start = -HALF_WINDOW;
    let mut prev_probe = -HALF_WINDOW;
    let mut pieces: Vec<CutSegment> = Vec::new();

    for win in events.windows(2) {
        let (e0, e1) = (win[0], win[1]);
        let gap = e1 - e0;
        if gap <= 2.0 * EVENT_MARGIN {
            continue;
        }
        let inner = gap - 2.0 * EVENT_MARGIN;
        let steps = (inner / PROBE_SPACING).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let a = e0 + EVENT_MARGIN + inner * (i as Real) / (steps as Real);

            while heap.peek().map_or(false, |top| (top.0).0 <= a) {
                let Reverse(ByStart(_, idx)) = heap.pop().expect("peeked");
                active.push(idx);
            }
            active.retain(|&idx| wrapped[idx].end >= a);

            let radii: Vec<(usize, Real)> =
                active.iter().map(|&idx| (idx, r_at(&wrapped[idx], a))).collect();
            let min_r = radii
                .iter()
                .map(|&(_, r)| r)
                .fold(Real::INFINITY, Real::min);
            let candidates: Vec<usize> = radii
                .iter()
                .filter(|&&(_, r)| r <= min_r + BOTTOM_TOLERANCE)
                .map(|&(idx, _)| idx)
                .collect();

            if running.is_empty() {
                running = candidates;
            } else {
                let narrowed: Vec<usize> = running
                    .iter()
                    .copied()
                    .filter(|idx| candidates.contains(idx))
                    .collect();
                if narrowed.is_empty() {
                    // The previous winner lost: commit it up to here. The
                    // committed end and the next piece's start deliberately
                    // overlap by one probe gap; refinement below finds the
                    // true crossover inside it.
                    if let Some(rp) = rep {
                        pieces.push(CutSegment {
                            start: piece_start,
                            end: a,
                            ..wrapped[rp]
                        });
                    }
                    piece_start = prev_probe;
                    running = candidates;
                } else {
                    running = narrowed;
                }
            }

            let radius_of = |idx: usize| {
                radii
                    .iter()
                    .find(|&&(i2, _)| i2 == idx)
                    .map_or(Real::INFINITY, |&(_, r)| r)
            };
            rep = running
                .iter()
                .copied()
                .min_by(|&x, &y| radius_of(x).total_cmp(&radius_of(y)));
            prev_probe = a;
        }
    }

    if let Some(rp) = rep {
        pieces.push(CutSegment {
            start: piece_start,
            end: HALF_WINDOW,
            ..wrapped[rp]
        });
    }

    // Crossover refinement: adjacent pieces overlap by construction; the
    // exact stitch angle is where their radii agree.
    for i in 1..pieces.len() {
        let lo = pieces[i - 1];
        let hi = pieces[i];
        if !(hi.start < lo.end) {
            continue;
        }
        let (l, h) = search(hi.start, lo.end, |a| r_at(&lo, a) <= r_at(&hi, a));
        let a_star = 0.5 * (l + h);
        pieces[i - 1].end = a_star;
        pieces[i].start = a_star;
    }
    pieces.retain(|p| p.end - p.start > MIN_SPAN);

    log::debug!(
        "envelope: {} segments -> {} wrapped -> {} pieces",
        segments.len(),
        wrapped.len(),
        pieces.len()
    );
    pieces
}
