//! High-level gear profile generation.
//!
//! `GearProps` ties the rack, the cutter and the normalizer together:
//! the rack is drawn into the cutter through an affine pen that places it
//! in the blank frame, the resulting cut segments are reduced to their
//! lower envelope, and the surviving pieces render through the biarc
//! fitter as lines and arcs.

use crate::cut::CutCurve;
use crate::cutter::{CutSegment, GearCutter};
use crate::envelope::normalize;
use crate::errors::ValidationError;
use crate::float_types::{Real, LINE_TURN, TAU};
use crate::pen::{arc_center, PathCommand, Pen, RecordPen, TransformPen};
use crate::rack::RackProps;
use geo::{LineString, Polygon as GeoPolygon};
use nalgebra::Point2;

/// Everything needed to cut one gear, in module units (module = 1; scale
/// the output afterwards).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GearProps {
    /// Tooth count, at least 4.
    pub teeth: u32,
    pub rack: RackProps,
    /// Permitted deviation of the rendered working faces, module units.
    pub face_tol: Real,
    /// Permitted deviation of the rendered root fillets, module units.
    pub fillet_tol: Real,
    /// Cut as an internal (ring) gear: the conjugate rack is used. Scaling
    /// by pitch-radius *difference* instead of sum is the caller's concern.
    pub internal: bool,
}

impl Default for GearProps {
    fn default() -> Self {
        Self {
            teeth: 14,
            rack: RackProps::default(),
            face_tol: 5e-4,
            fillet_tol: 5e-3,
            internal: false,
        }
    }
}

impl GearProps {
    /// Checks the parameters a caller is expected to have clamped already.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.teeth < 4 {
            return Err(ValidationError::FieldLessThan { name: "teeth", min: 4 });
        }
        if !(self.face_tol > 0.0) {
            return Err(ValidationError::Zero { name: "face_tol" });
        }
        if !(self.fillet_tol > 0.0) {
            return Err(ValidationError::Zero { name: "fillet_tol" });
        }
        if !(self.rack.contact_ratio > 0.0) {
            return Err(ValidationError::Zero { name: "contact_ratio" });
        }
        if !self.rack.pressure_angle.is_finite() {
            return Err(ValidationError::NotFinite { name: "pressure_angle" });
        }
        if self.rack.pressure_angle < 0.0 {
            return Err(ValidationError::FieldLessThanFloat {
                name: "pressure_angle",
                min: 0.0,
            });
        }
        if self.rack.pressure_angle >= 90.0 {
            return Err(ValidationError::FieldAtLeast { name: "pressure_angle", max: 90.0 });
        }
        Ok(())
    }

    /// The no-slip radius, `teeth / 2π` in module units.
    pub fn pitch_radius(&self) -> Real {
        self.teeth as Real / TAU
    }

    /// Cuts one tooth: rack → cutter → lower envelope.
    pub fn tooth_profile(&self) -> Result<ToothProfile, ValidationError> {
        self.validate()?;
        let rack = if self.internal { self.rack.internal() } else { self.rack };
        let pitch_radius = self.pitch_radius();

        let mut cutter = GearCutter::new(self.teeth, pitch_radius, self.face_tol, self.fillet_tol);
        {
            // Into the blank frame: rack x (pitch direction) becomes blank y,
            // rack y (tooth height) becomes depth below the pitch radius.
            let mut pen = TransformPen::new(&mut cutter);
            pen.translate(pitch_radius, 0.0);
            pen.rotate(90.0);
            rack.draw(&mut pen, true);
        }
        let (curves, segments, dad_tooth) = cutter.finish();
        let pieces = normalize(&curves, &segments, dad_tooth);
        Ok(ToothProfile { curves, pieces, dad_tooth, teeth: self.teeth })
    }
}

/// One tooth's boundary: the winning cut pieces over the canonical window,
/// in ascending angular order.
#[derive(Clone, Debug)]
pub struct ToothProfile {
    curves: Vec<CutCurve>,
    pieces: Vec<CutSegment>,
    dad_tooth: Real,
    teeth: u32,
}

impl ToothProfile {
    pub fn pieces(&self) -> &[CutSegment] {
        &self.pieces
    }

    pub fn curves(&self) -> &[CutCurve] {
        &self.curves
    }

    /// Blank rotation per tooth, radians.
    pub fn dad_tooth(&self) -> Real {
        self.dad_tooth
    }

    /// Boundary radius at a tooth-angle in `[-0.5, 0.5]`, or `None` outside
    /// the covered range.
    pub fn radius_at(&self, a: Real) -> Option<Real> {
        self.pieces
            .iter()
            .find(|p| p.start <= a && a <= p.end)
            .map(|p| self.curves[p.curve as usize].get_r((a - p.rot) * self.dad_tooth))
    }

    /// Draws one tooth. With `initial_move` the path starts fresh;
    /// otherwise the pen's current point must already sit on the first
    /// piece's start.
    pub fn draw(&self, pen: &mut dyn Pen, initial_move: bool) {
        let mut first = initial_move;
        for piece in &self.pieces {
            let mut tp = TransformPen::new(&mut *pen);
            tp.rotate((piece.rot * self.dad_tooth).to_degrees());
            self.curves[piece.curve as usize].draw_segment(
                &mut tp,
                (piece.start - piece.rot) * self.dad_tooth,
                (piece.end - piece.rot) * self.dad_tooth,
                piece.tol,
                first,
            );
            first = false;
        }
    }

    /// Draws the whole gear: the tooth replicated around the blank as one
    /// continuous closed path.
    pub fn draw_gear(&self, pen: &mut dyn Pen) {
        let mut tp = TransformPen::new(pen);
        let tooth_deg = 360.0 / self.teeth as Real;
        for k in 0..self.teeth {
            let mut fork = tp.fork();
            fork.rotate(k as Real * tooth_deg);
            self.draw(&mut fork, k == 0);
        }
    }

    /// Tessellates the whole gear outline into a closed polygon, splitting
    /// arcs at `max_step` radians.
    pub fn to_polygon(&self, max_step: Real) -> GeoPolygon<Real> {
        let mut rec = RecordPen::new();
        self.draw_gear(&mut rec);

        let mut coords: Vec<(Real, Real)> = Vec::new();
        let mut cur: Option<Point2<Real>> = None;
        for cmd in rec.commands() {
            match *cmd {
                PathCommand::MoveTo { x, y } => {
                    cur = Some(Point2::new(x, y));
                    coords.push((x, y));
                },
                PathCommand::ArcTo { x, y, turn } => {
                    let p0 = cur.expect("arc with no current point");
                    let p1 = Point2::new(x, y);
                    if turn.abs() >= LINE_TURN {
                        if let Some((c, r)) = arc_center(p0, p1, turn) {
                            let from = p0 - c;
                            let start = from.y.atan2(from.x);
                            let n = (turn.abs() / max_step).ceil().max(1.0) as usize;
                            for i in 1..n {
                                let ang = start + turn * (i as Real) / (n as Real);
                                coords.push((c.x + r.abs() * ang.cos(), c.y + r.abs() * ang.sin()));
                            }
                        }
                    }
                    coords.push((x, y));
                    cur = Some(p1);
                },
            }
        }
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last {
                coords.push(first);
            }
        }
        GeoPolygon::new(LineString::from(coords), vec![])
    }
}
