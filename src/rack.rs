//! One pitch of the straight-sided generating rack.
//!
//! Coordinates are in module units with the pitch line on y = 0: the pitch
//! advances along +x (one pitch = 1 unit) and teeth extend along ±y. The
//! caller rotates and translates this into the blank frame before feeding it
//! to the cutter.

use crate::float_types::{Real, PI};
use crate::pen::Pen;
use nalgebra::Point2;

/// Rack proportions, in the conventional gear-design parameters.
///
/// All percentages are of the module. The defaults describe a 20° full-depth
/// rack with symmetric teeth, 15% clearance and no backlash.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RackProps {
    /// Average number of tooth pairs in contact (1.0 to 2.5); controls tooth
    /// height.
    pub contact_ratio: Real,
    /// Pressure angle in degrees.
    pub pressure_angle: Real,
    /// Radial shift of the rack datum relative to the pitch line, % module.
    pub profile_shift: Real,
    /// Tooth/gap width split; 50 gives symmetric teeth.
    pub balance_percent: Real,
    /// Absolute tooth thickness offset, % module. Negative values thin the
    /// tooth, which is how backlash is introduced.
    pub balance_abs_percent: Real,
    /// Clearance added beyond the tooth tip, % module.
    pub top_clr_percent: Real,
    /// Clearance added below the tooth root, % module.
    pub bot_clr_percent: Real,
}

impl Default for RackProps {
    fn default() -> Self {
        Self {
            contact_ratio: 1.5,
            pressure_angle: 20.0,
            profile_shift: 0.0,
            balance_percent: 50.0,
            balance_abs_percent: 0.0,
            top_clr_percent: 15.0,
            bot_clr_percent: 15.0,
        }
    }
}

impl RackProps {
    /// The conjugate rack for an internal gear: tooth and gap swap roles, so
    /// the balance flips, the clearances trade places and the thickness
    /// offset changes sign.
    #[must_use]
    pub fn internal(&self) -> Self {
        Self {
            balance_percent: 100.0 - self.balance_percent,
            balance_abs_percent: -self.balance_abs_percent,
            top_clr_percent: self.bot_clr_percent,
            bot_clr_percent: self.top_clr_percent,
            ..*self
        }
    }

    /// The five vertices of one pitch, in drawing order: root-left, tip-left,
    /// tip-right, root-right, root-left of the next pitch.
    ///
    /// The first and last vertices share a y-coordinate and differ by exactly
    /// one pitch in x.
    pub fn profile_points(&self) -> [Point2<Real>; 5] {
        let alpha = self.pressure_angle.to_radians();
        let (sin_a, cos_a) = alpha.sin_cos();
        let tan_a = sin_a / cos_a;

        // Tooth half-height, centerline and flank geometry in pitch units
        // (module = 1/π of a pitch).
        let ah = self.contact_ratio * sin_a * cos_a;
        let cy = self.profile_shift / (100.0 * PI);
        let freew = 0.5 - ah * tan_a;
        let cx = -(self.balance_percent - 50.0) / 100.0 * freew - 0.25;
        let bkw = self.balance_abs_percent / (200.0 * PI);

        let top = cy + ah + self.top_clr_percent / (100.0 * PI);
        let bot = cy - ah - self.bot_clr_percent / (100.0 * PI);

        // Flank lines cross the centerline at the half-thickness marks and
        // rise at dx/dy = tan(pressure angle).
        let x_left = |y: Real| cx - (0.25 + bkw) + (y - cy) * tan_a;
        let x_right = |y: Real| cx + (0.25 + bkw) - (y - cy) * tan_a;

        let p0 = Point2::new(x_left(bot), bot);
        [
            p0,
            Point2::new(x_left(top), top),
            Point2::new(x_right(top), top),
            Point2::new(x_right(bot), bot),
            Point2::new(p0.x + 1.0, bot),
        ]
    }

    /// Emits one pitch of the rack as four straight edges.
    pub fn draw(&self, pen: &mut dyn Pen, initial_move: bool) {
        let pts = self.profile_points();
        if initial_move {
            pen.move_to(pts[0].x, pts[0].y);
        }
        for p in &pts[1..] {
            pen.arc_to(p.x, p.y, 0.0);
        }
    }
}
