// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Frac Pi 2
/// π/2
#[cfg(feature = "f32")]
pub const FRAC_PI_2: Real = core::f32::consts::FRAC_PI_2;
/// π/2
#[cfg(feature = "f64")]
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;

/// General-purpose geometric epsilon.
pub const EPSILON: Real = 1e-12;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Kernel tolerances
//
// Fixed properties of the envelope/normalization machinery, not user-facing
// accuracy knobs. The user-facing knobs are the face/fillet tolerances on
// `GearProps`.
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Radial slack when deciding which cuts tie for the envelope minimum.
pub const BOTTOM_TOLERANCE: Real = 1e-5;

/// Spacing of envelope probe angles, in teeth.
pub const PROBE_SPACING: Real = 1e-3;

/// Probe angles keep at least this distance (in teeth) from any event angle,
/// so a probe never lands on a segment boundary or a branch transition.
pub const EVENT_MARGIN: Real = 1e-6;

/// Below this squared distance, a recorded point is a duplicate of the
/// current point and is dropped.
pub const DUP_DISCARD_SQ: Real = 1e-14;

/// Below this squared distance, an arc's turn is forced to 0 (the chord is
/// too short to carry a meaningful bulge).
pub const TURN_CLAMP_SQ: Real = 1e-8;

/// Below this magnitude, a turn is semantically a straight line.
pub const LINE_TURN: Real = 1e-5;

/// Rack edges with more than this much tangent rotation are rejected as
/// curved input.
pub const MAX_EDGE_TURN: Real = 1e-3;

/// Squared blank-frame speed below which a cut point is considered to be at
/// a cusp, where the tangent falls back to the radial direction.
pub const CUSP_SPEED_SQ: Real = 1e-16;
