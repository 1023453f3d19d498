use crate::float_types::Real;

/// All the possible validation issues we might encounter when checking gear
/// and rack parameters.
///
/// Geometric domain errors (an arc fed to a pen with no current point, a
/// rack vertex on or behind the blank axis, a curved cutter edge) are caller
/// bugs and panic with a descriptive message instead; see the module docs of
/// [`crate::cutter`].
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// `name` must not be less than `min`
    #[error("{} must not be less than {}", .name, .min)]
    FieldLessThan { name: &'static str, min: i32 },
    /// `name` must not be less than `min`
    #[error("{} must not be less than {}", .name, .min)]
    FieldLessThanFloat { name: &'static str, min: Real },
    /// `name` must be below `max`
    #[error("{} must be below {}", .name, .max)]
    FieldAtLeast { name: &'static str, max: Real },
    /// `name` must be > 0
    #[error("{} must be > 0", .name)]
    Zero { name: &'static str },
    /// `name` is NaN or infinite
    #[error("{} is not finite", .name)]
    NotFinite { name: &'static str },
}
