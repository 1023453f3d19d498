#![forbid(unsafe_code)]

pub mod biarc;
pub mod cut;
pub mod cutter;
pub mod envelope;
pub mod errors;
pub mod float_types;
pub mod gear;
pub mod io;
pub mod pen;
pub mod rack;
pub mod search;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");
