//! Output sinks for the pen protocol.
//!
//! Each sink is a [`crate::pen::Pen`] that serializes what is drawn into
//! it. The sinks are behind cargo feature flags; with a feature disabled
//! the corresponding module is simply absent.

#[cfg(feature = "dxf-io")]
pub mod dxf;

#[cfg(feature = "svg-io")]
pub mod svg;
