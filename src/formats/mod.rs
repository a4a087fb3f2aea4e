//! Format plugins.
//!
//! Each submodule implements [`ImageFormat`](crate::ImageFormat) for one
//! container and is feature-gated so unused codecs compile away.

#[cfg(feature = "farbfeld")]
pub mod farbfeld;
