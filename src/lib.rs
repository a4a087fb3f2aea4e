//! Color-space abstraction, canonical pixel conversion, and magic-sniffing
//! image format dispatch.
//!
//! Pixels live in named color spaces (NRGBA, NRGBA64, RGB, Gray, Gray16, or
//! user-registered); every space converts to every other through one
//! canonical 16-bit premultiplied representation. [`Image`] binds a pixel
//! buffer to a space with coordinate get/set, and [`FormatRegistry`] sniffs
//! magic bytes off a stream without consuming it, dispatching to the first
//! registered format that matches.
//!
//! ```rust
//! use std::io::Cursor;
//! use zenimage::{Color, FormatRegistry};
//!
//! // A 1x1 farbfeld stream: tag, dimensions, one opaque red pixel.
//! let mut data = b"farbfeld".to_vec();
//! data.extend_from_slice(&1u32.to_be_bytes());
//! data.extend_from_slice(&1u32.to_be_bytes());
//! for channel in [0xffffu16, 0, 0, 0xffff] {
//!     data.extend_from_slice(&channel.to_be_bytes());
//! }
//!
//! let registry = FormatRegistry::builtin();
//! let image = registry.decode(Cursor::new(data))?;
//! assert_eq!(image.at(0, 0), Color::nrgba64(0xffff, 0, 0, 0xffff));
//!
//! let mut out = Vec::new();
//! registry.encode(&image, "farbfeld", &mut out)?;
//! # Ok::<(), zenimage::ImageError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod canonical;
mod color;
mod error;
mod image;
mod limits;
#[cfg(feature = "std")]
mod reader;
#[cfg(feature = "std")]
mod registry;
mod space;

#[cfg(feature = "std")]
pub mod formats;

pub use canonical::Canonical;
pub use color::Color;
pub use error::ImageError;
pub use image::Image;
pub use limits::Limits;
#[cfg(feature = "std")]
pub use reader::PeekReader;
#[cfg(feature = "std")]
pub use registry::{FormatRegistry, ImageFormat, Magic};
pub use space::{ColorRegistry, ColorSpace, Space, SpaceId};

// Pixel and view types shared with the wider codec ecosystem.
pub use imgref::{Img, ImgRef, ImgRefMut, ImgVec};
pub use rgb::{Gray, Rgb, Rgba};
