//! The farbfeld reference format.
//!
//! Wire layout: 8-byte `"farbfeld"` tag, big-endian u32 width and height,
//! then row-major pixels of four big-endian u16 channels (r, g, b, a), not
//! premultiplied. The simplest real container, and the worked example of
//! the [`ImageFormat`] contract.

use alloc::string::String;
use std::io::{Read, Write};

use crate::color::Color;
use crate::error::ImageError;
use crate::image::Image;
use crate::limits::Limits;
use crate::registry::{ImageFormat, Magic};
use crate::space::{Space, SpaceId};

const MAGIC: &[u8; 8] = b"farbfeld";
const HEADER_LEN: usize = 16;
const BYTES_PER_PIXEL: usize = 8;

/// The farbfeld codec.
///
/// Decodes into NRGBA64, whose in-memory encoding equals the wire encoding,
/// so the payload moves as one bulk copy in each direction when no pixel
/// conversion is needed.
pub struct Farbfeld;

impl ImageFormat for Farbfeld {
    fn name(&self) -> &str {
        "farbfeld"
    }

    fn magic(&self) -> Magic {
        // Wildcards cover the dimension fields, so a stream shorter than the
        // full header never matches.
        Magic::prefix(MAGIC, HEADER_LEN - MAGIC.len())
    }

    fn decode(&self, reader: &mut dyn Read, limits: &Limits) -> Result<Image, ImageError> {
        let mut header = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut header)
            .map_err(|e| ImageError::ShortRead { source: e })?;
        if &header[..MAGIC.len()] != MAGIC {
            return Err(ImageError::InvalidInput(String::from(
                "missing farbfeld tag",
            )));
        }

        let width = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
        let height = u32::from_be_bytes([header[12], header[13], header[14], header[15]]);
        limits.check_dimensions(u64::from(width), u64::from(height))?;

        let payload = (u64::from(width) * u64::from(height))
            .checked_mul(BYTES_PER_PIXEL as u64)
            .ok_or_else(|| {
                ImageError::InvalidInput(String::from("pixel payload exceeds u64 range"))
            })?;
        limits.check_memory(payload)?;

        let mut image = Image::new(&Space::nrgba64(), width, height)?;
        reader
            .read_exact(image.bytes_mut())
            .map_err(|e| ImageError::ShortRead { source: e })?;
        Ok(image)
    }

    fn encode(&self, image: &Image, writer: &mut dyn Write) -> Result<(), ImageError> {
        let mut header = [0u8; HEADER_LEN];
        header[..MAGIC.len()].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&image.width().to_be_bytes());
        header[12..16].copy_from_slice(&image.height().to_be_bytes());
        writer
            .write_all(&header)
            .map_err(|e| ImageError::ShortWrite { source: e })?;

        if image.space().id() == SpaceId::NRGBA64 {
            return writer
                .write_all(image.bytes())
                .map_err(|e| ImageError::ShortWrite { source: e });
        }

        // Non-native image: the lossy path, reusing two scratch colors.
        let space = Space::nrgba64();
        let mut pixel = image.new_color();
        let mut native = Color::new(&space);
        for y in 0..image.height() {
            for x in 0..image.width() {
                image.at_into(x, y, &mut pixel);
                space.convert(&mut native, &pixel);
                writer
                    .write_all(native.bytes())
                    .map_err(|e| ImageError::ShortWrite { source: e })?;
            }
        }
        Ok(())
    }
}
