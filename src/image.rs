//! Rectangular pixel buffers bound to one color space.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use imgref::{Img, ImgRef, ImgVec};
use rgb::{Gray, Rgb, Rgba};

use crate::color::Color;
use crate::error::ImageError;
use crate::space::{Space, SpaceId};

/// A rectangular pixel buffer bound to one color space.
///
/// The buffer is row-major with no padding, exactly
/// `width * height * space.encoded_len()` bytes. Reading or writing a pixel
/// in a different space converts through the canonical representation; pixel
/// access in the image's own space copies bytes directly.
#[derive(PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    space: Space,
    buf: Vec<u8>,
}

impl Image {
    /// Allocate a zeroed image.
    ///
    /// Fails with [`ImageError::InvalidInput`] if the byte size overflows
    /// addressable memory and [`ImageError::Oom`] if the reservation fails.
    /// Zero-sized dimensions are allowed and produce an empty buffer.
    pub fn new(space: &Space, width: u32, height: u32) -> Result<Image, ImageError> {
        let len = byte_len(space, width, height)?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| ImageError::Oom)?;
        buf.resize(len, 0);
        Ok(Image {
            width,
            height,
            space: space.clone(),
            buf,
        })
    }

    /// Adopt an existing native-encoded buffer.
    ///
    /// `buf.len()` must equal `width * height * space.encoded_len()`.
    pub fn from_bytes(
        space: &Space,
        width: u32,
        height: u32,
        buf: Vec<u8>,
    ) -> Result<Image, ImageError> {
        let len = byte_len(space, width, height)?;
        if buf.len() != len {
            return Err(ImageError::InvalidInput(String::from(
                "buffer length does not match image dimensions",
            )));
        }
        Ok(Image {
            width,
            height,
            space: space.clone(),
            buf,
        })
    }

    /// Take ownership of an 8-bit RGBA buffer as an NRGBA image.
    pub fn from_rgba8(img: ImgVec<Rgba<u8>>) -> Result<Image, ImageError> {
        let (buf, width, height) = img.into_contiguous_buf();
        let width = dim_u32(width)?;
        let height = dim_u32(height)?;
        Ok(Image {
            width,
            height,
            space: Space::nrgba(),
            buf: bytemuck::allocation::cast_vec(buf),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The bound color space.
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// The raw pixel buffer, row-major native encoding.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Mutable access to the raw pixel buffer.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Scratch [`Color`] in this image's space, sized for one pixel.
    pub fn new_color(&self) -> Color {
        Color::new(&self.space)
    }

    /// Read the pixel at `(x, y)` as a [`Color`] in this image's space.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn at(&self, x: u32, y: u32) -> Color {
        let mut c = Color::new(&self.space);
        self.at_into(x, y, &mut c);
        c
    }

    /// Read the pixel at `(x, y)` into a caller-supplied [`Color`].
    ///
    /// Allocation-free once `dst`'s buffer has grown to this space's width,
    /// so loops can reuse one scratch Color.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn at_into(&self, x: u32, y: u32, dst: &mut Color) {
        let range = self.pixel_range(x, y);
        dst.set_bytes(&self.space, &self.buf[range]);
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// A `src` in this image's space is copied directly; any other space is
    /// converted through the canonical representation first.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set(&mut self, x: u32, y: u32, src: &Color) {
        let range = self.pixel_range(x, y);
        if src.space().id() == self.space.id() {
            self.buf[range].copy_from_slice(src.bytes());
        } else {
            let c = src.to_canonical();
            self.space.from_canonical(c, &mut self.buf[range]);
        }
    }

    fn pixel_range(&self, x: u32, y: u32) -> Range<usize> {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        let px = self.space.encoded_len();
        let start = (y as usize * self.width as usize + x as usize) * px;
        start..start + px
    }

    /// View as 8-bit RGBA pixels; `None` unless the image is NRGBA.
    pub fn as_rgba8(&self) -> Option<ImgRef<'_, Rgba<u8>>> {
        (self.space.id() == SpaceId::NRGBA).then(|| {
            Img::new(
                bytemuck::cast_slice(&self.buf),
                self.width as usize,
                self.height as usize,
            )
        })
    }

    /// View as 8-bit RGB pixels; `None` unless the image is RGB.
    pub fn as_rgb8(&self) -> Option<ImgRef<'_, Rgb<u8>>> {
        (self.space.id() == SpaceId::RGB).then(|| {
            Img::new(
                bytemuck::cast_slice(&self.buf),
                self.width as usize,
                self.height as usize,
            )
        })
    }

    /// View as 8-bit grayscale pixels; `None` unless the image is Gray.
    pub fn as_gray8(&self) -> Option<ImgRef<'_, Gray<u8>>> {
        (self.space.id() == SpaceId::GRAY).then(|| {
            Img::new(
                bytemuck::cast_slice(&self.buf),
                self.width as usize,
                self.height as usize,
            )
        })
    }
}

impl Clone for Image {
    fn clone(&self) -> Image {
        Image {
            width: self.width,
            height: self.height,
            space: self.space.clone(),
            buf: self.buf.clone(),
        }
    }

    /// Copy-assign, reusing the existing buffer when the new size fits.
    fn clone_from(&mut self, source: &Image) {
        self.width = source.width;
        self.height = source.height;
        self.space = source.space.clone();
        self.buf.clone_from(&source.buf);
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image({}x{}, {})",
            self.width,
            self.height,
            self.space.name()
        )
    }
}

fn byte_len(space: &Space, width: u32, height: u32) -> Result<usize, ImageError> {
    let pixels = u64::from(width) * u64::from(height);
    let total = pixels
        .checked_mul(space.encoded_len() as u64)
        .ok_or_else(overflow)?;
    usize::try_from(total).map_err(|_| overflow())
}

fn dim_u32(dim: usize) -> Result<u32, ImageError> {
    u32::try_from(dim).map_err(|_| {
        ImageError::InvalidInput(String::from("image dimension exceeds u32 range"))
    })
}

fn overflow() -> ImageError {
    ImageError::InvalidInput(String::from("image size overflows addressable memory"))
}
