//! Single-pixel color values.

use alloc::vec::Vec;

use crate::canonical::Canonical;
use crate::space::Space;

/// One pixel value: a color space plus its native encoding.
///
/// The buffer holds exactly `space().encoded_len()` bytes of value, but its
/// capacity never shrinks. Retargeting a Color to a narrower space keeps the
/// allocation, so repeated conversions into one destination reuse a single
/// buffer; same-space conversion is a plain byte copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Color {
    space: Space,
    buf: Vec<u8>,
}

impl Color {
    /// Zero-valued pixel in `space`.
    pub fn new(space: &Space) -> Color {
        let mut buf = Vec::new();
        buf.resize(space.encoded_len(), 0);
        Color {
            space: space.clone(),
            buf,
        }
    }

    /// 8-bit non-premultiplied RGBA pixel.
    pub fn nrgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        let mut buf = Vec::with_capacity(4);
        buf.extend_from_slice(&[r, g, b, a]);
        Color {
            space: Space::nrgba(),
            buf,
        }
    }

    /// 16-bit non-premultiplied RGBA pixel.
    pub fn nrgba64(r: u16, g: u16, b: u16, a: u16) -> Color {
        let mut buf = Vec::with_capacity(8);
        buf.extend_from_slice(&r.to_be_bytes());
        buf.extend_from_slice(&g.to_be_bytes());
        buf.extend_from_slice(&b.to_be_bytes());
        buf.extend_from_slice(&a.to_be_bytes());
        Color {
            space: Space::nrgba64(),
            buf,
        }
    }

    /// 8-bit RGB pixel, implicitly opaque.
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        let mut buf = Vec::with_capacity(3);
        buf.extend_from_slice(&[r, g, b]);
        Color {
            space: Space::rgb(),
            buf,
        }
    }

    /// 8-bit grayscale pixel.
    pub fn gray(y: u8) -> Color {
        let mut buf = Vec::with_capacity(1);
        buf.push(y);
        Color {
            space: Space::gray(),
            buf,
        }
    }

    /// 16-bit grayscale pixel.
    pub fn gray16(y: u16) -> Color {
        let mut buf = Vec::with_capacity(2);
        buf.extend_from_slice(&y.to_be_bytes());
        Color {
            space: Space::gray16(),
            buf,
        }
    }

    /// The pixel's color space.
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Native encoding bytes, exactly `space().encoded_len()` long.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Mutable access to the native encoding bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Replace this value with `bytes` interpreted in `space`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` differs from `space.encoded_len()`.
    pub fn set_bytes(&mut self, space: &Space, bytes: &[u8]) {
        assert_eq!(
            bytes.len(),
            space.encoded_len(),
            "{} bytes do not encode one {} pixel",
            bytes.len(),
            space.name()
        );
        if self.space.id() != space.id() {
            self.space = space.clone();
        }
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
    }

    /// Convert this value to the interchange representation.
    pub fn to_canonical(&self) -> Canonical {
        self.space.to_canonical(&self.buf)
    }

    /// Current buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Release the backing buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Space {
    /// Write `src`'s value into `dst`, encoded in this space.
    ///
    /// Same space: a direct byte copy, lossless for any value. Differing
    /// spaces: routes through [`Canonical`], which truncates when the
    /// destination is narrower; channels stay premultiplied and are never
    /// re-multiplied. `dst`'s buffer grows if undersized and keeps its
    /// capacity otherwise. `src` is never mutated.
    pub fn convert(&self, dst: &mut Color, src: &Color) {
        if src.space.id() == self.id() {
            dst.set_bytes(self, src.bytes());
            return;
        }

        let c = src.to_canonical();
        if dst.space.id() != self.id() {
            dst.space = self.clone();
        }
        dst.buf.clear();
        dst.buf.resize(self.encoded_len(), 0);
        self.from_canonical(c, &mut dst.buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::Canonical;

    #[test]
    fn identity_copy_is_byte_exact() {
        // The fast path copies bytes without routing through the interchange
        // value, so translucent patterns survive untouched in every space.
        let pattern = [0x81, 0x12, 0xc3, 0x44, 0x05, 0xe6, 0x27, 0xf8];
        for space in [
            Space::nrgba(),
            Space::nrgba64(),
            Space::rgb(),
            Space::gray(),
            Space::gray16(),
        ] {
            let mut src = Color::new(&space);
            src.set_bytes(&space, &pattern[..space.encoded_len()]);
            let mut dst = Color::new(&space);
            space.convert(&mut dst, &src);
            assert_eq!(dst, src, "{}", space.name());
        }
    }

    #[test]
    fn cross_space_routes_through_canonical() {
        // (255, 0, 0, 128) premultiplies to 0x8080 per covered channel.
        let src = Color::nrgba(255, 0, 0, 128);
        let mut dst = Color::new(&Space::nrgba64());
        Space::nrgba64().convert(&mut dst, &src);
        assert_eq!(dst.bytes(), [0x80, 0x80, 0, 0, 0, 0, 0x80, 0x80]);
    }

    #[test]
    fn white_converts_to_gray_255() {
        let src = Color::nrgba64(0xffff, 0xffff, 0xffff, 0xffff);
        let mut dst = Color::new(&Space::gray());
        Space::gray().convert(&mut dst, &src);
        assert_eq!(dst.bytes(), [255]);
    }

    #[test]
    fn gray_survives_nrgba_round_trip() {
        for y in [0u8, 1, 77, 128, 254, 255] {
            let src = Color::gray(y);
            let mut wide = Color::new(&Space::nrgba());
            Space::nrgba().convert(&mut wide, &src);

            let mut back = Color::new(&Space::gray());
            Space::gray().convert(&mut back, &wide);
            assert_eq!(back.bytes(), [y]);
        }
    }

    #[test]
    fn capacity_never_shrinks() {
        let src = Color::gray(7);
        let mut dst = Color::new(&Space::nrgba64());
        let before = dst.capacity();

        Space::gray().convert(&mut dst, &src);
        assert_eq!(dst.space().name(), "gray");
        assert_eq!(dst.bytes(), [7]);
        assert!(dst.capacity() >= before);
    }

    #[test]
    fn buffer_grows_on_demand() {
        let src = Color::nrgba64(0x0102, 0x0304, 0x0506, 0xffff);
        let mut dst = Color::new(&Space::gray());
        Space::nrgba64().convert(&mut dst, &src);
        assert_eq!(dst.bytes().len(), 8);
        assert_eq!(dst.bytes(), src.bytes());
    }

    #[test]
    fn constructors_encode_big_endian() {
        assert_eq!(
            Color::nrgba64(0x1234, 0, 0, 0xffff).bytes(),
            [0x12, 0x34, 0, 0, 0, 0, 0xff, 0xff]
        );
        assert_eq!(Color::gray16(0xabcd).bytes(), [0xab, 0xcd]);
    }

    #[test]
    fn set_bytes_retargets_space() {
        let mut c = Color::gray(5);
        c.set_bytes(&Space::rgb(), &[1, 2, 3]);
        assert_eq!(c.space().name(), "rgb");
        assert_eq!(c.bytes(), [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "do not encode")]
    fn set_bytes_rejects_wrong_width() {
        let mut c = Color::gray(5);
        c.set_bytes(&Space::rgb(), &[1, 2]);
    }

    #[test]
    fn to_canonical_uses_own_space() {
        assert_eq!(
            Color::gray(0xff).to_canonical(),
            Canonical::opaque(0xffff, 0xffff, 0xffff)
        );
        assert_eq!(
            Color::rgb(0x10, 0x20, 0x30).to_canonical(),
            Canonical::opaque(0x1010, 0x2020, 0x3030)
        );
    }

    #[test]
    fn new_is_zeroed() {
        let c = Color::new(&Space::nrgba64());
        assert_eq!(c.bytes(), [0; 8]);
        assert_eq!(c.to_canonical(), Canonical::default());
    }

    #[test]
    fn into_bytes_yields_the_encoding() {
        let c = Color::gray16(0xabcd);
        let encoded = c.bytes().to_vec();
        assert_eq!(c.into_bytes(), encoded);
    }
}
