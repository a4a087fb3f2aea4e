//! Color spaces and the conversion contract.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::canonical::{Canonical, narrow8};

/// Identifier for a registered color space.
///
/// Built-in spaces occupy dense low ids; user-defined spaces receive fresh
/// ids from a [`ColorRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpaceId(pub(crate) u32);

impl SpaceId {
    /// 8-bit non-premultiplied RGBA.
    pub const NRGBA: SpaceId = SpaceId(0);
    /// 16-bit non-premultiplied RGBA, big-endian channels.
    pub const NRGBA64: SpaceId = SpaceId(1);
    /// 8-bit RGB, implicitly opaque.
    pub const RGB: SpaceId = SpaceId(2);
    /// 8-bit grayscale.
    pub const GRAY: SpaceId = SpaceId(3);
    /// 16-bit grayscale, big-endian.
    pub const GRAY16: SpaceId = SpaceId(4);

    const BUILTIN_COUNT: u32 = 5;
}

/// Conversion contract every color space implements.
///
/// `to_canonical` is the only primitive a space must supply to interoperate
/// with every other registered space; all cross-space conversion routes
/// through [`Canonical`], so adding a space costs one implementation, not one
/// per pair. `from_canonical` is the mirror, used when this space is the
/// destination of a lossy conversion.
pub trait ColorSpace {
    /// Short lowercase name (`"nrgba"`, `"gray16"`, ...).
    fn name(&self) -> &str;

    /// Native encoding width in bytes for one pixel.
    fn encoded_len(&self) -> usize;

    /// Decode one native pixel into the interchange value.
    ///
    /// # Panics
    ///
    /// Panics if `buf` holds fewer than
    /// [`encoded_len()`](ColorSpace::encoded_len) bytes.
    fn to_canonical(&self, buf: &[u8]) -> Canonical;

    /// Encode the interchange value as one native pixel.
    ///
    /// Channels are narrowed by truncation; values arrive premultiplied and
    /// are never re-multiplied here.
    ///
    /// # Panics
    ///
    /// Panics if `buf`'s length differs from
    /// [`encoded_len()`](ColorSpace::encoded_len).
    fn from_canonical(&self, c: Canonical, buf: &mut [u8]);
}

/// Shared handle to a color space: an id plus the conversion capability.
///
/// Cheap to clone. Equality compares ids only; two handles to the same
/// registered space are equal regardless of how they were obtained.
#[derive(Clone)]
pub struct Space {
    id: SpaceId,
    ops: Arc<dyn ColorSpace + Send + Sync>,
}

impl Space {
    /// Built-in 8-bit non-premultiplied RGBA (4 bytes per pixel).
    pub fn nrgba() -> Space {
        Space {
            id: SpaceId::NRGBA,
            ops: Arc::new(Nrgba),
        }
    }

    /// Built-in 16-bit non-premultiplied RGBA (8 bytes per pixel, big-endian).
    pub fn nrgba64() -> Space {
        Space {
            id: SpaceId::NRGBA64,
            ops: Arc::new(Nrgba64),
        }
    }

    /// Built-in 8-bit RGB (3 bytes per pixel, implicitly opaque).
    pub fn rgb() -> Space {
        Space {
            id: SpaceId::RGB,
            ops: Arc::new(Rgb),
        }
    }

    /// Built-in 8-bit grayscale (1 byte per pixel).
    pub fn gray() -> Space {
        Space {
            id: SpaceId::GRAY,
            ops: Arc::new(Gray),
        }
    }

    /// Built-in 16-bit grayscale (2 bytes per pixel, big-endian).
    pub fn gray16() -> Space {
        Space {
            id: SpaceId::GRAY16,
            ops: Arc::new(Gray16),
        }
    }

    /// This space's id.
    pub fn id(&self) -> SpaceId {
        self.id
    }

    /// This space's name.
    pub fn name(&self) -> &str {
        self.ops.name()
    }

    /// Native encoding width in bytes for one pixel.
    pub fn encoded_len(&self) -> usize {
        self.ops.encoded_len()
    }

    /// Decode one native pixel into the interchange value.
    ///
    /// # Panics
    ///
    /// Panics if `buf` holds fewer than [`encoded_len()`](Space::encoded_len)
    /// bytes.
    pub fn to_canonical(&self, buf: &[u8]) -> Canonical {
        self.ops.to_canonical(buf)
    }

    /// Encode the interchange value as one native pixel.
    ///
    /// # Panics
    ///
    /// Panics if `buf`'s length differs from
    /// [`encoded_len()`](Space::encoded_len).
    pub fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
        self.ops.from_canonical(c, buf);
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Space({}, id={})", self.ops.name(), self.id.0)
    }
}

impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Space {}

// ---------------------------------------------------------------------------
// Built-in spaces
// ---------------------------------------------------------------------------

/// Replicate an 8-bit channel into 16 bits.
fn rep8(v: u8) -> u16 {
    u16::from(v) | u16::from(v) << 8
}

/// Premultiply a 16-bit channel by 16-bit alpha, truncating.
fn premul16(v: u16, a: u16) -> u16 {
    (u32::from(v) * u32::from(a) / 0xffff) as u16
}

struct Nrgba;

impl ColorSpace for Nrgba {
    fn name(&self) -> &str {
        "nrgba"
    }

    fn encoded_len(&self) -> usize {
        4
    }

    fn to_canonical(&self, buf: &[u8]) -> Canonical {
        let a = rep8(buf[3]);
        Canonical {
            r: premul16(rep8(buf[0]), a),
            g: premul16(rep8(buf[1]), a),
            b: premul16(rep8(buf[2]), a),
            a,
        }
    }

    fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
        buf[0] = narrow8(c.r);
        buf[1] = narrow8(c.g);
        buf[2] = narrow8(c.b);
        buf[3] = narrow8(c.a);
    }
}

struct Nrgba64;

impl ColorSpace for Nrgba64 {
    fn name(&self) -> &str {
        "nrgba64"
    }

    fn encoded_len(&self) -> usize {
        8
    }

    fn to_canonical(&self, buf: &[u8]) -> Canonical {
        let a = u16::from_be_bytes([buf[6], buf[7]]);
        Canonical {
            r: premul16(u16::from_be_bytes([buf[0], buf[1]]), a),
            g: premul16(u16::from_be_bytes([buf[2], buf[3]]), a),
            b: premul16(u16::from_be_bytes([buf[4], buf[5]]), a),
            a,
        }
    }

    fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
        buf[0..2].copy_from_slice(&c.r.to_be_bytes());
        buf[2..4].copy_from_slice(&c.g.to_be_bytes());
        buf[4..6].copy_from_slice(&c.b.to_be_bytes());
        buf[6..8].copy_from_slice(&c.a.to_be_bytes());
    }
}

struct Rgb;

impl ColorSpace for Rgb {
    fn name(&self) -> &str {
        "rgb"
    }

    fn encoded_len(&self) -> usize {
        3
    }

    fn to_canonical(&self, buf: &[u8]) -> Canonical {
        Canonical::opaque(rep8(buf[0]), rep8(buf[1]), rep8(buf[2]))
    }

    fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
        buf[0] = narrow8(c.r);
        buf[1] = narrow8(c.g);
        buf[2] = narrow8(c.b);
    }
}

struct Gray;

impl ColorSpace for Gray {
    fn name(&self) -> &str {
        "gray"
    }

    fn encoded_len(&self) -> usize {
        1
    }

    fn to_canonical(&self, buf: &[u8]) -> Canonical {
        let y = rep8(buf[0]);
        Canonical::opaque(y, y, y)
    }

    fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
        buf[0] = narrow8(c.luma());
    }
}

struct Gray16;

impl ColorSpace for Gray16 {
    fn name(&self) -> &str {
        "gray16"
    }

    fn encoded_len(&self) -> usize {
        2
    }

    fn to_canonical(&self, buf: &[u8]) -> Canonical {
        let y = u16::from_be_bytes([buf[0], buf[1]]);
        Canonical::opaque(y, y, y)
    }

    fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
        buf.copy_from_slice(&c.luma().to_be_bytes());
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Assigns ids to user-defined color spaces.
///
/// An explicit object rather than process-global state: applications and
/// tests hold isolated registries, and registration requires `&mut` so
/// concurrent registration needs external synchronization. Handles obtained
/// from a registry stay valid after the registry is dropped.
#[derive(Clone, Debug)]
pub struct ColorRegistry {
    spaces: Vec<Space>,
    next_id: u32,
}

impl ColorRegistry {
    /// Registry seeded with the built-in spaces.
    pub fn builtin() -> Self {
        let mut spaces = Vec::with_capacity(SpaceId::BUILTIN_COUNT as usize);
        spaces.push(Space::nrgba());
        spaces.push(Space::nrgba64());
        spaces.push(Space::rgb());
        spaces.push(Space::gray());
        spaces.push(Space::gray16());
        Self {
            spaces,
            next_id: SpaceId::BUILTIN_COUNT,
        }
    }

    /// Register a user-defined space, assigning it a fresh id.
    ///
    /// Ids increase monotonically and are never reused, so every registered
    /// space is distinguishable from every built-in and from each other.
    pub fn register(&mut self, ops: impl ColorSpace + Send + Sync + 'static) -> Space {
        let id = SpaceId(self.next_id);
        self.next_id += 1;
        let space = Space {
            id,
            ops: Arc::new(ops),
        };
        self.spaces.push(space.clone());
        space
    }

    /// Look up a registered space by id.
    pub fn get(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    /// Number of registered spaces, built-ins included.
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Whether the registry holds no spaces.
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nrgba_half_alpha_red() {
        // 255 replicated to 65535, premultiplied by 32896/65535, truncating.
        let c = Space::nrgba().to_canonical(&[255, 0, 0, 128]);
        assert_eq!(c, Canonical::new(32896, 0, 0, 32896));
    }

    #[test]
    fn nrgba_opaque_replicates_channels() {
        let c = Space::nrgba().to_canonical(&[0x12, 0x34, 0x56, 0xff]);
        assert_eq!(c, Canonical::new(0x1212, 0x3434, 0x5656, 0xffff));
    }

    #[test]
    fn nrgba_narrowing_truncates() {
        let mut buf = [0u8; 4];
        Space::nrgba().from_canonical(Canonical::new(32896, 0, 0, 32896), &mut buf);
        assert_eq!(buf, [128, 0, 0, 128]);
    }

    #[test]
    fn nrgba64_premultiplies_16bit() {
        // 0xffff * 0x8000 / 0xffff = 0x8000
        let bytes = [0xff, 0xff, 0, 0, 0, 0, 0x80, 0x00];
        let c = Space::nrgba64().to_canonical(&bytes);
        assert_eq!(c, Canonical::new(0x8000, 0, 0, 0x8000));
    }

    #[test]
    fn nrgba64_big_endian_round_trip() {
        let space = Space::nrgba64();
        let bytes = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xff, 0xff];
        let c = space.to_canonical(&bytes);
        let mut out = [0u8; 8];
        space.from_canonical(c, &mut out);
        // Opaque, so premultiplication changes nothing.
        assert_eq!(out, bytes);
    }

    #[test]
    fn rgb_is_opaque() {
        let c = Space::rgb().to_canonical(&[10, 20, 30]);
        assert_eq!(c, Canonical::opaque(0x0a0a, 0x1414, 0x1e1e));
    }

    #[test]
    fn gray_white_round_trip() {
        let space = Space::gray();
        let c = space.to_canonical(&[0xff]);
        assert_eq!(c, Canonical::opaque(0xffff, 0xffff, 0xffff));

        let mut out = [0u8; 1];
        space.from_canonical(c, &mut out);
        assert_eq!(out[0], 255);
    }

    #[test]
    fn gray_round_trip_is_stable() {
        let space = Space::gray();
        for y in [0u8, 1, 64, 127, 128, 200, 255] {
            let c = space.to_canonical(&[y]);
            let mut out = [0u8; 1];
            space.from_canonical(c, &mut out);
            assert_eq!(out[0], y);
        }
    }

    #[test]
    fn gray16_big_endian() {
        let space = Space::gray16();
        let c = space.to_canonical(&[0x12, 0x34]);
        assert_eq!(c, Canonical::opaque(0x1234, 0x1234, 0x1234));

        let mut out = [0u8; 2];
        space.from_canonical(c, &mut out);
        assert_eq!(out, [0x12, 0x34]);
    }

    #[test]
    fn space_equality_is_by_id() {
        assert_eq!(Space::nrgba(), Space::nrgba());
        assert_ne!(Space::nrgba(), Space::nrgba64());
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn to_canonical_rejects_short_buffer() {
        Space::nrgba().to_canonical(&[1, 2]);
    }

    struct LumaAlpha;

    impl ColorSpace for LumaAlpha {
        fn name(&self) -> &str {
            "luma-alpha"
        }

        fn encoded_len(&self) -> usize {
            2
        }

        fn to_canonical(&self, buf: &[u8]) -> Canonical {
            let a = rep8(buf[1]);
            let y = premul16(rep8(buf[0]), a);
            Canonical::new(y, y, y, a)
        }

        fn from_canonical(&self, c: Canonical, buf: &mut [u8]) {
            buf[0] = narrow8(c.luma());
            buf[1] = narrow8(c.a);
        }
    }

    #[test]
    fn registry_assigns_fresh_ids() {
        let mut registry = ColorRegistry::builtin();
        assert_eq!(registry.len(), 5);

        let first = registry.register(LumaAlpha);
        let second = registry.register(LumaAlpha);
        assert_eq!(first.id(), SpaceId(5));
        assert_eq!(second.id(), SpaceId(6));
        assert_ne!(first, second);

        assert!(registry.get(SpaceId::GRAY).is_some());
        assert_eq!(registry.get(first.id()).map(Space::name), Some("luma-alpha"));
        assert!(registry.get(SpaceId(99)).is_none());
    }

    #[test]
    fn registered_space_converts() {
        let mut registry = ColorRegistry::builtin();
        let ya = registry.register(LumaAlpha);

        let c = ya.to_canonical(&[0x80, 0xff]);
        assert_eq!(c, Canonical::opaque(0x8080, 0x8080, 0x8080));
    }
}
