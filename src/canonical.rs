//! The canonical interchange color.

/// Alpha-premultiplied RGBA with 16 bits per channel.
///
/// Every color space converts to and from this representation, so any
/// space-to-space conversion routes through one `Canonical` value. It is an
/// interchange value only and is never stored inside an
/// [`Image`](crate::Image) buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Canonical {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Canonical {
    /// Premultiplied channels with explicit alpha.
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b, a: 0xffff }
    }

    /// Weighted luma of the premultiplied channels, in `[0, 65535]`.
    ///
    /// Integer BT.601 weights 19595/38470/7471 sum to 65536, so the rounded
    /// sum shifts back down to a normalized 16-bit value. The widened sum
    /// cannot overflow `u32`.
    pub fn luma(self) -> u16 {
        let sum = 19595 * u32::from(self.r)
            + 38470 * u32::from(self.g)
            + 7471 * u32::from(self.b)
            + 0x8000;
        (sum >> 16) as u16
    }
}

/// Narrow a 16-bit channel to 8 bits by dropping the low byte.
pub(crate) const fn narrow8(c: u16) -> u8 {
    (c >> 8) as u8
}
