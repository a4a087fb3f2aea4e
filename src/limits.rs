//! Resource limits for decode operations.

use alloc::string::String;

use crate::ImageError;

/// Resource limits for decode operations.
///
/// Used to prevent resource exhaustion from hostile headers. All limits are
/// optional; decoders check dimensions after parsing a header and projected
/// allocation size before allocating pixel memory.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u64>,
    /// Maximum image height in pixels.
    pub max_height: Option<u64>,
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum memory allocation in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Create a new Limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the maximum width in pixels.
    pub fn with_max_width(mut self, max: u64) -> Self {
        self.max_width = Some(max);
        self
    }

    /// Set the maximum height in pixels.
    pub fn with_max_height(mut self, max: u64) -> Self {
        self.max_height = Some(max);
        self
    }

    /// Set the maximum total pixel count.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set the maximum pixel memory allocation in bytes.
    pub fn with_max_memory_bytes(mut self, max: u64) -> Self {
        self.max_memory_bytes = Some(max);
        self
    }

    /// Check if dimensions are within limits.
    ///
    /// Returns [`ImageError::LimitExceeded`] naming the violated limit.
    pub fn check_dimensions(&self, width: u64, height: u64) -> Result<(), ImageError> {
        if let Some(max_width) = self.max_width {
            if width > max_width {
                return Err(exceeded("width exceeds limit"));
            }
        }

        if let Some(max_height) = self.max_height {
            if height > max_height {
                return Err(exceeded("height exceeds limit"));
            }
        }

        if let Some(max_pixels) = self.max_pixels {
            let pixels = width.saturating_mul(height);
            if pixels > max_pixels {
                return Err(exceeded("pixel count exceeds limit"));
            }
        }

        Ok(())
    }

    /// Check if a memory allocation is within limits.
    pub fn check_memory(&self, bytes: u64) -> Result<(), ImageError> {
        if let Some(max_memory) = self.max_memory_bytes {
            if bytes > max_memory {
                return Err(exceeded("memory allocation exceeds limit"));
            }
        }
        Ok(())
    }
}

fn exceeded(what: &str) -> ImageError {
    ImageError::LimitExceeded(String::from(what))
}
