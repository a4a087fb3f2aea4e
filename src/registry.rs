//! Format registration and magic-sniffing dispatch.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::io::{Read, Write};

use crate::error::ImageError;
use crate::image::Image;
use crate::limits::Limits;
use crate::reader::PeekReader;

/// Leading-byte pattern identifying a format.
///
/// Each position is either an exact byte or a wildcard matching anything.
/// A probed prefix must cover the whole pattern to match; a shorter prefix
/// never matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Magic {
    pattern: Vec<Option<u8>>,
}

impl Magic {
    /// Pattern of exact bytes.
    pub fn exact(bytes: &[u8]) -> Magic {
        Magic {
            pattern: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Exact bytes followed by `wildcards` positions matching anything.
    ///
    /// Covers formats whose fixed header fields (dimensions, version) sit
    /// right after the tag: the probe then demands those bytes exist before
    /// the decoder commits.
    pub fn prefix(bytes: &[u8], wildcards: usize) -> Magic {
        let mut pattern: Vec<Option<u8>> = bytes.iter().copied().map(Some).collect();
        pattern.resize(bytes.len() + wildcards, None);
        Magic { pattern }
    }

    /// Pattern from explicit positions, `None` matching anything.
    pub fn from_pattern(pattern: Vec<Option<u8>>) -> Magic {
        Magic { pattern }
    }

    /// Pattern length in bytes.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Whether the pattern is empty. An empty pattern matches any stream.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Whether `prefix` covers and matches this pattern.
    pub fn matches(&self, prefix: &[u8]) -> bool {
        prefix.len() >= self.pattern.len()
            && self
                .pattern
                .iter()
                .zip(prefix)
                .all(|(p, b)| p.map_or(true, |want| want == *b))
    }
}

/// Contract a format plugin implements.
///
/// `decode` and `encode` receive plain `Read`/`Write` trait objects; all I/O
/// flows through them. The dispatcher hands `decode` the stream positioned at
/// its first byte, magic included.
pub trait ImageFormat {
    /// Unique lowercase format name (`"farbfeld"`, `"png"`, ...).
    fn name(&self) -> &str;

    /// Leading-byte pattern probed during sniffing.
    fn magic(&self) -> Magic;

    /// Decode a stream into an [`Image`] in the format's native space.
    fn decode(&self, reader: &mut dyn Read, limits: &Limits) -> Result<Image, ImageError>;

    /// Encode `image` to `writer`, converting pixels as needed.
    fn encode(&self, image: &Image, writer: &mut dyn Write) -> Result<(), ImageError>;
}

struct Entry {
    name: String,
    magic: Magic,
    format: Box<dyn ImageFormat + Send + Sync>,
}

/// Append-only format table with magic-sniffing dispatch.
///
/// Registration order is priority order: when several magics match the same
/// stream prefix, the first registered format wins. An explicit object rather
/// than process-global state, so tests and applications hold isolated
/// registries; registration needs `&mut`, dispatch takes `&`.
pub struct FormatRegistry {
    entries: Vec<Entry>,
}

impl FormatRegistry {
    /// Registry with no formats.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry with the compiled-in formats pre-registered.
    #[allow(unused_mut)]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "farbfeld")]
        registry.push(Box::new(crate::formats::farbfeld::Farbfeld));
        registry
    }

    fn push(&mut self, format: Box<dyn ImageFormat + Send + Sync>) {
        let name = String::from(format.name());
        let magic = format.magic();
        self.entries.push(Entry {
            name,
            magic,
            format,
        });
    }

    /// Register a format, appending it at the lowest priority.
    ///
    /// The name and magic are captured once here. Fails with
    /// [`ImageError::DuplicateFormat`] if the name is already taken; the
    /// existing registration is left untouched.
    pub fn register(
        &mut self,
        format: impl ImageFormat + Send + Sync + 'static,
    ) -> Result<(), ImageError> {
        if self.entries.iter().any(|e| e.name == format.name()) {
            return Err(ImageError::DuplicateFormat(String::from(format.name())));
        }
        self.push(Box::new(format));
        Ok(())
    }

    /// Registered format names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Longest registered magic, the minimum peek capacity sniffing needs.
    pub fn max_magic_len(&self) -> usize {
        self.entries.iter().map(|e| e.magic.len()).max().unwrap_or(0)
    }

    /// Sniff `reader` and decode with the first matching format, without
    /// resource limits.
    pub fn decode<R: Read>(&self, reader: R) -> Result<Image, ImageError> {
        self.decode_with(reader, &Limits::none())
    }

    /// Sniff `reader` and decode with the first matching format.
    pub fn decode_with<R: Read>(&self, reader: R, limits: &Limits) -> Result<Image, ImageError> {
        let mut reader = PeekReader::new(reader);
        self.decode_buffered(&mut reader, limits)
    }

    /// Decode from an existing [`PeekReader`].
    ///
    /// Probing peeks each candidate's magic length in registration order; a
    /// source too short for one magic fails that probe only. Once a magic
    /// matches, the reader is handed to that decoder starting at byte zero
    /// and a decoder failure is final; later candidates are not tried.
    ///
    /// On [`ImageError::NoMatchingFormat`] the reader has only been peeked:
    /// the probed prefix is still readable, so the caller can run another
    /// dispatch table over the same stream. The reader's capacity must be at
    /// least [`max_magic_len`](FormatRegistry::max_magic_len).
    pub fn decode_buffered<R: Read>(
        &self,
        reader: &mut PeekReader<R>,
        limits: &Limits,
    ) -> Result<Image, ImageError> {
        for entry in &self.entries {
            let prefix = reader
                .peek(entry.magic.len())
                .map_err(|e| ImageError::ShortRead { source: e })?;
            if entry.magic.matches(prefix) {
                return entry.format.decode(reader, limits);
            }
        }
        Err(ImageError::NoMatchingFormat)
    }

    /// Encode `image` with the named format.
    ///
    /// Exact-name lookup; fails with [`ImageError::UnknownFormat`] if no
    /// format has that name.
    pub fn encode<W: Write>(
        &self,
        image: &Image,
        name: &str,
        writer: &mut W,
    ) -> Result<(), ImageError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ImageError::UnknownFormat(String::from(name)))?;
        entry.format.encode(image, writer)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormatRegistry(")?;
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, ")")
    }
}
