//! Unified error type for image operations.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// Unified error type for decode, encode, and registry operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum ImageError {
    /// Stream ended or failed before the required bytes were read.
    ///
    /// Always fatal to the current decode; no retry is attempted.
    #[cfg(feature = "std")]
    ShortRead { source: std::io::Error },
    /// Stream failed before all bytes were written.
    ///
    /// Bytes already flushed to the destination are not rolled back.
    #[cfg(feature = "std")]
    ShortWrite { source: std::io::Error },
    /// No registered magic matched the stream prefix.
    NoMatchingFormat,
    /// Encode requested a format name that is not registered.
    UnknownFormat(String),
    /// A format with this name is already registered.
    DuplicateFormat(String),
    /// Input validation failed.
    InvalidInput(String),
    /// Resource limit exceeded.
    LimitExceeded(String),
    /// Allocation failure.
    Oom,
    /// Underlying format error.
    Format {
        name: String,
        source: Box<dyn core::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            ImageError::ShortRead { source } => write!(f, "short read: {}", source),
            #[cfg(feature = "std")]
            ImageError::ShortWrite { source } => write!(f, "short write: {}", source),
            ImageError::NoMatchingFormat => write!(f, "no registered format matches the stream"),
            ImageError::UnknownFormat(name) => write!(f, "unknown format name {:?}", name),
            ImageError::DuplicateFormat(name) => {
                write!(f, "format {:?} is already registered", name)
            }
            ImageError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            ImageError::LimitExceeded(msg) => write!(f, "limit exceeded: {}", msg),
            ImageError::Oom => write!(f, "out of memory"),
            ImageError::Format { name, source } => {
                write!(f, "format error ({}): {}", name, source)
            }
        }
    }
}

impl core::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            #[cfg(feature = "std")]
            ImageError::ShortRead { source } | ImageError::ShortWrite { source } => Some(source),
            ImageError::Format { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// Conversion helpers for format-specific errors
impl ImageError {
    /// Wrap a format-specific error.
    pub fn from_format<E>(name: impl Into<String>, error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        ImageError::Format {
            name: name.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(
            ImageError::NoMatchingFormat.to_string(),
            "no registered format matches the stream"
        );
        assert_eq!(
            ImageError::UnknownFormat("bmp".into()).to_string(),
            "unknown format name \"bmp\""
        );
        assert_eq!(ImageError::Oom.to_string(), "out of memory");
    }

    #[test]
    fn format_error_carries_source() {
        use core::error::Error;

        let err = ImageError::from_format("farbfeld", core::fmt::Error);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("format error (farbfeld)"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn short_read_carries_source() {
        use core::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = ImageError::ShortRead { source: io };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("short read:"));
    }
}
