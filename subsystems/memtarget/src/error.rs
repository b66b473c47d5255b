//! # Memory Target Error Handling
//!
//! Error types shared by capability tables, the lifecycle manager and the
//! cost query engine.
//!
//! Error handling follows these principles:
//! - Every failure is returned to the immediate caller, nothing is retried
//! - "Not supported" is a distinct variant, never folded into a hard failure
//! - Errors are `Copy` and `no_std` compatible

use core::fmt;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// Memory target result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// Memory target error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// Malformed input: missing capability table, wrong parameter type,
    /// or parameters rejected by the kind
    InvalidArgument,
    /// Allocation or table space exhausted
    OutOfResources,
    /// Operation not implemented by the kind and no fallback available
    NotSupported,
    /// Catch-all failure reported by a backend
    Unknown,
}

impl Error {
    /// Whether this is the explicit "not supported" signal rather than a
    /// hard failure
    #[inline]
    pub const fn is_not_supported(&self) -> bool {
        matches!(self, Error::NotSupported)
    }

    /// Short stable name, suitable for log fields
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::OutOfResources => "out_of_resources",
            Self::NotSupported => "not_supported",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::OutOfResources => write!(f, "out of resources"),
            Self::NotSupported => write!(f, "operation not supported"),
            Self::Unknown => write!(f, "unknown backend error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

// =============================================================================
// TESTS
// =============================================================================
