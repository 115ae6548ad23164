//! Error types and the engine's ambient error channel.
//!
//! Internal operations return `Result<_, Error>`. The engine surface follows
//! the host contract instead: failing calls return `false` or an empty
//! candidate list, record the error in a `last_error` slot, and invoke the
//! optional callback synchronously on the calling thread.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way the recognition core can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Dictionary file cannot be opened.
    #[error("cannot open dictionary: {0}")]
    DictNotFound(String),

    /// Dictionary header fails validation or parsing runs past end of buffer.
    #[error("dictionary corrupt: {0}")]
    DictCorrupt(String),

    /// Magic is valid but the format version is unsupported.
    #[error("unsupported dictionary version {0}")]
    DictVersionMismatch(u16),

    /// Layout has no character keys or non-positive dimensions.
    #[error("keyboard layout invalid: {0}")]
    LayoutInvalid(String),

    /// Fewer than `MIN_GESTURE_POINTS` raw points.
    #[error("gesture path too short")]
    PathTooShort,

    /// `recognize` called before a successful load.
    #[error("engine not initialized")]
    EngineNotInitialized,

    /// Reserved for allocation failure signalled by the runtime.
    #[error("allocation failed")]
    OutOfMemory,
}

/// Discriminant of [`Error`], stable across the FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    DictNotFound,
    DictCorrupt,
    DictVersionMismatch,
    LayoutInvalid,
    PathTooShort,
    EngineNotInitialized,
    OutOfMemory,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DictNotFound(_) => ErrorKind::DictNotFound,
            Error::DictCorrupt(_) => ErrorKind::DictCorrupt,
            Error::DictVersionMismatch(_) => ErrorKind::DictVersionMismatch,
            Error::LayoutInvalid(_) => ErrorKind::LayoutInvalid,
            Error::PathTooShort => ErrorKind::PathTooShort,
            Error::EngineNotInitialized => ErrorKind::EngineNotInitialized,
            Error::OutOfMemory => ErrorKind::OutOfMemory,
        }
    }
}

impl ErrorKind {
    /// Numeric code for hosts that consume errors as integers.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::DictNotFound => 1,
            ErrorKind::DictCorrupt => 2,
            ErrorKind::DictVersionMismatch => 3,
            ErrorKind::LayoutInvalid => 4,
            ErrorKind::PathTooShort => 5,
            ErrorKind::EngineNotInitialized => 6,
            ErrorKind::OutOfMemory => 7,
        }
    }
}

/// Synchronous error notification, called from the thread that hit the error.
pub type ErrorCallback = Box<dyn Fn(&Error)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_codes() {
        let errors = [
            Error::DictNotFound("x".into()),
            Error::DictCorrupt("x".into()),
            Error::DictVersionMismatch(2),
            Error::LayoutInvalid("x".into()),
            Error::PathTooShort,
            Error::EngineNotInitialized,
            Error::OutOfMemory,
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.kind().code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn display_carries_context() {
        let err = Error::DictVersionMismatch(3);
        assert!(err.to_string().contains('3'));
        let err = Error::DictNotFound("/tmp/words.glide".into());
        assert!(err.to_string().contains("/tmp/words.glide"));
    }
}
