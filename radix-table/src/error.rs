//! Error type shared by the map and set surfaces.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by table operations.
///
/// Misuse of a cursor (erasing an end cursor, using a cursor whose entry was already erased, or
/// one taken from another table) is not reported here: it panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Growing the node store or adding an arena page could not obtain memory. The table is left
    /// as it was before the failing call.
    #[error("allocation failed while reserving {requested} {what}")]
    AllocFailed {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },
    /// `at`/`at_mut` on a key that is not stored.
    #[error("key not found")]
    KeyNotFound,
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn alloc(what: &'static str, requested: usize, source: TryReserveError) -> Self {
        Error::AllocFailed {
            what,
            requested,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_failure_is_reported_with_context() {
        let source = Vec::<u64>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = Error::alloc("buckets", usize::MAX, source);
        let msg = err.to_string();
        assert!(msg.contains("buckets"), "{msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn key_not_found_message() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
    }
}
