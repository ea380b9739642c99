//! Pure functions for mapping repository errors to HTTP-style status codes.
//!
//! The codes fill the `error_code` field of error responses.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `Key` -> 400 (Bad Request)
/// - `NoPrimaryIndex` -> 500 (Internal Server Error)
/// - `Conflict` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use datarepo_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// assert_eq!(repository_error_to_status_code(&RepositoryError::NoPrimaryIndex), 500);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Key(_) => 400,
        RepositoryError::NoPrimaryIndex => 500,
        RepositoryError::Conflict(_) => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}
