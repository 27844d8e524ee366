//! Shared error types for the services crate.
//!
//! Validation failures are not errors: they come back as message lists in
//! [`crate::response_service::SaveOutcome::Rejected`]. The enums here cover
//! genuine faults only, which means store failures for the most part.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResponseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResponseError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SummaryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SummaryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
