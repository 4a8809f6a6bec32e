//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface configuration problems from here.

use thiserror::Error;

/// The base error type for `apron-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `apron-core`.
pub type CoreResult<T> = Result<T, CoreError>;
