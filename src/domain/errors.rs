// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("integrity error: {0}")]
    Integrity(String),
    #[error("public revision is unmodifiable: {0}")]
    PublicIsUnmodifiable(String),
    #[error("public revision needed: {0}")]
    PublicVersionNeeded(String),
}
