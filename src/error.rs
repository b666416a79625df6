//! Error handling for Folio
//!
//! Defines the domain error types. Application code propagates them through
//! `anyhow::Result` for context chaining.

use thiserror::Error;

/// Core error types for portfolio operations
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("portfolio {0} not found")]
    NotFound(i64),

    #[error("{kind} {id} not found")]
    RecordNotFound { kind: &'static str, id: i64 },

    /// A money or quantity computation left the range of `Decimal`
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}
