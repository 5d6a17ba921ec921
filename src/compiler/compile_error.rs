use thiserror::Error;

use crate::{parser::ParseError, validator::ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("catalog is unavailable")]
    CatalogUnavailable,
}
