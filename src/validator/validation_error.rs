use thiserror::Error;

use crate::parser::ast::DataType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Object '{0}' not found")]
    UnknownTable(String),
    #[error("Column '{name}' not found in any table")]
    UnknownColumn { name: String, candidates: Vec<String> },
    #[error("Column '{name}' is ambiguous")]
    AmbiguousColumn { name: String, matches: Vec<(String, String)> },
    #[error("No match found for function signature {0}")]
    FunctionNotFound(String),
    #[error("Invalid number or type of arguments to function '{name}': expected {expected}, got {got:?}")]
    FunctionArgMismatch { name: String, expected: String, got: Vec<DataType> },
    #[error("Cannot apply '{operator}' to arguments of type {types:?}")]
    TypeMismatch { operator: String, types: Vec<DataType> },
    #[error("Ordinal out of range: {ordinal} (select list has {columns} columns)")]
    InvalidOrdinal { ordinal: i64, columns: usize },
    #[error("Column count mismatch in set operation: {left} vs {right}")]
    SetOperationArity { left: usize, right: usize },
    #[error("Invalid row count '{0}': must be a non-negative integer literal")]
    InvalidFetch(String),
    #[error("Expression '{0}' is not being grouped")]
    NotGrouped(String),
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ValidationError::UnknownColumn { name: "x".into(), candidates: vec![] };
        assert_eq!(err.to_string(), "Column 'x' not found in any table");

        let err = ValidationError::InvalidOrdinal { ordinal: 3, columns: 2 };
        assert_eq!(err.to_string(), "Ordinal out of range: 3 (select list has 2 columns)");
    }
}
