use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single validation rule failure, keyed by the wire name of the field
/// that violated it (e.g. "tradeDetails.price").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every validation failure found in one inbound payload. Callers get the
/// full list, not just the first failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("validation failed: {} violation(s)", .violations.len())]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Trade not found: {id}")]
    NotFound { id: u64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid sort field: {0}")]
    UnknownSortField(String),

    #[error("Invalid pagination: page_num={page_num}, page_size={page_size} (both must be greater than 0)")]
    InvalidPagination { page_num: u64, page_size: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.push("trader", "is required");
        errors.push("tradeDetails.price", "must be non-negative");
        assert_eq!(errors.violations.len(), 2);
        assert_eq!(errors.violations[0].field, "trader");
        assert_eq!(errors.to_string(), "validation failed: 2 violation(s)");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "Trade not found: 42");
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::UnknownSortField("notAField".to_string());
        assert_eq!(err.to_string(), "Invalid sort field: notAField");
    }
}
