use thiserror::Error;

/// Errors that can occur when constructing or parsing types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("Negative weight: {0}")]
    NegativeWeight(String),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Malformed threshold: {0}")]
    MalformedThreshold(String),

    #[error("Empty member id")]
    EmptyMemberId,
}
