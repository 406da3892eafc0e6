use powerdex_math::MathError;
use powerdex_types::TypesError;
use thiserror::Error;

/// Errors that can occur while computing power indices.
///
/// Every error is local to one game; other games in a batch are unaffected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Malformed threshold: {0}")]
    MalformedThreshold(String),

    #[error("Duplicate member id: {0}")]
    DuplicateMember(String),

    #[error("Invalid member: {0}")]
    InvalidMember(String),

    #[error("Combinatorial limit exceeded: {members} members > {limit}")]
    CombinatorialLimit { members: usize, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Arithmetic error: {0}")]
    Math(#[from] MathError),
}

impl From<TypesError> for EngineError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::NegativeWeight(v) => EngineError::InvalidWeight(format!("negative weight {}", v)),
            TypesError::InvalidWeight(v) => EngineError::InvalidWeight(v),
            TypesError::MalformedThreshold(m) => EngineError::MalformedThreshold(m),
            TypesError::EmptyMemberId => EngineError::InvalidMember("empty member id".to_string()),
        }
    }
}
