//! Members of a weighted voting body.

use crate::error::TypesError;
use crate::weight::Weight;
use std::fmt;
use std::str::FromStr;

/// Opaque member identifier (wallet address, delegate name, seat number...).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(String);

impl MemberId {
    /// Create a new member id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

impl FromStr for MemberId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyMemberId);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A voting member and its weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub weight: Weight,
}

impl Member {
    /// Create a new member.
    pub fn new(id: impl Into<MemberId>, weight: impl Into<Weight>) -> Self {
        Self {
            id: id.into(),
            weight: weight.into(),
        }
    }

    /// Zero-weight members are valid but can never tip a positive threshold.
    pub fn is_inert(&self) -> bool {
        self.weight.is_zero()
    }
}
