//! Game documents read by `powerdex compute`.
//!
//! ```json
//! { "games": [ { "id": "council", "quorum": "51", "total_weight": "100",
//!                "members": [ { "id": "alice", "weight": "60" } ] } ] }
//! ```

use powerdex_engine::{game_from_quorum, EngineError};
use powerdex_types::{Member, MemberId, Quorum, TypesError, Weight, WeightedVotingGame};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Input document.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub games: Vec<GameInput>,
}

/// One voting body.
///
/// Quorum, total and weights stay unparsed until `to_game`, so a bad value
/// fails only its own game and the error can name what was wrong.
#[derive(Debug, Clone, Deserialize)]
pub struct GameInput {
    pub id: String,
    pub quorum: ScalarInput,
    pub total_weight: ScalarInput,
    pub members: Vec<MemberInput>,
}

/// A member as written in the document.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberInput {
    pub id: String,
    pub weight: ScalarInput,
}

/// A number or string as written in the document.
///
/// JSON integers above `u64::MAX` arrive as floats and lose precision; write
/// large weights as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarInput {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Other(serde_json::Value),
}

impl ScalarInput {
    /// Text form, or `None` for values that are neither strings nor numbers.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ScalarInput::Text(s) => Some(s.clone()),
            ScalarInput::Unsigned(u) => Some(u.to_string()),
            ScalarInput::Signed(i) => Some(i.to_string()),
            ScalarInput::Float(f) => Some(f.to_string()),
            ScalarInput::Other(_) => None,
        }
    }
}

impl fmt::Display for ScalarInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarInput::Other(v) => write!(f, "{}", v),
            other => f.write_str(&other.as_text().unwrap_or_default()),
        }
    }
}

impl InputDocument {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read input file '{}': {}", path.display(), e))?;
        Self::from_json(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse input file '{}': {}", path.display(), e))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl GameInput {
    /// Parse quorum, total and members, resolve the threshold and build the game.
    pub fn to_game(&self) -> Result<WeightedVotingGame, EngineError> {
        let quorum = self.quorum()?;
        let total_weight = self.total_weight()?;
        let members = self
            .members
            .iter()
            .map(MemberInput::to_member)
            .collect::<Result<Vec<_>, _>>()?;
        game_from_quorum(members, &quorum, &total_weight)
    }

    pub fn quorum(&self) -> Result<Quorum, EngineError> {
        let text = self.quorum.as_text().ok_or_else(|| {
            EngineError::MalformedThreshold(format!("quorum {} is not a string or number", self.quorum))
        })?;
        Ok(text.parse::<Quorum>()?)
    }

    pub fn total_weight(&self) -> Result<Weight, EngineError> {
        parse_weight(&self.total_weight).map_err(|e| match e {
            TypesError::NegativeWeight(v) => {
                EngineError::InvalidWeight(format!("negative total weight {}", v))
            }
            e => EngineError::InvalidWeight(format!("total weight: {}", e)),
        })
    }
}

impl MemberInput {
    pub fn to_member(&self) -> Result<Member, EngineError> {
        let id: MemberId = self.id.parse()?;
        match parse_weight(&self.weight) {
            Ok(weight) => Ok(Member::new(id, weight)),
            Err(TypesError::NegativeWeight(v)) => Err(EngineError::InvalidWeight(format!(
                "member {} has negative weight {}",
                id, v
            ))),
            Err(e) => Err(EngineError::InvalidWeight(format!("member {}: {}", id, e))),
        }
    }
}

fn parse_weight(input: &ScalarInput) -> Result<Weight, TypesError> {
    match input.as_text() {
        Some(text) => text.parse(),
        None => Err(TypesError::InvalidWeight(format!("{} is not a string or number", input))),
    }
}
