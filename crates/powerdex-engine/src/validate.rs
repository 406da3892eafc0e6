//! Input validation shared by both computation paths.

use crate::error::EngineError;
use num_bigint::BigInt;
use powerdex_types::{Member, MemberId, Weight, WeightedVotingGame};
use std::collections::HashMap;

/// Member as delivered by an ingestion source, weight not yet checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    pub id: MemberId,
    pub weight: BigInt,
}

impl RawMember {
    pub fn new(id: impl Into<MemberId>, weight: BigInt) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// Convert raw members, rejecting negative weights and duplicate ids.
pub fn validate_members(raw: Vec<RawMember>) -> Result<Vec<Member>, EngineError> {
    let members = raw
        .into_iter()
        .map(|r| {
            let weight = Weight::try_from(r.weight.clone()).map_err(|_| {
                EngineError::InvalidWeight(format!("member {} has negative weight {}", r.id, r.weight))
            })?;
            Ok(Member { id: r.id, weight })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;
    position_index(&members)?;
    Ok(members)
}

/// Map each member id to its position in the game.
///
/// Fails on duplicate ids: a repeated id would make per-member results
/// ambiguous for the caller.
pub fn position_index(members: &[Member]) -> Result<HashMap<&MemberId, usize>, EngineError> {
    let mut positions = HashMap::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        if positions.insert(&member.id, i).is_some() {
            return Err(EngineError::DuplicateMember(member.id.to_string()));
        }
    }
    Ok(positions)
}

/// Structural checks run before any short-circuit or algorithm.
pub fn validate_game(game: &WeightedVotingGame) -> Result<(), EngineError> {
    position_index(&game.members)?;
    Ok(())
}
