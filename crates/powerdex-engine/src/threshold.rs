//! Quorum threshold resolution.
//!
//! threshold = ceil(p * total_weight / 100), computed on integers only.

use crate::error::EngineError;
use crate::validate::{validate_members, RawMember};
use num_bigint::{BigInt, BigUint};
use powerdex_math::ceil_div;
use powerdex_types::{Member, Quorum, Weight, WeightedVotingGame};

/// Absolute threshold for an integer percentage: `(p * total + 99) / 100`.
pub fn resolve_percent(percent: u32, total_weight: &BigUint) -> Result<BigUint, EngineError> {
    if percent > 100 {
        return Err(EngineError::MalformedThreshold(format!(
            "quorum {}% exceeds 100%",
            percent
        )));
    }
    let scaled = BigUint::from(percent) * total_weight + BigUint::from(99u32);
    Ok(scaled / BigUint::from(100u32))
}

/// Absolute threshold for a rational percentage `numer / denom`:
/// `ceil(numer * total / (denom * 100))`.
pub fn resolve_threshold(quorum: &Quorum, total_weight: &BigUint) -> Result<BigUint, EngineError> {
    let numerator = quorum.numer() * total_weight;
    let denominator = quorum.denom() * BigUint::from(100u32);
    Ok(ceil_div(&numerator, &denominator)?)
}

/// Build a game from members, a quorum and the weight basis.
pub fn game_from_quorum(
    members: Vec<Member>,
    quorum: &Quorum,
    total_weight: &Weight,
) -> Result<WeightedVotingGame, EngineError> {
    let total = total_weight.as_biguint();
    let threshold = resolve_threshold(quorum, total)?;
    Ok(WeightedVotingGame::new(members, threshold, total.clone()))
}

/// Build a game from signed inputs, rejecting negative weights.
pub fn game_from_signed(
    members: Vec<RawMember>,
    quorum: &Quorum,
    total_weight: &BigInt,
) -> Result<WeightedVotingGame, EngineError> {
    let total = Weight::try_from(total_weight.clone())
        .map_err(|_| EngineError::InvalidWeight(format!("negative total weight {}", total_weight)))?;
    let members = validate_members(members)?;
    game_from_quorum(members, quorum, &total)
}
