//! Serde implementations for powerdex-types
//!
//! Weights and quorums travel as strings so values beyond `u64` (and
//! scientific notation from indexers) survive JSON round-trips.

use crate::*;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// MemberId
impl Serialize for MemberId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MemberId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MemberId::from_str(&s).map_err(de::Error::custom)
    }
}

// Weight
impl Serialize for Weight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

struct WeightVisitor;

impl<'de> Visitor<'de> for WeightVisitor {
    type Value = Weight;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal/scientific string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Weight, E> {
        Weight::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Weight, E> {
        Ok(Weight::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Weight, E> {
        Weight::try_from(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Weight, E> {
        Err(E::custom(format!(
            "weight {} is a float; pass large weights as strings",
            v
        )))
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WeightVisitor)
    }
}

// Quorum
impl Serialize for Quorum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

struct QuorumVisitor;

impl<'de> Visitor<'de> for QuorumVisitor {
    type Value = Quorum;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a percentage between 0 and 100")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quorum, E> {
        Quorum::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quorum, E> {
        let p = u32::try_from(v).map_err(|_| E::custom(format!("quorum {} exceeds 100%", v)))?;
        Quorum::percent(p).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quorum, E> {
        if v < 0 {
            return Err(E::custom(format!("quorum {} is negative", v)));
        }
        self.visit_u64(v as u64)
    }
}

impl<'de> Deserialize<'de> for Quorum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuorumVisitor)
    }
}

// Member
#[derive(Serialize, Deserialize)]
struct MemberRepr {
    id: MemberId,
    weight: Weight,
}

impl Serialize for Member {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MemberRepr {
            id: self.id.clone(),
            weight: self.weight.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Member {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = MemberRepr::deserialize(deserializer)?;
        Ok(Member {
            id: repr.id,
            weight: repr.weight,
        })
    }
}
