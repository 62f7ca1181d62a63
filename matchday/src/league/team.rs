// Team identity and display name.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable team identifier. Issued once by the store (max existing + 1,
/// starting at 1) and never reused.
///
/// Serialized as a decimal string (`"3"`) so it can key a JSON object; both
/// strings and integers are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamId(u32);

impl TeamId {
    /// The identifier issued to the first team of an empty league.
    pub const FIRST: TeamId = TeamId(1);

    pub fn new(value: u32) -> Self {
        TeamId(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The identifier following this one.
    pub fn next(self) -> Self {
        TeamId(self.0.saturating_add(1))
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(TeamId)
    }
}

impl Serialize for TeamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TeamIdVisitor;

        impl Visitor<'_> for TeamIdVisitor {
            type Value = TeamId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a team id as a string or non-negative integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TeamId, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TeamId, E> {
                u32::try_from(v)
                    .map(TeamId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TeamId, E> {
                u32::try_from(v)
                    .map(TeamId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }
        }

        deserializer.deserialize_any(TeamIdVisitor)
    }
}

/// A team taking part in the league.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Team {
            id,
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
