// Match record: pairing, round, goal and foul counters, played flag.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::team::TeamId;

/// Match identifier. The first match of an empty league gets 0; later ids
/// are one past the highest id the league has held, so a deleted match's id
/// is not handed out again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u32);

impl MatchId {
    pub const FIRST: MatchId = MatchId(0);

    pub fn new(value: u32) -> Self {
        MatchId(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        MatchId(self.0.saturating_add(1))
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which team of a match a stat applies to: team 1 (home) or team 2 (away).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    /// Map the 1-based side index used by the interchange format.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Side::Home),
            2 => Some(Side::Away),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Side::Home => 1,
            Side::Away => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A single fixture between two teams.
///
/// Field names follow the interchange format (`t1`, `g1`, `f1`, ...).
/// Team references are not checked against the team list here; standings
/// skip matches whose teams are unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    pub t1: TeamId,
    pub t2: TeamId,
    pub g1: u32,
    pub g2: u32,
    pub f1: u32,
    pub f2: u32,
    #[serde(default)]
    pub done: bool,
}

impl Match {
    /// A fresh, not-yet-played match.
    pub fn new(id: MatchId, round: u32, t1: TeamId, t2: TeamId) -> Self {
        Match {
            id,
            round,
            t1,
            t2,
            g1: 0,
            g2: 0,
            f1: 0,
            f2: 0,
            done: false,
        }
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::Home => self.t1,
            Side::Away => self.t2,
        }
    }

    pub fn goals(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.g1,
            Side::Away => self.g2,
        }
    }

    pub fn fouls(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.f1,
            Side::Away => self.f2,
        }
    }

    pub(crate) fn goals_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Home => &mut self.g1,
            Side::Away => &mut self.g2,
        }
    }

    pub(crate) fn fouls_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Home => &mut self.f1,
            Side::Away => &mut self.f2,
        }
    }

    /// Whether the match involves the given team on either side.
    pub fn involves(&self, team: TeamId) -> bool {
        self.t1 == team || self.t2 == team
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_match_is_unplayed_and_zeroed() {
        let m = Match::new(MatchId::FIRST, 1, TeamId::new(1), TeamId::new(2));
        assert_eq!((m.g1, m.g2, m.f1, m.f2), (0, 0, 0, 0));
        assert!(!m.done);
    }

    #[test]
    fn side_index_mapping() {
        assert_eq!(Side::from_index(1), Some(Side::Home));
        assert_eq!(Side::from_index(2), Some(Side::Away));
        assert_eq!(Side::from_index(3), None);
        assert_eq!(Side::Home.opponent(), Side::Away);
        assert_eq!(Side::Away.index(), 2);
    }

    #[test]
    fn match_uses_interchange_field_names() {
        let m = Match::new(MatchId::new(3), 2, TeamId::new(1), TeamId::new(4));
        let value = serde_json::to_value(m).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 3, "round": 2, "t1": "1", "t2": "4",
                "g1": 0, "g2": 0, "f1": 0, "f2": 0, "done": false
            })
        );
    }

    #[test]
    fn match_without_done_flag_defaults_to_unplayed() {
        let m: Match = serde_json::from_str(
            r#"{"id":0,"round":1,"t1":"1","t2":"2","g1":1,"g2":0,"f1":0,"f2":0}"#,
        )
        .unwrap();
        assert!(!m.done);
        assert_eq!(m.g1, 1);
    }
}
