// League state: the ordered team list plus the flat match list.
//
// This is the unit of persistence and of backup restore. Teams keep their
// insertion order, which standings use as the last tie-break.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::matches::{Match, MatchId};
use super::team::{Team, TeamId};
use super::LeagueError;

/// Teams and matches of one league.
///
/// Besides the stored data it tracks the lowest match id not yet handed out,
/// which survives deletes but is rebuilt from the matches on load. It takes
/// no part in equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "LeagueStateRepr", into = "LeagueStateRepr")]
pub struct LeagueState {
    teams: Vec<Team>,
    matches: Vec<Match>,
    match_id_floor: MatchId,
}

impl PartialEq for LeagueState {
    fn eq(&self, other: &Self) -> bool {
        self.teams == other.teams && self.matches == other.matches
    }
}

impl Eq for LeagueState {}

impl LeagueState {
    /// Build a state from parts, rejecting duplicate team or match ids.
    pub fn new(teams: Vec<Team>, matches: Vec<Match>) -> Result<Self, LeagueError> {
        let mut seen_teams = HashSet::new();
        for team in &teams {
            if !seen_teams.insert(team.id) {
                return Err(LeagueError::invalid(
                    "teams",
                    format!("duplicate team id {}", team.id),
                ));
            }
        }
        let mut seen_matches = HashSet::new();
        let mut match_id_floor = MatchId::FIRST;
        for m in &matches {
            if !seen_matches.insert(m.id) {
                return Err(LeagueError::invalid(
                    "matches",
                    format!("duplicate match id {}", m.id),
                ));
            }
            match_id_floor = match_id_floor.max(m.id.next());
        }
        Ok(LeagueState {
            teams,
            matches,
            match_id_floor,
        })
    }

    /// A fresh league: `count` teams named "<prefix> 1".."<prefix> N" with ids
    /// 1..N, and no matches.
    pub fn with_default_roster(count: usize, prefix: &str) -> Self {
        let teams = (1..=count as u32)
            .map(|i| Team::new(TeamId::new(i), format!("{prefix} {i}")))
            .collect();
        LeagueState {
            teams,
            matches: Vec::new(),
            match_id_floor: MatchId::FIRST,
        }
    }

    /// Teams in insertion order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Matches in stored order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.team(id).map(|t| t.name.as_str())
    }

    pub fn contains_team(&self, id: TeamId) -> bool {
        self.team(id).is_some()
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub(crate) fn match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Identifier the next added team will receive.
    pub fn next_team_id(&self) -> TeamId {
        self.teams
            .iter()
            .map(|t| t.id)
            .max()
            .map(TeamId::next)
            .unwrap_or(TeamId::FIRST)
    }

    /// Identifier the next added match will receive. Ids of deleted matches
    /// are not reissued.
    pub fn next_match_id(&self) -> MatchId {
        self.matches
            .iter()
            .map(|m| m.id.next())
            .fold(self.match_id_floor, MatchId::max)
    }

    /// Distinct round numbers present, ascending.
    pub fn rounds(&self) -> Vec<u32> {
        let mut rounds: Vec<u32> = self.matches.iter().map(|m| m.round).collect();
        rounds.sort_unstable();
        rounds.dedup();
        rounds
    }

    /// Suggested round for a new match: one past the highest round, or 1.
    pub fn next_round(&self) -> u32 {
        self.matches
            .iter()
            .map(|m| m.round)
            .max()
            .map(|r| r.saturating_add(1))
            .unwrap_or(1)
    }

    /// Matches of one round, in stored order.
    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    pub(crate) fn push_team(&mut self, team: Team) {
        self.teams.push(team);
    }

    pub(crate) fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn push_match(&mut self, m: Match) {
        self.match_id_floor = self.match_id_floor.max(m.id.next());
        self.matches.push(m);
    }

    /// Remove a match by id, returning it if it was present.
    pub(crate) fn remove_match(&mut self, id: MatchId) -> Option<Match> {
        let idx = self.matches.iter().position(|m| m.id == id)?;
        Some(self.matches.remove(idx))
    }

    /// Write `m` over the match with the same id. If no such match exists it
    /// is re-inserted before the first match with a larger id.
    pub(crate) fn put_match(&mut self, m: Match) {
        self.match_id_floor = self.match_id_floor.max(m.id.next());
        if let Some(existing) = self.match_mut(m.id) {
            *existing = m;
            return;
        }
        let idx = self
            .matches
            .iter()
            .position(|other| other.id > m.id)
            .unwrap_or(self.matches.len());
        self.matches.insert(idx, m);
    }
}

// ---------------------------------------------------------------------------
// Interchange representation
// ---------------------------------------------------------------------------

/// On-disk shape: `{"teams": {"1": "Team 1", ...}, "matches": [...]}`.
#[derive(Clone, Serialize, Deserialize)]
struct LeagueStateRepr {
    #[serde(with = "team_map")]
    teams: Vec<Team>,
    #[serde(default)]
    matches: Vec<Match>,
}

impl TryFrom<LeagueStateRepr> for LeagueState {
    type Error = LeagueError;

    fn try_from(repr: LeagueStateRepr) -> Result<Self, Self::Error> {
        LeagueState::new(repr.teams, repr.matches)
    }
}

impl From<LeagueState> for LeagueStateRepr {
    fn from(state: LeagueState) -> Self {
        LeagueStateRepr {
            teams: state.teams,
            matches: state.matches,
        }
    }
}

/// (De)serialize the team list as an id -> name object, keeping document
/// order in both directions.
mod team_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::league::team::{Team, TeamId};

    pub fn serialize<S: Serializer>(teams: &[Team], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(teams.iter().map(|t| (t.id, t.name.as_str())))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Team>, D::Error> {
        struct TeamMapVisitor;

        impl<'de> Visitor<'de> for TeamMapVisitor {
            type Value = Vec<Team>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of team id to team name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<Team>, A::Error> {
                let mut teams = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, name)) = map.next_entry::<TeamId, String>()? {
                    teams.push(Team { id, name });
                }
                Ok(teams)
            }
        }

        deserializer.deserialize_map(TeamMapVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> LeagueState {
        let mut state = LeagueState::with_default_roster(3, "Team");
        state.push_match(Match::new(MatchId::new(0), 1, TeamId::new(1), TeamId::new(2)));
        state.push_match(Match::new(MatchId::new(1), 1, TeamId::new(3), TeamId::new(1)));
        state.push_match(Match::new(MatchId::new(4), 3, TeamId::new(2), TeamId::new(3)));
        state
    }

    #[test]
    fn default_roster_names_and_ids() {
        let state = LeagueState::with_default_roster(6, "Team");
        assert_eq!(state.teams().len(), 6);
        assert_eq!(state.teams()[0], Team::new(TeamId::new(1), "Team 1"));
        assert_eq!(state.teams()[5], Team::new(TeamId::new(6), "Team 6"));
        assert!(state.matches().is_empty());
    }

    #[test]
    fn next_ids_follow_max_plus_one() {
        let state = sample_state();
        assert_eq!(state.next_team_id(), TeamId::new(4));
        assert_eq!(state.next_match_id(), MatchId::new(5));

        let empty = LeagueState::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(empty.next_team_id(), TeamId::new(1));
        assert_eq!(empty.next_match_id(), MatchId::new(0));
    }

    #[test]
    fn rounds_are_distinct_and_sorted() {
        let state = sample_state();
        assert_eq!(state.rounds(), vec![1, 3]);
        assert_eq!(state.next_round(), 4);
        assert_eq!(state.matches_in_round(1).count(), 2);
        assert_eq!(LeagueState::with_default_roster(2, "T").next_round(), 1);
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let teams = vec![
            Team::new(TeamId::new(1), "A"),
            Team::new(TeamId::new(1), "B"),
        ];
        assert!(matches!(
            LeagueState::new(teams, Vec::new()),
            Err(LeagueError::InvalidInput { .. })
        ));

        let m = Match::new(MatchId::new(2), 1, TeamId::new(1), TeamId::new(2));
        assert!(LeagueState::new(Vec::new(), vec![m, m]).is_err());
    }

    #[test]
    fn put_match_reinserts_in_id_order() {
        let mut state = sample_state();
        let removed = state.remove_match(MatchId::new(1)).unwrap();
        assert_eq!(state.matches().len(), 2);

        state.put_match(removed);
        let ids: Vec<u32> = state.matches().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 4]);
    }

    #[test]
    fn put_match_overwrites_existing() {
        let mut state = sample_state();
        let mut m = *state.get_match(MatchId::new(4)).unwrap();
        m.g1 = 7;
        state.put_match(m);
        assert_eq!(state.matches().len(), 3);
        assert_eq!(state.get_match(MatchId::new(4)).unwrap().g1, 7);
    }

    #[test]
    fn json_shape_matches_interchange_format() {
        let state = sample_state();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["teams"]["1"], "Team 1");
        assert_eq!(value["matches"][0]["t2"], "2");
        assert_eq!(value["matches"][2]["id"], 4);
    }

    #[test]
    fn json_round_trip_preserves_team_order() {
        let json = r#"{"teams": {"10": "Zebras", "2": "Ants", "7": "Moles"}, "matches": []}"#;
        let state: LeagueState = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = state.teams().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Zebras", "Ants", "Moles"]);

        let again: LeagueState =
            serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(again, state);
    }

    #[test]
    fn deleted_match_id_is_not_reissued() {
        let mut state = sample_state();
        state.remove_match(MatchId::new(4)).unwrap();
        assert_eq!(state.next_match_id(), MatchId::new(5));

        state.remove_match(MatchId::new(0)).unwrap();
        state.remove_match(MatchId::new(1)).unwrap();
        assert!(state.matches().is_empty());
        assert_eq!(state.next_match_id(), MatchId::new(5));
    }

    #[test]
    fn id_floor_is_ignored_by_equality_and_rebuilt_on_load() {
        let mut state = sample_state();
        state.remove_match(MatchId::new(4)).unwrap();

        let reloaded: LeagueState =
            serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(reloaded, state);
        assert_eq!(reloaded.next_match_id(), MatchId::new(2));
    }

    #[test]
    fn json_with_duplicate_match_ids_is_rejected() {
        let json = r#"{"teams": {"1": "A", "2": "B"}, "matches": [
            {"id":0,"round":1,"t1":"1","t2":"2","g1":0,"g2":0,"f1":0,"f2":0,"done":false},
            {"id":0,"round":1,"t1":"2","t2":"1","g1":0,"g2":0,"f1":0,"f2":0,"done":false}
        ]}"#;
        assert!(serde_json::from_str::<LeagueState>(json).is_err());
    }
}
