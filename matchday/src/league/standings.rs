// Standings table computed from played matches.
//
// Pure function of the league state: one row per team, ranked by points,
// then goal difference, then goals scored. Teams still tied keep their
// insertion order.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use super::matches::Match;
use super::state::LeagueState;
use super::team::TeamId;

/// Points for a win.
pub const POINTS_WIN: u32 = 3;
/// Points for a draw.
pub const POINTS_DRAW: u32 = 1;

/// One line of the standings table, in display column order.
///
/// The serde names are the table's column labels, used for CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "PTS")]
    pub points: u32,
    #[serde(rename = "GP")]
    pub games_played: u32,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "D")]
    pub draws: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "GD")]
    pub goal_difference: i64,
}

/// Running totals for one team. Goals for/against only feed the tie-break
/// and are not part of the output row.
#[derive(Debug, Clone)]
struct TeamRecord {
    name: String,
    points: u32,
    games_played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u64,
    goals_against: u64,
    goal_difference: i64,
}

impl TeamRecord {
    fn new(name: &str) -> Self {
        TeamRecord {
            name: name.to_string(),
            points: 0,
            games_played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
        }
    }

    fn record_goals(&mut self, scored: u32, conceded: u32) {
        self.games_played += 1;
        self.goals_for += u64::from(scored);
        self.goals_against += u64::from(conceded);
        self.goal_difference += i64::from(scored) - i64::from(conceded);
    }

    fn record_win(&mut self) {
        self.wins += 1;
        self.points += POINTS_WIN;
    }

    fn record_draw(&mut self) {
        self.draws += 1;
        self.points += POINTS_DRAW;
    }

    fn record_loss(&mut self) {
        self.losses += 1;
    }

    fn into_row(self) -> StandingsRow {
        debug_assert_eq!(
            self.goal_difference,
            self.goals_for as i64 - self.goals_against as i64
        );
        StandingsRow {
            team: self.name,
            points: self.points,
            games_played: self.games_played,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goal_difference: self.goal_difference,
        }
    }
}

/// Compute the ranked standings table.
///
/// Only matches flagged `done` count; matches naming a team that is not in
/// the league are skipped.
pub fn compute(state: &LeagueState) -> Vec<StandingsRow> {
    let mut records: Vec<TeamRecord> = state
        .teams()
        .iter()
        .map(|t| TeamRecord::new(&t.name))
        .collect();
    let index: HashMap<TeamId, usize> = state
        .teams()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i))
        .collect();

    for m in state.matches().iter().filter(|m| m.done) {
        let (Some(&i1), Some(&i2)) = (index.get(&m.t1), index.get(&m.t2)) else {
            continue;
        };
        tally(&mut records, i1, i2, m);
    }

    // `sort_by` is stable, so full ties keep insertion order.
    records.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    records.into_iter().map(TeamRecord::into_row).collect()
}

fn tally(records: &mut [TeamRecord], home: usize, away: usize, m: &Match) {
    records[home].record_goals(m.g1, m.g2);
    records[away].record_goals(m.g2, m.g1);

    match m.g1.cmp(&m.g2) {
        std::cmp::Ordering::Greater => {
            records[home].record_win();
            records[away].record_loss();
        }
        std::cmp::Ordering::Less => {
            records[away].record_win();
            records[home].record_loss();
        }
        std::cmp::Ordering::Equal => {
            records[home].record_draw();
            records[away].record_draw();
        }
    }
}

/// Write the table as CSV with a `Team,PTS,GP,W,D,L,GD` header.
pub fn write_csv<W: Write>(rows: &[StandingsRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(["Team", "PTS", "GP", "W", "D", "L", "GD"])?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::matches::MatchId;
    use crate::league::team::Team;

    /// Helper: a played match with the given score.
    fn played(id: u32, t1: u32, t2: u32, g1: u32, g2: u32) -> Match {
        let mut m = Match::new(MatchId::new(id), 1, TeamId::new(t1), TeamId::new(t2));
        m.g1 = g1;
        m.g2 = g2;
        m.done = true;
        m
    }

    fn teams(names: &[&str]) -> Vec<Team> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Team::new(TeamId::new(i as u32 + 1), *n))
            .collect()
    }

    fn order(rows: &[StandingsRow]) -> Vec<&str> {
        rows.iter().map(|r| r.team.as_str()).collect()
    }

    #[test]
    fn empty_league_lists_every_team_with_zeros() {
        let state = LeagueState::with_default_roster(6, "Team");
        let rows = compute(&state);
        assert_eq!(rows.len(), 6);
        assert_eq!(order(&rows)[0], "Team 1");
        assert!(rows.iter().all(|r| r.points == 0 && r.games_played == 0));
    }

    #[test]
    fn win_draw_loss_accounting() {
        let state = LeagueState::new(
            teams(&["A", "B", "C"]),
            vec![played(0, 1, 2, 3, 1), played(1, 2, 3, 2, 2), played(2, 3, 1, 0, 4)],
        )
        .unwrap();

        let rows = compute(&state);

        let a = rows.iter().find(|r| r.team == "A").unwrap();
        assert_eq!((a.points, a.games_played, a.wins, a.draws, a.losses), (6, 2, 2, 0, 0));
        assert_eq!(a.goal_difference, 6);

        let b = rows.iter().find(|r| r.team == "B").unwrap();
        assert_eq!((b.points, b.games_played, b.wins, b.draws, b.losses), (1, 2, 0, 1, 1));
        assert_eq!(b.goal_difference, -2);

        let c = rows.iter().find(|r| r.team == "C").unwrap();
        assert_eq!((c.points, c.games_played, c.wins, c.draws, c.losses), (1, 2, 0, 1, 1));
        assert_eq!(c.goal_difference, -4);

        assert_eq!(order(&rows), vec!["A", "B", "C"]);
    }

    #[test]
    fn unplayed_match_contributes_nothing() {
        let mut state = LeagueState::new(teams(&["A", "B"]), Vec::new()).unwrap();
        state.push_match(Match::new(MatchId::new(0), 1, TeamId::new(1), TeamId::new(2)));

        let rows = compute(&state);
        assert!(rows.iter().all(|r| r.games_played == 0 && r.draws == 0 && r.points == 0));
    }

    #[test]
    fn scored_but_not_done_is_ignored() {
        let mut m = played(0, 1, 2, 2, 0);
        m.done = false;
        let state = LeagueState::new(teams(&["A", "B"]), vec![m]).unwrap();
        assert!(compute(&state).iter().all(|r| r.games_played == 0));
    }

    #[test]
    fn dangling_team_reference_is_skipped() {
        let state = LeagueState::new(
            teams(&["A", "B"]),
            vec![played(0, 1, 9, 5, 0), played(1, 1, 2, 1, 0)],
        )
        .unwrap();

        let rows = compute(&state);
        let a = rows.iter().find(|r| r.team == "A").unwrap();
        assert_eq!(a.games_played, 1);
        assert_eq!(a.goal_difference, 1);
    }

    #[test]
    fn sort_order_prefers_points_then_goal_difference() {
        // A: 6 pts, gd +2, gf 5. B: 6 pts, gd +3, gf 3. C: 9 pts, gd -1.
        let state = LeagueState::new(
            teams(&["A", "B", "C", "X"]),
            vec![
                // A vs X: 2-0, 3-1 (two wins), then a 0-2 loss to X.
                played(0, 1, 4, 2, 0),
                played(1, 1, 4, 3, 1),
                played(2, 4, 1, 2, 0),
                // B vs X: 1-0, 2-0 (two wins).
                played(3, 2, 4, 1, 0),
                played(4, 2, 4, 2, 0),
                // C: three 1-0 wins and one 0-4 loss -> 9 pts, gd -1.
                played(5, 3, 4, 1, 0),
                played(6, 3, 4, 1, 0),
                played(7, 3, 4, 1, 0),
                played(8, 4, 3, 4, 0),
            ],
        )
        .unwrap();

        let rows = compute(&state);
        let find = |name: &str| rows.iter().find(|r| r.team == name).unwrap().clone();
        assert_eq!((find("A").points, find("A").goal_difference), (6, 2));
        assert_eq!((find("B").points, find("B").goal_difference), (6, 3));
        assert_eq!((find("C").points, find("C").goal_difference), (9, -1));

        let top3: Vec<&str> = order(&rows).into_iter().filter(|n| *n != "X").collect();
        assert_eq!(top3, vec!["C", "B", "A"]);
    }

    #[test]
    fn goals_for_breaks_points_and_difference_tie() {
        // A and B both 3 pts, gd +1; A scored 3, B scored 1.
        let state = LeagueState::new(
            teams(&["B", "A", "X", "Y"]),
            vec![played(0, 2, 3, 3, 2), played(1, 1, 4, 1, 0)],
        )
        .unwrap();

        let rows = compute(&state);
        assert_eq!(&order(&rows)[..2], &["A", "B"]);
    }

    #[test]
    fn full_tie_keeps_insertion_order() {
        let state = LeagueState::new(
            teams(&["Zeta", "Alpha", "Mid"]),
            vec![played(0, 1, 2, 1, 1)],
        )
        .unwrap();

        let rows = compute(&state);
        assert_eq!(order(&rows), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn compute_is_pure_and_deterministic() {
        let state = LeagueState::new(
            teams(&["A", "B", "C"]),
            vec![played(0, 1, 2, 1, 1), played(1, 3, 2, 0, 1)],
        )
        .unwrap();
        let before = state.clone();

        let first = compute(&state);
        let second = compute(&state);

        assert_eq!(first, second);
        assert_eq!(state, before);
    }

    #[test]
    fn csv_export_has_table_header() {
        let state = LeagueState::new(teams(&["A", "B"]), vec![played(0, 1, 2, 2, 1)]).unwrap();
        let mut buf = Vec::new();
        write_csv(&compute(&state), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Team,PTS,GP,W,D,L,GD");
        assert_eq!(lines[1], "A,3,1,1,0,0,1");
        assert_eq!(lines[2], "B,0,1,0,0,1,-1");
    }

    #[test]
    fn csv_export_of_empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), "Team,PTS,GP,W,D,L,GD");
    }
}
