// Match mutation and undo engine.
//
// Applies goal/foul deltas to a single match in the working league state,
// enforces the three-foul penalty rule, and keeps a per-session stack of
// match snapshots for undo.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matches::{Match, MatchId, Side};
use super::state::LeagueState;

/// Foul count at which a side concedes a penalty goal and its fouls reset.
pub const PENALTY_FOUL_THRESHOLD: u32 = 3;

/// Which counter a delta applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Goal,
    Foul,
}

/// Result of `apply_delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The match id is not in the state (e.g. it was deleted while still on
    /// screen). Nothing changed and no snapshot was recorded.
    NotFound,
    /// The delta was applied. `penalty` names the side that was credited a
    /// penalty goal, if the foul threshold was reached.
    Applied { penalty: Option<Side> },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// Copy of a match's fields taken immediately before it was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSnapshot(Match);

impl MatchSnapshot {
    pub fn of(m: &Match) -> Self {
        MatchSnapshot(*m)
    }

    pub fn match_id(&self) -> MatchId {
        self.0.id
    }

    pub fn as_match(&self) -> &Match {
        &self.0
    }
}

/// Last-in-first-out stack of match snapshots for the current session.
///
/// Unbounded and never persisted; dropping it (or calling `clear`) forgets
/// all history.
#[derive(Debug, Clone, Default)]
pub struct UndoHistory {
    snapshots: Vec<MatchSnapshot>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn push(&mut self, snapshot: MatchSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Restore the most recent snapshot into `state`.
    ///
    /// The snapshot replaces the match with the same id; a match deleted
    /// since the snapshot was taken is re-inserted. Returns the restored
    /// match id, or `None` when there is nothing to undo.
    pub fn undo(&mut self, state: &mut LeagueState) -> Option<MatchId> {
        let snapshot = self.snapshots.pop()?;
        let id = snapshot.match_id();
        debug!("Undo: restoring match {}", id);
        state.put_match(snapshot.0);
        Some(id)
    }
}

/// Apply `delta` to the goal or foul counter of `side` in match `match_id`.
///
/// Counters never go below zero. A positive foul delta that leaves the
/// counter at or above [`PENALTY_FOUL_THRESHOLD`] resets it to zero and
/// awards exactly one goal to the opposing side. Any applied mutation marks
/// the match as played.
pub fn apply_delta(
    state: &mut LeagueState,
    history: &mut UndoHistory,
    match_id: MatchId,
    stat: StatKind,
    delta: i32,
    side: Side,
) -> MutationOutcome {
    let Some(m) = state.match_mut(match_id) else {
        debug!("Ignoring {:?} delta for unknown match {}", stat, match_id);
        return MutationOutcome::NotFound;
    };

    history.push(MatchSnapshot::of(m));

    let mut penalty = None;
    match stat {
        StatKind::Goal => {
            let goals = m.goals_mut(side);
            *goals = add_clamped(*goals, delta);
        }
        StatKind::Foul => {
            let fouls = m.fouls_mut(side);
            *fouls = add_clamped(*fouls, delta);
            if delta > 0 && *fouls >= PENALTY_FOUL_THRESHOLD {
                *fouls = 0;
                let awarded = side.opponent();
                let goals = m.goals_mut(awarded);
                *goals = goals.saturating_add(1);
                penalty = Some(awarded);
            }
        }
    }
    m.done = true;

    debug!(
        "Match {}: {:?} {:+} for side {} -> {}-{} (fouls {}/{})",
        match_id,
        stat,
        delta,
        side.index(),
        m.g1,
        m.g2,
        m.f1,
        m.f2
    );

    MutationOutcome::Applied { penalty }
}

/// Add a signed delta to a counter, flooring at zero.
fn add_clamped(value: u32, delta: i32) -> u32 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
