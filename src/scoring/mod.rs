//! Match scoring hooks.
//!
//! The host game engine calls three hooks on its own schedule:
//! [`MatchScoring::points`] when a side earns points, [`MatchScoring::win`]
//! once the match is decided, and [`MatchScoring::check_fainted`] before each
//! turn. Output goes to the match log as [`BattleLine`]s, which the host
//! drains and forwards like any other feed line.

mod side;
mod store;

pub use side::{Combatant, FORCED_SWITCH_VOLATILE, Side, SideId};
pub use store::{NoopScoreStore, ScoreStore, SqliteScoreStore, open_score_store};

use crate::error::ScoringError;
use std::fmt;
use tracing::{info, warn};

/// Victory point multiplier, indexed by the winner's remaining party size.
pub const SURVIVOR_MULTIPLIERS: [f64; 7] = [1.0, 1.0, 1.1, 1.3, 1.5, 1.7, 2.0];

/// Reason shown for the victory award.
pub const VICTORY_REASON: &str = "victory";

/// Multiplier for a winner with `remaining` party members left.
///
/// Counts past the end of the table use its last entry.
pub fn survivor_multiplier(remaining: usize) -> f64 {
    SURVIVOR_MULTIPLIERS[remaining.min(SURVIVOR_MULTIPLIERS.len() - 1)]
}

/// Round a point total for persistence: halves round up, non-finite is 0.
pub fn round_points(points: f64) -> i64 {
    if points.is_finite() {
        (points + 0.5).floor() as i64
    } else {
        0
    }
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Active,
    Ended,
}

/// Who `win` was called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner<'a> {
    /// A slot token such as `p1`; anything else counts as no winner.
    Token(&'a str),
    /// A side directly.
    Side(SideId),
    /// Nobody: the match is a tie.
    Nobody,
}

impl<'a> From<&'a str> for Winner<'a> {
    fn from(token: &'a str) -> Self {
        Self::Token(token)
    }
}

impl From<SideId> for Winner<'_> {
    fn from(id: SideId) -> Self {
        Self::Side(id)
    }
}

impl<'a> From<Option<SideId>> for Winner<'a> {
    fn from(id: Option<SideId>) -> Self {
        id.map_or(Self::Nobody, Self::Side)
    }
}

/// One line of match output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleLine {
    Message(String),
    /// Blank separator.
    Spacer,
    Win(String),
    Tie,
}

impl BattleLine {
    /// Text for the chat channel; `None` for lines that carry nothing to say.
    pub fn chat_text(&self) -> Option<String> {
        match self {
            Self::Message(text) => Some(text.clone()),
            Self::Spacer => None,
            Self::Win(name) => Some(format!("{name} won the battle!")),
            Self::Tie => Some("The battle ended in a tie.".to_string()),
        }
    }
}

/// Game protocol form, e.g. `|-message|text`.
impl fmt::Display for BattleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(text) => write!(f, "|-message|{text}"),
            Self::Spacer => f.write_str("|"),
            Self::Win(name) => write!(f, "|win|{name}"),
            Self::Tie => f.write_str("|tie"),
        }
    }
}

/// Per-match score state and the three lifecycle hooks.
#[derive(Debug)]
pub struct MatchScoring {
    sides: [Side; 2],
    victory_points: f64,
    state: MatchState,
    winner: Option<String>,
    current_request: String,
    log: Vec<BattleLine>,
}

impl MatchScoring {
    pub fn new(p1: Side, p2: Side, victory_points: f64) -> Self {
        Self {
            sides: [p1, p2],
            victory_points,
            state: MatchState::Active,
            winner: None,
            current_request: String::new(),
            log: Vec::new(),
        }
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut Side {
        &mut self.sides[id.index()]
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == MatchState::Ended
    }

    /// Winner's name once ended; empty for a tie.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Marker for the decision the engine is currently waiting on.
    pub fn current_request(&self) -> &str {
        &self.current_request
    }

    pub fn set_current_request(&mut self, request: &str) {
        self.current_request = request.to_string();
    }

    pub fn log(&self) -> &[BattleLine] {
        &self.log
    }

    pub fn drain_log(&mut self) -> Vec<BattleLine> {
        std::mem::take(&mut self.log)
    }

    /// Award `amount` points to a side.
    pub fn points(&mut self, id: SideId, reason: &str, amount: f64) {
        let side = self.side_mut(id);
        side.points = Some(side.total() + amount);
        let line = format!("{} received {amount} points ({reason}).", side.name);
        self.log.push(BattleLine::Message(line));
    }

    fn resolve_winner(&self, winner: Winner<'_>) -> Option<SideId> {
        match winner {
            Winner::Token(token) => SideId::from_token(token),
            Winner::Side(id) => Some(id),
            Winner::Nobody => None,
        }
    }

    /// End the match.
    ///
    /// Announces the winner (with the survivor-scaled victory award) or a
    /// tie, reports both totals, then commits both rounded totals to `store`,
    /// side one first. The match is ended before the first commit is issued,
    /// so a commit that fails, stalls or is cancelled never reopens it.
    /// Commit failures are logged and otherwise ignored.
    pub async fn win<'w>(
        &mut self,
        winner: impl Into<Winner<'w>>,
        store: &dyn ScoreStore,
    ) -> Result<(), ScoringError> {
        if self.is_ended() {
            return Err(ScoringError::AlreadyEnded);
        }

        let winner = self.resolve_winner(winner.into());
        self.winner = Some(
            winner
                .map(|id| self.side(id).name.clone())
                .unwrap_or_default(),
        );

        self.log.push(BattleLine::Spacer);
        match winner {
            Some(id) => {
                let side = &self.sides[id.index()];
                let award = self.victory_points * survivor_multiplier(side.pokemon_left);
                self.log.push(BattleLine::Win(side.name.clone()));
                self.points(id, VICTORY_REASON, award);
            }
            None => self.log.push(BattleLine::Tie),
        }

        for id in SideId::BOTH {
            let side = self.side(id);
            let total = match side.total() {
                t if t == 0.0 || t.is_nan() => "no".to_string(),
                t => t.to_string(),
            };
            let line = format!("{} finished with {total} points.", side.name);
            self.log.push(BattleLine::Message(line));
        }

        self.state = MatchState::Ended;
        self.current_request.clear();

        let commits = SideId::BOTH.map(|id| {
            let side = self.side(id);
            (id, side.name.clone(), round_points(side.total()))
        });
        for (id, name, rounded) in commits {
            match store.commit_score(&name, rounded).await {
                Ok(()) => info!(side = %id, name = %name, points = rounded, "Committed score"),
                Err(e) => warn!(side = %id, name = %name, points = rounded, error = %e, "Score commit failed"),
            }
        }
        Ok(())
    }

    /// Pre-turn check: flag every active combatant that must be replaced.
    pub fn check_fainted(&mut self) {
        for side in &mut self.sides {
            for combatant in side.active.iter_mut().flatten() {
                if combatant.must_switch() {
                    combatant.switch_flag = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        commits: Mutex<Vec<(String, i64)>>,
    }

    #[async_trait]
    impl ScoreStore for RecordingStore {
        async fn commit_score(&self, name: &str, points: i64) -> Result<(), StoreError> {
            self.commits.lock().push((name.to_string(), points));
            Ok(())
        }
    }

    fn scoring() -> MatchScoring {
        MatchScoring::new(Side::new("Red", 3), Side::new("Blue", 0), 100.0)
    }

    fn messages(m: &MatchScoring) -> Vec<String> {
        m.log().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(survivor_multiplier(0), 1.0);
        assert_eq!(survivor_multiplier(3), 1.3);
        assert_eq!(survivor_multiplier(6), 2.0);
        assert_eq!(survivor_multiplier(40), 2.0);
    }

    #[test]
    fn test_round_points() {
        assert_eq!(round_points(2.5), 3);
        assert_eq!(round_points(2.4), 2);
        assert_eq!(round_points(-2.5), -2);
        assert_eq!(round_points(f64::NAN), 0);
    }

    #[test]
    fn test_points_accumulate() {
        let mut m = scoring();
        m.points(SideId::P1, "reason", 10.0);
        m.points(SideId::P1, "reason2", 5.0);
        assert_eq!(m.side(SideId::P1).total(), 15.0);
        assert_eq!(m.side(SideId::P2).points, None);
        assert_eq!(
            messages(&m),
            vec![
                "|-message|Red received 10 points (reason).",
                "|-message|Red received 5 points (reason2).",
            ]
        );
    }

    #[tokio::test]
    async fn test_win_announces_and_commits() {
        let store = RecordingStore::default();
        let mut m = scoring();
        m.points(SideId::P1, "reason", 10.0);
        m.points(SideId::P1, "reason2", 5.0);
        m.set_current_request("move");

        m.win("p1", &store).await.unwrap();

        assert_eq!(
            messages(&m)[2..],
            [
                "|",
                "|win|Red",
                "|-message|Red received 130 points (victory).",
                "|-message|Red finished with 145 points.",
                "|-message|Blue finished with no points.",
            ]
        );
        assert_eq!(
            *store.commits.lock(),
            vec![("Red".to_string(), 145), ("Blue".to_string(), 0)]
        );
        assert_eq!(m.state(), MatchState::Ended);
        assert_eq!(m.winner(), Some("Red"));
        assert_eq!(m.current_request(), "");
    }

    #[tokio::test]
    async fn test_second_win_is_noop() {
        let store = RecordingStore::default();
        let mut m = scoring();
        m.win(SideId::P2, &store).await.unwrap();
        let logged = m.log().len();

        assert_eq!(m.win("p1", &store).await, Err(ScoringError::AlreadyEnded));
        assert_eq!(m.log().len(), logged);
        assert_eq!(store.commits.lock().len(), 2);
        assert_eq!(m.state(), MatchState::Ended);
        assert_eq!(m.winner(), Some("Blue"));
    }

    /// Records the first commit, then never completes another.
    #[derive(Default)]
    struct StallingStore {
        commits: Mutex<Vec<(String, i64)>>,
    }

    #[async_trait]
    impl ScoreStore for StallingStore {
        async fn commit_score(&self, name: &str, points: i64) -> Result<(), StoreError> {
            let first = {
                let mut commits = self.commits.lock();
                commits.push((name.to_string(), points));
                commits.len() == 1
            };
            if !first {
                std::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stalled_commit_leaves_match_ended() {
        let store = StallingStore::default();
        let mut m = scoring();
        m.set_current_request("move");

        let stalled = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            m.win("p1", &store),
        )
        .await;
        assert!(stalled.is_err());

        assert_eq!(m.state(), MatchState::Ended);
        assert_eq!(m.current_request(), "");
        assert_eq!(m.win("p2", &store).await, Err(ScoringError::AlreadyEnded));

        let wins = messages(&m).iter().filter(|l| l.starts_with("|win|")).count();
        assert_eq!(wins, 1);
        assert_eq!(store.commits.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_nan_total_reads_as_no_points() {
        let store = RecordingStore::default();
        let mut m = scoring();
        m.points(SideId::P2, "glitch", f64::NAN);
        m.win(SideId::P1, &store).await.unwrap();

        let lines = messages(&m);
        assert!(lines.contains(&"|-message|Blue finished with no points.".to_string()));
        assert!(!lines.iter().any(|l| l.contains("NaN points.")));
        assert_eq!(store.commits.lock()[1], ("Blue".to_string(), 0));
    }

    #[tokio::test]
    async fn test_unknown_winner_is_tie() {
        let store = RecordingStore::default();
        let mut m = scoring();
        m.points(SideId::P2, "style", 2.5);
        m.win("nobody", &store).await.unwrap();

        let lines = messages(&m);
        assert!(lines.contains(&"|tie".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("|win|")));
        assert!(lines.contains(&"|-message|Blue finished with 2.5 points.".to_string()));
        assert_eq!(
            *store.commits.lock(),
            vec![("Red".to_string(), 0), ("Blue".to_string(), 3)]
        );
        assert_eq!(m.winner(), Some(""));
    }

    #[tokio::test]
    async fn test_explicit_tie() {
        let mut m = scoring();
        m.win(Winner::Nobody, &NoopScoreStore).await.unwrap();
        assert!(m.log().contains(&BattleLine::Tie));
    }

    #[test]
    fn test_check_fainted() {
        let p1 = Side::new("Red", 2)
            .with_active(Some(Combatant::new("Pikachu").fainted()))
            .with_active(None)
            .with_active(Some(Combatant::new("Onix")));
        let p2 = Side::new("Blue", 2).with_active(Some(
            Combatant::new("Abra").with_volatile(FORCED_SWITCH_VOLATILE),
        ));
        let mut m = MatchScoring::new(p1, p2, 100.0);
        m.check_fainted();

        let flags: Vec<bool> = m
            .side(SideId::P1)
            .active
            .iter()
            .flatten()
            .map(|c| c.switch_flag)
            .collect();
        assert_eq!(flags, vec![true, false]);
        assert!(m.side(SideId::P2).active[0].as_ref().unwrap().switch_flag);
        assert!(m.log().is_empty());
    }

    #[test]
    fn test_chat_text() {
        assert_eq!(BattleLine::Spacer.chat_text(), None);
        assert_eq!(
            BattleLine::Win("Red".into()).chat_text().as_deref(),
            Some("Red won the battle!")
        );
    }
}
