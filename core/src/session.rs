use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Active
/// - Active -> Shielded
/// - Shielded -> Active
/// - Ready | Active -> Won
/// - Active -> Lost
///
/// Any state goes back to Ready on restart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Board built, mines deferred to the first reveal
    Ready,
    Active,
    /// Paused while a mine hit absorbed by a life is on display
    Shielded,
    Won,
    Lost,
}

impl SessionState {
    /// Whether player input is accepted
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Ready | Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Counters and budgets of the game in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    state: SessionState,
    generation: u32,
    revealed_safe_count: CellCount,
    flagged_count: CellCount,
    elapsed_secs: u32,
    first_click_done: bool,
    lives: u8,
    hints: u8,
    safe_clicks: u8,
    hint_armed: bool,
    remaining_flags: CellCount,
    win_threshold: CellCount,
}

impl GameSession {
    pub fn new(rules: &Rules, difficulty: &Difficulty, generation: u32) -> Self {
        Self {
            state: SessionState::Ready,
            generation,
            revealed_safe_count: 0,
            flagged_count: 0,
            elapsed_secs: 0,
            first_click_done: false,
            lives: rules.lives,
            hints: rules.hints,
            safe_clicks: rules.safe_clicks,
            hint_armed: false,
            remaining_flags: difficulty.mines,
            win_threshold: difficulty.win_threshold(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.accepts_input()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Identifies this session among all the ones the controller has started.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn first_click_done(&self) -> bool {
        self.first_click_done
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn hints(&self) -> u8 {
        self.hints
    }

    pub fn safe_clicks(&self) -> u8 {
        self.safe_clicks
    }

    pub fn hint_armed(&self) -> bool {
        self.hint_armed
    }

    pub fn remaining_flags(&self) -> CellCount {
        self.remaining_flags
    }

    pub fn win_threshold(&self) -> CellCount {
        self.win_threshold
    }

    pub(crate) fn mark_started(&mut self) {
        self.first_click_done = true;
        if matches!(self.state, SessionState::Ready) {
            self.state = SessionState::Active;
        }
    }

    /// Adds newly revealed safe cells, returns whether the win threshold was reached.
    pub(crate) fn record_revealed(&mut self, count: usize) -> bool {
        // bounded by the board size, which fits a CellCount
        self.revealed_safe_count = self.revealed_safe_count.saturating_add(count as CellCount);
        self.revealed_safe_count == self.win_threshold
    }

    /// Advances the clock by one second, only while active.
    pub(crate) fn tick(&mut self) -> bool {
        if matches!(self.state, SessionState::Active) {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Takes a flag from the budget, `false` when none are left.
    pub(crate) fn take_flag(&mut self) -> bool {
        if self.remaining_flags == 0 {
            return false;
        }
        self.remaining_flags -= 1;
        self.flagged_count += 1;
        true
    }

    pub(crate) fn return_flag(&mut self) {
        self.remaining_flags += 1;
        self.flagged_count = self.flagged_count.saturating_sub(1);
    }

    /// Spends a life to absorb a mine hit, `false` when none are left.
    pub(crate) fn raise_shield(&mut self) -> bool {
        if self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        self.state = SessionState::Shielded;
        true
    }

    pub(crate) fn lower_shield(&mut self) -> bool {
        if matches!(self.state, SessionState::Shielded) {
            self.state = SessionState::Active;
            true
        } else {
            false
        }
    }

    pub(crate) fn end(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }
        self.state = if won {
            SessionState::Won
        } else {
            SessionState::Lost
        };
        self.hint_armed = false;
    }

    pub(crate) fn use_safe_click(&mut self) -> bool {
        if self.safe_clicks == 0 {
            return false;
        }
        self.safe_clicks -= 1;
        true
    }

    /// Toggles hint mode, returns the new armed state or `None` when blocked.
    pub(crate) fn toggle_hint(&mut self) -> Option<bool> {
        if self.hint_armed {
            self.hint_armed = false;
            return Some(false);
        }
        if !self.first_click_done || !self.is_active() || self.hints == 0 {
            return None;
        }
        self.hint_armed = true;
        Some(true)
    }

    /// Spends the armed hint, returns whether one was armed.
    pub(crate) fn consume_hint(&mut self) -> bool {
        if !self.hint_armed {
            return false;
        }
        self.hint_armed = false;
        self.hints = self.hints.saturating_sub(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(&Rules::default(), &Difficulty::beginner(), 1)
    }

    #[test]
    fn new_session_uses_rules_and_difficulty() {
        let session = session();

        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.is_active());
        assert_eq!(session.lives(), 3);
        assert_eq!(session.hints(), 3);
        assert_eq!(session.safe_clicks(), 3);
        assert_eq!(session.remaining_flags(), 2);
        assert_eq!(session.win_threshold(), 14);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn ticks_only_count_while_active() {
        let mut session = session();
        assert!(!session.tick());

        session.mark_started();
        assert!(session.tick());
        assert!(session.raise_shield());
        assert!(!session.tick());
        assert!(session.lower_shield());
        assert!(session.tick());
        session.end(true);
        assert!(!session.tick());

        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn flag_budget_round_trips() {
        let mut session = session();

        assert!(session.take_flag());
        assert!(session.take_flag());
        assert!(!session.take_flag());
        assert_eq!(session.remaining_flags(), 0);
        assert_eq!(session.flagged_count(), 2);

        session.return_flag();
        assert_eq!(session.remaining_flags(), 1);
        assert_eq!(session.flagged_count(), 1);
    }

    #[test]
    fn shield_runs_out_of_lives() {
        let mut session = session();
        session.mark_started();

        for _ in 0..3 {
            assert!(session.raise_shield());
            assert!(session.lower_shield());
        }

        assert!(!session.raise_shield());
        assert_eq!(session.lives(), 0);
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn hint_needs_first_click_and_charges() {
        let mut session = session();
        assert_eq!(session.toggle_hint(), None);

        session.mark_started();
        assert_eq!(session.toggle_hint(), Some(true));
        assert_eq!(session.toggle_hint(), Some(false));
        assert_eq!(session.hints(), 3);

        for _ in 0..3 {
            assert_eq!(session.toggle_hint(), Some(true));
            assert!(session.consume_hint());
        }
        assert_eq!(session.hints(), 0);
        assert_eq!(session.toggle_hint(), None);
        assert!(!session.consume_hint());
    }

    #[test]
    fn win_is_reported_at_threshold() {
        let mut session = session();
        session.mark_started();

        assert!(!session.record_revealed(13));
        assert!(session.record_revealed(1));
        session.end(true);
        session.end(false);

        assert_eq!(session.state(), SessionState::Won);
    }
}
