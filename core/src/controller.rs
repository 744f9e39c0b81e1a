use alloc::boxed::Box;
use core::time::Duration;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;

use crate::*;

/// Owns one game at a time and routes front-end events through it.
///
/// Input handlers mutate the board and session, then report what changed to the [`Presenter`]. Time is logical, the
/// host drives it with [`GameController::advance`].
pub struct GameController<P, S = BestTimes> {
    rules: Rules,
    difficulty: Difficulty,
    board: Board,
    session: GameSession,
    timeline: Timeline,
    placer: Box<dyn MinePlacer>,
    rng: SmallRng,
    presenter: P,
    scores: S,
}

impl<P: Presenter, S: ScoreStore> GameController<P, S> {
    /// Starts a game seeded from the operating system.
    pub fn new(rules: Rules, difficulty: Difficulty, presenter: P, scores: S) -> Result<Self> {
        let mut rng = SmallRng::from_os_rng();
        let placer = ShufflePlacer::new(SmallRng::from_rng(&mut rng));
        Self::build(rules, difficulty, presenter, scores, rng, Box::new(placer))
    }

    /// Starts a game whose mine layouts and safe-click picks are reproducible.
    pub fn with_seed(
        rules: Rules,
        difficulty: Difficulty,
        presenter: P,
        scores: S,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let placer = ShufflePlacer::new(SmallRng::from_rng(&mut rng));
        Self::build(rules, difficulty, presenter, scores, rng, Box::new(placer))
    }

    fn build(
        rules: Rules,
        difficulty: Difficulty,
        presenter: P,
        scores: S,
        rng: SmallRng,
        placer: Box<dyn MinePlacer>,
    ) -> Result<Self> {
        difficulty.validate()?;
        let board = Board::new(difficulty.size)?;
        let session = GameSession::new(&rules, &difficulty, 0);
        let mut controller = Self {
            rules,
            difficulty,
            board,
            session,
            timeline: Timeline::new(),
            placer,
            rng,
            presenter,
            scores,
        };
        controller.start_session()?;
        Ok(controller)
    }

    /// Replaces the mine placement strategy, takes effect on the next first click.
    pub fn set_placer(&mut self, placer: impl MinePlacer + 'static) {
        self.placer = Box::new(placer);
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    /// Best time recorded for the current difficulty label.
    pub fn best_time(&self) -> Option<u32> {
        self.scores.get(&self.difficulty.label)
    }

    pub fn is_timer_running(&self) -> bool {
        self.timeline.is_ticking()
    }

    pub fn pending_effects(&self) -> usize {
        self.timeline.pending_len()
    }

    /// Left click: reveal a cell, or peek around it when a hint is armed.
    pub fn on_cell_primary_action(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if !self.session.is_active() || !self.board[coords].state().is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.session.hint_armed() {
            return self.peek_hint(coords);
        }

        if !self.session.first_click_done() {
            self.start_play(coords)?;
        }

        if self.board[coords].is_mine() {
            return Ok(self.hit_mine(coords));
        }

        let opened = self.board.open_cell(coords)?;
        for &pos in &opened {
            self.presenter.render_cell(pos, self.board[pos].visible_glyph());
        }

        if self.session.record_revealed(opened.len()) {
            self.finish(true);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Right click: toggle a flag on a hidden cell.
    pub fn on_cell_secondary_action(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if !self.session.is_active() {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = match self.board[coords].state() {
            CellState::Revealed => MarkOutcome::NoChange,
            CellState::Flagged => {
                self.board.set_marked(coords, false);
                self.session.return_flag();
                self.presenter.render_cell(coords, Glyph::Hidden);
                MarkOutcome::Changed
            }
            CellState::Hidden if self.session.take_flag() => {
                self.board.set_marked(coords, true);
                self.presenter.render_cell(coords, Glyph::Flag);
                MarkOutcome::Changed
            }
            CellState::Hidden => MarkOutcome::NoChange,
        };

        if outcome.has_update() {
            self.presenter
                .status(StatusUpdate::FlagsRemaining(self.session.remaining_flags()));
        }
        Ok(outcome)
    }

    /// Highlights a random hidden safe cell for a moment, spending a safe-click charge.
    pub fn on_safe_click_requested(&mut self) -> Option<Coord2> {
        // mines are laid on the first click, a cell highlighted before that could still get one
        if !self.session.is_active()
            || !self.session.first_click_done()
            || self.session.safe_clicks() == 0
        {
            return None;
        }

        // the charge is only spent once there is a cell to show
        let Some(&coords) = self.board.hidden_safe_cells().choose(&mut self.rng) else {
            log::debug!("No hidden safe cell left to highlight");
            return None;
        };
        self.session.use_safe_click();

        self.presenter.set_highlight(coords, true);
        self.presenter
            .status(StatusUpdate::SafeClicks(self.session.safe_clicks()));
        self.timeline.schedule(
            self.rules.safe_click_flash(),
            self.session.generation(),
            Effect::HighlightEnd { coords },
        );
        Some(coords)
    }

    /// Arms or disarms hint mode.
    pub fn on_hint_requested(&mut self) -> HintOutcome {
        match self.session.toggle_hint() {
            None => HintOutcome::Blocked,
            Some(armed) => {
                self.report_hints();
                if armed {
                    HintOutcome::Armed
                } else {
                    HintOutcome::Disarmed
                }
            }
        }
    }

    pub fn on_restart_requested(&mut self) -> Result<()> {
        self.start_session()
    }

    /// Switches to a new board size and mine count, rejected before anything is rebuilt when invalid.
    pub fn on_difficulty_changed(
        &mut self,
        size: Coord,
        mines: CellCount,
        label: &str,
    ) -> Result<()> {
        let difficulty = Difficulty::new(label, size, mines)?;
        log::debug!("Difficulty changed to {:?}", difficulty);
        self.difficulty = difficulty;
        self.start_session()
    }

    /// Moves logical time forward, running ticks and delayed effects that came due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timeline.now().saturating_add(elapsed);
        while let Some(event) = self.timeline.pop_due(until) {
            self.dispatch(event);
        }
        self.timeline.settle(until);
    }

    fn start_session(&mut self) -> Result<()> {
        self.timeline.clear();
        let generation = self.session.generation().wrapping_add(1);
        self.board = Board::new(self.difficulty.size)?;
        self.session = GameSession::new(&self.rules, &self.difficulty, generation);
        log::debug!(
            "Game {} started: {} ({}x{}, {} mines)",
            generation,
            self.difficulty.label,
            self.difficulty.size,
            self.difficulty.size,
            self.difficulty.mines
        );

        self.presenter.status(StatusUpdate::BoardRebuilt {
            size: self.board.size(),
        });
        self.presenter.status(StatusUpdate::Lives(self.session.lives()));
        self.presenter
            .status(StatusUpdate::FlagsRemaining(self.session.remaining_flags()));
        self.presenter.status(StatusUpdate::Elapsed(0));
        self.report_hints();
        self.presenter
            .status(StatusUpdate::SafeClicks(self.session.safe_clicks()));
        self.presenter.status(StatusUpdate::Face(Face::Normal));
        Ok(())
    }

    /// Lays the mines around the first clicked cell and starts the clock.
    fn start_play(&mut self, first: Coord2) -> Result<()> {
        self.placer
            .place(&mut self.board, self.difficulty.mines, first)?;
        self.board.compute_adjacency_counts();
        self.session.mark_started();
        self.timeline
            .start_ticker(self.rules.tick_period(), self.session.generation());
        log::debug!("First click at {:?}", first);
        Ok(())
    }

    fn hit_mine(&mut self, coords: Coord2) -> RevealOutcome {
        self.presenter.status(StatusUpdate::MineHit);

        if self.session.raise_shield() {
            log::debug!(
                "Shield absorbed mine at {:?}, {} lives left",
                coords,
                self.session.lives()
            );
            self.presenter.status(StatusUpdate::Lives(self.session.lives()));
            self.presenter.render_cell(coords, Glyph::Mine);
            self.timeline.schedule(
                self.rules.shield_flash(),
                self.session.generation(),
                Effect::ShieldRevert { coords },
            );
            RevealOutcome::Shielded
        } else {
            log::debug!("Mine at {:?} ended the game", coords);
            self.finish(false);
            RevealOutcome::HitMine
        }
    }

    fn peek_hint(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let area = self.board.peek_area(coords)?;
        self.session.consume_hint();
        log::debug!("Hint peek at {:?} over {} cells", coords, area.len());

        for &(pos, glyph) in &area {
            self.presenter.render_cell(pos, glyph);
        }
        self.report_hints();
        self.timeline.schedule(
            self.rules.hint_flash(),
            self.session.generation(),
            Effect::HintRevert {
                cells: area.iter().map(|&(pos, _)| pos).collect(),
            },
        );
        Ok(RevealOutcome::Peeked)
    }

    fn finish(&mut self, won: bool) {
        self.session.end(won);
        self.timeline.stop_ticker();

        if won {
            let secs = self.session.elapsed_secs();
            log::debug!("Won {} in {}s", self.difficulty.label, secs);
            if self.scores.set_if_better(&self.difficulty.label, secs) {
                log::debug!("New best time for {}", self.difficulty.label);
            }
            self.presenter.status(StatusUpdate::Face(Face::Won));
        } else {
            for coords in self.board.reveal_all_mines() {
                self.presenter.render_cell(coords, Glyph::Mine);
            }
            self.presenter.status(StatusUpdate::Face(Face::Lost));
        }
    }

    fn report_hints(&mut self) {
        self.presenter.status(StatusUpdate::Hints {
            remaining: self.session.hints(),
            armed: self.session.hint_armed(),
        });
    }

    fn dispatch(&mut self, event: TimerEvent) {
        if event.generation() != self.session.generation() {
            log::trace!("Dropping stale timer event {:?}", event);
            return;
        }

        match event {
            TimerEvent::Tick { .. } => {
                if self.session.tick() {
                    self.presenter
                        .status(StatusUpdate::Elapsed(self.session.elapsed_secs()));
                }
            }
            TimerEvent::Effect { effect, .. } => self.apply_effect(effect),
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ShieldRevert { coords } => {
                let Ok(cell) = self.board.cell_at(coords) else {
                    log::warn!("Shield revert for missing cell {:?}", coords);
                    return;
                };
                if !self.session.lower_shield() {
                    return;
                }
                self.presenter.render_cell(coords, cell.visible_glyph());

                if self.rules.flag_shielded_mine
                    && cell.state().is_hidden()
                    && self.session.take_flag()
                {
                    self.board.set_marked(coords, true);
                    self.presenter.render_cell(coords, Glyph::Flag);
                    self.presenter
                        .status(StatusUpdate::FlagsRemaining(self.session.remaining_flags()));
                }
            }
            Effect::HighlightEnd { coords } => {
                self.presenter.set_highlight(coords, false);
            }
            Effect::HintRevert { cells } => {
                for coords in cells {
                    match self.board.cell_at(coords) {
                        Ok(cell) if !cell.is_revealed() => {
                            self.presenter.render_cell(coords, cell.visible_glyph());
                        }
                        Ok(_) => {}
                        Err(_) => log::warn!("Hint revert for missing cell {:?}", coords),
                    }
                }
            }
        }
    }
}
