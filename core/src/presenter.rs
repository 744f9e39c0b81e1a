use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Face shown on the restart button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Normal,
    Won,
    Lost,
}

impl Face {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "😄",
            Self::Won => "😎",
            Self::Lost => "🤯",
        }
    }
}

/// Session-level change the front end should reflect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusUpdate {
    /// A fresh board replaced the old one, every cell is hidden again
    BoardRebuilt { size: Coord2 },
    Lives(u8),
    FlagsRemaining(CellCount),
    Elapsed(u32),
    Hints { remaining: u8, armed: bool },
    SafeClicks(u8),
    Face(Face),
    /// A mine went off, shielded or not
    MineHit,
}

/// Presentation collaborator notified whenever something visible changes.
pub trait Presenter {
    fn render_cell(&mut self, coords: Coord2, glyph: Glyph);

    /// Turns the transient safe-click highlight of a cell on or off.
    fn set_highlight(&mut self, coords: Coord2, on: bool) {
        let _ = (coords, on);
    }

    fn status(&mut self, update: StatusUpdate);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn render_cell(&mut self, coords: Coord2, glyph: Glyph) {
        (**self).render_cell(coords, glyph)
    }

    fn set_highlight(&mut self, coords: Coord2, on: bool) {
        (**self).set_highlight(coords, on)
    }

    fn status(&mut self, update: StatusUpdate) {
        (**self).status(update)
    }
}

/// Discards every notification.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_cell(&mut self, _coords: Coord2, _glyph: Glyph) {}

    fn status(&mut self, _update: StatusUpdate) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Render(Coord2, Glyph),
    Highlight(Coord2, bool),
    Status(StatusUpdate),
}

/// Queues notifications so a front end can apply them in one batch per frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingPresenter {
    events: Vec<Notification>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Notification] {
        &self.events
    }

    /// Hands over everything recorded so far.
    pub fn take(&mut self) -> Vec<Notification> {
        core::mem::take(&mut self.events)
    }

    /// Glyphs rendered on `coords`, oldest first.
    pub fn renders_of(&self, coords: Coord2) -> Vec<Glyph> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                Notification::Render(pos, glyph) if pos == coords => Some(glyph),
                _ => None,
            })
            .collect()
    }

    pub fn last_glyph(&self, coords: Coord2) -> Option<Glyph> {
        self.renders_of(coords).last().copied()
    }

    pub fn statuses(&self) -> impl Iterator<Item = StatusUpdate> + '_ {
        self.events.iter().filter_map(|event| match *event {
            Notification::Status(update) => Some(update),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn render_cell(&mut self, coords: Coord2, glyph: Glyph) {
        self.events.push(Notification::Render(coords, glyph));
    }

    fn set_highlight(&mut self, coords: Coord2, on: bool) {
        self.events.push(Notification::Highlight(coords, on));
    }

    fn status(&mut self, update: StatusUpdate) {
        self.events.push(Notification::Status(update));
    }
}
