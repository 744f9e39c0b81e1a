#![no_std]

extern crate alloc;

pub use board::*;
pub use cell::*;
pub use clock::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use presenter::*;
pub use reveal::*;
pub use rules::*;
pub use scores::*;
pub use session::*;
pub use timeline::*;
pub use types::*;

mod board;
mod cell;
mod clock;
mod controller;
mod error;
mod generator;
mod presenter;
mod reveal;
mod rules;
mod scores;
mod session;
mod timeline;
mod types;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    /// An armed hint flashed the neighborhood instead of revealing
    Peeked,
    /// A mine was hit and a life absorbed it
    Shielded,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Peeked => true,
            Shielded => true,
            HitMine => true,
            Won => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HintOutcome {
    Armed,
    Disarmed,
    /// Not started yet, not accepting input or out of charges
    Blocked,
}
