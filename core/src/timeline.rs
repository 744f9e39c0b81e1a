use alloc::vec::Vec;
use core::time::Duration;
use smallvec::SmallVec;

use crate::*;

/// Delayed display change scheduled by the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Hide a mine flashed by the shield and resume play
    ShieldRevert { coords: Coord2 },
    /// Remove a safe-click highlight
    HighlightEnd { coords: Coord2 },
    /// Return cells flashed by a hint to what the player knows
    HintRevert { cells: SmallVec<[Coord2; 9]> },
}

/// Something that came due while time advanced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { generation: u32 },
    Effect { generation: u32, effect: Effect },
}

impl TimerEvent {
    /// The session generation this event was scheduled for.
    pub fn generation(&self) -> u32 {
        match self {
            Self::Tick { generation } | Self::Effect { generation, .. } => *generation,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Ticker {
    period: Duration,
    next_due: Duration,
    generation: u32,
}

#[derive(Clone, Debug, PartialEq)]
struct Scheduled {
    seq: u64,
    due: Duration,
    generation: u32,
    effect: Effect,
}

/// Logical clock driving the periodic tick and delayed effects.
///
/// There is a single ticker slot, starting a ticker replaces whatever was running. Time only moves when the owner
/// pops events, so nothing fires behind its back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    now: Duration,
    ticker: Option<Ticker>,
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical time elapsed since the timeline was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn start_ticker(&mut self, period: Duration, generation: u32) {
        let period = if period.is_zero() {
            log::warn!("Zero tick period, using one millisecond");
            Duration::from_millis(1)
        } else {
            period
        };
        if self.ticker.is_some() {
            log::debug!("Replacing running ticker");
        }
        self.ticker = Some(Ticker {
            period,
            next_due: self.now.saturating_add(period),
            generation,
        });
    }

    pub fn stop_ticker(&mut self) -> bool {
        self.ticker.take().is_some()
    }

    /// Queues `effect` to come due `delay` from now, clamped to the end of logical time.
    pub fn schedule(&mut self, delay: Duration, generation: u32, effect: Effect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            seq,
            due: self.now.saturating_add(delay),
            generation,
            effect,
        });
    }

    /// Stops the ticker and drops every pending effect.
    pub fn clear(&mut self) {
        self.ticker = None;
        self.pending.clear();
    }

    /// Earliest moment something is due.
    pub fn next_due(&self) -> Option<Duration> {
        let effect_due = self.pending.iter().map(|scheduled| scheduled.due).min();
        let tick_due = self.ticker.as_ref().map(|ticker| ticker.next_due);
        match (effect_due, tick_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Pops the earliest event due at or before `until`, moving the clock to it.
    ///
    /// Effects scheduled for the same instant come out in scheduling order, and before a tick due at that instant.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerEvent> {
        let effect_index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due <= until)
            .min_by_key(|(_, scheduled)| (scheduled.due, scheduled.seq))
            .map(|(index, _)| index);
        let tick_due = self
            .ticker
            .as_ref()
            .map(|ticker| ticker.next_due)
            .filter(|&due| due <= until);

        let take_tick = match (effect_index, tick_due) {
            (None, None) => return None,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(index), Some(tick_due)) => tick_due < self.pending[index].due,
        };

        if take_tick {
            let ticker = self.ticker.as_mut()?;
            let generation = ticker.generation;
            self.now = self.now.max(ticker.next_due);
            match ticker.next_due.checked_add(ticker.period) {
                Some(next_due) => ticker.next_due = next_due,
                None => {
                    log::warn!("Ticker ran past the end of logical time, stopping it");
                    self.ticker = None;
                }
            }
            Some(TimerEvent::Tick { generation })
        } else {
            let scheduled = self.pending.remove(effect_index?);
            self.now = self.now.max(scheduled.due);
            Some(TimerEvent::Effect {
                generation: scheduled.generation,
                effect: scheduled.effect,
            })
        }
    }

    /// Moves the clock forward to `until` once every due event has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
