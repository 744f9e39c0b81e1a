use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

/// Best completion time per difficulty label, in whole seconds.
pub trait ScoreStore {
    fn get(&self, label: &str) -> Option<u32>;

    /// Records `secs` if there is no time yet or it beats the stored one, returns whether it was stored.
    fn set_if_better(&mut self, label: &str, secs: u32) -> bool;
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn get(&self, label: &str) -> Option<u32> {
        (**self).get(label)
    }

    fn set_if_better(&mut self, label: &str, secs: u32) -> bool {
        (**self).set_if_better(label, secs)
    }
}

/// In-memory record table, serialized as a flat JSON object of label to seconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestTimes {
    records: BTreeMap<String, u32>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|err| GameError::InvalidScores(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| GameError::InvalidScores(err.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.records.iter().map(|(label, &secs)| (label.as_str(), secs))
    }
}

impl ScoreStore for BestTimes {
    fn get(&self, label: &str) -> Option<u32> {
        self.records.get(label).copied()
    }

    fn set_if_better(&mut self, label: &str, secs: u32) -> bool {
        match self.records.get(label) {
            Some(&best) if best <= secs => false,
            _ => {
                log::debug!("New best time for {}: {}s", label, secs);
                self.records.insert(label.to_string(), secs);
                true
            }
        }
    }
}
