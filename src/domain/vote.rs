use serde::{Deserialize, Serialize};

pub type VoteId = u64;

/// Age recorded for a vote when the caller does not supply one.
pub const DEFAULT_AGE: u32 = 18;

/// A single entry on the ballot.
///
/// Field order is the serialized key order: `id, title, age, completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub title: String,
    pub age: u32,
    pub completed: bool,
}

impl Vote {
    pub fn new(id: VoteId, title: impl Into<String>, age: u32) -> Self {
        Self {
            id,
            title: title.into(),
            age,
            completed: false,
        }
    }

    /// Returns true while the vote has not been marked completed.
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
