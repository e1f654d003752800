use std::mem;

use crate::storage::{KeyValueStore, STORAGE_KEY, StorageError};

use super::{DEFAULT_AGE, Vote, VoteId};

/// Ordered collection of votes with single-slot editing support.
///
/// Input validation never fails loudly: empty titles and unknown titles turn
/// the call into a no-op. Only storage access returns errors.
#[derive(Debug, Clone, Default)]
pub struct Ballot {
    votes: Vec<Vote>,
    /// Index into `votes` of the vote being edited. Kept pointing at the same
    /// vote when the collection is reordered or shrunk.
    edited: Option<usize>,
    before_edited_title: String,
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live collection, in current order.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Mutable access to the live collection. Callers flip `completed` or
    /// edit titles through this.
    pub fn votes_mut(&mut self) -> &mut [Vote] {
        &mut self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Replace the whole collection, typically with the result of [`Ballot::load`].
    /// Any edit in progress is dropped.
    pub fn replace_votes(&mut self, votes: Vec<Vote>) {
        self.votes = votes;
        self.edited = None;
    }

    // ========================
    // Adding
    // ========================

    /// Add a vote with the default age.
    pub fn add_vote(&mut self, title: &str) -> Option<&Vote> {
        self.add_vote_with_age(title, DEFAULT_AGE)
    }

    /// Add a vote with a trimmed title. Returns `None` without touching the
    /// collection when the title is empty or whitespace.
    ///
    /// The id is the collection length plus one, so ids can repeat once
    /// votes have been removed.
    pub fn add_vote_with_age(&mut self, title: &str, age: u32) -> Option<&Vote> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let id = self.votes.len() as VoteId + 1;
        self.votes.push(Vote::new(id, title, age));
        self.votes.last()
    }

    // ========================
    // Queries
    // ========================

    pub fn active_votes(&self) -> Vec<&Vote> {
        self.votes.iter().filter(|v| v.is_active()).collect()
    }

    pub fn completed_votes(&self) -> Vec<&Vote> {
        self.votes.iter().filter(|v| v.completed).collect()
    }

    /// Number of active votes.
    pub fn remaining(&self) -> usize {
        self.votes.iter().filter(|v| v.is_active()).count()
    }

    /// True when no vote is active, including for an empty ballot.
    pub fn all_done(&self) -> bool {
        self.remaining() == 0
    }

    /// Mean age over all votes, or `None` for an empty ballot.
    pub fn average_age(&self) -> Option<f64> {
        if self.votes.is_empty() {
            return None;
        }
        let total: u64 = self.votes.iter().map(|v| u64::from(v.age)).sum();
        Some(total as f64 / self.votes.len() as f64)
    }

    /// Index of the first vote whose title matches exactly.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.votes.iter().position(|v| v.title == title)
    }

    /// First vote whose title matches exactly.
    pub fn find_vote(&self, title: &str) -> Option<&Vote> {
        self.votes.iter().find(|v| v.title == title)
    }

    // ========================
    // Bulk updates
    // ========================

    pub fn set_all_done(&mut self) {
        for vote in &mut self.votes {
            vote.completed = true;
        }
    }

    /// Remove the first vote with this exact title.
    pub fn remove_vote(&mut self, title: &str) -> Option<Vote> {
        let index = self.position(title)?;
        self.edited = match self.edited {
            Some(e) if e == index => None,
            Some(e) if e > index => Some(e - 1),
            other => other,
        };
        Some(self.votes.remove(index))
    }

    /// Drop every completed vote, keeping the active ones in order.
    pub fn remove_completed(&mut self) {
        self.edited = self.edited.and_then(|e| {
            let vote = self.votes.get(e)?;
            let shift = self.votes[..e].iter().filter(|v| v.completed).count();
            vote.is_active().then_some(e - shift)
        });
        self.votes.retain(Vote::is_active);
    }

    /// Stable sort by title, ordinal and case-sensitive.
    pub fn sort_votes(&mut self) {
        // Votes carry their pre-sort index so the edited slot can be relocated.
        let mut tagged: Vec<(usize, Vote)> =
            mem::take(&mut self.votes).into_iter().enumerate().collect();
        tagged.sort_by(|(_, a), (_, b)| a.title.cmp(&b.title));

        self.edited = self
            .edited
            .and_then(|e| tagged.iter().position(|(i, _)| *i == e));
        self.votes = tagged.into_iter().map(|(_, vote)| vote).collect();
    }

    // ========================
    // Editing
    // ========================

    /// Remember the title of the vote at `index` and mark it as edited.
    /// Replaces any edit already in progress.
    pub fn start_editing(&mut self, index: usize) {
        let Some(vote) = self.votes.get(index) else {
            return;
        };
        self.before_edited_title = vote.title.clone();
        self.edited = Some(index);
    }

    /// Commit the edit of the vote at `index`. The title is trimmed in place;
    /// a vote left with an empty title is removed.
    pub fn done_editing(&mut self, index: usize) {
        let Some(vote) = self.votes.get_mut(index) else {
            return;
        };
        vote.title = vote.title.trim().to_string();
        let emptied = vote.title.is_empty();

        self.edited = None;
        if emptied {
            self.remove_vote("");
        }
    }

    /// Discard the edit of the vote at `index`, restoring the title captured
    /// by the last [`Ballot::start_editing`].
    ///
    /// The restored title is whatever was captured last, even when no edit is
    /// in progress: on a ballot that has never started an edit this writes an
    /// empty title. An out-of-range index only clears the edited slot.
    pub fn cancel_edit(&mut self, index: usize) {
        self.edited = None;
        if let Some(vote) = self.votes.get_mut(index) {
            vote.title = self.before_edited_title.clone();
        }
    }

    pub fn edited_index(&self) -> Option<usize> {
        self.edited
    }

    pub fn edited_vote(&self) -> Option<&Vote> {
        self.edited.and_then(|e| self.votes.get(e))
    }

    pub fn edited_vote_mut(&mut self) -> Option<&mut Vote> {
        self.edited.and_then(|e| self.votes.get_mut(e))
    }

    pub fn before_edited_title(&self) -> &str {
        &self.before_edited_title
    }

    // ========================
    // Persistence
    // ========================

    /// Read the persisted collection.
    ///
    /// The result is returned, not assigned: pass it to
    /// [`Ballot::replace_votes`] to make it the live collection.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<Vec<Vote>, StorageError> {
        match store.get_item(STORAGE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Write the whole collection as a compact JSON array, overwriting the
    /// previous value.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.votes)?;
        store.set_item(STORAGE_KEY, &json)
    }
}
