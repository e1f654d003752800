use tracing::{debug, info, warn};

use crate::domain::{Ballot, Vote};
use crate::storage::KeyValueStore;

use super::AppError;

/// Which votes to include in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// Aggregate figures over the whole ballot.
#[derive(Debug, Clone, PartialEq)]
pub struct BallotSummary {
    pub total: usize,
    pub remaining: usize,
    pub completed: usize,
    pub all_done: bool,
    pub average_age: Option<f64>,
}

/// Application service pairing a ballot with its store.
/// This is the primary interface for any client (CLI, tests, etc.).
///
/// Unlike [`Ballot`], the service reports rejected input and missing votes
/// as errors, and writes the collection back after every change.
pub struct BallotService<S: KeyValueStore> {
    ballot: Ballot,
    store: S,
}

impl<S: KeyValueStore> BallotService<S> {
    /// Open a service over `store`, making the persisted votes the live
    /// collection.
    pub fn open(store: S) -> Result<Self, AppError> {
        let mut ballot = Ballot::new();
        let votes = ballot.load(&store)?;
        debug!(count = votes.len(), "loaded votes from store");
        ballot.replace_votes(votes);
        Ok(Self { ballot, store })
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (Ballot, S) {
        (self.ballot, self.store)
    }

    /// Apply `change` to the ballot and save the result. If the change or
    /// the save fails, the ballot is restored to its previous state.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Ballot) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let before = self.ballot.clone();
        let result = change(&mut self.ballot).and_then(|value| {
            self.ballot.save(&mut self.store)?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                debug!(count = self.ballot.len(), "saved votes to store");
                Ok(value)
            }
            Err(e) => {
                self.ballot = before;
                Err(e)
            }
        }
    }

    // ========================
    // Commands
    // ========================

    /// Add a vote, using the default age when `age` is `None`.
    pub fn add_vote(&mut self, title: &str, age: Option<u32>) -> Result<Vote, AppError> {
        let vote = self.commit(|ballot| {
            let added = match age {
                Some(age) => ballot.add_vote_with_age(title, age),
                None => ballot.add_vote(title),
            };
            added.cloned().ok_or(AppError::EmptyTitle)
        });

        match &vote {
            Ok(vote) => info!(id = vote.id, title = %vote.title, age = vote.age, "vote added"),
            Err(AppError::EmptyTitle) => warn!(title, "rejected vote with empty title"),
            Err(_) => {}
        }
        vote
    }

    /// Flip the completion flag of the first vote with this title.
    pub fn toggle_vote(&mut self, title: &str) -> Result<Vote, AppError> {
        let vote = self.commit(|ballot| {
            let index = index_of(ballot, title)?;
            let vote = &mut ballot.votes_mut()[index];
            vote.toggle();
            Ok(vote.clone())
        })?;

        info!(title, completed = vote.completed, "vote toggled");
        Ok(vote)
    }

    pub fn complete_all(&mut self) -> Result<(), AppError> {
        self.commit(|ballot| {
            ballot.set_all_done();
            Ok(())
        })?;

        info!(count = self.ballot.len(), "all votes completed");
        Ok(())
    }

    pub fn remove_vote(&mut self, title: &str) -> Result<Vote, AppError> {
        let vote = self.commit(|ballot| {
            ballot
                .remove_vote(title)
                .ok_or_else(|| AppError::VoteNotFound(title.to_string()))
        })?;

        info!(id = vote.id, title, "vote removed");
        Ok(vote)
    }

    /// Drop completed votes, returning how many were discarded.
    pub fn clear_completed(&mut self) -> Result<usize, AppError> {
        let removed = self.commit(|ballot| {
            let before = ballot.len();
            ballot.remove_completed();
            Ok(before - ballot.len())
        })?;

        info!(removed, "completed votes cleared");
        Ok(removed)
    }

    pub fn sort(&mut self) -> Result<(), AppError> {
        self.commit(|ballot| {
            ballot.sort_votes();
            Ok(())
        })
    }

    /// Retitle a vote through the edit cycle. A blank new title deletes the
    /// vote, in which case `None` is returned.
    pub fn rename_vote(
        &mut self,
        title: &str,
        new_title: &str,
    ) -> Result<Option<Vote>, AppError> {
        let renamed = self.commit(|ballot| {
            let index = index_of(ballot, title)?;

            ballot.start_editing(index);
            if let Some(vote) = ballot.edited_vote_mut() {
                vote.title = new_title.to_string();
            }
            ballot.done_editing(index);

            if new_title.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(ballot.votes()[index].clone()))
            }
        })?;

        match &renamed {
            Some(vote) => info!(from = title, to = %vote.title, "vote renamed"),
            None => info!(title, "vote removed by blank rename"),
        }
        Ok(renamed)
    }

    /// Remove every key from the store and empty the ballot.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.store.clear()?;
        self.ballot.replace_votes(Vec::new());
        info!("store cleared");
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    pub fn find_vote(&self, title: &str) -> Result<&Vote, AppError> {
        self.ballot
            .find_vote(title)
            .ok_or_else(|| AppError::VoteNotFound(title.to_string()))
    }

    pub fn list(&self, filter: VoteFilter) -> Vec<&Vote> {
        match filter {
            VoteFilter::All => self.ballot.votes().iter().collect(),
            VoteFilter::Active => self.ballot.active_votes(),
            VoteFilter::Completed => self.ballot.completed_votes(),
        }
    }

    pub fn summary(&self) -> BallotSummary {
        let remaining = self.ballot.remaining();
        BallotSummary {
            total: self.ballot.len(),
            remaining,
            completed: self.ballot.len() - remaining,
            all_done: self.ballot.all_done(),
            average_age: self.ballot.average_age(),
        }
    }
}

fn index_of(ballot: &Ballot, title: &str) -> Result<usize, AppError> {
    ballot
        .position(title)
        .ok_or_else(|| AppError::VoteNotFound(title.to_string()))
}
