// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use ballot::application::BallotService;
use ballot::domain::{Ballot, Vote};
use ballot::storage::FileStore;
use tempfile::TempDir;

/// Helper to create a test service over a store file in a temporary directory
pub fn test_service() -> Result<(BallotService<FileStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = FileStore::new(temp_dir.path().join("ballot.json"));
    let service = BallotService::open(store)?;
    Ok((service, temp_dir))
}

/// Helper to reopen a service on the same store file
pub fn reopen(temp_dir: &TempDir) -> Result<BallotService<FileStore>> {
    let store = FileStore::new(temp_dir.path().join("ballot.json"));
    Ok(BallotService::open(store)?)
}

/// Build a ballot with one default-age vote per title
pub fn ballot_with(titles: &[&str]) -> Ballot {
    let mut ballot = Ballot::new();
    for title in titles {
        ballot.add_vote(title);
    }
    ballot
}

pub fn titles<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Vec<String> {
    votes.into_iter().map(|v| v.title.clone()).collect()
}
