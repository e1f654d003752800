mod common;

use anyhow::Result;
use ballot::domain::{Ballot, Vote};
use ballot::storage::{FileStore, KeyValueStore, MemoryStore, STORAGE_KEY, StorageError};
use common::{ballot_with, titles};
use tempfile::TempDir;

#[test]
fn test_save_writes_single_vote() -> Result<()> {
    let mut store = MemoryStore::new();
    store.clear()?;

    let ballot = ballot_with(&["ACT"]);
    ballot.save(&mut store)?;

    assert!(store.get_item(STORAGE_KEY)?.is_some());
    Ok(())
}

#[test]
fn test_save_writes_expected_json() -> Result<()> {
    let mut store = MemoryStore::new();
    let ballot = ballot_with(&["Green"]);
    ballot.save(&mut store)?;

    assert_eq!(
        store.get_item(STORAGE_KEY)?.as_deref(),
        Some(r#"[{"id":1,"title":"Green","age":18,"completed":false}]"#)
    );
    Ok(())
}

#[test]
fn test_save_overwrites_previous_value() -> Result<()> {
    let mut store = MemoryStore::new();
    ballot_with(&["Green", "National"]).save(&mut store)?;
    ballot_with(&["ACT"]).save(&mut store)?;

    assert_eq!(
        store.get_item(STORAGE_KEY)?.as_deref(),
        Some(r#"[{"id":1,"title":"ACT","age":18,"completed":false}]"#)
    );
    Ok(())
}

#[test]
fn test_load_in_fresh_ballot() -> Result<()> {
    let mut store = MemoryStore::new();
    ballot_with(&["ACT"]).save(&mut store)?;

    let fresh = Ballot::new();
    let loaded = fresh.load(&store)?;

    assert_eq!(loaded, vec![Vote::new(1, "ACT", 18)]);
    assert_eq!(
        store.get_item(STORAGE_KEY)?.as_deref(),
        Some(r#"[{"id":1,"title":"ACT","age":18,"completed":false}]"#)
    );
    Ok(())
}

#[test]
fn test_load_does_not_populate_ballot() -> Result<()> {
    let mut store = MemoryStore::new();
    ballot_with(&["National"]).save(&mut store)?;

    let mut fresh = Ballot::new();
    let loaded = fresh.load(&store)?;
    assert!(fresh.is_empty());

    fresh.replace_votes(loaded);
    assert_eq!(titles(fresh.votes()), vec!["National"]);
    Ok(())
}

#[test]
fn test_load_without_entry_is_empty() -> Result<()> {
    let store = MemoryStore::new();
    assert!(Ballot::new().load(&store)?.is_empty());
    Ok(())
}

#[test]
fn test_load_keeps_completion_and_age() -> Result<()> {
    let mut store = MemoryStore::new();
    let mut ballot = Ballot::new();
    ballot.add_vote_with_age("Labour", 33);
    ballot.add_vote_with_age("Green", 39);
    ballot.votes_mut()[1].completed = true;
    ballot.save(&mut store)?;

    let loaded = Ballot::new().load(&store)?;
    assert_eq!(loaded, ballot.votes());
    Ok(())
}

#[test]
fn test_load_corrupt_entry_fails_without_touching_ballot() -> Result<()> {
    let mut store = MemoryStore::new();
    store.set_item(STORAGE_KEY, "{not an array")?;

    let ballot = ballot_with(&["Green"]);
    let result = ballot.load(&store);

    assert!(matches!(result, Err(StorageError::Corrupt(_))));
    assert_eq!(titles(ballot.votes()), vec!["Green"]);
    Ok(())
}

#[test]
fn test_file_store_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("votes.json");

    let mut ballot = ballot_with(&["Green", "National"]);
    ballot.votes_mut()[0].completed = true;
    ballot.save(&mut FileStore::new(&path))?;

    let reopened = FileStore::new(&path);
    let loaded = Ballot::new().load(&reopened)?;
    assert_eq!(loaded, ballot.votes());
    Ok(())
}

#[test]
fn test_file_store_clear() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut store = FileStore::new(temp_dir.path().join("votes.json"));
    ballot_with(&["Green"]).save(&mut store)?;

    store.clear()?;
    assert!(store.get_item(STORAGE_KEY)?.is_none());
    assert!(Ballot::new().load(&store)?.is_empty());
    Ok(())
}
