// Integration tests for the roster store, view and persistence
// Covers id assignment, round-trips through SQLite, and the Anna/Bob/Cara walkthrough

use anyhow::Result;
use roster::config::DEFAULT_STORAGE_KEY;
use roster::db::Database;
use roster::models::{EmployeeDraft, EmployeeRecord, Gender, SortKey};
use roster::store::Store;
use roster::view;

fn memory_store() -> Result<Store> {
    Store::load(Database::open_in_memory()?, DEFAULT_STORAGE_KEY)
}

fn persisted(store: &Store) -> Result<Vec<EmployeeRecord>> {
    let raw = store
        .storage()
        .get_item(store.key())?
        .expect("roster should be persisted after a mutation");
    Ok(serde_json::from_str(&raw)?)
}

#[test]
fn test_walkthrough_add_remove_search() -> Result<()> {
    let db = Database::open_in_memory()?;
    db.set_item(
        DEFAULT_STORAGE_KEY,
        r#"[{"id":1,"name":"Anna","dob":"","gender":"","email":"","address":""},
            {"id":2,"name":"Bob","dob":"","gender":"","email":"","address":""}]"#,
    )?;
    let mut store = Store::load(db, DEFAULT_STORAGE_KEY)?;

    // Search on the original list
    let hits = view::visible(store.records(), "an", Some(SortKey::Name));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Anna");

    let id = store.add(EmployeeDraft::named("Cara"))?;
    assert_eq!(id, 3);
    assert_eq!(store.len(), 3);

    assert!(store.remove(1)?);
    let ids: Vec<u64> = store.records().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(persisted(&store)?, store.records());

    Ok(())
}

#[test]
fn test_every_mutation_is_persisted() -> Result<()> {
    let mut store = memory_store()?;

    for name in ["Anna", "Bob", "Cara", "Dan"] {
        let expected = store.next_id();
        assert_eq!(store.add(EmployeeDraft::named(name))?, expected);
        assert_eq!(persisted(&store)?, store.records());
    }

    let mut cara = store.get(3).cloned().expect("Cara exists");
    cara.email = "cara@example.com".to_string();
    store.update(cara)?;
    assert_eq!(persisted(&store)?, store.records());

    store.remove(2)?;
    assert_eq!(persisted(&store)?, store.records());

    Ok(())
}

#[test]
fn test_round_trip_through_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("roster.db");

    let written = {
        let mut store = Store::load(Database::open_at(&path)?, DEFAULT_STORAGE_KEY)?;
        store.add(EmployeeDraft {
            id: None,
            name: "Nguyễn Thị Ánh".to_string(),
            date_of_birth: "1995-12-31".to_string(),
            gender: Gender::Female,
            email: "anh@example.com".to_string(),
            address: "12 Lê Lợi, Huế".to_string(),
        })?;
        store.add(EmployeeDraft::named("Bob"))?;
        store.records().to_vec()
    };

    let reloaded = Store::load(Database::open_at(&path)?, DEFAULT_STORAGE_KEY)?;
    assert_eq!(reloaded.records(), written.as_slice());

    Ok(())
}

#[test]
fn test_update_preserves_other_records() -> Result<()> {
    let mut store = memory_store()?;
    store.add(EmployeeDraft::named("Anna"))?;
    store.add(EmployeeDraft::named("Bob"))?;
    store.add(EmployeeDraft::named("Cara"))?;
    let before = store.records().to_vec();

    let mut bob = store.get(2).cloned().expect("Bob exists");
    bob.name = "Robert".to_string();
    assert!(store.update(bob)?);

    for (old, new) in before.iter().zip(store.records()) {
        if old.id == 2 {
            assert_eq!(new.name, "Robert");
        } else {
            assert_eq!(old, new);
        }
    }

    Ok(())
}

#[test]
fn test_separate_keys_do_not_collide() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("roster.db");

    let mut staff = Store::load(Database::open_at(&path)?, "staff")?;
    staff.add(EmployeeDraft::named("Anna"))?;

    let other = Store::load(Database::open_at(&path)?, DEFAULT_STORAGE_KEY)?;
    assert!(other.is_empty());

    Ok(())
}

#[test]
fn test_filter_then_sort_by_name() -> Result<()> {
    let mut store = memory_store()?;
    for name in ["joanna", "Bob", "Anna", "Hannah", "Ánh"] {
        store.add(EmployeeDraft::named(name))?;
    }

    // Matching folds case but not accents, so "Ánh" is not an "an" hit
    let rows = view::visible(store.records(), "AN", Some(SortKey::Name));
    let names: Vec<&str> = rows.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Hannah", "joanna"]);

    let rows = view::visible(store.records(), "", Some(SortKey::Name));
    let names: Vec<&str> = rows.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Ánh", "Anna", "Bob", "Hannah", "joanna"]);

    assert!(view::visible(store.records(), "xyz", Some(SortKey::Name)).is_empty());

    Ok(())
}
