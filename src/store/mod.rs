//! The employee list and its persisted mirror
//!
//! The in-memory list is the source of truth. Every mutation rewrites the whole
//! serialized list under the storage key before returning.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::db::Database;
use crate::models::{EmployeeDraft, EmployeeRecord};

pub struct Store {
    storage: Database,
    key: String,
    employees: Vec<EmployeeRecord>,
}

impl Store {
    /// Read the persisted list once; an absent key means an empty roster
    pub fn load(storage: Database, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let employees: Vec<EmployeeRecord> = match storage.get_item(&key)? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Malformed roster data under key {}", key))?,
            None => Vec::new(),
        };
        info!(key = %key, count = employees.len(), "loaded roster");

        Ok(Self {
            storage,
            key,
            employees,
        })
    }

    /// Serialize the full list and replace the stored value
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.employees).context("Failed to serialize roster")?;
        self.storage.set_item(&self.key, &json)?;
        debug!(key = %self.key, count = self.employees.len(), "persisted roster");
        Ok(())
    }

    /// Id the next `add` will assign
    pub fn next_id(&self) -> u64 {
        self.employees.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    /// Append a new record with a fresh id and return that id
    ///
    /// Any id carried by the draft is ignored.
    pub fn add(&mut self, draft: EmployeeDraft) -> Result<u64> {
        let id = self.next_id();
        self.employees.push(draft.into_record(id));
        self.persist()?;
        info!(id, "added employee");
        Ok(id)
    }

    /// Replace the record with the same id; returns false when none matched
    pub fn update(&mut self, record: EmployeeRecord) -> Result<bool> {
        let id = record.id;
        let replaced = match self.employees.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        };
        self.persist()?;
        info!(id, replaced, "updated employee");
        Ok(replaced)
    }

    /// Drop the record with this id; returns false when none matched
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let before = self.employees.len();
        self.employees.retain(|e| e.id != id);
        let removed = self.employees.len() != before;
        self.persist()?;
        info!(id, removed, "removed employee");
        Ok(removed)
    }

    /// Forget every record and delete the storage key itself
    ///
    /// A later `load` sees an absent key and starts empty, same as a first run.
    pub fn clear(&mut self) -> Result<usize> {
        let dropped = self.employees.len();
        self.employees.clear();
        self.storage.remove_item(&self.key)?;
        info!(key = %self.key, dropped, "cleared roster");
        Ok(dropped)
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.employees
    }

    pub fn get(&self, id: u64) -> Option<&EmployeeRecord> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying local storage
    pub fn storage(&self) -> &Database {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    const KEY: &str = "employees_data";

    fn seeded(names: &[&str]) -> Store {
        let mut store = Store::load(Database::open_in_memory().unwrap(), KEY).unwrap();
        for name in names {
            store.add(EmployeeDraft::named(*name)).unwrap();
        }
        store
    }

    fn persisted(store: &Store) -> Vec<EmployeeRecord> {
        let raw = store.storage().get_item(KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_absent_key_starts_empty() {
        let store = Store::load(Database::open_in_memory().unwrap(), KEY).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_add_assigns_max_plus_one() {
        let mut store = seeded(&["Anna"]);
        store.remove(1).unwrap();
        assert_eq!(store.add(EmployeeDraft::named("Bob")).unwrap(), 1);

        let mut draft = EmployeeDraft::named("Cara");
        draft.id = Some(99);
        assert_eq!(store.add(draft).unwrap(), 2);
        assert_eq!(persisted(&store), store.records());
    }

    #[test]
    fn test_ids_follow_max_not_count() {
        let mut store = seeded(&["Anna", "Bob", "Cara"]);
        store.remove(2).unwrap();
        assert_eq!(store.add(EmployeeDraft::named("Dan")).unwrap(), 4);
    }

    #[test]
    fn test_update_replaces_only_match() {
        let mut store = seeded(&["Anna", "Bob"]);
        let mut bob = store.get(2).unwrap().clone();
        bob.gender = Gender::Male;
        bob.address = "Da Nang".to_string();

        assert!(store.update(bob.clone()).unwrap());
        assert_eq!(store.get(2), Some(&bob));
        assert_eq!(store.get(1).unwrap().name, "Anna");
        assert_eq!(persisted(&store), store.records());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = seeded(&["Anna"]);
        let before = store.records().to_vec();
        let ghost = EmployeeDraft::named("Ghost").into_record(42);

        assert!(!store.update(ghost).unwrap());
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = seeded(&["Anna", "Bob"]);
        assert!(!store.remove(7).unwrap());
        assert_eq!(store.len(), 2);
        assert_eq!(persisted(&store).len(), 2);
    }

    #[test]
    fn test_clear_drops_the_key() {
        let mut store = seeded(&["Anna", "Bob"]);
        store.storage().set_item("other", "kept").unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.is_empty());
        assert_eq!(store.storage().get_item(KEY).unwrap(), None);
        assert_eq!(store.storage().get_item("other").unwrap().as_deref(), Some("kept"));
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_malformed_data_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(KEY, "{not json").unwrap();
        let err = Store::load(db, KEY).err().unwrap();
        assert!(err.to_string().contains("Malformed roster data"));
    }
}
