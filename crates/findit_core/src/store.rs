//! Record store collaborator
//!
//! Persistence belongs to the host; the Core only needs get-all/replace-all
//! semantics plus the upsert rule: one record per case-insensitive name,
//! identity assigned once and kept across re-logs.

use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Item, ParsedLogCommand};

/// Host-owned ordered record collection
pub trait ItemStore: Send {
    fn load_all(&self) -> Result<Vec<Item>, StoreError>;
    fn save_all(&mut self, items: &[Item]) -> Result<(), StoreError>;
}

/// Outcome of committing a confirmed log command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub item: Item,
    /// True when an existing record was rewritten rather than appended
    pub updated: bool,
}

/// Apply a confirmed log command to the store.
///
/// Re-logging a known name (case-insensitive) rewrites location and
/// timestamp on the existing record, keeping its id and position; a new name
/// is prepended as a fresh record.
pub fn commit_log(
    store: &mut dyn ItemStore,
    parsed: &ParsedLogCommand,
    now_ms: i64,
) -> Result<Saved, StoreError> {
    let mut items = store.load_all()?;
    let existing = items
        .iter()
        .position(|item| item.name.eq_ignore_ascii_case(&parsed.name));

    let saved = match existing {
        Some(index) => {
            let item = Item {
                id: items[index].id.clone(),
                name: parsed.name.clone(),
                location: parsed.location.clone(),
                timestamp: now_ms,
            };
            items[index] = item.clone();
            debug!("Updated record {} in place", item.id);
            Saved {
                item,
                updated: true,
            }
        }
        None => {
            let item = Item {
                id: Uuid::new_v4().to_string(),
                name: parsed.name.clone(),
                location: parsed.location.clone(),
                timestamp: now_ms,
            };
            items.insert(0, item.clone());
            debug!("Created record {}", item.id);
            Saved {
                item,
                updated: false,
            }
        }
    };

    store.save_all(&items)?;
    Ok(saved)
}

/// Remove a record by case-insensitive name. Returns the removed record.
pub fn remove_by_name(store: &mut dyn ItemStore, name: &str) -> Result<Option<Item>, StoreError> {
    let mut items = store.load_all()?;
    let index = items
        .iter()
        .position(|item| item.name.eq_ignore_ascii_case(name));
    let removed = index.map(|i| items.remove(i));
    if removed.is_some() {
        store.save_all(&items)?;
    }
    Ok(removed)
}

/// Rewrite the location of an existing record directly, refreshing its
/// timestamp. Returns the updated record, or `None` for an unknown name.
pub fn relabel(
    store: &mut dyn ItemStore,
    name: &str,
    new_location: &str,
    now_ms: i64,
) -> Result<Option<Item>, StoreError> {
    let mut items = store.load_all()?;
    let Some(index) = items
        .iter()
        .position(|item| item.name.eq_ignore_ascii_case(name))
    else {
        return Ok(None);
    };

    items[index].location = new_location.to_string();
    items[index].timestamp = now_ms;
    let item = items[index].clone();
    store.save_all(&items)?;
    Ok(Some(item))
}

/// In-memory store for tests and transient sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<Item>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl ItemStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.clone())
    }

    fn save_all(&mut self, items: &[Item]) -> Result<(), StoreError> {
        self.items = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str, location: &str) -> ParsedLogCommand {
        ParsedLogCommand {
            name: name.to_string(),
            location: location.to_string(),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_new_record_prepended() {
        let mut store = MemoryStore::new();
        commit_log(&mut store, &parsed("keys", "drawer"), 1000).unwrap();
        let saved = commit_log(&mut store, &parsed("wallet", "desk"), 2000).unwrap();

        assert!(!saved.updated);
        let items = store.load_all().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "wallet");
        assert_eq!(items[1].name, "keys");
    }

    #[test]
    fn test_relog_same_name_updates_in_place() {
        let mut store = MemoryStore::new();
        let first = commit_log(&mut store, &parsed("keys", "drawer"), 1000).unwrap();
        let second = commit_log(&mut store, &parsed("Keys", "coat pocket"), 2000).unwrap();

        assert!(second.updated);
        assert_eq!(second.item.id, first.item.id);

        let items = store.load_all().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location, "coat pocket");
        assert_eq!(items[0].timestamp, 2000);
    }

    #[test]
    fn test_remove_by_name_case_insensitive() {
        let mut store = MemoryStore::new();
        commit_log(&mut store, &parsed("keys", "drawer"), 1000).unwrap();

        let removed = remove_by_name(&mut store, "KEYS").unwrap();
        assert!(removed.is_some());
        assert!(store.load_all().unwrap().is_empty());

        let missing = remove_by_name(&mut store, "keys").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_relabel_refreshes_timestamp() {
        let mut store = MemoryStore::new();
        commit_log(&mut store, &parsed("keys", "drawer"), 1000).unwrap();

        let updated = relabel(&mut store, "keys", "hook by the door", 5000)
            .unwrap()
            .unwrap();
        assert_eq!(updated.location, "hook by the door");
        assert_eq!(updated.timestamp, 5000);

        assert!(relabel(&mut store, "ghost", "nowhere", 5000).unwrap().is_none());
    }
}
