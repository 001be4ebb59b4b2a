use std::sync::{Arc, PoisonError, RwLock};

use crate::models::{SanctionsEntry, SearchQuery};

/// In-memory sanctions list with copy-on-write snapshots.
///
/// Screening runs hold an `Arc` snapshot, so a concurrent replace never
/// changes the list under a request that is already matching against it.
/// The list is ephemeral; an upload or a raw replace seeds it per process.
#[derive(Debug, Default)]
pub struct SanctionsStore {
    entries: RwLock<Arc<Vec<SanctionsEntry>>>,
}

impl SanctionsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<SanctionsEntry>) -> Self {
        Self {
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    /// Current list snapshot; unaffected by later replaces
    pub fn snapshot(&self) -> Arc<Vec<SanctionsEntry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a full new list, returning the new entry count
    pub fn replace(&self, entries: Vec<SanctionsEntry>) -> usize {
        let count = entries.len();
        *self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(entries);
        tracing::info!(count = count, "sanctions list replaced");
        count
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filtered search over the current list.
    ///
    /// Field filters and the free-text query are conjunctive. A positive
    /// `perPage` caps the result at the first N hits; zero or negative
    /// returns everything.
    pub fn search(&self, query: &SearchQuery) -> Vec<SanctionsEntry> {
        let snapshot = self.snapshot();
        let mut results: Vec<SanctionsEntry> = snapshot
            .iter()
            .filter(|entry| matches_filters(entry, query))
            .cloned()
            .collect();

        if query.per_page > 0 {
            results.truncate(query.per_page as usize);
        }
        results
    }
}

fn matches_filters(entry: &SanctionsEntry, query: &SearchQuery) -> bool {
    if let Some(id_filter) = filter_value(&query.id_filter) {
        if !entry.id.to_lowercase().contains(&id_filter.to_lowercase()) {
            return false;
        }
    }

    if let Some(name_filter) = filter_value(&query.name_filter) {
        if !entry.name.to_lowercase().contains(&name_filter.to_lowercase()) {
            return false;
        }
    }

    if let Some(type_filter) = filter_value(&query.type_filter) {
        if entry.entry_type.as_str() != type_filter {
            return false;
        }
    }

    if let Some(nationality_filter) = filter_value(&query.nationality_filter) {
        let matches = entry
            .nationality
            .as_ref()
            .is_some_and(|n| n.to_lowercase().contains(&nationality_filter.to_lowercase()));
        if !matches {
            return false;
        }
    }

    if !query.query.is_empty() && !entry.matches_query(&query.query) {
        return false;
    }

    true
}

fn filter_value(filter: &str) -> Option<&str> {
    (!filter.is_empty()).then_some(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    fn create_store() -> SanctionsStore {
        let mut abbasin = SanctionsEntry::new("QDi.001", "Abdul Aziz Abbasin", EntryType::Person);
        abbasin.nationality = Some("Afghan".to_string());
        abbasin.other_info = Some("Taliban commander".to_string());

        let mut agha = SanctionsEntry::new("TAi.002", "Abdul Rahman Agha", EntryType::Person);
        agha.nationality = Some("Afghan".to_string());

        let mut qaida = SanctionsEntry::new("QDe.004", "Al-Qaida", EntryType::Entity);
        qaida.address = vec!["Afghanistan".to_string(), "Pakistan".to_string()];

        SanctionsStore::with_entries(vec![abbasin, agha, qaida])
    }

    #[test]
    fn test_replace_swaps_whole_list() {
        let store = create_store();
        assert_eq!(store.len(), 3);

        let count = store.replace(vec![SanctionsEntry::new(
            "X.1",
            "New Entry",
            EntryType::Person,
        )]);
        assert_eq!(count, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_replace() {
        let store = create_store();
        let before = store.snapshot();

        store.replace(Vec::new());

        assert_eq!(before.len(), 3);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_name_filter_is_case_insensitive_contains() {
        let store = create_store();
        let query = SearchQuery {
            name_filter: "abdul".to_string(),
            ..SearchQuery::default()
        };

        let results = store.search(&query);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|e| e.name.contains("Abdul")));
    }

    #[test]
    fn test_type_filter_is_exact() {
        let store = create_store();
        let query = SearchQuery {
            type_filter: "entity".to_string(),
            ..SearchQuery::default()
        };

        let results = store.search(&query);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "QDe.004");

        let unknown = SearchQuery {
            type_filter: "charity".to_string(),
            ..SearchQuery::default()
        };
        assert!(store.search(&unknown).is_empty());
    }

    #[test]
    fn test_nationality_filter_skips_entries_without_one() {
        let store = create_store();
        let query = SearchQuery {
            nationality_filter: "afghan".to_string(),
            ..SearchQuery::default()
        };

        let results = store.search(&query);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|e| e.entry_type == EntryType::Person));
    }

    #[test]
    fn test_free_query_reaches_other_info_and_address() {
        let store = create_store();

        let by_info = store.search(&SearchQuery {
            query: "taliban".to_string(),
            ..SearchQuery::default()
        });
        assert_eq!(by_info.len(), 1);
        assert_eq!(by_info[0].id, "QDi.001");

        let by_address = store.search(&SearchQuery {
            query: "pakistan".to_string(),
            ..SearchQuery::default()
        });
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].id, "QDe.004");
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let store = create_store();
        let query = SearchQuery {
            name_filter: "abdul".to_string(),
            id_filter: "QDi".to_string(),
            ..SearchQuery::default()
        };

        let results = store.search(&query);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "QDi.001");
    }

    #[test]
    fn test_per_page_caps_results() {
        let store = create_store();

        let capped = store.search(&SearchQuery {
            per_page: 2,
            ..SearchQuery::default()
        });
        assert_eq!(capped.len(), 2);

        let all = store.search(&SearchQuery {
            per_page: 0,
            ..SearchQuery::default()
        });
        assert_eq!(all.len(), 3);

        let negative = store.search(&SearchQuery {
            per_page: -1,
            ..SearchQuery::default()
        });
        assert_eq!(negative.len(), 3);
    }

    #[test]
    fn test_default_query_truncates_at_twenty() {
        let entries = (0..25)
            .map(|i| {
                SanctionsEntry::new(
                    &format!("QDi.{:03}", i),
                    &format!("Entry {}", i),
                    EntryType::Person,
                )
            })
            .collect();
        let store = SanctionsStore::with_entries(entries);

        let results = store.search(&SearchQuery::default());
        assert_eq!(results.len(), 20);
        assert_eq!(results[0].id, "QDi.000");
        assert_eq!(results[19].id, "QDi.019");
    }

    #[test]
    fn test_empty_store_searches_empty() {
        let store = SanctionsStore::new();
        assert!(store.is_empty());
        assert!(store.search(&SearchQuery::default()).is_empty());
    }
}
