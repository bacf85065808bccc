use super::PrefsBackend;
use crate::error::Result;
use crate::model::{self, STORAGE_KEY};
use serde_json::Value;
use tracing::warn;

/// Durable CRUD over one JSON-array value under the `saved_items` key.
///
/// Every operation is a full read-modify-write: parse the whole array,
/// scan it linearly, write the whole array back. There is no index and no
/// snapshot isolation; callers must serialize invocations (the bridge
/// does).
///
/// ## Error policy
///
/// This is a best-effort cache, not a transactional store. No public
/// method returns an error: parse and backend failures are absorbed and
/// surface as the operation's sentinel (`None`, `false`, or an empty
/// collection), with a warning logged. Callers cannot distinguish "not
/// found" from "storage was corrupt" — that lossiness is the contract.
pub struct ItemStore<B: PrefsBackend> {
    backend: B,
}

impl<B: PrefsBackend> ItemStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Current collection. Absent or unparseable stored values degrade to
    /// an empty collection, never an error.
    fn load_items(&self) -> Vec<Value> {
        let raw = match self.backend.get_string(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "backend read failed, treating collection as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "stored collection unparseable, treating as empty");
                Vec::new()
            }
        }
    }

    fn persist_items(&self, items: &[Value]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.backend.put_string(STORAGE_KEY, &raw)?;
        self.backend.commit()?;
        Ok(())
    }

    /// Append `item_json` to the collection. The item must be a JSON
    /// object; `id` and `productId` are not validated and no uniqueness
    /// check is made against existing ids. Echoes the input back on
    /// success, `None` on unparseable input or a failed write.
    pub fn save(&self, item_json: &str) -> Option<String> {
        let item = model::parse_item(item_json)?;
        let mut items = self.load_items();
        items.push(item);
        match self.persist_items(&items) {
            Ok(()) => Some(item_json.to_string()),
            Err(e) => {
                warn!(error = %e, "save failed");
                None
            }
        }
    }

    /// The raw persisted array string, `"[]"` when absent or unreadable.
    /// The stored string is passed through verbatim, not re-serialized.
    pub fn get_all(&self) -> String {
        match self.backend.get_string(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => "[]".to_string(),
            Err(e) => {
                warn!(error = %e, "backend read failed");
                "[]".to_string()
            }
        }
    }

    /// First item whose `id` field equals `id` exactly, re-serialized.
    pub fn get_by_id(&self, id: &str) -> Option<String> {
        let items = self.load_items();
        let item = items.iter().find(|item| model::item_id(item) == Some(id))?;
        match serde_json::to_string(item) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "item re-serialization failed");
                None
            }
        }
    }

    /// Replace the first item whose `id` matches the input's `id` field,
    /// in place. The whole record is replaced; no field-level merge.
    /// `None` when the input is unparseable, has no string `id`, no entry
    /// matches (update never upserts), or the write fails.
    pub fn update(&self, item_json: &str) -> Option<String> {
        let new_item = model::parse_item(item_json)?;
        let id = model::item_id(&new_item)?.to_string();

        let mut items = self.load_items();
        let pos = items
            .iter()
            .position(|item| model::item_id(item) == Some(id.as_str()))?;
        items[pos] = new_item;

        match self.persist_items(&items) {
            Ok(()) => Some(item_json.to_string()),
            Err(e) => {
                warn!(error = %e, "update failed");
                None
            }
        }
    }

    /// Remove every item whose `id` matches (at most one under the
    /// assumed-uniqueness contract, but duplicates are all removed).
    /// Persists only when something was removed. Returns whether anything
    /// was removed; a failed persist after removal still reports `true`,
    /// matching the platform handlers this store replaces.
    pub fn delete(&self, id: &str) -> bool {
        let mut items = self.load_items();
        let before = items.len();
        items.retain(|item| model::item_id(item) != Some(id));

        let found = items.len() < before;
        if found {
            if let Err(e) = self.persist_items(&items) {
                warn!(error = %e, "delete persisted nothing");
            }
        }
        found
    }

    /// Remove the storage key entirely. Distinct from persisting an empty
    /// array: after `clear` the key is gone.
    pub fn clear(&self) -> bool {
        let removed = self
            .backend
            .remove(STORAGE_KEY)
            .and_then(|()| self.backend.commit());
        match removed {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "clear failed");
                false
            }
        }
    }

    /// True iff any item's `productId` equals `product_id` exactly.
    /// Missing or non-numeric fields never match.
    pub fn is_product_saved(&self, product_id: i64) -> bool {
        self.load_items()
            .iter()
            .any(|item| model::item_product_id(item) == Some(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;
    use serde_json::json;

    fn make_store() -> ItemStore<MemBackend> {
        ItemStore::with_backend(MemBackend::new())
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    // --- Round-trip ---

    #[test]
    fn save_then_get_by_id_round_trips() {
        let store = make_store();
        let item = r#"{"id":"1","productId":42,"name":"Widget"}"#;

        let echoed = store.save(item).unwrap();
        assert_eq!(echoed, item);

        let fetched = store.get_by_id("1").unwrap();
        assert_eq!(parse(&fetched), parse(item));
    }

    #[test]
    fn save_preserves_opaque_payload() {
        let store = make_store();
        let item = r#"{"id":"x","nested":{"a":[1,2,3]},"tag":null}"#;
        store.save(item).unwrap();

        let fetched = store.get_by_id("x").unwrap();
        assert_eq!(parse(&fetched), parse(item));
    }

    // --- Listing ---

    #[test]
    fn get_all_defaults_to_empty_array() {
        let store = make_store();
        assert_eq!(store.get_all(), "[]");
    }

    #[test]
    fn get_all_is_idempotent() {
        let store = make_store();
        store.save(r#"{"id":"1","productId":1}"#).unwrap();

        let first = store.get_all();
        let second = store.get_all();
        assert_eq!(first, second);
    }

    #[test]
    fn get_all_reflects_insertion_order() {
        let store = make_store();
        store.save(r#"{"id":"a"}"#).unwrap();
        store.save(r#"{"id":"b"}"#).unwrap();
        store.save(r#"{"id":"c"}"#).unwrap();

        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| model::item_id(i).unwrap()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    // --- Save edge cases ---

    #[test]
    fn save_rejects_invalid_json() {
        let store = make_store();
        assert!(store.save("not json").is_none());
        assert!(store.save("[1,2]").is_none());
        assert_eq!(store.get_all(), "[]");
    }

    #[test]
    fn save_allows_duplicate_ids() {
        // Append-always is the observed contract; uniqueness is the
        // caller's problem.
        let store = make_store();
        store.save(r#"{"id":"1","v":1}"#).unwrap();
        store.save(r#"{"id":"1","v":2}"#).unwrap();

        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn save_returns_none_on_write_failure() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let store = ItemStore::with_backend(backend);

        assert!(store.save(r#"{"id":"1"}"#).is_none());
    }

    #[test]
    fn save_returns_none_on_commit_failure() {
        let backend = MemBackend::new();
        backend.set_simulate_commit_error(true);
        let store = ItemStore::with_backend(backend);

        assert!(store.save(r#"{"id":"1"}"#).is_none());
    }

    // --- Lookup ---

    #[test]
    fn get_by_id_misses_cleanly() {
        let store = make_store();
        store.save(r#"{"id":"1"}"#).unwrap();

        assert!(store.get_by_id("2").is_none());
    }

    #[test]
    fn get_by_id_is_exact_string_equality() {
        let store = make_store();
        store.save(r#"{"id":"01"}"#).unwrap();

        assert!(store.get_by_id("1").is_none());
        assert!(store.get_by_id("01").is_some());
    }

    #[test]
    fn get_by_id_skips_items_without_string_id() {
        let store = make_store();
        store.save(r#"{"name":"no id"}"#).unwrap();
        store.save(r#"{"id":7}"#).unwrap();
        store.save(r#"{"id":"7"}"#).unwrap();

        let hit = store.get_by_id("7").unwrap();
        assert_eq!(parse(&hit), json!({"id": "7"}));
    }

    // --- Update ---

    #[test]
    fn update_replaces_in_place() {
        let store = make_store();
        store.save(r#"{"id":"a","v":1}"#).unwrap();
        store.save(r#"{"id":"b","v":1}"#).unwrap();
        store.save(r#"{"id":"c","v":1}"#).unwrap();

        let echoed = store.update(r#"{"id":"b","v":2,"extra":true}"#).unwrap();
        assert_eq!(echoed, r#"{"id":"b","v":2,"extra":true}"#);

        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| model::item_id(i).unwrap()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(items[1], json!({"id": "b", "v": 2, "extra": true}));
    }

    #[test]
    fn update_is_whole_record_replacement() {
        let store = make_store();
        store.save(r#"{"id":"a","keep":"me","v":1}"#).unwrap();
        store.update(r#"{"id":"a","v":2}"#).unwrap();

        // No field-level merge: "keep" is gone.
        let fetched = store.get_by_id("a").unwrap();
        assert_eq!(parse(&fetched), json!({"id": "a", "v": 2}));
    }

    #[test]
    fn update_never_upserts() {
        let store = make_store();
        assert!(store.update(r#"{"id":"ghost","v":1}"#).is_none());
        assert_eq!(store.get_all(), "[]");
    }

    #[test]
    fn update_requires_a_string_id() {
        let store = make_store();
        store.save(r#"{"id":"1"}"#).unwrap();

        assert!(store.update(r#"{"v":2}"#).is_none());
        assert!(store.update(r#"{"id":1,"v":2}"#).is_none());
        assert!(store.update("garbage").is_none());
    }

    #[test]
    fn update_returns_none_on_write_failure() {
        let backend = MemBackend::new();
        let store = ItemStore::with_backend(backend);
        store.save(r#"{"id":"1","v":1}"#).unwrap();

        store.backend.set_simulate_write_error(true);
        assert!(store.update(r#"{"id":"1","v":2}"#).is_none());

        // The stored collection is untouched.
        store.backend.set_simulate_write_error(false);
        let fetched = store.get_by_id("1").unwrap();
        assert_eq!(parse(&fetched), json!({"id": "1", "v": 1}));
    }

    // --- Delete ---

    #[test]
    fn delete_removes_matching_item() {
        let store = make_store();
        store.save(r#"{"id":"1","productId":42}"#).unwrap();

        assert!(store.delete("1"));
        assert_eq!(store.get_all(), "[]");
    }

    #[test]
    fn delete_miss_returns_false_and_leaves_collection_unchanged() {
        let store = make_store();
        store.save(r#"{"id":"1"}"#).unwrap();
        let before = store.get_all();

        assert!(!store.delete("2"));
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn delete_removes_all_duplicates() {
        let store = make_store();
        store.save(r#"{"id":"1","v":1}"#).unwrap();
        store.save(r#"{"id":"1","v":2}"#).unwrap();
        store.save(r#"{"id":"2"}"#).unwrap();

        assert!(store.delete("1"));

        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(model::item_id(&items[0]), Some("2"));
    }

    #[test]
    fn delete_reports_true_when_persist_fails() {
        // The write result is ignored once something was removed; the
        // caller learns what was found, not whether it stuck.
        let backend = MemBackend::new();
        let store = ItemStore::with_backend(backend);
        store.save(r#"{"id":"1"}"#).unwrap();

        store.backend.set_simulate_write_error(true);
        assert!(store.delete("1"));
    }

    #[test]
    fn delete_shifts_later_entries_down() {
        let store = make_store();
        store.save(r#"{"id":"a"}"#).unwrap();
        store.save(r#"{"id":"b"}"#).unwrap();
        store.save(r#"{"id":"c"}"#).unwrap();

        store.delete("b");

        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| model::item_id(i).unwrap()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    // --- Clear ---

    #[test]
    fn clear_removes_the_key_itself() {
        let backend = MemBackend::new();
        let store = ItemStore::with_backend(backend);
        store.save(r#"{"id":"1"}"#).unwrap();
        assert!(store.backend.raw(STORAGE_KEY).is_some());

        assert!(store.clear());
        assert!(store.backend.raw(STORAGE_KEY).is_none());
        assert_eq!(store.get_all(), "[]");
        assert!(store.get_by_id("1").is_none());
    }

    #[test]
    fn clear_returns_false_on_backend_error() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let store = ItemStore::with_backend(backend);

        assert!(!store.clear());
    }

    // --- Membership ---

    #[test]
    fn membership_is_independent_of_id() {
        let store = make_store();
        store.save(r#"{"id":"x","productId":42}"#).unwrap();
        store.save(r#"{"id":"y","productId":7}"#).unwrap();

        assert!(store.is_product_saved(42));
        assert!(store.is_product_saved(7));
        assert!(!store.is_product_saved(99));
    }

    #[test]
    fn membership_ignores_missing_or_non_numeric_product_ids() {
        let store = make_store();
        store.save(r#"{"id":"a"}"#).unwrap();
        store.save(r#"{"id":"b","productId":"42"}"#).unwrap();

        assert!(!store.is_product_saved(42));
    }

    // --- Corruption tolerance ---

    #[test]
    fn corrupt_collection_reads_as_empty() {
        let backend = MemBackend::new();
        backend.seed(STORAGE_KEY, "{{{ not an array");
        let store = ItemStore::with_backend(backend);

        assert!(store.get_by_id("1").is_none());
        assert!(!store.is_product_saved(1));
        assert!(!store.delete("1"));
    }

    #[test]
    fn get_all_passes_corrupt_value_through_verbatim() {
        // Listing is raw passthrough; only the parsing operations degrade
        // corrupt data to empty.
        let backend = MemBackend::new();
        backend.seed(STORAGE_KEY, "{{{ not an array");
        let store = ItemStore::with_backend(backend);

        assert_eq!(store.get_all(), "{{{ not an array");
    }

    #[test]
    fn save_over_corrupt_collection_starts_fresh() {
        let backend = MemBackend::new();
        backend.seed(STORAGE_KEY, "{{{ not an array");
        let store = ItemStore::with_backend(backend);

        store.save(r#"{"id":"1"}"#).unwrap();

        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        assert_eq!(items.len(), 1);
    }

    // --- Example scenario from the contract ---

    #[test]
    fn full_lifecycle_scenario() {
        let store = make_store();
        let item = r#"{"id":"1","productId":42,"name":"Widget"}"#;

        store.save(item).unwrap();
        let items: Vec<Value> = serde_json::from_str(&store.get_all()).unwrap();
        assert_eq!(items, vec![parse(item)]);

        assert!(store.is_product_saved(42));
        assert!(store.delete("1"));
        assert_eq!(store.get_all(), "[]");
    }
}
