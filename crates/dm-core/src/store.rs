//! A generic document store keyed by record id.
//!
//! Records are JSON objects grouped into named collections. Writes are
//! read-modify-write with no locking: the last writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// A collection of documents, keyed by id.
pub type Collection = BTreeMap<String, Value>;

/// Storage for JSON documents grouped into collections.
pub trait RecordStore {
    /// Fetch a document by id.
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Value>>;

    /// Insert a new document and return its generated id. The id is also
    /// written into the document's `id` field.
    fn insert(&mut self, collection: &str, record: Value) -> CoreResult<String>;

    /// Merge `fields` into an existing document.
    fn patch(&mut self, collection: &str, id: &str, fields: Map<String, Value>) -> CoreResult<()>;

    /// All documents whose `field` equals `value`, in id order.
    fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> CoreResult<Vec<Value>>;

    /// Overwrite a single field of an existing document.
    fn update_field(&mut self, collection: &str, id: &str, field: &str, value: Value) -> CoreResult<()> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), value);
        self.patch(collection, id, fields)
    }
}

/// Stamp a fresh id into a document and return it.
fn assign_id(record: &mut Value) -> CoreResult<String> {
    let object = record
        .as_object_mut()
        .ok_or_else(|| CoreError::InvalidRecord("record must be a JSON object".to_string()))?;
    let id = Uuid::new_v4().to_string();
    object.insert("id".to_string(), Value::String(id.clone()));
    Ok(id)
}

fn merge_fields(collection: &str, id: &str, docs: &mut Collection, fields: Map<String, Value>) -> CoreResult<()> {
    let record = docs.get_mut(id).ok_or_else(|| CoreError::RecordNotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    })?;
    let object = record
        .as_object_mut()
        .ok_or_else(|| CoreError::InvalidRecord(format!("{collection}/{id} is not an object")))?;
    for (key, value) in fields {
        object.insert(key, value);
    }
    Ok(())
}

fn matching(docs: &Collection, field: &str, value: &Value) -> Vec<Value> {
    docs.values()
        .filter(|doc| doc.get(field) == Some(value))
        .cloned()
        .collect()
}

/// An in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Collection>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Value>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn insert(&mut self, collection: &str, mut record: Value) -> CoreResult<String> {
        let id = assign_id(&mut record)?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }

    fn patch(&mut self, collection: &str, id: &str, fields: Map<String, Value>) -> CoreResult<()> {
        let docs = self.collections.entry(collection.to_string()).or_default();
        merge_fields(collection, id, docs, fields)
    }

    fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> CoreResult<Vec<Value>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| matching(docs, field, value))
            .unwrap_or_default())
    }
}

/// A store that keeps each collection in `<root>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    fn load(&self, collection: &str) -> CoreResult<Collection> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(Collection::new());
        }
        let json = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, collection: &str, docs: &Collection) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(docs)?;
        std::fs::write(self.path(collection), json)?;
        debug!(collection, records = docs.len(), "collection saved");
        Ok(())
    }
}

impl RecordStore for JsonDirStore {
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Value>> {
        Ok(self.load(collection)?.remove(id))
    }

    fn insert(&mut self, collection: &str, mut record: Value) -> CoreResult<String> {
        let id = assign_id(&mut record)?;
        let mut docs = self.load(collection)?;
        docs.insert(id.clone(), record);
        self.save(collection, &docs)?;
        Ok(id)
    }

    fn patch(&mut self, collection: &str, id: &str, fields: Map<String, Value>) -> CoreResult<()> {
        let mut docs = self.load(collection)?;
        merge_fields(collection, id, &mut docs, fields)?;
        self.save(collection, &docs)
    }

    fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> CoreResult<Vec<Value>> {
        Ok(matching(&self.load(collection)?, field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(store: &mut dyn RecordStore) {
        let id = store
            .insert("houses", json!({"name": "Thistle", "playerId": "p1"}))
            .unwrap();
        let doc = store.get("houses", &id).unwrap().unwrap();
        assert_eq!(doc["id"], id.as_str());
        assert_eq!(doc["name"], "Thistle");

        store
            .update_field("houses", &id, "gold", json!(12))
            .unwrap();
        let mut fields = Map::new();
        fields.insert("motto".into(), json!("Small but sharp"));
        fields.insert("name".into(), json!("Thistledown"));
        store.patch("houses", &id, fields).unwrap();

        let doc = store.get("houses", &id).unwrap().unwrap();
        assert_eq!(doc["gold"], 12);
        assert_eq!(doc["name"], "Thistledown");
        assert_eq!(doc["playerId"], "p1");

        let found = store
            .find_by_field("houses", "playerId", &json!("p1"))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(
            store
                .find_by_field("houses", "playerId", &json!("p2"))
                .unwrap()
                .is_empty()
        );
        assert!(store.get("houses", "missing").unwrap().is_none());
        assert!(matches!(
            store.update_field("houses", "missing", "gold", json!(1)),
            Err(CoreError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn json_dir_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonDirStore::open(dir.path().join("store")).unwrap();
        exercise(&mut store);
        assert!(store.root().join("houses.json").exists());
    }

    #[test]
    fn insert_rejects_non_objects() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.insert("houses", json!([1, 2])),
            Err(CoreError::InvalidRecord(_))
        ));
    }
}
