//! Core Store implementation

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A record that can be kept in a [`Store`] collection
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Unique identifier within the collection
    fn id(&self) -> &str;

    /// Collection the record belongs to (also the file stem on disk)
    fn collection_name() -> &'static str;
}

/// JSON file backed record store
#[derive(Debug, Clone)]
pub struct Store {
    /// Base path for storage
    base_path: PathBuf,
}

impl Store {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened plan store");
        Ok(Self { base_path })
    }

    /// Directory holding the collection files
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// All records of a collection, in stored order
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.collection_path::<R>();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&path).context(format!("Failed to read {}", path.display()))?;
        let records: Vec<R> = serde_json::from_slice(&data).context(format!("Failed to parse {}", path.display()))?;
        Ok(records)
    }

    /// Look up a single record by id
    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        Ok(self.list::<R>()?.into_iter().find(|r| r.id() == id))
    }

    /// Replace the record with the same id, or append it if absent
    pub fn upsert<R: Record>(&self, record: &R) -> Result<()> {
        let mut records = self.list::<R>()?;
        let record = record.clone();

        match records.iter().position(|r| r.id() == record.id()) {
            Some(idx) => {
                debug!(collection = R::collection_name(), id = record.id(), "Replacing record");
                records[idx] = record;
            }
            None => {
                debug!(collection = R::collection_name(), id = record.id(), "Inserting record");
                records.push(record);
            }
        }

        self.write_all(&records)
    }

    /// Upsert many records with a single write
    pub fn upsert_all<R: Record>(&self, incoming: Vec<R>) -> Result<()> {
        let mut records = self.list::<R>()?;
        for record in incoming {
            match records.iter().position(|r| r.id() == record.id()) {
                Some(idx) => records[idx] = record,
                None => records.push(record),
            }
        }
        self.write_all(&records)
    }

    /// Remove the record with the given id; removing a missing id is a no-op
    pub fn remove<R: Record>(&self, id: &str) -> Result<bool> {
        let mut records = self.list::<R>()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = records.len() != before;
        if removed {
            self.write_all(&records)?;
            info!(collection = R::collection_name(), id, "Removed record");
        }
        Ok(removed)
    }

    /// Drop a whole collection
    pub fn clear<R: Record>(&self) -> Result<()> {
        let path = self.collection_path::<R>();
        if path.exists() {
            fs::remove_file(&path).context(format!("Failed to remove {}", path.display()))?;
            info!(collection = R::collection_name(), "Cleared collection");
        }
        Ok(())
    }

    fn write_all<R: Record>(&self, records: &[R]) -> Result<()> {
        let path = self.collection_path::<R>();
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(records)?;
        fs::write(&tmp, &data).context(format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).context(format!("Failed to rename {} -> {}", tmp.display(), path.display()))?;
        Ok(())
    }

    fn collection_path<R: Record>(&self) -> PathBuf {
        self.base_path.join(format!("{}.json", R::collection_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Note {
        fn new(id: &str, body: &str) -> Self {
            Self {
                id: id.to_string(),
                body: body.to_string(),
            }
        }
    }

    impl Record for Note {
        fn id(&self) -> &str {
            &self.id
        }

        fn collection_name() -> &'static str {
            "notes"
        }
    }

    #[test]
    fn test_list_missing_collection_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        let notes: Vec<Note> = store.list().unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_upsert_inserts_then_replaces() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();

        store.upsert(&Note::new("a", "first")).unwrap();
        store.upsert(&Note::new("b", "second")).unwrap();
        store.upsert(&Note::new("a", "edited")).unwrap();

        let notes: Vec<Note> = store.list().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], Note::new("a", "edited"));
        assert_eq!(notes[1], Note::new("b", "second"));
        assert!(temp.path().join("notes.json").exists());
        assert!(!temp.path().join("notes.json.tmp").exists());
    }

    #[test]
    fn test_get_and_remove() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        store
            .upsert_all(vec![Note::new("a", "one"), Note::new("b", "two")])
            .unwrap();

        assert_eq!(store.get::<Note>("b").unwrap(), Some(Note::new("b", "two")));
        assert!(store.remove::<Note>("b").unwrap());
        assert!(!store.remove::<Note>("b").unwrap());
        assert_eq!(store.get::<Note>("b").unwrap(), None);
        assert_eq!(store.list::<Note>().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_drops_collection() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        store.upsert(&Note::new("a", "one")).unwrap();

        store.clear::<Note>().unwrap();
        assert!(store.list::<Note>().unwrap().is_empty());
        // Clearing twice is fine
        store.clear::<Note>().unwrap();
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        fs::write(temp.path().join("notes.json"), "not json").unwrap();
        assert!(store.list::<Note>().is_err());
    }
}
