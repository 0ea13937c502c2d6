use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::StateShowArgs;

/// Synchronous string-to-string store, the page-load analogue of an
/// origin-scoped browser store. `get`/`set` never fail; durability is the
/// concern of the concrete store's load/save boundary.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

/// State persisted as a single JSON object on disk. A missing file is an
/// empty store; entries stay sorted so saved files diff cleanly.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse state store: {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(anyhow::Error::new(err))
                    .with_context(|| format!("read state store: {}", path.display()));
            }
        };
        Ok(Self { path, entries })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create state store dir: {}", parent.display()))?;
        }

        let data = serde_json::to_vec_pretty(&self.entries).context("serialize state store")?;
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, &data)
            .with_context(|| format!("write state store tmp: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("rename state store into place: {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

pub fn show(args: StateShowArgs) -> anyhow::Result<()> {
    let store = JsonFileStore::load(&args.state)?;
    for (key, value) in store.entries() {
        println!("{key}={value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_on_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("tree_open_0"), None);
        store.set("tree_open_0", "1");
        store.set("tree_open_0", "0");
        assert_eq!(store.get("tree_open_0"), Some("0".to_owned()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_file_is_an_empty_store() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = JsonFileStore::load(temp.path().join("state.json"))?;
        assert_eq!(store.entries().count(), 0);
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips_entries() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("state.json");

        let mut store = JsonFileStore::load(&path)?;
        store.set("tree_open_2", "1");
        store.set("tree_open_0", "0");
        store.save()?;

        let reloaded = JsonFileStore::load(&path)?;
        assert_eq!(reloaded.get("tree_open_0"), Some("0".to_owned()));
        assert_eq!(reloaded.get("tree_open_2"), Some("1".to_owned()));

        let keys = reloaded.entries().map(|(k, _)| k.to_owned()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["tree_open_0", "tree_open_2"]);
        Ok(())
    }

    #[test]
    fn corrupt_state_file_is_an_error() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("state.json");
        std::fs::write(&path, b"not json")?;
        assert!(JsonFileStore::load(&path).is_err());
        Ok(())
    }
}
