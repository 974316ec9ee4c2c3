use crate::domain::stores::key_value::KeyValueStore;
use anyhow::{Context, Error, anyhow};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value store backed by a single JSON object on disk.
///
/// The whole object is rewritten on every `set_item`, first to a sibling
/// temporary file which is then renamed over the original.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    #[tracing::instrument(name = "JsonFileStore::open", skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store file {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Store file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read store file {}", path.display()));
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.write(&updated)?;
        *entries = updated;
        Ok(())
    }
}
