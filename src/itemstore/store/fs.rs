use super::PrefsBackend;
use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::warn;

const PREFS_FILE: &str = "prefs.json";

/// File-based preference backend.
///
/// All preferences live in a single `prefs.json` file: a JSON object
/// mapping string keys to string values. The file is loaded lazily on
/// first access; `put_string`/`remove` stage changes in memory and
/// `commit` writes the whole map back atomically (tmp file + rename).
///
/// A missing prefs file reads as an empty map. So does a corrupt one:
/// the preference area is a best-effort cache, and resetting beats
/// refusing to start.
pub struct FsBackend {
    root: PathBuf,
    cache: RefCell<Option<HashMap<String, String>>>,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            cache: RefCell::new(None),
        }
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.root.join(PREFS_FILE)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    fn load_from_disk(&self) -> HashMap<String, String> {
        let path = self.prefs_path();
        if !path.exists() {
            return HashMap::new();
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable prefs file, starting empty");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt prefs file, starting empty");
                HashMap::new()
            }
        }
    }

    fn with_map<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut cache = self.cache.borrow_mut();
        let map = cache.get_or_insert_with(|| self.load_from_disk());
        f(map)
    }
}

impl PrefsBackend for FsBackend {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.with_map(|map| map.get(key).cloned()))
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.with_map(|map| {
            map.insert(key.to_string(), value.to_string());
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_map(|map| {
            map.remove(key);
        });
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = self.with_map(|map| serde_json::to_string_pretty(map))?;

        // Atomic write: never leave a half-written prefs file behind.
        let tmp_file = self.root.join(format!(".prefs-{}.tmp", process::id()));
        fs::write(&tmp_file, content)?;
        if let Err(e) = fs::rename(&tmp_file, self.prefs_path()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }

        Ok(())
    }
}
