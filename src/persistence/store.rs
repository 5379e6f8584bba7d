use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::simulation::meta::MetaState;
use crate::simulation::run::RunState;

/// Save backend. All operations are fail-silent: a broken disk loses
/// progress but never interrupts play, so saves report nothing and loads
/// return None on any error.
pub trait SaveStore: Send + Sync {
    fn load_meta(&self) -> Option<MetaState>;
    fn save_meta(&self, meta: &MetaState);
    fn load_run(&self) -> Option<RunState>;
    fn save_run(&self, run: &RunState);
    fn clear_run(&self);
}

/// JSON files in a save directory, one per slot.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join("meta.json")
    }

    fn run_path(&self) -> PathBuf {
        self.dir.join("run.json")
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                eprintln!("Ignoring corrupt save {}: {}", path.display(), err);
                None
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            eprintln!("Failed to create save dir {}: {}", self.dir.display(), err);
            return;
        }
        let raw = match serde_json::to_string_pretty(value) {
            Ok(raw) => raw,
            Err(err) => {
                eprintln!("Failed to serialize save: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(path, raw) {
            eprintln!("Failed to write {}: {}", path.display(), err);
        }
    }
}

impl SaveStore for FileStore {
    fn load_meta(&self) -> Option<MetaState> {
        Self::read_json(&self.meta_path())
    }

    fn save_meta(&self, meta: &MetaState) {
        self.write_json(&self.meta_path(), meta);
    }

    fn load_run(&self) -> Option<RunState> {
        Self::read_json(&self.run_path())
    }

    fn save_run(&self, run: &RunState) {
        self.write_json(&self.run_path(), run);
    }

    fn clear_run(&self) {
        match fs::remove_file(self.run_path()) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => eprintln!("Failed to clear run save: {}", err),
        }
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    meta: Mutex<Option<MetaState>>,
    run: Mutex<Option<RunState>>,
}

impl SaveStore for MemoryStore {
    fn load_meta(&self) -> Option<MetaState> {
        self.meta.lock().ok()?.clone()
    }

    fn save_meta(&self, meta: &MetaState) {
        if let Ok(mut slot) = self.meta.lock() {
            *slot = Some(meta.clone());
        }
    }

    fn load_run(&self) -> Option<RunState> {
        self.run.lock().ok()?.clone()
    }

    fn save_run(&self, run: &RunState) {
        if let Ok(mut slot) = self.run.lock() {
            *slot = Some(run.clone());
        }
    }

    fn clear_run(&self) {
        if let Ok(mut slot) = self.run.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_meta() {
        let store = MemoryStore::default();
        assert!(store.load_meta().is_none());

        let mut meta = MetaState::default();
        meta.tokens = 42;
        store.save_meta(&meta);
        assert_eq!(store.load_meta().unwrap().tokens, 42);
    }

    #[test]
    fn clear_run_removes_the_slot() {
        use crate::data::Tuning;
        use crate::simulation::dice::SeededDice;

        let store = MemoryStore::default();
        let meta = MetaState::default();
        let tuning = Tuning::default();
        let mut dice = SeededDice::new(1);
        let run = RunState::new_run("Adventurer", &meta, &tuning, &mut dice);
        store.save_run(&run);
        assert!(store.load_run().is_some());
        store.clear_run();
        assert!(store.load_run().is_none());
    }
}
