//! Filter memory for master-data screens.
//!
//! A small JSON key-value file under the state directory remembers the last
//! filter context per entity, under `{entity}-has-searched`,
//! `{entity}-current-name` and `{entity}-current-code`. It is read when a
//! screen opens and written on every filter change; last write wins.
//!
//! Public methods never fail: storage problems are logged and the screen
//! starts unfiltered.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

const FILE_NAME: &str = "filter-memory.json";

/// Last filter applied on a master-data screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    pub has_searched: bool,
    pub name: String,
    pub code: String,
}

impl FilterContext {
    pub fn searched(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            has_searched: true,
            name: name.into(),
            code: code.into(),
        }
    }
}

fn key(entity: &str, suffix: &str) -> String {
    format!("{entity}-{suffix}")
}

/// File-backed filter memory.
#[derive(Debug, Clone)]
pub struct FilterMemory {
    path: PathBuf,
}

impl FilterMemory {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last filter for `entity`, or an empty context.
    pub fn restore(&self, entity: &str) -> FilterContext {
        match self.load() {
            Ok(map) => FilterContext {
                has_searched: map
                    .get(&key(entity, "has-searched"))
                    .is_some_and(|v| v == "true"),
                name: map.get(&key(entity, "current-name")).cloned().unwrap_or_default(),
                code: map.get(&key(entity, "current-code")).cloned().unwrap_or_default(),
            },
            Err(e) => {
                tracing::warn!(error = %e, %entity, "failed to read filter memory; starting unfiltered");
                FilterContext::default()
            }
        }
    }

    /// Persist the filter context for `entity`.
    pub fn remember(&self, entity: &str, context: &FilterContext) {
        if let Err(e) = self.write_entity(entity, context) {
            tracing::warn!(error = %e, %entity, "failed to persist filter memory");
        }
    }

    /// Reset `entity` to an unsearched state.
    pub fn forget(&self, entity: &str) {
        self.remember(entity, &FilterContext::default());
    }

    fn write_entity(&self, entity: &str, context: &FilterContext) -> anyhow::Result<()> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut map = self.load().unwrap_or_default();
        map.insert(key(entity, "has-searched"), context.has_searched.to_string());
        map.insert(key(entity, "current-name"), context.name.clone());
        map.insert(key(entity, "current-code"), context.code.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create state directory at {parent:?}"))?;
        }
        let json = serde_json::to_string_pretty(&map).context("failed to serialize filter memory")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write filter memory at {:?}", self.path))?;
        Ok(())
    }

    fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read filter memory at {:?}", self.path))?;
        serde_json::from_str(&raw).context("filter memory is not a JSON string map")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("freightdesk-prefs-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn unknown_entity_restores_empty_context() {
        let memory = FilterMemory::new(scratch_dir());
        assert_eq!(memory.restore("origin"), FilterContext::default());
    }

    #[test]
    fn remembered_context_is_restored_per_entity() {
        let dir = scratch_dir();
        let memory = FilterMemory::new(&dir);
        memory.remember("origin", &FilterContext::searched("Nhava Sheva", "INNSA"));
        memory.remember("destination", &FilterContext::searched("Jebel Ali", "AEJEA"));

        let reopened = FilterMemory::new(&dir);
        assert_eq!(reopened.restore("origin"), FilterContext::searched("Nhava Sheva", "INNSA"));
        assert_eq!(reopened.restore("destination").code, "AEJEA");

        let raw = fs::read_to_string(reopened.path()).unwrap();
        assert!(raw.contains("\"origin-has-searched\": \"true\""));
        assert!(raw.contains("\"destination-current-name\": \"Jebel Ali\""));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn last_write_wins_and_forget_resets() {
        let dir = scratch_dir();
        let memory = FilterMemory::new(&dir);
        memory.remember("origin", &FilterContext::searched("A", "AAA"));
        memory.remember("origin", &FilterContext::searched("B", "BBB"));
        assert_eq!(memory.restore("origin").code, "BBB");

        memory.forget("origin");
        assert!(!memory.restore("origin").has_searched);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_file_falls_back_and_is_replaced() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let memory = FilterMemory::new(&dir);
        fs::write(memory.path(), "{not json").unwrap();

        assert_eq!(memory.restore("origin"), FilterContext::default());
        memory.remember("origin", &FilterContext::searched("A", "AAA"));
        assert_eq!(memory.restore("origin").name, "A");
        let _ = fs::remove_dir_all(dir);
    }
}
