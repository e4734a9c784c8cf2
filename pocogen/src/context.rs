//! Output context: destination key -> writer registry for one generation run

use std::path::Path;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::save::{PlannedFile, SavePipeline, SaveReport};
use crate::writer::{CodeWriter, DEFAULT_INDENT_UNIT};

/// All output buffers of one generation run, keyed by destination.
///
/// Keys keep their insertion order. Nothing touches storage until
/// [`OutputContext::save`]; dropping the context abandons the run.
#[derive(Debug)]
pub struct OutputContext {
    files: IndexMap<String, CodeWriter>,
    indent_unit: String,
}

impl OutputContext {
    pub fn new() -> Self {
        Self::with_indent_unit(DEFAULT_INDENT_UNIT)
    }

    /// Create a context whose writers indent with `indent_unit`
    pub fn with_indent_unit(indent_unit: impl Into<String>) -> Self {
        Self {
            files: IndexMap::new(),
            indent_unit: indent_unit.into(),
        }
    }

    /// Writer registered under `key`, created empty on first access
    pub fn get_or_create(&mut self, key: &str) -> &mut CodeWriter {
        let indent_unit = &self.indent_unit;
        match self.files.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("Registering output {}", key);
                entry.insert(CodeWriter::with_indent_unit(indent_unit.clone()))
            }
        }
    }

    /// Register a new writer under `key`, failing if the key already exists
    pub fn create(&mut self, key: &str) -> Result<&mut CodeWriter> {
        if self.files.contains_key(key) {
            return Err(Error::DestinationCollision {
                key: key.to_string(),
                existing: key.to_string(),
                path: key.into(),
            });
        }
        Ok(self.get_or_create(key))
    }

    pub fn get(&self, key: &str) -> Option<&CodeWriter> {
        self.files.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }

    /// Registered keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// (key, writer) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeWriter)> {
        self.files.iter().map(|(k, w)| (k.as_str(), w))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve every destination under `root` without writing anything.
    pub fn plan(&self, root: impl AsRef<Path>) -> Result<Vec<PlannedFile>> {
        let pipeline = SavePipeline::prepare(self, root.as_ref())?;
        Ok(pipeline.files().cloned().collect())
    }

    /// Persist every buffer under `root`.
    ///
    /// See [`SavePipeline`] for the failure guarantees.
    pub fn save(self, root: impl AsRef<Path>) -> Result<SaveReport> {
        SavePipeline::prepare(&self, root.as_ref())?.execute()
    }
}

impl Default for OutputContext {
    fn default() -> Self {
        Self::new()
    }
}
