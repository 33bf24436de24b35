use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::loader::{load_questions, LoadError};
use crate::models::QuestionRecord;

/// Snapshot of what a [`QuestionCache`] currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub cached_files: Vec<PathBuf>,
    pub total_cached_questions: usize,
}

/// Loaded question files keyed by path.
///
/// Owned by the caller and passed to whoever loads questions, so repeated
/// loads of the same file within one process reuse the parsed records.
#[derive(Debug, Default)]
pub struct QuestionCache {
    entries: HashMap<PathBuf, Arc<[QuestionRecord]>>,
}

impl QuestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the questions for `path`, reading the file only on a miss.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<[QuestionRecord]>, LoadError> {
        let path = path.as_ref();
        if let Some(hit) = self.entries.get(path) {
            debug!(path = %path.display(), "Question cache hit");
            return Ok(Arc::clone(hit));
        }

        let questions: Arc<[QuestionRecord]> = load_questions(path)?.into();
        self.entries.insert(path.to_path_buf(), Arc::clone(&questions));
        Ok(questions)
    }

    /// Drop one cached file. Returns whether it was cached.
    pub fn invalidate<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn info(&self) -> CacheInfo {
        let mut cached_files: Vec<PathBuf> = self.entries.keys().cloned().collect();
        cached_files.sort();
        CacheInfo {
            cached_files,
            total_cached_questions: self.entries.values().map(|q| q.len()).sum(),
        }
    }
}
