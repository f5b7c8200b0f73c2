//! Process-wide, best-effort source-line cache.
//!
//! Extraction warms the cache for every yielded frame; frame rendering
//! looks lines up for optional source display. Unreadable files are
//! remembered as empty entries so a walk never pays for the same miss
//! twice. Concurrent warms of one file race benignly: they insert
//! identical content.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

type Cache = RwLock<HashMap<String, Arc<Vec<String>>>>;

static CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers `file` for later lookup. Never fails.
pub fn warm(file: &str) {
    if cache().read().unwrap().contains_key(file) {
        return;
    }
    let lines = match std::fs::read_to_string(file) {
        Ok(text) => text.lines().map(str::to_owned).collect(),
        Err(err) => {
            debug!(file, %err, "source unavailable for display");
            Vec::new()
        }
    };
    cache()
        .write()
        .unwrap()
        .insert(file.to_string(), Arc::new(lines));
}

/// The 1-based `line` of `file`, when the cache can resolve it.
pub fn lookup(file: &str, line: u32) -> Option<String> {
    let entry = cache().read().unwrap().get(file).cloned()?;
    let index = line.checked_sub(1)? as usize;
    entry.get(index).cloned()
}

/// Drops every cached entry.
pub fn clear() {
    cache().write().unwrap().clear();
}
