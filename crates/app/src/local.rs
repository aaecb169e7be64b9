use std::path::Path;

use api_types::EntryKind;
use backend::{CategoryTable, Collection, MemoryBackend};

use crate::error::Result;

const BUILT_IN_CATEGORIES: &[(&str, EntryKind)] = &[
    ("Salary", EntryKind::Income),
    ("Freelance", EntryKind::Income),
    ("Food", EntryKind::Expense),
    ("Transport", EntryKind::Expense),
    ("Housing", EntryKind::Expense),
    ("Entertainment", EntryKind::Expense),
    ("Utilities", EntryKind::Expense),
    ("Healthcare", EntryKind::Expense),
    ("Shopping", EntryKind::Expense),
];

/// Opens the snapshot at `path`, seeding built-in categories into a fresh store.
pub fn open(path: &Path) -> Result<MemoryBackend> {
    let store = MemoryBackend::load(path)?;
    if store.is_empty(CategoryTable::TABLE) {
        tracing::info!(path = %path.display(), "seeding built-in categories");
        for (name, kind) in BUILT_IN_CATEGORIES {
            store.insert(CategoryTable::TABLE, CategoryTable::builtin_record(name, *kind));
        }
    }
    Ok(store)
}

pub fn close(store: &MemoryBackend, path: &Path) -> Result<()> {
    store.save(path)?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn fresh_store_gets_built_in_categories_once() {
        let dir = std::env::temp_dir().join(format!("tally_local_{}", std::process::id()));
        let path = dir.join("state.json");

        let store = open(&path).unwrap();
        assert_eq!(store.len(CategoryTable::TABLE), BUILT_IN_CATEGORIES.len());
        close(&store, &path).unwrap();

        let reopened = open(&path).unwrap();
        assert_eq!(reopened.len(CategoryTable::TABLE), BUILT_IN_CATEGORIES.len());

        fs::remove_dir_all(dir).unwrap();
    }
}
