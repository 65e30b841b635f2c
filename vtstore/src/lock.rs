//! Registre des verrous par document

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

static DOCUMENT_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Retourne le verrou partagé par tous les stores ouverts sur `path`
///
/// La clé est le chemin absolu, pour que `data/x.json` et `./data/x.json`
/// désignent le même document.
pub(crate) fn document_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = normalize(path);
    let mut locks = DOCUMENT_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(key).or_default().clone()
}

fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    // `absolute` ne résout pas les "." : on les retire pour unifier les clés
    absolute
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_document_shares_lock() {
        let a = document_lock(Path::new("some/dir/doc.json"));
        let b = document_lock(Path::new("./some/dir/doc.json"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_documents_have_distinct_locks() {
        let a = document_lock(Path::new("some/dir/a.json"));
        let b = document_lock(Path::new("some/dir/b.json"));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
