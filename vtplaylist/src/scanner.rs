//! Scanner du répertoire média

use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Liste les fichiers candidats d'un répertoire média
#[derive(Debug, Clone)]
pub struct MediaScanner {
    root: PathBuf,
}

impl MediaScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Retourne les noms des fichiers réguliers non cachés, triés
    ///
    /// Un répertoire absent donne une liste vide. Les liens symboliques sont
    /// suivis ; les noms qui ne sont pas de l'UTF-8 valide sont ignorés.
    pub fn scan(&self) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Erreur sur la racine elle-même
                Err(e) if e.depth() == 0 => {
                    if e.io_error().map(|io| io.kind()) == Some(ErrorKind::NotFound) {
                        warn!(path = %self.root.display(), "Media directory does not exist");
                        return Ok(Vec::new());
                    }
                    return Err(Error::Scan {
                        path: self.root.clone(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(name = ?entry.file_name(), "Skipping non UTF-8 file name");
                continue;
            };

            // Fichiers cachés
            if name.starts_with('.') {
                continue;
            }

            files.push(name);
        }

        files.sort();
        debug!(path = %self.root.display(), count = files.len(), "Media directory scanned");
        Ok(files)
    }
}
