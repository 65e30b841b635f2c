//! # vtstore - Documents JSON persistés
//!
//! Cette crate fournit [`JsonStore`], un accès typé à un document JSON stocké
//! dans un fichier unique :
//!
//! - **Chargement** : le document absent ou illisible est remplacé par une
//!   valeur par défaut fournie par l'appelant ([`JsonStore::load_or`]), ou
//!   signalé explicitement via [`Loaded`] ([`JsonStore::read`])
//! - **Sauvegarde** : réécriture complète, sérialisée par document et
//!   atomique (fichier temporaire dans le même répertoire puis rename)
//!
//! - **Lecture-modification-écriture** : [`JsonStore::lock`] garde le verrou
//!   du document de la lecture jusqu'à la sauvegarde
//!
//! Deux `JsonStore` ouverts sur le même chemin partagent le même verrou : les
//! écritures concurrentes ne peuvent pas s'entrelacer, et un lecteur voit
//! toujours soit l'ancien document complet, soit le nouveau. Une écriture
//! calculée à partir d'une lecture doit passer par [`JsonStore::lock`], sinon
//! elle peut écraser une sauvegarde faite entre les deux.
//!
//! ## Exemple
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use vtstore::JsonStore;
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Doc {
//!     items: Vec<String>,
//! }
//!
//! # fn main() -> vtstore::Result<()> {
//! let store: JsonStore<Doc> = JsonStore::new("data/doc.json");
//! let mut doc = store.load_or(Doc::default())?;
//! doc.items.push("hello".into());
//! store.save(&doc)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod lock;

pub use error::{Error, Result};

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Résultat d'une lecture de document
///
/// Seules les vraies erreurs d'E/S remontent en `Err` ; l'absence et la
/// corruption sont des états attendus.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// Document présent et valide
    Found(T),
    /// Aucun fichier à cet emplacement
    Missing,
    /// Fichier présent mais impossible à décoder
    Malformed(String),
}

impl<T> Loaded<T> {
    /// Retourne le document, ou `None` s'il est absent ou corrompu
    pub fn found(self) -> Option<T> {
        match self {
            Loaded::Found(doc) => Some(doc),
            Loaded::Missing | Loaded::Malformed(_) => None,
        }
    }
}

/// Document JSON typé stocké dans un fichier
pub struct JsonStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: self.lock.clone(),
            _doc: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for JsonStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore").field("path", &self.path).finish()
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Ouvre le document situé à `path` (le fichier n'a pas besoin d'exister)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock = lock::document_lock(&path);
        Self {
            path,
            lock,
            _doc: PhantomData,
        }
    }

    /// Chemin du fichier sous-jacent
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lit le document en distinguant présent / absent / corrompu
    pub fn read(&self) -> Result<Loaded<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Missing),
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(doc) => Ok(Loaded::Found(doc)),
            Err(e) => Ok(Loaded::Malformed(e.to_string())),
        }
    }

    /// Charge le document, ou retourne `default` s'il est absent ou corrompu
    pub fn load_or(&self, default: T) -> Result<T> {
        self.load_or_else(|| default)
    }

    /// Variante paresseuse de [`load_or`](Self::load_or)
    pub fn load_or_else<F>(&self, default: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        match self.read()? {
            Loaded::Found(doc) => Ok(doc),
            Loaded::Missing => {
                info!(path = %self.path.display(), "Document not found, using default data");
                Ok(default())
            }
            Loaded::Malformed(reason) => {
                error!(
                    path = %self.path.display(),
                    %reason,
                    "Error decoding JSON document, using default data"
                );
                Ok(default())
            }
        }
    }

    /// Réécrit entièrement le document
    ///
    /// Le contenu est écrit dans un fichier temporaire du même répertoire,
    /// synchronisé, puis renommé sur la cible. Les appels concurrents sur un
    /// même chemin sont sérialisés.
    pub fn save(&self, doc: &T) -> Result<()> {
        self.lock().save(doc)
    }

    /// Prend le verrou du document jusqu'à la fin de vie du garde
    ///
    /// Les autres `save` et `lock` sur le même chemin attendent ;
    /// les simples `read` ne sont pas bloqués.
    pub fn lock(&self) -> Locked<'_, T> {
        let guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Locked {
            store: self,
            _guard: guard,
        }
    }

    fn write_file(&self, doc: &T) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(doc)?;
        json.push(b'\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|source| Error::Io {
            path: parent.clone(),
            source,
        })?;

        let io_err = |source| Error::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| Error::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!(path = %self.path.display(), bytes = json.len(), "Document saved");
        Ok(())
    }
}

/// Accès exclusif à un document, obtenu par [`JsonStore::lock`]
pub struct Locked<'a, T> {
    store: &'a JsonStore<T>,
    _guard: MutexGuard<'a, ()>,
}

impl<T> Locked<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn read(&self) -> Result<Loaded<T>> {
        self.store.read()
    }

    pub fn save(&self, doc: &T) -> Result<()> {
        self.store.write_file(doc)
    }
}
