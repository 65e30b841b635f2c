//! # vtconfig - Configuration du serveur VideoTimeline
//!
//! La configuration est un arbre YAML construit au démarrage :
//!
//! 1. valeurs par défaut embarquées (`videotimeline.yaml`)
//! 2. fichier `config.yaml` du répertoire de configuration, s'il existe
//! 3. variables `VIDEOTIMELINE_CONFIG__SECTION__CLE=valeur`
//!
//! Le résultat fusionné est réécrit dans `config.yaml`, ce qui documente les
//! clés disponibles pour l'utilisateur. Les clés sont insensibles à la casse.
//!
//! Les composants ne lisent jamais le singleton eux-mêmes : `vtplaylist` et
//! `vtschedule` exposent un trait d'extension sur [`Config`] qui construit
//! les paramètres explicites passés à leurs constructeurs.
//!
//! ```no_run
//! use vtconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let media_dir = config.get_media_dir()?;
//! println!("{} -> {}", port, media_dir.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod tree;

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use serde_yaml::{Number, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

const EMBEDDED_DEFAULTS: &str = include_str!("videotimeline.yaml");
const CONFIG_FILE_NAME: &str = "config.yaml";
const CONFIG_DIR_NAME: &str = ".videotimeline";
const ENV_CONFIG_DIR: &str = "VIDEOTIMELINE_CONFIG";
const ENV_OVERRIDE_PREFIX: &str = "VIDEOTIMELINE_CONFIG__";

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_BASE_URL: &str = "localhost";
const DEFAULT_LOG_BUFFER_CAPACITY: usize = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_MEDIA_DIR: &str = "media";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MEDIA_URL_PREFIX: &str = "/media";
const DEFAULT_MEDIA_FILENAME: &str = "default.jpg";

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load VideoTimeline configuration"));
}

/// Accesseurs `usize` (lecture tolérante, écriture persistée)
macro_rules! usize_setting {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            Ok(match self.get_value($path)? {
                Value::Number(n) => n.as_u64().map_or($default, |v| v as usize),
                _ => $default,
            })
        }

        pub fn $setter(&self, value: usize) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(value)))
        }
    };
}

/// Accesseurs booléens
macro_rules! bool_setting {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            Ok(self.get_value($path)?.as_bool().unwrap_or($default))
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Accesseurs texte ; une valeur absente ou vide donne le défaut
macro_rules! string_setting {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> String {
            self.non_empty_string($path)
                .unwrap_or_else(|| $default.to_string())
        }

        pub fn $setter(&self, value: String) -> Result<()> {
            self.set_value($path, Value::String(value))
        }
    };
}

/// Configuration chargée depuis un répertoire
///
/// Les lectures et écritures passent par un `Mutex` : une même instance
/// peut être partagée entre threads. Chaque écriture réécrit `config.yaml`.
#[derive(Debug)]
pub struct Config {
    dir: PathBuf,
    file: PathBuf,
    tree: Mutex<Value>,
}

impl Config {
    /// Charge la configuration du répertoire `directory`
    ///
    /// Une chaîne vide déclenche la recherche décrite dans
    /// [`config_dir`](Self::config_dir).
    pub fn load_config(directory: &str) -> Result<Self> {
        let dir = PathBuf::from(Self::config_dir(directory)?);
        let file = dir.join(CONFIG_FILE_NAME);
        info!(config_dir = %dir.display(), "Using config directory");

        let mut merged: Value = serde_yaml::from_str(EMBEDDED_DEFAULTS)?;
        match fs::read(&file) {
            Ok(bytes) => {
                // Un fichier vide se lit comme Null
                let user: Value = serde_yaml::from_slice(&bytes)?;
                if !user.is_null() {
                    tree::overlay(&mut merged, &tree::lowercase_keys(user));
                }
                info!(config_file = %file.display(), "Loaded config file");
            }
            Err(_) => {
                info!(config_file = %file.display(), "No config file, using embedded defaults");
            }
        }

        let mut merged = tree::lowercase_keys(merged);
        tree::apply_env(&mut merged, ENV_OVERRIDE_PREFIX, env::vars());

        let config = Self {
            dir,
            file,
            tree: Mutex::new(merged),
        };
        config.save()?;
        Ok(config)
    }

    /// Répertoire de configuration retenu, créé et testé en écriture
    ///
    /// Ordre de recherche :
    /// 1. `directory` s'il n'est pas vide
    /// 2. la variable `VIDEOTIMELINE_CONFIG`
    /// 3. `./.videotimeline` s'il existe
    /// 4. `~/.videotimeline` s'il existe
    /// 5. `./.videotimeline`
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir = locate_config_dir(directory);
        prepare_dir(&dir)?;
        Ok(dir.to_string_lossy().into_owned())
    }

    /// Répertoire d'où la configuration a été chargée
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Réécrit `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.tree())?;
        fs::write(&self.file, yaml)?;
        Ok(())
    }

    /// Valeur au chemin `path` (ex: `&["host", "http_port"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        tree::lookup(&self.tree(), path)
    }

    /// Modifie la valeur au chemin `path` et sauvegarde
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        tree::assign(&mut self.tree(), path, value)?;
        self.save()
    }

    /// Liste de chaînes, ou `default` si la clé est absente ou n'est pas une liste
    pub fn get_string_list(&self, path: &[&str], default: &[&str]) -> Vec<String> {
        match self.get_value(path) {
            Ok(Value::Sequence(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => default.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Répertoire géré : absolu, ou relatif au répertoire de configuration
    ///
    /// Une clé absente est initialisée avec `default`. Le répertoire est
    /// créé s'il n'existe pas.
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<PathBuf> {
        let name = match self.non_empty_string(path) {
            Some(name) => name,
            None => {
                self.set_value(path, Value::String(default.to_string()))?;
                default.to_string()
            }
        };

        let dir = self.dir.join(&name);
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
            info!(directory = %dir.display(), "Created managed directory");
        }
        Ok(dir)
    }

    /// Nom d'hôte annoncé par le serveur HTTP
    pub fn get_base_url(&self) -> String {
        self.non_empty_string(&["host", "base_url"])
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Port HTTP ; une valeur invalide donne 8080 avec un avertissement
    pub fn get_http_port(&self) -> u16 {
        let raw = match self.get_value(&["host", "http_port"]) {
            Ok(value) => value,
            Err(_) => return DEFAULT_HTTP_PORT,
        };

        let port = match &raw {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) => s.trim().parse::<u16>().ok(),
            _ => None,
        };

        port.unwrap_or_else(|| {
            warn!(value = ?raw, "Invalid host.http_port, using {}", DEFAULT_HTTP_PORT);
            DEFAULT_HTTP_PORT
        })
    }

    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(&["host", "http_port"], Value::Number(Number::from(port)))
    }

    /// Répertoire des médias diffusés
    pub fn get_media_dir(&self) -> Result<PathBuf> {
        self.get_managed_dir(&["media", "directory"], DEFAULT_MEDIA_DIR)
    }

    /// Répertoire des documents JSON (playlist, média courant, emploi du temps)
    pub fn get_data_dir(&self) -> Result<PathBuf> {
        self.get_managed_dir(&["data", "directory"], DEFAULT_DATA_DIR)
    }

    /// Fichier `data.<key>` dans le répertoire de données
    pub fn get_data_file(&self, key: &str, default: &str) -> Result<PathBuf> {
        let name = self
            .non_empty_string(&["data", key])
            .unwrap_or_else(|| default.to_string());
        if Path::new(&name).components().count() != 1 {
            bail!("data.{} must be a plain file name, got '{}'", key, name);
        }
        Ok(self.get_data_dir()?.join(name))
    }

    string_setting!(
        get_media_url_prefix,
        set_media_url_prefix,
        &["media", "url_prefix"],
        DEFAULT_MEDIA_URL_PREFIX
    );

    string_setting!(
        get_default_media_filename,
        set_default_media_filename,
        &["media", "default_filename"],
        DEFAULT_MEDIA_FILENAME
    );

    usize_setting!(
        get_log_cache_size,
        set_log_cache_size,
        &["host", "logger", "buffer_capacity"],
        DEFAULT_LOG_BUFFER_CAPACITY
    );

    bool_setting!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Niveau de log minimum (`ERROR` ... `TRACE`)
    pub fn get_log_min_level(&self) -> Result<String> {
        Ok(match self.get_value(&["host", "logger", "min_level"])? {
            Value::String(level) => level,
            _ => DEFAULT_LOG_MIN_LEVEL.to_string(),
        })
    }

    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }

    fn tree(&self) -> MutexGuard<'_, Value> {
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn non_empty_string(&self, path: &[&str]) -> Option<String> {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

impl Clone for Config {
    fn clone(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            file: self.file.clone(),
            tree: Mutex::new(self.tree().clone()),
        }
    }
}

/// Instance globale, chargée au premier accès
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

fn locate_config_dir(directory: &str) -> PathBuf {
    if !directory.is_empty() {
        return PathBuf::from(directory);
    }

    if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
        info!(env_var = ENV_CONFIG_DIR, path = %from_env, "Config directory taken from environment");
        return PathBuf::from(from_env);
    }

    let local = PathBuf::from(CONFIG_DIR_NAME);
    if local.exists() {
        return local;
    }

    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .filter(|dir| dir.exists())
        .unwrap_or(local)
}

/// Crée le répertoire si besoin et vérifie qu'il est accessible en écriture
fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let probe = dir.join(".write_test");
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)?;
    Ok(())
}
