//! Manipulation de l'arbre YAML de configuration
//!
//! Toutes les clés sont stockées en minuscules ; les chemins fournis par
//! l'appelant sont normalisés de la même façon.

use anyhow::{bail, Result};
use serde_yaml::{Mapping, Value};

fn key(name: &str) -> Value {
    Value::String(name.to_lowercase())
}

/// Superpose `overlay` à `base`
///
/// Les tables sont fusionnées clé par clé, tout autre nœud (scalaire ou
/// liste) de `overlay` remplace celui de `base`.
pub(crate) fn overlay(base: &mut Value, overlay_value: &Value) {
    match (base, overlay_value) {
        (Value::Mapping(target), Value::Mapping(source)) => {
            for (k, v) in source {
                if let Some(existing) = target.get_mut(k) {
                    overlay(existing, v);
                } else {
                    target.insert(k.clone(), v.clone());
                }
            }
        }
        (slot, replacement) => *slot = replacement.clone(),
    }
}

/// Copie de `value` dont toutes les clés texte sont en minuscules
pub(crate) fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lowercase_keys(v))
                })
                .collect::<Mapping>(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Lit le nœud désigné par `path`
pub(crate) fn lookup(root: &Value, path: &[&str]) -> Result<Value> {
    let mut node = root;
    for (depth, name) in path.iter().enumerate() {
        let Value::Mapping(map) = node else {
            bail!("Configuration node '{}' is not a table", path[..depth].join("."));
        };
        match map.get(&key(name)) {
            Some(child) => node = child,
            None => bail!("Configuration key '{}' not found", path[..=depth].join(".")),
        }
    }
    Ok(node.clone())
}

/// Écrit `value` au nœud désigné par `path`, en créant les tables manquantes
pub(crate) fn assign(root: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for name in parents {
        let Value::Mapping(map) = node else {
            bail!("Cannot set '{}': parent is not a table", path.join("."));
        };
        node = map
            .entry(key(name))
            .or_insert(Value::Mapping(Mapping::new()));
    }

    match node {
        Value::Mapping(map) => {
            map.insert(key(last), value);
            Ok(())
        }
        _ => bail!("Cannot set '{}': parent is not a table", path.join(".")),
    }
}

/// Valeur d'une variable d'environnement, interprétée comme du YAML
///
/// `"42"` donne un nombre, `"true"` un booléen ; le texte brut est conservé
/// si l'analyse échoue.
pub(crate) fn parse_scalar(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Applique les variables `<prefix>A__B=valeur` sur la clé `a.b`
pub(crate) fn apply_env<I>(root: &mut Value, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, raw) in vars {
        let Some(path) = name.strip_prefix(prefix) else {
            continue;
        };
        let path: Vec<&str> = path.split("__").collect();
        if let Err(e) = assign(root, &path, parse_scalar(&raw)) {
            tracing::warn!(variable = %name, error = %e, "Ignoring environment override");
        }
    }
}
