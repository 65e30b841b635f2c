//! Validation d'une playlist soumise par un client
//!
//! Le contenu arrive sous forme de JSON brut : la validation se fait élément
//! par élément pour pouvoir désigner le premier élément fautif par son
//! index. Aucune modification partielle n'est possible, la playlist n'est
//! convertie qu'une fois entièrement validée.

use crate::item::{MediaKind, PlaylistDocument, PlaylistItem};
use crate::settings::PlaylistSettings;
use crate::{Error, Result};
use serde_json::{Map, Value};

const INVALID_FORMAT: &str = "Invalid playlist format. Must have 'items' array.";
const ITEMS_NOT_ARRAY: &str = "Playlist 'items' must be an array.";

/// Valide `payload` et le convertit en document
///
/// `duration` et `muted` sont repris tels quels quand ils sont fournis, sinon
/// ils prennent la valeur par défaut du type. Les champs inconnus sont
/// ignorés.
pub fn validate_update(settings: &PlaylistSettings, payload: &Value) -> Result<PlaylistDocument> {
    let items = payload
        .as_object()
        .and_then(|obj| obj.get("items"))
        .ok_or_else(|| Error::InvalidPayload(INVALID_FORMAT.to_string()))?
        .as_array()
        .ok_or_else(|| Error::InvalidPayload(ITEMS_NOT_ARRAY.to_string()))?;

    let items = items
        .iter()
        .enumerate()
        .map(|(index, raw)| validate_item(settings, index, raw))
        .collect::<Result<Vec<_>>>()?;

    Ok(PlaylistDocument::new(items))
}

fn validate_item(settings: &PlaylistSettings, index: usize, raw: &Value) -> Result<PlaylistItem> {
    let invalid = |reason: String| Error::InvalidItem { index, reason };

    let obj: &Map<String, Value> = raw
        .as_object()
        .ok_or_else(|| invalid("must be an object".into()))?;

    let kind = match obj.get("type").and_then(Value::as_str) {
        Some("image") => MediaKind::Image,
        Some("video") => MediaKind::Video,
        _ => {
            return Err(invalid(format!(
                "has invalid type '{}'. Must be 'image' or 'video'",
                display_value(obj.get("type"))
            )))
        }
    };

    let url = match obj.get("url").and_then(Value::as_str) {
        Some(url) if !url.is_empty() => url,
        _ => return Err(invalid("must have a valid 'url' string".into())),
    };

    if let Some(filename) = settings.local_filename(url) {
        if settings.media_path(filename).is_none() {
            return Err(invalid("has a 'url' outside the media directory".into()));
        }
        if !settings.media_exists(filename) {
            return Err(Error::ItemMediaNotFound {
                index,
                filename: filename.to_string(),
            });
        }
    }

    let duration = match obj.get("duration") {
        None | Some(Value::Null) => kind.default_duration(),
        Some(v) => v
            .as_i64()
            .ok_or_else(|| invalid("has invalid 'duration'. Must be an integer".into()))?,
    };

    let muted = match obj.get("muted") {
        None | Some(Value::Null) => false,
        Some(v) => v
            .as_bool()
            .ok_or_else(|| invalid("has invalid 'muted'. Must be a boolean".into()))?,
    };

    Ok(PlaylistItem {
        kind,
        url: url.to_string(),
        duration,
        muted,
    })
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> PlaylistSettings {
        PlaylistSettings::new("/nonexistent/media", "/nonexistent/data")
    }

    #[test]
    fn missing_type_is_reported_as_none() {
        let err = validate_update(&settings(), &json!({"items": [{"url": "http://x/a.jpg"}]}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Item 0 has invalid type 'None'. Must be 'image' or 'video'."
        );
    }

    #[test]
    fn remote_urls_are_accepted_without_check() {
        let doc = validate_update(
            &settings(),
            &json!({"items": [{"type": "video", "url": "https://cdn.example/a.mp4", "extra": 1}]}),
        )
        .unwrap();
        assert_eq!(doc.items, vec![PlaylistItem::video("https://cdn.example/a.mp4", false)]);
    }
}
