//! Rendu texte des commandes `analyze`, `rules` et `generate`

use std::fmt::{self, Write};
use std::fs;
use std::path::Path;
use vtplaylist::{
    Classification, Classifier, DurationRule, MediaKind, MuteRule, PlaylistDocument,
    DURATION_RULES, MUTE_RULES,
};

/// Classement prévu de chaque fichier d'un répertoire
pub fn analyze(
    out: &mut impl Write,
    media_dir: &Path,
    files: &[String],
    classifier: &Classifier,
) -> fmt::Result {
    if files.is_empty() {
        return writeln!(out, "No media files found in {}", media_dir.display());
    }

    writeln!(out, "Analyzing {} files in {}:", files.len(), media_dir.display())?;
    writeln!(out, "{}", "-".repeat(60))?;

    for filename in files {
        let size = fs::metadata(media_dir.join(filename))
            .map(|m| m.len())
            .unwrap_or(0);

        match classifier.classify(filename) {
            Classification::Image { duration, rule } => {
                writeln!(out, "[image] {}", filename)?;
                writeln!(out, "   Type: Image ({} bytes)", group_thousands(size))?;
                writeln!(out, "   Duration: {}ms ({})", duration, rule.describe())?;
            }
            Classification::Video { muted, rule } => {
                writeln!(out, "[video] {}", filename)?;
                writeln!(out, "   Type: Video ({} bytes)", group_thousands(size))?;
                writeln!(out, "   Audio: {} ({})", audio_label(muted), rule.describe())?;
            }
            Classification::Unsupported { extension } => {
                writeln!(out, "[?] {}", filename)?;
                writeln!(out, "   Type: Unknown (extension: {})", extension)?;
                writeln!(out, "   Size: {} bytes", group_thousands(size))?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Table des règles de classification
pub fn rules(out: &mut impl Write, classifier: &Classifier) -> fmt::Result {
    writeln!(out, "Automatic Playlist Generation Rules")?;
    writeln!(out, "{}", "=".repeat(50))?;

    writeln!(out, "\nIMAGE DURATION RULES (first match wins):")?;
    for (rule, keywords) in DURATION_RULES {
        writeln!(
            out,
            "   - Contains {}: {}ms",
            quote_all(keywords),
            rule.duration_ms()
        )?;
    }
    writeln!(out, "   - Otherwise: {}ms", DurationRule::Default.duration_ms())?;

    writeln!(out, "\nVIDEO AUDIO RULES (first match wins):")?;
    for (rule, keywords) in MUTE_RULES {
        writeln!(
            out,
            "   - Contains {}: {}",
            quote_all(keywords),
            audio_label(rule.muted())
        )?;
    }
    writeln!(out, "   - Otherwise: {}", audio_label(MuteRule::Default.muted()))?;

    writeln!(out, "\nSUPPORTED FILE TYPES:")?;
    writeln!(
        out,
        "   - Images: {}",
        classifier.image_extensions().collect::<Vec<_>>().join(", ")
    )?;
    writeln!(
        out,
        "   - Videos: {}",
        classifier.video_extensions().collect::<Vec<_>>().join(", ")
    )?;

    writeln!(out, "\nPLAYLIST BEHAVIOR:")?;
    writeln!(out, "   - Files are sorted alphabetically")?;
    writeln!(out, "   - Videos play for their full duration")?;
    writeln!(out, "   - Images display for the duration above")
}

/// Résumé lisible d'une playlist
pub fn playlist(out: &mut impl Write, doc: &PlaylistDocument) -> fmt::Result {
    for (i, item) in doc.items.iter().enumerate() {
        writeln!(out, "{}. {}: {}", i + 1, item.kind.as_str().to_uppercase(), item.url)?;
        match item.kind {
            MediaKind::Image => writeln!(out, "   Duration: {}ms", item.duration)?,
            MediaKind::Video => writeln!(out, "   Audio: {}", audio_label(item.muted))?,
        }
    }
    Ok(())
}

fn audio_label(muted: bool) -> &'static str {
    if muted { "Muted" } else { "With sound" }
}

fn quote_all(keywords: &[&str]) -> String {
    keywords
        .iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(" or ")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtplaylist::{PlaylistItem, PlaylistSettings};

    fn classifier() -> Classifier {
        Classifier::new(&PlaylistSettings::new("media", "data"))
    }

    #[test]
    fn empty_directory_is_reported() {
        let mut report = String::new();
        analyze(&mut report, Path::new("/srv/media"), &[], &classifier()).unwrap();
        assert_eq!(report, "No media files found in /srv/media\n");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn analyze_reports_rule_and_size() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_quick.jpg"), vec![0u8; 1500]).unwrap();
        std::fs::write(dir.path().join("bg_mute.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("c.txt"), b"x").unwrap();

        let files = vec![
            "a_quick.jpg".to_string(),
            "bg_mute.mp4".to_string(),
            "c.txt".to_string(),
        ];
        let mut report = String::new();
        analyze(&mut report, dir.path(), &files, &classifier()).unwrap();

        assert!(report.contains("Type: Image (1,500 bytes)"));
        assert!(report.contains("Duration: 2000ms (quick/short keyword)"));
        assert!(report.contains("Audio: Muted (mute/silent/background keyword)"));
        assert!(report.contains("Type: Unknown (extension: .txt)"));
    }

    #[test]
    fn rules_list_keywords_in_order() {
        let mut report = String::new();
        rules(&mut report, &classifier()).unwrap();
        let quick = report.find("'quick'").unwrap();
        let long = report.find("'long'").unwrap();
        assert!(quick < long);
        assert!(report.contains("'sound' or 'audio' or 'announcement': With sound"));
        assert!(report.contains(".webp"));
    }

    #[test]
    fn playlist_summary() {
        let doc = PlaylistDocument::new(vec![
            PlaylistItem::image("/media/a.jpg", 5000),
            PlaylistItem::video("/media/b.mp4", true),
        ]);
        let mut text = String::new();
        playlist(&mut text, &doc).unwrap();
        assert!(text.contains("1. IMAGE: /media/a.jpg"));
        assert!(text.contains("2. VIDEO: /media/b.mp4\n   Audio: Muted"));
    }
}
