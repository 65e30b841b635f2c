use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;
use vtplaylist::{
    Error, MediaKind, PlaylistDocument, PlaylistItem, PlaylistSettings, Reconciler,
    Reconciliation, RegenerateReason,
};

/// Répertoires média et données dans un tempdir
struct Fixture {
    _dir: TempDir,
    settings: PlaylistSettings,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        fs::create_dir_all(&media).unwrap();
        for f in files {
            fs::write(media.join(f), b"data").unwrap();
        }
        let settings = PlaylistSettings::new(media, dir.path().join("data"));
        Self { _dir: dir, settings }
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.settings.clone())
    }

    fn media(&self) -> &Path {
        &self.settings.media_dir
    }

    fn persisted(&self) -> PlaylistDocument {
        let raw = fs::read_to_string(&self.settings.playlist_file).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn persist(&self, doc: &PlaylistDocument) {
        fs::create_dir_all(self.settings.playlist_file.parent().unwrap()).unwrap();
        fs::write(
            &self.settings.playlist_file,
            serde_json::to_string_pretty(doc).unwrap(),
        )
        .unwrap();
    }
}

fn image(url: &str, duration: i64) -> PlaylistItem {
    PlaylistItem::image(url, duration)
}

#[test]
fn test_scenario_a_generation_from_directory() {
    let fx = Fixture::new(&["a_quick.jpg", "b_sound.mp4", "c.txt"]);

    let playlist = fx.reconciler().get_playlist();

    assert_eq!(
        playlist.items,
        vec![
            image("/media/a_quick.jpg", 2000),
            PlaylistItem::video("/media/b_sound.mp4", false),
        ]
    );
    // Le document généré est persisté
    assert_eq!(fx.persisted(), playlist);
}

#[test]
fn test_scenario_b_empty_directory_gives_fallback() {
    let fx = Fixture::new(&[]);

    let playlist = fx.reconciler().get_playlist();

    assert_eq!(playlist.items, vec![image("/media/default.jpg", 5000)]);
    assert!(!playlist.items[0].muted);
}

#[test]
fn test_missing_media_directory_gives_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let settings = PlaylistSettings::new(dir.path().join("nowhere"), dir.path().join("data"));

    let report = Reconciler::new(settings).regenerate().unwrap();
    assert_eq!(report.playlist.items, vec![image("/media/default.jpg", 5000)]);
}

#[test]
fn test_scenario_c_partial_pruning() {
    let fx = Fixture::new(&["one.jpg", "two.jpg", "three.mp4"]);
    let reconciler = fx.reconciler();
    reconciler.regenerate().unwrap();

    fs::remove_file(fx.media().join("two.jpg")).unwrap();

    let reconciled = reconciler.reconcile().unwrap();
    assert_eq!(reconciled.action, Reconciliation::Pruned { removed: 1 });
    assert_eq!(
        reconciled.document.items,
        vec![
            image("/media/one.jpg", 5000),
            PlaylistItem::video("/media/three.mp4", false),
        ]
    );
    assert_eq!(fx.persisted(), reconciled.document);
}

#[test]
fn test_pruning_keeps_caller_order_and_values() {
    let fx = Fixture::new(&["a.jpg", "b.jpg"]);
    fx.persist(&PlaylistDocument::new(vec![
        image("/media/b.jpg", 1234),
        image("/media/gone.jpg", 5000),
        image("/media/a.jpg", 42),
    ]));

    let playlist = fx.reconciler().get_playlist();
    assert_eq!(
        playlist.items,
        vec![image("/media/b.jpg", 1234), image("/media/a.jpg", 42)]
    );
}

#[test]
fn test_scenario_d_all_invalid_triggers_regeneration() {
    let fx = Fixture::new(&["new_logo.png"]);
    fx.persist(&PlaylistDocument::new(vec![
        image("/media/old1.jpg", 5000),
        PlaylistItem::video("/media/old2.mp4", true),
    ]));

    let reconciled = fx.reconciler().reconcile().unwrap();

    assert_eq!(
        reconciled.action,
        Reconciliation::Regenerated(RegenerateReason::AllInvalid)
    );
    assert_eq!(reconciled.document.items, vec![image("/media/new_logo.png", 3000)]);
    assert_eq!(fx.persisted(), reconciled.document);
}

#[test]
fn test_scenario_e_update_missing_url_is_rejected() {
    let fx = Fixture::new(&["a.jpg"]);
    let reconciler = fx.reconciler();
    let before = reconciler.regenerate().unwrap().playlist;

    let err = reconciler
        .apply_update(&json!({"items": [{"type": "image"}]}))
        .unwrap_err();

    assert!(matches!(err, Error::InvalidItem { index: 0, .. }));
    assert_eq!(err.to_string(), "Item 0 must have a valid 'url' string.");
    // Aucune modification partielle
    assert_eq!(fx.persisted(), before);
}

#[test]
fn test_consistent_playlist_is_not_rewritten() {
    let fx = Fixture::new(&["a.jpg"]);
    let doc = PlaylistDocument::new(vec![
        image("/media/a.jpg", 7000),
        image("https://cdn.example.com/remote.jpg", 5000),
    ]);
    fx.persist(&doc);
    let raw_before = fs::read(&fx.settings.playlist_file).unwrap();

    let reconciled = fx.reconciler().reconcile().unwrap();

    assert_eq!(reconciled.action, Reconciliation::Unchanged);
    assert_eq!(reconciled.document, doc);
    assert_eq!(fs::read(&fx.settings.playlist_file).unwrap(), raw_before);
}

#[test]
fn test_remote_urls_are_kept_unchecked() {
    let fx = Fixture::new(&[]);
    fx.persist(&PlaylistDocument::new(vec![
        image("https://cdn.example.com/remote.jpg", 5000),
        image("/media/gone.jpg", 5000),
    ]));

    let playlist = fx.reconciler().get_playlist();
    assert_eq!(
        playlist.items,
        vec![image("https://cdn.example.com/remote.jpg", 5000)]
    );
}

#[test]
fn test_traversal_urls_count_as_missing() {
    let fx = Fixture::new(&["a.jpg"]);
    fs::create_dir_all(fx.settings.playlist_file.parent().unwrap()).unwrap();
    fx.persist(&PlaylistDocument::new(vec![
        image("/media/a.jpg", 5000),
        image("/media/../data/playlist.json", 5000),
    ]));

    let playlist = fx.reconciler().get_playlist();
    assert_eq!(playlist.items, vec![image("/media/a.jpg", 5000)]);
}

#[test]
fn test_empty_and_malformed_documents_are_regenerated() {
    let fx = Fixture::new(&["a.jpg"]);
    let reconciler = fx.reconciler();

    fx.persist(&PlaylistDocument::default());
    let reconciled = reconciler.reconcile().unwrap();
    assert_eq!(
        reconciled.action,
        Reconciliation::Regenerated(RegenerateReason::Absent)
    );

    fs::write(&fx.settings.playlist_file, "{\"items\": [{\"type\": \"gif\"}]").unwrap();
    let reconciled = reconciler.reconcile().unwrap();
    assert_eq!(
        reconciled.action,
        Reconciliation::Regenerated(RegenerateReason::Absent)
    );
    assert_eq!(reconciled.document.items, vec![image("/media/a.jpg", 5000)]);
}

#[test]
fn test_regenerate_is_idempotent() {
    let fx = Fixture::new(&["z.mp4", "a_short.png", "m_background.webm", "notes.md"]);
    let reconciler = fx.reconciler();

    let first = reconciler.regenerate().unwrap();
    let bytes_first = fs::read(&fx.settings.playlist_file).unwrap();
    let second = reconciler.regenerate().unwrap();
    let bytes_second = fs::read(&fx.settings.playlist_file).unwrap();

    assert_eq!(first, second);
    assert_eq!(bytes_first, bytes_second);
    assert_eq!(first.message, "Playlist regenerated with 3 items");
    assert_eq!(first.playlist.items[1].kind, MediaKind::Video);
    assert!(first.playlist.items[1].muted);
}

#[test]
fn test_reconciliation_is_monotonic() {
    let fx = Fixture::new(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    let reconciler = fx.reconciler();
    reconciler.regenerate().unwrap();

    for gone in ["b.jpg", "d.jpg", "a.jpg"] {
        fs::remove_file(fx.media().join(gone)).unwrap();
        let playlist = reconciler.get_playlist();

        let existing = fs::read_dir(fx.media()).unwrap().count();
        assert!(playlist.len() <= existing);
        for item in &playlist.items {
            let name = item.url.trim_start_matches("/media/");
            assert!(fx.media().join(name).is_file(), "{name} was invented");
        }
    }
    assert_eq!(reconciler.get_playlist().items, vec![image("/media/c.jpg", 5000)]);
}

#[test]
fn test_update_is_persisted_verbatim() {
    let fx = Fixture::new(&["clip.mp4", "a.jpg"]);
    let reconciler = fx.reconciler();

    let doc = reconciler
        .apply_update(&json!({"items": [
            {"type": "video", "url": "/media/clip.mp4", "duration": 15000, "muted": true},
            {"type": "image", "url": "/media/a.jpg"},
            {"type": "image", "url": "/media/a.jpg", "duration": 1}
        ]}))
        .unwrap();

    assert_eq!(doc.items[0].duration, 15000);
    assert!(doc.items[0].muted);
    assert_eq!(doc.items[1].duration, 5000);
    assert_eq!(doc.items[2].duration, 1);
    assert_eq!(fx.persisted(), doc);
    assert_eq!(reconciler.get_playlist(), doc);
}

#[test]
fn test_update_rejects_missing_local_file() {
    let fx = Fixture::new(&["a.jpg"]);
    let err = fx
        .reconciler()
        .apply_update(&json!({"items": [
            {"type": "image", "url": "/media/a.jpg"},
            {"type": "video", "url": "/media/missing.mp4"}
        ]}))
        .unwrap_err();

    assert!(matches!(err, Error::ItemMediaNotFound { index: 1, .. }));
    assert_eq!(err.to_string(), "Item 1: Media file 'missing.mp4' not found.");
    assert!(!fx.settings.playlist_file.exists());
}

#[test]
fn test_update_payload_shape_errors() {
    let fx = Fixture::new(&[]);
    let reconciler = fx.reconciler();

    let cases = [
        (json!([1, 2]), "Invalid playlist format. Must have 'items' array."),
        (json!({"list": []}), "Invalid playlist format. Must have 'items' array."),
        (json!({"items": {}}), "Playlist 'items' must be an array."),
        (json!({"items": ["x"]}), "Item 0 must be an object."),
        (
            json!({"items": [{"type": "image", "url": "http://a/b.jpg"}, {"type": "audio", "url": "x"}]}),
            "Item 1 has invalid type 'audio'. Must be 'image' or 'video'.",
        ),
        (
            json!({"items": [{"type": "image", "url": ""}]}),
            "Item 0 must have a valid 'url' string.",
        ),
        (
            json!({"items": [{"type": "image", "url": "/media/../secret.jpg"}]}),
            "Item 0 has a 'url' outside the media directory.",
        ),
        (
            json!({"items": [{"type": "image", "url": "http://a/b.jpg", "duration": "long"}]}),
            "Item 0 has invalid 'duration'. Must be an integer.",
        ),
    ];

    for (payload, message) in cases {
        let err = reconciler.apply_update(&payload).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_empty_update_is_accepted_then_regenerated_on_read() {
    let fx = Fixture::new(&["a.jpg"]);
    let reconciler = fx.reconciler();

    let doc = reconciler.apply_update(&json!({"items": []})).unwrap();
    assert!(doc.is_empty());
    assert_eq!(reconciler.get_playlist().items, vec![image("/media/a.jpg", 5000)]);
}

#[test]
fn test_unexpected_read_failure_is_masked() {
    let fx = Fixture::new(&["a.jpg"]);
    // Un répertoire à la place du document : erreur d'E/S à la lecture
    fs::create_dir_all(&fx.settings.playlist_file).unwrap();

    let reconciler = fx.reconciler();
    assert!(matches!(reconciler.reconcile(), Err(Error::Store(_))));
    assert_eq!(
        reconciler.get_playlist().items,
        vec![image("/media/default.jpg", 5000)]
    );
}

#[test]
fn test_persistence_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();
    let settings = PlaylistSettings::new(dir.path(), &blocker);

    let err = Reconciler::new(settings).regenerate().unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert!(!err.is_rejection());
}

#[test]
fn test_custom_prefix_and_default_filename() {
    let fx = Fixture::new(&[]);
    let settings = fx
        .settings
        .clone()
        .with_url_prefix("/signage/")
        .with_default_filename("placeholder.png");

    let playlist = Reconciler::new(settings).get_playlist();
    assert_eq!(playlist.items, vec![image("/signage/placeholder.png", 5000)]);
}

#[test]
fn test_update_is_not_lost_during_concurrent_reconcile() {
    let fx = Fixture::new(&["a.jpg", "c.jpg"]);
    let update = json!({"items": [{"type": "image", "url": "/media/c.jpg", "duration": 1234}]});
    let expected = vec![image("/media/c.jpg", 1234)];

    for _ in 0..200 {
        fx.persist(&PlaylistDocument::new(vec![
            image("/media/a.jpg", 5000),
            image("/media/gone.jpg", 5000),
        ]));

        let barrier = Arc::new(Barrier::new(2));
        let reader = {
            let reconciler = fx.reconciler();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                reconciler.get_playlist()
            })
        };

        let reconciler = fx.reconciler();
        barrier.wait();
        let accepted = reconciler.apply_update(&update).unwrap();
        reader.join().unwrap();

        // La réconciliation passe avant la mise à jour, ou voit déjà le
        // nouveau document ; elle ne l'écrase jamais
        assert_eq!(accepted.items, expected);
        assert_eq!(fx.persisted().items, expected);
    }
}
