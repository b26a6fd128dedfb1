use super::load::{CatalogSource, read_catalog, resolve_source};
use super::manifest::parse_manifest;
use super::*;
use crate::config::CatalogSettings;
use crate::engine::Player;
use crate::engine::fake::{Call, FakeEngine};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const MANIFEST: &str = r#"
[[track]]
id = 1
title = "Faded"
artist = "Alan Walker"
artwork = "artwork/faded.jpg"
url = "audio/faded.mp3"
duration_secs = 212.5

[[track]]
id = "two"
title = "Alone"
artist = "Marshmello"
url = "/abs/alone.mp3"
"#;

fn settings_for(source: &Path) -> CatalogSettings {
    CatalogSettings {
        source: Some(source.to_path_buf()),
        ..CatalogSettings::default()
    }
}

#[test]
fn manifest_resolves_relative_paths_and_accepts_numeric_ids() {
    let tracks = parse_manifest(MANIFEST, Path::new("/music")).unwrap();
    assert_eq!(tracks.len(), 2);

    assert_eq!(tracks[0].id, TrackId::new("1"));
    assert_eq!(tracks[0].artwork, Some(PathBuf::from("/music/artwork/faded.jpg")));
    assert_eq!(tracks[0].source, PathBuf::from("/music/audio/faded.mp3"));
    assert_eq!(tracks[0].duration.map(|d| d.as_millis()), Some(212_500));

    assert_eq!(tracks[1].id, TrackId::new("two"));
    assert_eq!(tracks[1].source, PathBuf::from("/abs/alone.mp3"));
    assert!(tracks[1].artwork.is_none());
}

#[test]
fn unrepresentable_durations_are_treated_as_unknown() {
    let text = r#"
[[track]]
id = 1
title = "Huge"
url = "a.mp3"
duration_secs = 1e30

[[track]]
id = 2
title = "Negative"
url = "b.mp3"
duration_secs = -3.0

[[track]]
id = 3
title = "Infinite"
url = "c.mp3"
duration_secs = inf
"#;
    let tracks = parse_manifest(text, Path::new("/music")).unwrap();
    assert_eq!(tracks.len(), 3);
    for t in &tracks {
        assert_eq!(t.duration, None, "{}", t.title);
    }

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tracks.toml"), text).unwrap();
    let catalog = read_catalog(&settings_for(dir.path())).unwrap();
    assert_eq!(catalog.len(), 3);
}

#[test]
fn catalog_rejects_duplicate_ids() {
    let mut tracks = parse_manifest(MANIFEST, Path::new("/music")).unwrap();
    tracks[1].id = TrackId::new("1");
    match Catalog::new(tracks) {
        Err(CatalogError::DuplicateId(id)) => assert_eq!(id.as_str(), "1"),
        other => panic!("expected duplicate id error, got {other:?}"),
    }
}

#[test]
fn catalog_keeps_order_and_finds_indices() {
    let catalog = Catalog::new(parse_manifest(MANIFEST, Path::new("/m")).unwrap()).unwrap();
    assert_eq!(catalog.get(0).unwrap().title, "Faded");
    assert_eq!(catalog.index_of(&TrackId::new("two")), Some(1));
    assert_eq!(catalog.index_of(&TrackId::new("nope")), None);
}

#[test]
fn directory_with_manifest_is_read_as_manifest() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tracks.toml"), MANIFEST).unwrap();
    fs::write(dir.path().join("ignored.mp3"), b"not real").unwrap();

    let settings = settings_for(dir.path());
    assert_eq!(
        resolve_source(&settings),
        CatalogSource::Manifest(dir.path().join("tracks.toml"))
    );
    let catalog = read_catalog(&settings).unwrap();
    assert_eq!(catalog.len(), 2);
}

#[test]
fn directory_without_manifest_is_scanned() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("song.mp3"), b"not real").unwrap();

    let settings = settings_for(dir.path());
    assert_eq!(
        resolve_source(&settings),
        CatalogSource::Directory(dir.path().to_path_buf())
    );
    assert_eq!(read_catalog(&settings).unwrap().len(), 1);
}

#[test]
fn broken_manifest_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.toml");
    fs::write(&path, "[[track]]\ntitle = 3").unwrap();
    assert!(matches!(
        read_catalog(&settings_for(&path)),
        Err(CatalogError::Manifest { .. })
    ));
}

#[test]
fn load_queues_catalog_in_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tracks.toml"), MANIFEST).unwrap();

    let mut player = Player::new(FakeEngine::default());
    let catalog = load(&settings_for(dir.path()), &mut player);

    assert_eq!(catalog.len(), 2);
    assert_eq!(
        player.engine().calls(),
        vec![
            Call::Setup,
            Call::Add(vec![TrackId::new("1"), TrackId::new("two")])
        ]
    );
}

#[test]
fn load_survives_engine_setup_failure() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tracks.toml"), MANIFEST).unwrap();

    let engine = FakeEngine::default();
    engine.fail_setup.set(true);
    let mut player = Player::new(engine);
    let catalog = load(&settings_for(dir.path()), &mut player);

    assert_eq!(catalog.len(), 2);
    assert_eq!(player.engine().calls(), vec![Call::Setup]);
    assert_eq!(player.current_track(), None);
}

#[test]
fn load_of_missing_source_gives_empty_catalog() {
    let dir = tempdir().unwrap();
    let mut player = Player::new(FakeEngine::default());
    let catalog = load(&settings_for(&dir.path().join("missing")), &mut player);

    assert!(catalog.is_empty());
    // Nothing to queue; the engine is still set up.
    assert_eq!(player.engine().calls(), vec![Call::Setup]);
}
