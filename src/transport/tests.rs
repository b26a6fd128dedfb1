use super::*;
use crate::catalog::{TrackDescriptor, TrackId};
use crate::engine::fake::{Call, FakeEngine};
use crate::tracker::SkipBoundary;
use std::path::PathBuf;
use std::time::Duration;

fn catalog(n: usize) -> Catalog {
    let tracks = (0..n)
        .map(|i| TrackDescriptor {
            id: TrackId::new(i.to_string()),
            title: format!("Song {i}"),
            artist: "Artist".to_string(),
            album: None,
            artwork: None,
            source: PathBuf::from(format!("/tmp/{i}.mp3")),
            duration: None,
        })
        .collect();
    Catalog::new(tracks).unwrap()
}

fn loaded_player(catalog: &Catalog) -> Player<FakeEngine> {
    let mut player = Player::new(FakeEngine::default());
    player.setup();
    player.add(catalog.tracks());
    player.engine().clear_calls();
    player
}

#[test]
fn transport_state_collapses_everything_but_playing() {
    assert_eq!(TransportState::from(PlaybackState::Playing), TransportState::Playing);
    for s in [
        PlaybackState::Idle,
        PlaybackState::Buffering,
        PlaybackState::Paused,
        PlaybackState::Stopped,
        PlaybackState::Error,
    ] {
        assert_eq!(TransportState::from(s), TransportState::Paused, "{s:?}");
    }
}

#[test]
fn toggle_from_paused_issues_exactly_one_play() {
    let c = catalog(3);
    let player = loaded_player(&c);
    player.engine().state.set(PlaybackState::Paused);

    assert_eq!(toggle(&player), Some(TransportCommand::Play));
    assert_eq!(player.engine().commands(), vec![Call::Play]);
}

#[test]
fn toggle_from_playing_issues_exactly_one_pause() {
    let c = catalog(3);
    let player = loaded_player(&c);
    player.engine().state.set(PlaybackState::Playing);

    assert_eq!(toggle(&player), Some(TransportCommand::Pause));
    assert_eq!(player.engine().commands(), vec![Call::Pause]);
}

#[test]
fn toggle_from_stopped_plays() {
    let c = catalog(3);
    let player = loaded_player(&c);
    player.engine().state.set(PlaybackState::Stopped);

    assert_eq!(toggle(&player), Some(TransportCommand::Play));
}

#[test]
fn toggle_without_loaded_track_issues_nothing() {
    let mut player = Player::new(FakeEngine::default());
    player.setup();
    player.engine().state.set(PlaybackState::Paused);

    assert_eq!(toggle(&player), None);
    assert!(player.engine().commands().is_empty());
}

#[test]
fn skip_delegates_to_carousel_scroll() {
    let mut carousel = Carousel::new(5, 4.0, Duration::from_millis(300));
    carousel.set_page_width(320.0);
    let mut tracker = ActiveTrackTracker::new(SkipBoundary::Clamp);
    tracker.mount(&mut carousel);

    assert_eq!(skip_next(&tracker, &mut carousel), Some(320.0));
    assert!(!carousel.is_idle());
    assert_eq!(skip_previous(&tracker, &mut carousel), Some(0.0));
}

#[test]
fn settled_page_skips_engine_only_when_track_differs() {
    let c = catalog(5);
    let player = loaded_player(&c);

    assert!(!sync_engine_to_page(0, &c, &player));
    assert!(sync_engine_to_page(3, &c, &player));
    assert!(!sync_engine_to_page(9, &c, &player));
    assert_eq!(
        player.engine().commands(),
        vec![Call::Skip(TrackId::new("3"))]
    );
}

#[test]
fn settled_page_without_loaded_track_issues_nothing() {
    let c = catalog(5);
    let mut player = Player::new(FakeEngine::default());
    player.setup();

    assert!(!sync_engine_to_page(2, &c, &player));
    assert!(player.engine().commands().is_empty());
}
