use super::*;
use crate::catalog::{TrackDescriptor, TrackId};
use crate::engine::PlaybackState;
use crate::progress::ProgressSnapshot;
use crate::engine::fake::{Call, FakeEngine};
use std::path::PathBuf;

fn loaded_player() -> Player<FakeEngine> {
    let mut player = Player::new(FakeEngine::default());
    player.setup();
    player.add(&[TrackDescriptor {
        id: TrackId::new("1"),
        title: "Song".to_string(),
        artist: "Artist".to_string(),
        album: None,
        artwork: None,
        source: PathBuf::from("/tmp/1.mp3"),
        duration: None,
    }]);
    player.engine().clear_calls();
    player
}

#[test]
fn default_mapping_sends_play_for_play_pause_and_stop() {
    let player = loaded_player();
    let relay = RemoteRelay::new(RemoteMapping::default());

    for signal in [RemoteSignal::Play, RemoteSignal::Pause, RemoteSignal::Stop] {
        assert_eq!(relay.forward(signal, &player), None);
    }
    assert_eq!(
        player.engine().commands(),
        vec![Call::Play, Call::Play, Call::Play]
    );
}

#[test]
fn remote_pause_plays_under_default_mapping() {
    let player = loaded_player();
    player.engine().state.set(PlaybackState::Playing);
    RemoteRelay::new(RemoteMapping::default()).forward(RemoteSignal::Pause, &player);
    assert_eq!(player.engine().commands(), vec![Call::Play]);
}

#[test]
fn corrected_mapping_pauses_and_stops() {
    let player = loaded_player();
    let relay = RemoteRelay::new(RemoteMapping::corrected());

    relay.forward(RemoteSignal::Pause, &player);
    relay.forward(RemoteSignal::Stop, &player);
    relay.forward(RemoteSignal::Play, &player);
    assert_eq!(
        player.engine().commands(),
        vec![Call::Pause, Call::Stop, Call::Play]
    );
}

#[test]
fn play_pause_signal_toggles() {
    let player = loaded_player();
    let relay = RemoteRelay::new(RemoteMapping::default());

    relay.forward(RemoteSignal::PlayPause, &player);
    relay.forward(RemoteSignal::PlayPause, &player);
    assert_eq!(player.engine().commands(), vec![Call::Play, Call::Pause]);
}

#[test]
fn skip_signals_are_handed_back() {
    let player = loaded_player();
    let relay = RemoteRelay::new(RemoteMapping::default());

    assert_eq!(relay.forward(RemoteSignal::Next, &player), Some(SkipRequest::Next));
    assert_eq!(
        relay.forward(RemoteSignal::Previous, &player),
        Some(SkipRequest::Previous)
    );
    assert!(player.engine().commands().is_empty());
}

#[test]
fn ignored_signal_does_nothing() {
    let player = loaded_player();
    let mapping = RemoteMapping {
        stop: RemoteAction::Ignore,
        ..RemoteMapping::corrected()
    };
    assert_eq!(RemoteRelay::new(mapping).forward(RemoteSignal::Stop, &player), None);
    assert!(player.engine().commands().is_empty());
}

#[test]
fn seek_signals_bypass_the_mapping_table() {
    let player = loaded_player();
    player.engine().progress.set(ProgressSnapshot::new(30.0, 180.0));
    let mapping = RemoteMapping {
        play: RemoteAction::Ignore,
        pause: RemoteAction::Ignore,
        play_pause: RemoteAction::Ignore,
        stop: RemoteAction::Ignore,
        next: RemoteAction::Ignore,
        previous: RemoteAction::Ignore,
    };
    let relay = RemoteRelay::new(mapping);

    assert_eq!(mapping.action(RemoteSignal::SeekBy { micros: 1 }), None);
    assert_eq!(
        relay.forward(RemoteSignal::SeekBy { micros: -10_000_000 }, &player),
        None
    );
    relay.forward(RemoteSignal::SetPosition { micros: 90_500_000 }, &player);
    assert_eq!(
        player.engine().commands(),
        vec![Call::SeekTo(20.0), Call::SeekTo(90.5)]
    );
}
