use super::*;
use crate::catalog::{Catalog, TrackDescriptor, TrackId};
use crate::engine::fake::{Call, FakeEngine};
use crate::engine::{PlaybackState, Player, RepeatMode};
use crate::progress::ProgressSnapshot;
use crate::relay::RemoteSignal;
use crate::tracker::SkipBoundary;
use crate::transport::{TransportCommand, TransportState};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const W: u16 = 320;

fn catalog(n: usize) -> Catalog {
    let tracks = (0..n)
        .map(|i| TrackDescriptor {
            id: TrackId::new(i.to_string()),
            title: format!("Song {i}"),
            artist: format!("Artist {i}"),
            album: None,
            artwork: None,
            source: PathBuf::from(format!("/tmp/{i}.mp3")),
            duration: Some(Duration::from_secs(180)),
        })
        .collect();
    Catalog::new(tracks).unwrap()
}

fn app_with(n: usize, config: &ScreenConfig, loaded: bool) -> App<FakeEngine> {
    let catalog = catalog(n);
    let mut player = Player::new(FakeEngine::default());
    player.setup();
    if loaded {
        player.add(catalog.tracks());
    }
    player.engine().clear_calls();

    let mut app = App::new(catalog, player, config);
    app.set_viewport_width(W);
    app.mount();
    app.sync_engine_state();
    app
}

fn app(n: usize) -> App<FakeEngine> {
    app_with(n, &ScreenConfig::default(), true)
}

fn settle(app: &mut App<FakeEngine>) -> usize {
    for _ in 0..2000 {
        if let Some(page) = app.tick(Duration::from_millis(16)) {
            return page;
        }
    }
    panic!("carousel never settled");
}

fn commands(app: &App<FakeEngine>) -> Vec<Call> {
    app.player.engine().commands()
}

#[test]
fn labels_follow_swipe_offsets() {
    let mut app = app(5);
    assert_eq!(app.active_index(), 0);
    assert_eq!(app.active_track().map(|t| t.title.as_str()), Some("Song 0"));

    app.carousel.drag_by(300.0);
    assert_eq!(app.active_index(), 1);
    app.carousel.drag_by(340.0);
    assert_eq!(app.active_index(), 2);
    assert_eq!(app.active_track().map(|t| t.artist.as_str()), Some("Artist 2"));
}

#[test]
fn mount_registers_a_single_observer() {
    let mut app = app(3);
    app.mount();
    assert!(app.is_mounted());
    assert_eq!(app.carousel.listener_count(), 1);
}

#[test]
fn unmount_detaches_observer_and_stops_polling() {
    let mut app = app(5);
    app.unmount();
    assert!(!app.is_mounted());
    assert_eq!(app.carousel.listener_count(), 0);

    app.carousel.drag_by(640.0);
    assert_eq!(app.active_index(), 0);
    assert!(!app.poll_progress(Instant::now()));
}

#[test]
fn unmounted_screen_ignores_engine_state() {
    let mut app = app(3);
    app.unmount();
    app.player.engine().state.set(PlaybackState::Playing);
    app.sync_engine_state();
    assert_eq!(app.playback, PlaybackState::Paused);
}

#[test]
fn toggle_flips_the_transport_icon() {
    let mut app = app(3);
    assert_eq!(app.transport_state(), TransportState::Paused);

    assert_eq!(app.toggle_playback(), Some(TransportCommand::Play));
    assert_eq!(app.transport_state(), TransportState::Playing);

    assert_eq!(app.toggle_playback(), Some(TransportCommand::Pause));
    assert_eq!(app.transport_state(), TransportState::Paused);
    assert_eq!(commands(&app), vec![Call::Play, Call::Pause]);
}

#[test]
fn nothing_reaches_the_engine_without_a_loaded_track() {
    let mut app = app_with(3, &ScreenConfig::default(), false);
    assert_eq!(app.toggle_playback(), None);

    app.skip_next();
    assert_eq!(settle(&mut app), 1);
    assert_eq!(app.active_index(), 1);
    assert!(commands(&app).is_empty());
}

#[test]
fn skip_next_moves_carousel_then_engine_on_settle() {
    let mut app = app(5);
    assert_eq!(app.skip_next(), Some(320.0));
    assert_eq!(app.active_index(), 0);

    assert_eq!(settle(&mut app), 1);
    assert_eq!(app.active_index(), 1);
    assert_eq!(commands(&app), vec![Call::Skip(TrackId::new("1"))]);
    assert_eq!(app.engine_track, Some(TrackId::new("1")));
}

#[test]
fn skip_forward_on_last_track_stays_put_by_default() {
    let mut app = app(5);
    app.carousel.drag_by(4.0 * f32::from(W));
    settle(&mut app);
    assert_eq!(app.active_index(), 4);

    assert_eq!(app.skip_next(), Some(4.0 * f32::from(W)));
}

#[test]
fn unbounded_skip_requests_past_the_end() {
    let config = ScreenConfig {
        skip_boundary: SkipBoundary::Unbounded,
        ..ScreenConfig::default()
    };
    let mut app = app_with(5, &config, true);
    app.carousel.drag_by(4.0 * f32::from(W));
    settle(&mut app);

    assert_eq!(app.skip_next(), Some(5.0 * f32::from(W)));
    assert_eq!(settle(&mut app), 4);
}

#[test]
fn settle_sync_can_be_disabled() {
    let config = ScreenConfig {
        sync_engine_on_settle: false,
        ..ScreenConfig::default()
    };
    let mut app = app_with(3, &config, true);
    app.skip_next();
    settle(&mut app);
    assert!(commands(&app).is_empty());
}

#[test]
fn carousel_follows_engine_auto_advance() {
    let mut app = app(5);
    app.player.engine().set_current(Some("2"));
    app.sync_engine_state();

    assert_eq!(settle(&mut app), 2);
    assert_eq!(app.active_index(), 2);
    // already on that track: no skip back
    assert!(commands(&app).is_empty());
}

#[test]
fn follow_waits_while_the_user_is_swiping() {
    let mut app = app(5);
    app.swipe(1.0);
    app.player.engine().set_current(Some("3"));
    app.sync_engine_state();

    assert_eq!(settle(&mut app), 0);
    assert_eq!(commands(&app), vec![Call::Skip(TrackId::new("0"))]);
}

#[test]
fn follow_can_be_disabled() {
    let config = ScreenConfig {
        follow_playback: false,
        ..ScreenConfig::default()
    };
    let mut app = app_with(5, &config, true);
    app.player.engine().set_current(Some("2"));
    app.sync_engine_state();
    assert!(app.carousel.is_idle());
    assert_eq!(app.active_index(), 0);
}

#[test]
fn swipe_moves_by_drag_fraction_of_a_page() {
    let mut app = app(5);
    app.swipe(1.0);
    assert_eq!(app.carousel.offset(), 40.0);
    app.swipe(-1.0);
    app.swipe(-1.0);
    assert_eq!(app.carousel.offset(), 0.0);
}

#[test]
fn progress_is_polled_on_cadence() {
    let mut app = app(3);
    app.player.engine().progress.set(ProgressSnapshot::new(12.0, 180.0));

    let t0 = Instant::now();
    assert!(app.poll_progress(t0));
    assert_eq!(app.progress.position_secs, 12.0);
    assert!(!app.poll_progress(t0 + Duration::from_millis(500)));
    assert!(app.poll_progress(t0 + Duration::from_millis(1000)));
}

#[test]
fn scrub_seeks_relative_to_last_known_position() {
    let mut app = app(3);
    app.progress = ProgressSnapshot::new(30.0, 180.0);
    app.scrub(1.0);
    app.progress = ProgressSnapshot::new(2.0, 180.0);
    app.scrub(-1.0);
    assert_eq!(commands(&app), vec![Call::SeekTo(35.0), Call::SeekTo(-3.0)]);
}

#[test]
fn repeat_cycles_and_reaches_engine() {
    let mut app = app(3);
    assert_eq!(app.repeat_mode, RepeatMode::Queue);
    app.cycle_repeat();
    app.cycle_repeat();
    assert_eq!(app.repeat_mode, RepeatMode::Off);
    assert_eq!(
        commands(&app),
        vec![Call::Repeat(RepeatMode::Track), Call::Repeat(RepeatMode::Off)]
    );
}

#[test]
fn remote_pause_plays_under_default_mapping() {
    let mut app = app(3);
    app.handle_remote(RemoteSignal::Pause);
    assert_eq!(commands(&app), vec![Call::Play]);
    assert_eq!(app.transport_state(), TransportState::Playing);
}

#[test]
fn remote_next_scrolls_the_carousel() {
    let mut app = app(3);
    app.handle_remote(RemoteSignal::Next);
    assert_eq!(settle(&mut app), 1);
    assert_eq!(commands(&app), vec![Call::Skip(TrackId::new("1"))]);
}

#[test]
fn metadata_window_toggles() {
    let mut app = app(1);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    app.toggle_metadata_window();
    assert!(!app.metadata_window);
}

#[test]
fn shutdown_unmounts_and_stops_the_engine() {
    let mut app = app(3);
    app.shutdown(Duration::from_millis(250));
    assert!(!app.is_mounted());
    assert_eq!(app.carousel.listener_count(), 0);
    assert_eq!(app.player.engine().calls(), vec![Call::Shutdown]);
}
