//! MPRIS service on the session bus: the source of remote-control signals.
//!
//! Method calls are forwarded as [`RemoteEvent`]s over a channel to the UI
//! loop; the loop publishes playback status and track metadata back through
//! [`MprisHandle`].

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::catalog::TrackDescriptor;
use crate::engine::PlaybackState;
use crate::relay::RemoteSignal;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.swipetune";
const NOTIFY_POLL: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteEvent {
    Signal(RemoteSignal),
    Quit,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    art_url: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    track_id: Option<OwnedObjectPath>,
}

/// UI-side handle; setters mark properties changed for the service thread.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        if s.playback != playback {
            s.playback = playback;
            let _ = self.notify.send(());
        }
    }

    /// Position is polled by clients, so no change signal is sent.
    pub fn set_position(&self, seconds: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = (seconds * 1_000_000.0) as i64;
        }
    }

    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&TrackDescriptor>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        let track_id = index.and_then(|i| {
            ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}"))
                .ok()
                .map(OwnedObjectPath::from)
        });
        if s.track_id == track_id && s.title.as_deref() == track.map(|t| t.title.as_str()) {
            return;
        }

        s.track_id = track_id;
        s.title = track.map(|t| t.title.clone());
        s.artist = track.map(|t| vec![t.artist.clone()]).unwrap_or_default();
        s.album = track.and_then(|t| t.album.clone());
        s.art_url = track
            .and_then(|t| t.artwork.as_ref())
            .map(|p| format!("file://{}", p.display()));
        s.url = track.map(|t| format!("file://{}", t.source.display()));
        s.length_micros = track
            .and_then(|t| t.duration)
            .and_then(|d| i64::try_from(d.as_micros()).ok());
        let _ = self.notify.send(());
    }
}

fn status_str(playback: PlaybackState) -> &'static str {
    match playback {
        PlaybackState::Playing | PlaybackState::Buffering => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Idle | PlaybackState::Stopped | PlaybackState::Error => "Stopped",
    }
}

struct RootIface {
    tx: Sender<RemoteEvent>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(RemoteEvent::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "swipetune"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<RemoteEvent>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn send(&self, signal: RemoteSignal) {
        debug!(?signal, "mpris call");
        let _ = self.tx.send(RemoteEvent::Signal(signal));
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.send(RemoteSignal::Next);
    }

    fn previous(&self) {
        self.send(RemoteSignal::Previous);
    }

    fn play(&self) {
        self.send(RemoteSignal::Play);
    }

    fn pause(&self) {
        self.send(RemoteSignal::Pause);
    }

    fn play_pause(&self) {
        self.send(RemoteSignal::PlayPause);
    }

    fn stop(&self) {
        self.send(RemoteSignal::Stop);
    }

    fn seek(&self, offset: i64) {
        self.send(RemoteSignal::SeekBy { micros: offset });
    }

    /// Ignored unless `track_id` is the current track.
    fn set_position(&self, track_id: ObjectPath<'_>, position: i64) {
        let current = self
            .state
            .lock()
            .ok()
            .and_then(|s| s.track_id.clone());
        if current.as_ref().map(|p| p.as_str()) != Some(track_id.as_str()) {
            debug!(%track_id, "set position for a stale track");
            return;
        }
        self.send(RemoteSignal::SetPosition { micros: position });
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        status_str(s.playback)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        put("xesam:title", Value::from(s.title.clone().unwrap_or_default()));
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(art) = &s.art_url {
            put("mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Start the MPRIS service on its own thread. Bus failures are logged and
/// leave the player without remote control.
pub fn spawn_mpris(tx: Sender<RemoteEvent>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel();

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("mpris".to_string())
        .spawn(move || block_on(serve(tx, state_for_thread, notify_rx)));
    if let Err(e) = spawned {
        warn!(error = %e, "mpris: failed to spawn service thread");
    }

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

async fn serve(tx: Sender<RemoteEvent>, state: Arc<Mutex<SharedState>>, notify: Receiver<()>) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "mpris: failed to connect to session bus");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        warn!(error = %e, "mpris: failed to acquire name");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await
    {
        warn!(error = %e, "mpris: failed to register root iface");
        return;
    }

    if let Err(e) = object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await
    {
        warn!(error = %e, "mpris: failed to register player iface");
        return;
    }

    let player: InterfaceRef<PlayerIface> = match object_server.interface(OBJECT_PATH).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "mpris: player iface missing after registration");
            return;
        }
    };
    info!(name = BUS_NAME, "mpris service registered");

    loop {
        Timer::after(NOTIFY_POLL).await;
        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                // UI side is gone.
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if changed {
            emit_changes(&player).await;
        }
    }
}

async fn emit_changes(player: &InterfaceRef<PlayerIface>) {
    let emitter = player.signal_emitter();
    let iface = player.get().await;
    if let Err(e) = iface.playback_status_changed(emitter).await {
        debug!(error = %e, "mpris: playback status signal failed");
    }
    if let Err(e) = iface.metadata_changed(emitter).await {
        debug!(error = %e, "mpris: metadata signal failed");
    }
}
