use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/swipetune/config.toml` or `~/.config/swipetune/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SWIPETUNE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub carousel: CarouselSettings,
    pub progress: ProgressSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub remote: RemoteSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Track manifest file, or a directory. A directory containing
    /// `manifest_name` is read as a manifest, anything else is scanned.
    /// Defaults to the working directory.
    pub source: Option<PathBuf>,
    pub manifest_name: String,

    /// File extensions to treat as audio when scanning (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Cover image file names looked up next to scanned tracks, in order.
    pub artwork_names: Vec<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: None,
            manifest_name: "tracks.toml".to_string(),
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            artwork_names: vec![
                "cover.jpg".into(),
                "cover.png".into(),
                "folder.jpg".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    /// What skip does at the first/last track.
    pub skip_boundary: SkipBoundarySetting,
    /// Speed of programmatic scrolls and page snapping, in pages per second.
    pub pages_per_second: f32,
    /// Quiet time after the last swipe step before the carousel snaps to a page.
    pub settle_delay_ms: u64,
    /// Fraction of a page moved by one swipe key press.
    pub drag_fraction: f32,
    /// Scroll to the engine's track when it changes on its own (auto-advance, remote skip).
    pub follow_playback: bool,
    /// Switch the engine to the track the carousel settles on.
    pub sync_engine_on_settle: bool,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            skip_boundary: SkipBoundarySetting::Clamp,
            pages_per_second: 4.0,
            settle_delay_ms: 250,
            drag_fraction: 0.125,
            follow_playback: true,
            sync_engine_on_settle: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipBoundarySetting {
    #[serde(alias = "clamped")]
    Clamp,
    #[serde(alias = "unclamped")]
    Unbounded,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// How often position/duration are polled from the engine.
    pub poll_interval_ms: u64,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds the progress slider moves when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Default repeat mode.
    pub repeat_mode: RepeatModeSetting,
    /// Start playing the first track right after loading.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat_mode: RepeatModeSetting::Queue,
            autoplay: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "none", alias = "no-loop")]
    Off,
    #[serde(alias = "repeat-one", alias = "loop-one")]
    Track,
    #[serde(alias = "loop-all", alias = "loop-around")]
    Queue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Label under the left end of the progress bar.
    pub left_time: TimeField,
    /// Label under the right end of the progress bar.
    pub right_time: TimeField,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ swipe through your music ~ ".to_string(),
            left_time: TimeField::Elapsed,
            right_time: TimeField::Remaining,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

/// Remote-control settings: the MPRIS service and the signal → action table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Register an MPRIS service on the session bus.
    pub mpris: bool,
    pub play: RemoteActionSetting,
    pub pause: RemoteActionSetting,
    pub play_pause: RemoteActionSetting,
    pub stop: RemoteActionSetting,
    pub next: RemoteActionSetting,
    pub previous: RemoteActionSetting,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            mpris: true,
            play: RemoteActionSetting::Play,
            pause: RemoteActionSetting::Play,
            play_pause: RemoteActionSetting::TogglePause,
            stop: RemoteActionSetting::Play,
            next: RemoteActionSetting::SkipNext,
            previous: RemoteActionSetting::SkipPrevious,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteActionSetting {
    Play,
    Pause,
    Stop,
    #[serde(alias = "play-pause", alias = "toggle")]
    TogglePause,
    #[serde(alias = "next")]
    SkipNext,
    #[serde(alias = "previous", alias = "prev")]
    SkipPrevious,
    #[serde(alias = "none")]
    Ignore,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log directory. Defaults to `$XDG_STATE_HOME/swipetune` or `~/.local/state/swipetune`.
    pub directory: Option<PathBuf>,
    pub file_name: String,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "swipetune.log".to_string(),
            filter: "info".to_string(),
        }
    }
}
