//! Static track manifest (`tracks.toml`).
//!
//! ```toml
//! [[track]]
//! id = 1
//! title = "Faded"
//! artist = "Alan Walker"
//! artwork = "artwork/faded.jpg"
//! url = "audio/faded.mp3"
//! ```
//!
//! Relative `artwork` and `url` paths resolve against the manifest's directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::model::{CatalogError, TrackDescriptor, TrackId};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "track")]
    tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestId {
    Number(i64),
    Text(String),
}

impl From<ManifestId> for TrackId {
    fn from(id: ManifestId) -> Self {
        match id {
            ManifestId::Number(n) => TrackId::new(n.to_string()),
            ManifestId::Text(s) => TrackId::new(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ManifestTrack {
    id: ManifestId,
    title: String,
    #[serde(default)]
    artist: String,
    album: Option<String>,
    artwork: Option<PathBuf>,
    url: PathBuf,
    duration_secs: Option<f64>,
}

pub(super) fn read_manifest(path: &Path) -> Result<Vec<TrackDescriptor>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse_manifest(&text, base).map_err(|source| CatalogError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn parse_manifest(text: &str, base: &Path) -> Result<Vec<TrackDescriptor>, toml::de::Error> {
    let manifest: Manifest = toml::from_str(text)?;
    Ok(manifest
        .tracks
        .into_iter()
        .map(|t| TrackDescriptor {
            id: t.id.into(),
            title: t.title,
            artist: t.artist,
            album: t.album.filter(|a| !a.trim().is_empty()),
            artwork: t.artwork.map(|p| base.join(p)),
            source: base.join(t.url),
            // Negative, non-finite or out-of-range values mean "unknown".
            duration: t
                .duration_secs
                .and_then(|s| Duration::try_from_secs_f64(s).ok()),
        })
        .collect())
}
