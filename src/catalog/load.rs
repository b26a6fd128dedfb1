use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::CatalogSettings;
use crate::engine::{PlaybackEngine, Player};

use super::manifest::read_manifest;
use super::model::{Catalog, CatalogError};
use super::scan::scan;

/// Where the track list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CatalogSource {
    Manifest(PathBuf),
    Directory(PathBuf),
}

pub(super) fn resolve_source(settings: &CatalogSettings) -> CatalogSource {
    let root = settings
        .source
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    if root.is_file() {
        return CatalogSource::Manifest(root);
    }
    let manifest = root.join(&settings.manifest_name);
    if manifest.is_file() {
        CatalogSource::Manifest(manifest)
    } else {
        CatalogSource::Directory(root)
    }
}

pub(super) fn read_catalog(settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    let tracks = match resolve_source(settings) {
        CatalogSource::Manifest(path) => {
            info!(manifest = %path.display(), "reading track manifest");
            read_manifest(&path)?
        }
        CatalogSource::Directory(dir) => {
            if !Path::new(&dir).is_dir() {
                return Err(CatalogError::MissingRoot(dir));
            }
            info!(dir = %dir.display(), "scanning for tracks");
            scan(&dir, settings)
        }
    };
    Catalog::new(tracks)
}

/// Read the catalog and hand it to the engine.
///
/// Called once when the screen starts. Failures never propagate: an unreadable
/// source yields an empty catalog, and a failed engine setup leaves the engine
/// with an empty queue while the carousel still shows the tracks.
pub fn load<E: PlaybackEngine>(settings: &CatalogSettings, player: &mut Player<E>) -> Catalog {
    let catalog = match read_catalog(settings) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load catalog");
            Catalog::empty()
        }
    };
    info!(tracks = catalog.len(), "catalog loaded");

    if player.setup() {
        player.add(catalog.tracks());
    } else {
        warn!("playback engine unavailable; queue left empty");
    }
    catalog
}
