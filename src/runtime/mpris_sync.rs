use crate::app::App;
use crate::engine::PlaybackEngine;
use crate::mpris::MprisHandle;

/// Publish the engine's track and state. The handle ignores unchanged values.
pub fn update_mpris<E: PlaybackEngine>(mpris: &MprisHandle, app: &App<E>) {
    let now_playing_idx = app
        .engine_track
        .as_ref()
        .and_then(|id| app.catalog.index_of(id));

    let track = now_playing_idx.and_then(|i| app.catalog.get(i));
    mpris.set_track_metadata(now_playing_idx, track);
    mpris.set_playback(app.playback);
    mpris.set_position(app.progress.display_position());
}
