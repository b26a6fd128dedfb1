use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::config;
use crate::engine::PlaybackEngine;
use crate::mpris::{MprisHandle, RemoteEvent};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// Input wait per frame; also the carousel animation step.
const FRAME: Duration = Duration::from_millis(16);

/// Main terminal event loop: advances the carousel, syncs with the engine and
/// MPRIS, draws, and handles input. Returns `Ok(())` when quit is requested;
/// the caller shuts the engine down either way.
pub fn run<E: PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
    mpris: Option<&MprisHandle>,
    remote_rx: &mpsc::Receiver<RemoteEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_frame = Instant::now();
    loop {
        let now = Instant::now();
        let dt = now.saturating_duration_since(last_frame);
        last_frame = now;

        app.set_viewport_width(terminal.size()?.width);
        app.tick(dt);
        app.sync_engine_state();
        app.poll_progress(now);

        // Covers changes coming from media keys and auto-advance too.
        if let Some(mpris) = mpris {
            update_mpris(mpris, app);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(ev) = remote_rx.try_recv() {
            match ev {
                RemoteEvent::Quit => {
                    info!("quit requested over mpris");
                    return Ok(());
                }
                RemoteEvent::Signal(signal) => app.handle_remote(signal),
            }
        }

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app) {
                    info!("quit requested");
                    return Ok(());
                }
            }
        }
    }
}

/// Returns true when the key asks to quit.
fn handle_key_event<E: PlaybackEngine>(key: KeyEvent, app: &mut App<E>) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') => return true,
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.toggle_playback();
        }
        KeyCode::Char('l') | KeyCode::Char('n') => {
            app.skip_next();
        }
        KeyCode::Char('h') | KeyCode::Char('b') => {
            app.skip_previous();
        }
        KeyCode::Right => app.swipe(1.0),
        KeyCode::Left => app.swipe(-1.0),
        KeyCode::Char('L') => app.scrub(1.0),
        KeyCode::Char('H') => app.scrub(-1.0),
        KeyCode::Char('r') => app.cycle_repeat(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}
