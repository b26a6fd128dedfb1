use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog;
use crate::engine::{Player, RodioEngine};
use crate::mpris::RemoteEvent;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, problem) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings.logging);
    if let Some(problem) = problem {
        warn!("{problem}");
    }

    if let Some(source) = env::args().nth(1) {
        info!(source = %source, "catalog source from command line");
        settings.catalog.source = Some(PathBuf::from(source));
    }

    let mut player = Player::new(RodioEngine::new(startup::repeat_mode(
        settings.playback.repeat_mode,
    )));
    let catalog = catalog::load(&settings.catalog, &mut player);

    let mut app = App::new(catalog, player, &startup::screen_config(&settings));

    let (remote_tx, remote_rx) = mpsc::channel::<RemoteEvent>();
    let mpris = settings
        .remote
        .mpris
        .then(|| crate::mpris::spawn_mpris(remote_tx));

    app.mount();
    startup::apply_playback_defaults(&mut app, &settings);
    if let Some(mpris) = &mpris {
        mpris_sync::update_mpris(mpris, &app);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, mpris.as_ref(), &remote_rx);

    // Also on error, so the worker still fades out and releases the device.
    app.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!(error = %e, "event loop ended with an error");
    }
    run_result
}
