//! UI rendering for the player screen.
//!
//! This module draws the screen model with `ratatui`: the track carousel,
//! the active track's labels, the progress bar and the transport row.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Widget, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::catalog::TrackDescriptor;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::engine::{PlaybackEngine, RepeatMode};
use crate::progress::{ProgressSnapshot, format_clock};
use crate::transport::TransportState;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next track");
    map.insert("←/→", "swipe");
    // H/L is filled dynamically from config.
    map.insert("r", "repeat mode");
    map.insert("K", "metadata");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = ["space/p", "h/l", "←/→", "H/L", "r", "K", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Text for one of the labels under the progress bar.
fn time_label(field: TimeField, progress: &ProgressSnapshot) -> String {
    match field {
        TimeField::Elapsed => format_clock(progress.display_position()),
        TimeField::Total => format_clock(progress.duration_secs),
        TimeField::Remaining => format!("-{}", format_clock(progress.remaining())),
    }
}

fn repeat_text(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "REPEAT: Off",
        RepeatMode::Track => "REPEAT: Track",
        RepeatMode::Queue => "REPEAT: Queue",
    }
}

fn toggle_icon(state: TransportState) -> &'static str {
    match state {
        TransportState::Playing => "⏸",
        TransportState::Paused => "▶",
    }
}

/// Horizontal position of page `index` relative to the viewport, in cells.
fn page_left(index: usize, offset: f32, page_width: u16) -> i32 {
    (index as f32 * f32::from(page_width) - offset).round() as i32
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

/// One carousel page: the artwork card of a track.
fn page_widget(track: &TrackDescriptor, index: usize, count: usize) -> Paragraph<'_> {
    let artwork = match &track.artwork {
        Some(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        None => "no artwork".to_string(),
    };
    let lines = vec![
        Line::from(""),
        Line::from("♪").bold(),
        Line::from(""),
        Line::from(track.title.as_str()),
        Line::from(track.album.as_deref().unwrap_or("")).italic(),
        Line::from(""),
        Line::from(format!("[ {artwork} ]")).dim(),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {}/{} ", index + 1, count))
                .title_alignment(Alignment::Center),
        )
}

/// Draw the pages intersecting the viewport, shifted by the scroll offset.
fn render_carousel<E: PlaybackEngine>(app: &App<E>, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    if app.catalog.is_empty() {
        Paragraph::new("No tracks found")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
        return;
    }

    let width = area.width;
    let offset = app.carousel.offset();
    let page_rect = Rect::new(0, 0, width, area.height);

    for (index, track) in app.catalog.tracks().iter().enumerate() {
        let left = page_left(index, offset, width);
        if left <= -i32::from(width) || left >= i32::from(width) {
            continue;
        }

        let mut page = Buffer::empty(page_rect);
        page_widget(track, index, app.catalog.len()).render(page_rect, &mut page);

        for col in 0..width {
            let x = left + i32::from(col);
            if x < 0 || x >= i32::from(width) {
                continue;
            }
            let dest_x = area.x + x as u16;
            for row in 0..area.height {
                if let (Some(src), Some(dst)) =
                    (page.cell((col, row)), buf.cell_mut((dest_x, area.y + row)))
                {
                    *dst = src.clone();
                }
            }
        }
    }
}

/// Render the entire screen into `frame`.
pub fn draw<E: PlaybackEngine>(
    frame: &mut Frame,
    app: &App<E>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" swipetune ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    render_carousel(app, chunks[1], frame.buffer_mut());

    // Labels of the active track
    let (title, artist) = match app.active_track() {
        Some(t) => (t.title.as_str(), t.artist.as_str()),
        None => ("", ""),
    };
    let labels = Paragraph::new(vec![
        Line::from(title).add_modifier(Modifier::BOLD),
        Line::from(artist),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(labels, chunks[2]);

    // Progress bar and its time labels
    let progress_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(chunks[3]);
    let gauge = Gauge::default()
        .ratio(app.progress.ratio())
        .label("")
        .gauge_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(gauge, progress_rows[0]);

    let time_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(progress_rows[1]);
    frame.render_widget(
        Paragraph::new(time_label(ui_settings.left_time, &app.progress)),
        time_cols[0],
    );
    frame.render_widget(
        Paragraph::new(time_label(ui_settings.right_time, &app.progress))
            .alignment(Alignment::Right),
        time_cols[1],
    );

    // Transport row
    let transport = Paragraph::new(format!(
        "⏮     {}     ⏭",
        toggle_icon(app.transport_state())
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(transport, chunks[4]);

    // Bottom bar
    let status = {
        let mut parts = vec![repeat_text(app.repeat_mode).to_string()];
        if !app.catalog.is_empty() {
            parts.push(format!(
                "TRACK: {}/{}",
                app.active_index() + 1,
                app.catalog.len()
            ));
        }
        if app.player.is_ready() {
            parts.push(format!("ENGINE: {:?}", app.playback));
        } else {
            parts.push("ENGINE: unavailable".to_string());
        }
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" status "),
    );
    frame.render_widget(status_par, chunks[5]);

    // Metadata popup over the carousel
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, chunks[1]);
        frame.render_widget(Clear, popup_area);

        let meta = if let Some(track) = app.active_track() {
            format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nSource: {}",
                track.title,
                track.artist,
                track.album.as_deref().unwrap_or("-"),
                format_duration_mmss_ceil(track.duration),
                track.source.display()
            )
        } else {
            "No track selected".to_string()
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[6]);
}
