//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the TUI using `ratatui` and exposes the screen layout
//! so mouse input can be hit-tested against the same rectangles.

use std::f64::consts::TAU;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap,
        canvas::{Canvas, Circle, Points},
    },
};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{Controller, MediaElement, PlayerPhase, format_time};

const ARC_SAMPLES: usize = 360;

/// Rectangles of every screen region for a given terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub header: Rect,
    pub now_playing: Rect,
    pub dial: Rect,
    pub status: Rect,
    pub playlist: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> Screen {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(body[1]);

    Screen {
        header: rows[0],
        now_playing: right[0],
        dial: body[0],
        status: right[1],
        playlist: right[2],
        footer: rows[2],
    }
}

fn dial_block() -> Block<'static> {
    Block::default().borders(Borders::ALL).title(" progress ")
}

/// Map a mouse cell inside the dial to `(pointer, center)` in a space where
/// rows count double, so the angle matches what is drawn.
pub fn dial_pointer(screen: &Screen, column: u16, row: u16) -> Option<((f64, f64), (f64, f64))> {
    let inner = dial_block().inner(screen.dial);
    if !point_in_rect(column, row, inner) {
        return None;
    }
    let center = (
        inner.x as f64 + inner.width as f64 / 2.0,
        (inner.y as f64 + inner.height as f64 / 2.0) * 2.0,
    );
    let pointer = (column as f64 + 0.5, (row as f64 + 0.5) * 2.0);
    Some((pointer, center))
}

pub fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    let volume_pct = (controls.volume_step * 100.0).round() as u32;
    [
        ("space/p", "play/pause".to_string()),
        ("h/l", "prev/next song".to_string()),
        ("j/k", "up/down".to_string()),
        ("enter", "play selected song".to_string()),
        ("H/L", format!("scrub -/+{}s", controls.scrub_seconds)),
        ("-/+", format!("volume -/+{volume_pct}%")),
        ("s", "shuffle".to_string()),
        ("r", "repeat".to_string()),
        ("o", "open file/folder".to_string()),
        ("q", "quit".to_string()),
    ]
    .iter()
    .map(|(k, v)| format!("[{k}] {v}"))
    .collect::<Vec<String>>()
    .join(" | ")
}

fn phase_text(phase: PlayerPhase) -> &'static str {
    match phase {
        PlayerPhase::Idle => "No tracks",
        PlayerPhase::Loading => "Loading",
        PlayerPhase::Playing => "Playing",
        PlayerPhase::Paused => "Paused",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::bordered()
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
        .title(title)
}

fn draw_now_playing<M: MediaElement>(frame: &mut Frame, area: Rect, player: &Controller<M>) {
    let lines = match player.current_track() {
        Some(track) => vec![
            Line::from(Span::styled(
                track.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                track.artist.as_str(),
                Style::default().fg(Color::Gray),
            )),
        ],
        None => vec![Line::from("Nothing loaded. Press [o] to open a file or folder.")],
    };
    let paragraph = Paragraph::new(lines)
        .block(left_padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_dial<M: MediaElement>(frame: &mut Frame, area: Rect, player: &Controller<M>) {
    let state = player.state();
    let inner = dial_block().inner(area);
    // One unit per column, two per row: terminal cells are about twice as tall as wide.
    let half_w = inner.width as f64 / 2.0;
    let half_h = inner.height as f64;
    let radius = (half_w.min(half_h) * 0.85).max(1.0);

    let progress = state.progress();
    let arc: Vec<(f64, f64)> = (0..=ARC_SAMPLES)
        .map(|i| i as f64 / ARC_SAMPLES as f64 * progress)
        .map(|f| on_dial(f, radius))
        .collect();
    let knob = on_dial(progress, radius);

    let elapsed = format_time(state.current_time);
    let total = state
        .duration
        .map_or_else(|| "--:--".to_string(), format_time);
    let label = format!("{elapsed} / {total}");
    let label_x = -(label.chars().count() as f64) / 2.0;

    let canvas = Canvas::default()
        .block(dial_block())
        .marker(Marker::Braille)
        .x_bounds([-half_w, half_w])
        .y_bounds([-half_h, half_h])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &arc,
                color: Color::Cyan,
            });
            ctx.draw(&Circle {
                x: knob.0,
                y: knob.1,
                radius: 0.6,
                color: Color::White,
            });
            ctx.print(label_x, 0.0, label.clone());
        });
    frame.render_widget(canvas, area);
}

/// Point on the dial at `fraction` of a clockwise turn from twelve o'clock.
/// Canvas coordinates grow upwards.
fn on_dial(fraction: f64, radius: f64) -> (f64, f64) {
    let angle = fraction * TAU;
    (radius * angle.sin(), radius * angle.cos())
}

fn draw_status<M: MediaElement>(frame: &mut Frame, area: Rect, app: &App, player: &Controller<M>) {
    let state = player.state();
    let mut parts: Vec<String> = vec![
        phase_text(player.phase()).to_string(),
        format!("Shuffle: {}", if state.shuffled { "ON" } else { "OFF" }),
        format!("Repeat: {}", state.repeat.label()),
        format!("Vol: {:.0}%", state.volume * 100.0),
    ];
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }
    let paragraph = Paragraph::new(parts.join(" • "))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_playlist<M: MediaElement>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    player: &Controller<M>,
) {
    let tracks = player.tracks();
    let current = player.state().current;

    // Center the cursor when possible; only build items for the visible window.
    let total = tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let start = app.cursor.saturating_sub(half).min(total - list_height);
        (start, start + list_height)
    };

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let index = start + offset;
            let text = format!("{} - {}", track.artist, track.name);
            if current == Some(index) {
                ListItem::new(format!("♪ {text}"))
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {text}"))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" playlist ({total}) ")),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.cursor.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_open_prompt(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect_sized(72, 3, area);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(format!("{}█", app.path_input)).block(left_padded(
        " open file or folder (enter confirms, esc cancels) ",
    ));
    frame.render_widget(prompt, popup);
}

/// Render the entire UI into `frame`.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App,
    player: &Controller<M>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let screen = layout(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" aura ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, screen.header);

    draw_now_playing(frame, screen.now_playing, player);
    draw_dial(frame, screen.dial, player);
    draw_status(frame, screen.status, app, player);
    draw_playlist(frame, screen.playlist, app, player);

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, screen.footer);

    if app.input_mode == InputMode::OpenPath {
        draw_open_prompt(frame, frame.area(), app);
    }
}
