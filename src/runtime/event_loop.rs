use std::io::Stdout;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::{App, InputMode};
use crate::config;
use crate::error::Result;
use crate::player::{Controller, MediaElement};
use crate::runtime::startup::open_paths;
use crate::ui::{self, Screen};

/// Input poll timeout while no fade is running.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Poll timeout for the next loop iteration: short enough to land on every
/// fade step while one is running.
pub(super) fn poll_timeout<M: MediaElement>(player: &Controller<M>, now: Instant) -> Duration {
    player
        .next_fade_step_in(now)
        .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL))
}

/// Main terminal event loop: forwards media events, drives fades, draws and
/// handles input. It is also the fade timer, so it wakes for every fade step.
/// Returns once the user has quit and the quit fade is done.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Controller<M>,
) -> Result<()> {
    loop {
        player.pump_events();
        player.tick(Instant::now());
        app.sync_cursor(player.state().current, player.tracks().len());

        terminal.draw(|f| ui::draw(f, app, player, &settings.ui, &settings.controls))?;

        if !event::poll(poll_timeout(player, Instant::now()))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, player) {
                    quit_softly(player, Duration::from_millis(settings.audio.quit_fade_out_ms));
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let screen = ui::layout(Rect::new(0, 0, size.width, size.height));
                handle_mouse(mouse, &screen, app, player);
            }
            _ => {}
        }
    }
}

/// Fade out and wait for the fade to finish before returning.
fn quit_softly<M: MediaElement>(player: &mut Controller<M>, fade_out: Duration) {
    player.begin_quit(fade_out);
    let deadline = Instant::now() + fade_out + Duration::from_millis(100);
    while player.is_fading() && Instant::now() < deadline {
        thread::sleep(poll_timeout(player, Instant::now()));
        player.tick(Instant::now());
    }
}

/// Returns `true` when the user asked to quit.
pub(super) fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Controller<M>,
) -> bool {
    if app.input_mode == InputMode::OpenPath {
        match key.code {
            KeyCode::Esc => app.cancel_open_mode(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Enter => {
                if let Some(path) = app.submit_path() {
                    open_paths(player, app, &[path], &settings.library);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
            _ => {}
        }
        return false;
    }

    let len = player.tracks().len();
    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('o') => app.enter_open_mode(),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.follow_playback_on();
            player.toggle_play_pause();
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            player.play_next();
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            player.play_previous();
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Enter => {
            if app.cursor < len {
                app.follow_playback_on();
                let (current, playing) = (player.state().current, player.state().is_playing);
                if current == Some(app.cursor) {
                    if !playing {
                        player.toggle_play_pause();
                    }
                } else {
                    player.select_track(app.cursor);
                }
            }
        }
        KeyCode::Char('s') => {
            player.toggle_shuffle();
            let on = player.state().shuffled;
            app.set_status(format!("Shuffle {}", if on { "on" } else { "off" }));
        }
        KeyCode::Char('r') => {
            player.cycle_repeat_mode();
            app.set_status(format!("Repeat {}", player.state().repeat.label()));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.set_volume(player.state().volume + step);
        }
        KeyCode::Char('-') => {
            player.set_volume(player.state().volume - step);
        }
        KeyCode::Char('L') => player.seek_by(scrub),
        KeyCode::Char('H') => player.seek_by(-scrub),
        _ => {}
    }

    false
}

/// Press on the dial starts seeking, dragging keeps seeking, release stops.
/// The wheel scrolls the playlist cursor.
pub(super) fn handle_mouse<M: MediaElement>(
    mouse: MouseEvent,
    screen: &Screen,
    app: &mut App,
    player: &mut Controller<M>,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((pointer, center)) = ui::dial_pointer(screen, mouse.column, mouse.row) {
                app.seeking = true;
                player.seek_to_pointer(pointer, center);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.seeking => {
            if let Some((pointer, center)) = ui::dial_pointer(screen, mouse.column, mouse.row) {
                player.seek_to_pointer(pointer, center);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.seeking = false,
        MouseEventKind::ScrollDown if ui::point_in_rect(mouse.column, mouse.row, screen.playlist) => {
            app.next(player.tracks().len());
        }
        MouseEventKind::ScrollUp if ui::point_in_rect(mouse.column, mouse.row, screen.playlist) => {
            app.prev(player.tracks().len());
        }
        _ => {}
    }
}
