use std::io::{self, Stdout, Write};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::RodioElement;
use crate::config::Settings;
use crate::error::Result;
use crate::player::{Controller, MediaElement};

mod cli;
mod event_loop;
mod settings;
mod startup;

pub use settings::{LoadedSettings, load_settings};

/// Dispatch the command line.
pub fn run<I: IntoIterator<Item = String>>(settings: Settings, args: I) -> Result<()> {
    match cli::parse_args(args)? {
        cli::Command::Help => {
            writeln!(io::stdout(), "{}", cli::USAGE)?;
            Ok(())
        }
        cli::Command::ShellFetch(target) => startup::shell_fetch(&settings.shell_cache, &target),
        cli::Command::Play(paths) => {
            let _shell_cache = startup::spawn_shell_cache(&settings.shell_cache);

            let mut player = startup::build_controller(RodioElement::open()?, &settings);
            let mut app = App::new();
            if !paths.is_empty() {
                startup::open_paths(&mut player, &mut app, &paths, &settings.library);
            }

            enable_raw_mode()?;
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;

            let ran = event_loop::run(&mut terminal, &settings, &mut app, &mut player);
            let restored = restore_terminal(&mut terminal);
            close_session(&mut player, ran, restored)
        }
    }
}

/// Shut the player down whatever happened to the loop or the terminal, then
/// report the first error.
fn close_session<M: MediaElement>(
    player: &mut Controller<M>,
    ran: Result<()>,
    restored: Result<()>,
) -> Result<()> {
    player.shutdown();
    info!("bye");
    ran.and(restored)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
