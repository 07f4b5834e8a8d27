//! View-side state of the terminal UI: `App` and `InputMode`.
//!
//! The playlist and playback state live in the player controller; `App`
//! only tracks what the user is looking at and typing.

use std::env;
use std::path::PathBuf;

/// What keystrokes currently edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys map to transport and navigation commands.
    #[default]
    Normal,
    /// Keys edit the "open file or folder" prompt.
    OpenPath,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    /// Playlist row under the cursor.
    pub cursor: usize,
    /// Cursor jumps to the current track whenever it changes.
    pub follow_playback: bool,
    pub input_mode: InputMode,
    pub path_input: String,
    /// One-line message shown in the status box until replaced.
    pub status: Option<String>,
    /// A mouse button is held down on the dial.
    pub seeking: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            follow_playback: true,
            ..Self::default()
        }
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.cursor = (self.cursor + 1) % len;
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.cursor = (self.cursor + len - 1) % len;
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Keep the cursor on the playing track (when following) and inside the playlist.
    pub fn sync_cursor(&mut self, current: Option<usize>, len: usize) {
        if self.follow_playback {
            if let Some(i) = current {
                self.cursor = i;
            }
        }
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn enter_open_mode(&mut self) {
        self.input_mode = InputMode::OpenPath;
        self.path_input.clear();
    }

    pub fn cancel_open_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.path_input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.path_input.pop();
    }

    /// Leave the prompt and return the typed path, if any.
    ///
    /// Surrounding whitespace and quotes (as left by drag-and-drop into a
    /// terminal) are stripped and a leading `~/` expands to `$HOME`.
    pub fn submit_path(&mut self) -> Option<PathBuf> {
        self.input_mode = InputMode::Normal;
        let raw = std::mem::take(&mut self.path_input);
        let mut text = raw.trim();
        for quote in ['"', '\''] {
            if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
                text = &text[1..text.len() - 1];
            }
        }
        if text.is_empty() {
            return None;
        }
        if let Some(rest) = text.strip_prefix("~/") {
            if let Some(home) = env::var_os("HOME") {
                return Some(PathBuf::from(home).join(rest));
            }
        }
        Some(PathBuf::from(text))
    }
}
