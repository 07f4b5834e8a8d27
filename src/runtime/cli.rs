use std::path::PathBuf;

use crate::error::{AuraError, Result};

pub const USAGE: &str = "\
aura [PATH...]                  play files and folders
aura shell-fetch <PATH|URL>     print one shell asset, cache first
aura --help                     show this message";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Play(Vec<PathBuf>),
    ShellFetch(String),
    Help,
}

/// Parse arguments (without the program name).
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut args = args.into_iter().peekable();
    match args.peek().map(String::as_str) {
        Some("-h" | "--help") => Ok(Command::Help),
        Some("shell-fetch") => {
            args.next();
            let target = args
                .next()
                .ok_or_else(|| AuraError::Usage("aura shell-fetch <PATH|URL>".to_string()))?;
            if let Some(extra) = args.next() {
                return Err(AuraError::Usage(format!("unexpected argument {extra:?}")));
            }
            Ok(Command::ShellFetch(target))
        }
        _ => Ok(Command::Play(args.map(PathBuf::from).collect())),
    }
}
