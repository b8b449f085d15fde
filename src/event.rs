//! Events that drive the board, and the line protocol that carries them.
//!
//! Every line is either JSON or a short text form:
//!
//! ```text
//! {"Press":[0,1]}        press 0 1        0 1
//! {"Press":"0 1"}
//! {"Switch":"media"}     switch media
//! "Quit"                 quit
//! ```
//!
//! Blank lines and lines starting with `#` carry no event.

use crate::button::{parse_position, Position};
use serde::Deserialize;

/// Everything the board can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum BoardEvent {
    /// A button (or an empty cell) at this position was activated.
    Press(Position),
    /// Make the named state active.
    Switch(String),
    /// Stop processing events.
    Quit,
}

/// A line that could not be turned into a [`BoardEvent`].
#[derive(Debug, thiserror::Error)]
pub enum EventParseError {
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unrecognised event {0:?}")]
    Unrecognised(String),
}

/// Parse one line of the event protocol.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<BoardEvent>, EventParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with('{') || line.starts_with('"') {
        return Ok(Some(serde_json::from_str(line)?));
    }

    let unrecognised = || EventParseError::Unrecognised(line.to_string());
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let event = match head.to_ascii_lowercase().as_str() {
        "press" => BoardEvent::Press(parse_position(rest).ok_or_else(unrecognised)?),
        "switch" if !rest.is_empty() => BoardEvent::Switch(rest.to_string()),
        "quit" | "exit" if rest.is_empty() => BoardEvent::Quit,
        _ => BoardEvent::Press(parse_position(line).ok_or_else(unrecognised)?),
    };
    Ok(Some(event))
}
