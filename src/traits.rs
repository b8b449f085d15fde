//! Core traits that decouple the board from how commands are run and where
//! events come from.
//!
//! The [`Board`](crate::board::Board) only depends on these abstractions:
//! a [`Launcher`] runs shell commands, an [`EventSource`] produces
//! [`BoardEvent`]s, and a frontend consumes [`ViewEvent`]s.

use crate::button::Position;
use crate::color::HexColor;
use crate::event::BoardEvent;
use std::path::PathBuf;
use std::sync::mpsc;

/// Runs the shell command bound to a button.
///
/// # Contract
///
/// * [`launch`](Launcher::launch) must return as soon as the command has
///   been started; it never waits for it to finish.
/// * Output is not captured and the command is never retried.
pub trait Launcher {
    /// The error type produced when a command cannot be started.
    type Error: std::error::Error + Send + 'static;

    /// Start `command` detached from the caller.
    fn launch(&self, command: &str) -> Result<(), Self::Error>;
}

//  View

/// How a cell of the grid should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub position: Position,
    pub label: String,
    pub bg_color: HexColor,
    pub fg_color: HexColor,
    pub font_size: u32,
    pub icon: Option<PathBuf>,
    /// `false` for empty cells and label-only buttons.
    pub actionable: bool,
    /// `false` for cells without a button.
    pub populated: bool,
}

/// A snapshot of the active state that a frontend needs in order to
/// render.
///
/// Built via [`Board::view`](crate::board::Board::view).
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    /// Name of the active state.
    pub state: String,
    pub columns: usize,
    pub rows: usize,
    /// Every cell of the grid in row-major order, `rows * columns` long.
    pub cells: Vec<CellView>,
}

impl BoardView {
    /// The cell at `position`, or `None` if it lies outside the grid.
    pub fn cell(&self, position: Position) -> Option<&CellView> {
        if position.row >= self.rows || position.col >= self.columns {
            return None;
        }
        self.cells.get(position.row * self.columns + position.col)
    }
}

/// Events sent from the [`Board`](crate::board::Board) to a frontend over
/// an [`mpsc`] channel.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The active state changed; draw this instead.
    Redraw(BoardView),
}

//  Event Source

/// A source of [`BoardEvent`]s.
///
/// Implementations read some transport (stdin, a test harness, …) and
/// forward parsed events into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received event is sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait EventSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start reading and forward every incoming [`BoardEvent`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<BoardEvent>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    //  Mock Launcher

    #[derive(Debug, Default)]
    struct MockLauncher {
        launched: RefCell<Vec<String>>,
    }

    impl Launcher for MockLauncher {
        type Error = MockError;

        fn launch(&self, command: &str) -> Result<(), MockError> {
            self.launched.borrow_mut().push(command.to_string());
            Ok(())
        }
    }

    #[test]
    fn mock_launcher_records_commands() {
        let launcher = MockLauncher::default();
        launcher.launch("echo hi").unwrap();
        assert_eq!(*launcher.launched.borrow(), vec!["echo hi".to_string()]);
    }

    //  Mock EventSource

    struct MockSource {
        events: Vec<BoardEvent>,
    }

    impl EventSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<BoardEvent>) -> Result<(), MockError> {
            for event in self.events.drain(..) {
                let _ = sink.send(event);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_events() {
        let mut src = MockSource {
            events: vec![
                BoardEvent::Press(Position::new(0, 1)),
                BoardEvent::Switch("media".into()),
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let events: Vec<BoardEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], BoardEvent::Press(Position::new(0, 1)));
        assert_eq!(events[1], BoardEvent::Switch("media".into()));
    }

    #[test]
    fn view_cell_lookup_is_row_major() {
        let cell = |row, col| CellView {
            position: Position::new(row, col),
            label: String::new(),
            bg_color: HexColor::rgb(0, 0, 0),
            fg_color: HexColor::rgb(0, 0, 0),
            font_size: 14,
            icon: None,
            actionable: false,
            populated: false,
        };
        let view = BoardView {
            state: "main".into(),
            columns: 2,
            rows: 2,
            cells: vec![cell(0, 0), cell(0, 1), cell(1, 0), cell(1, 1)],
        };
        assert_eq!(view.cell(Position::new(1, 0)).unwrap().position, Position::new(1, 0));
        assert!(view.cell(Position::new(0, 2)).is_none());
        assert!(view.cell(Position::new(2, 0)).is_none());
    }
}
