//! The board: the loaded [`Config`] plus the active state.
//!
//! [`Board`] reacts to [`BoardEvent`]s by switching the active
//! [`ButtonState`] or handing commands to its [`Launcher`].  State switches
//! are pure in-memory pointer moves; the only side effect is a
//! [`ViewEvent::Redraw`] to the attached frontend.

use crate::button::{Action, Button, ButtonState, Position, StateId};
use crate::config::Config;
use crate::event::BoardEvent;
use crate::traits::{BoardView, CellView, Launcher, ViewEvent};
use log::{debug, info};
use std::sync::mpsc;

/// Possible errors from the board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The launcher could not start a command.
    #[error("launch error: {0}")]
    Launch(String),
    /// A switch named a state that does not exist.
    #[error("unknown state {0:?}")]
    UnknownState(String),
}

/// What a press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// No button at that position.
    Empty,
    /// The button has no action.
    Inert,
    /// The command was started.
    Launched(String),
    /// The active state changed.
    Switched { from: String, to: String },
}

/// Whether the caller should keep feeding events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the configuration and dispatches button activations.
///
/// Generic over any [`Launcher`], so tests can record commands instead of
/// running them.
///
/// ```ignore
/// let config = Config::load(&path)?;
/// let mut board = Board::new(config, ShellLauncher::new());
/// board.press(Position::new(0, 1))?;
/// ```
pub struct Board<L: Launcher> {
    config: Config,
    launcher: L,
    active: StateId,
    view_tx: Option<mpsc::Sender<ViewEvent>>,
}

impl<L: Launcher> Board<L> {
    /// Create a board showing the config's initial state.
    pub fn new(config: Config, launcher: L) -> Self {
        let active = config.initial_state();
        Self {
            config,
            launcher,
            active,
            view_tx: None,
        }
    }

    /// Attach a frontend channel.  A [`ViewEvent::Redraw`] is sent after
    /// every state change.
    pub fn set_view_sink(&mut self, tx: mpsc::Sender<ViewEvent>) {
        self.view_tx = Some(tx);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn active_id(&self) -> StateId {
        self.active
    }

    /// The state currently on screen.
    pub fn active_state(&self) -> &ButtonState {
        // `active` only ever holds ids handed out by the config.
        &self.config.states()[self.active.0]
    }

    /// Process a single event.
    pub fn handle(&mut self, event: BoardEvent) -> Result<Flow, BoardError> {
        debug!("event: {:?}", event);
        match event {
            BoardEvent::Press(position) => {
                self.press(position)?;
            }
            BoardEvent::Switch(name) => self.switch_to(&name)?,
            BoardEvent::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Activate the button at `position` in the active state.
    pub fn press(&mut self, position: Position) -> Result<PressOutcome, BoardError> {
        let action = match self.active_state().button_at(position) {
            None => {
                debug!("press on empty cell {}", position);
                return Ok(PressOutcome::Empty);
            }
            Some(Button { action: None, .. }) => return Ok(PressOutcome::Inert),
            Some(Button {
                action: Some(action),
                ..
            }) => action.clone(),
        };

        match action {
            Action::Command(cmd) => {
                self.launcher
                    .launch(&cmd)
                    .map_err(|e| BoardError::Launch(e.to_string()))?;
                Ok(PressOutcome::Launched(cmd))
            }
            Action::SwitchState(target) => {
                let from = self.active_state().name().to_string();
                self.activate(target);
                Ok(PressOutcome::Switched {
                    from,
                    to: self.active_state().name().to_string(),
                })
            }
        }
    }

    /// Make the state called `name` active.
    pub fn switch_to(&mut self, name: &str) -> Result<(), BoardError> {
        let id = self
            .config
            .state_id(name)
            .ok_or_else(|| BoardError::UnknownState(name.to_string()))?;
        self.activate(id);
        Ok(())
    }

    /// Render snapshot of the active state.
    pub fn view(&self) -> BoardView {
        let state = self.active_state();
        let style = self.config.style();
        let columns = self.config.columns();
        let rows = self.config.rows();

        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                let position = Position::new(row, col);
                cells.push(match state.button_at(position) {
                    Some(button) => CellView {
                        position,
                        label: button.label.clone(),
                        bg_color: button.bg_color,
                        fg_color: button.fg_color,
                        font_size: button.font_size,
                        icon: button.icon.clone(),
                        actionable: button.action.is_some(),
                        populated: true,
                    },
                    None => CellView {
                        position,
                        label: String::new(),
                        bg_color: style.empty_color,
                        fg_color: style.fg_color,
                        font_size: style.font_size,
                        icon: None,
                        actionable: false,
                        populated: false,
                    },
                });
            }
        }

        BoardView {
            state: state.name().to_string(),
            columns,
            rows,
            cells,
        }
    }

    fn activate(&mut self, id: StateId) {
        if id == self.active {
            debug!("state {:?} already active", self.active_state().name());
            return;
        }
        self.active = id;
        info!("switched to state {:?}", self.active_state().name());
        self.emit_redraw();
    }

    fn emit_redraw(&self) {
        if let Some(ref tx) = self.view_tx {
            if tx.send(ViewEvent::Redraw(self.view())).is_err() {
                debug!("view receiver gone");
            }
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::config::DEFAULT_EMPTY_COLOR;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct RecordingLauncher {
        launched: RefCell<Vec<String>>,
        fail: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("spawn refused")]
    struct Refused;

    impl Launcher for RecordingLauncher {
        type Error = Refused;

        fn launch(&self, command: &str) -> Result<(), Refused> {
            if self.fail {
                return Err(Refused);
            }
            self.launched.borrow_mut().push(command.to_string());
            Ok(())
        }
    }

    const CONFIG: &str = r##"
columns: 3
rows: 2
defaults:
  empty_color: "#111111"
states:
  main:
    - position: [0, 0]
      txt: Terminal
      cmd: alacritty
    - position: [0, 1]
      txt: Media
      switch: media
      bg_color: "#ff0000"
    - position: [1, 0]
      txt: Just a label
  media:
    - position: [0, 0]
      txt: Back
      switch: main
    - position: [1, 2]
      txt: Play
      cmd: playerctl play-pause
"##;

    fn board() -> Board<RecordingLauncher> {
        Board::new(Config::from_yaml_str(CONFIG).unwrap(), RecordingLauncher::default())
    }

    #[test]
    fn starts_in_initial_state() {
        let b = board();
        assert_eq!(b.active_state().name(), "main");
        assert_eq!(b.active_id(), StateId(0));
    }

    #[test]
    fn press_command_launches_once() {
        let mut b = board();
        let outcome = b.press(Position::new(0, 0)).unwrap();
        assert_eq!(outcome, PressOutcome::Launched("alacritty".into()));
        assert_eq!(*b.launcher().launched.borrow(), vec!["alacritty".to_string()]);
        assert_eq!(b.active_state().name(), "main");
    }

    #[test]
    fn press_switch_changes_state_and_redraws() {
        let mut b = board();
        let (tx, rx) = mpsc::channel();
        b.set_view_sink(tx);

        let outcome = b.press(Position::new(0, 1)).unwrap();
        assert_eq!(
            outcome,
            PressOutcome::Switched {
                from: "main".into(),
                to: "media".into()
            }
        );
        assert_eq!(b.active_state().name(), "media");
        assert!(b.launcher().launched.borrow().is_empty());

        let events: Vec<ViewEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        let ViewEvent::Redraw(view) = &events[0];
        assert_eq!(view.state, "media");

        // Commands now resolve against the new state.
        let outcome = b.press(Position::new(1, 2)).unwrap();
        assert_eq!(outcome, PressOutcome::Launched("playerctl play-pause".into()));
    }

    #[test]
    fn press_empty_and_inert_cells() {
        let mut b = board();
        assert_eq!(b.press(Position::new(1, 2)).unwrap(), PressOutcome::Empty);
        assert_eq!(b.press(Position::new(1, 0)).unwrap(), PressOutcome::Inert);
        assert_eq!(b.press(Position::new(9, 9)).unwrap(), PressOutcome::Empty);
        assert!(b.launcher().launched.borrow().is_empty());
    }

    #[test]
    fn launch_failure_is_reported_and_state_kept() {
        let config = Config::from_yaml_str(CONFIG).unwrap();
        let mut b = Board::new(
            config,
            RecordingLauncher {
                fail: true,
                ..Default::default()
            },
        );
        let err = b.press(Position::new(0, 0)).unwrap_err();
        assert!(matches!(err, BoardError::Launch(ref msg) if msg == "spawn refused"));
        assert_eq!(b.active_state().name(), "main");
    }

    #[test]
    fn switch_by_name() {
        let mut b = board();
        b.switch_to("media").unwrap();
        assert_eq!(b.active_state().name(), "media");
        assert!(matches!(
            b.switch_to("missing"),
            Err(BoardError::UnknownState(ref n)) if n == "missing"
        ));
        assert_eq!(b.active_state().name(), "media");
    }

    #[test]
    fn switching_to_active_state_does_not_redraw() {
        let mut b = board();
        let (tx, rx) = mpsc::channel();
        b.set_view_sink(tx);
        b.switch_to("main").unwrap();
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn handle_dispatches_events() {
        let mut b = board();
        assert_eq!(
            b.handle(BoardEvent::Press(Position::new(0, 0))).unwrap(),
            Flow::Continue
        );
        assert_eq!(b.handle(BoardEvent::Switch("media".into())).unwrap(), Flow::Continue);
        assert_eq!(b.active_state().name(), "media");
        assert_eq!(b.handle(BoardEvent::Quit).unwrap(), Flow::Quit);
        assert!(b.handle(BoardEvent::Switch("nope".into())).is_err());
    }

    #[test]
    fn view_covers_whole_grid() {
        let b = board();
        let view = b.view();
        assert_eq!(view.state, "main");
        assert_eq!(view.cells.len(), 6);
        let positions: Vec<Position> = view.cells.iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(1, 2),
            ]
        );

        let media = view.cell(Position::new(0, 1)).unwrap();
        assert_eq!(media.label, "Media");
        assert_eq!(media.bg_color, HexColor::rgb(0xff, 0, 0));
        assert!(media.actionable);
        assert!(media.populated);

        let label = view.cell(Position::new(1, 0)).unwrap();
        assert!(label.populated);
        assert!(!label.actionable);

        let empty = view.cell(Position::new(0, 2)).unwrap();
        assert!(!empty.populated);
        assert_eq!(empty.label, "");
        assert_eq!(empty.bg_color, HexColor::rgb(0x11, 0x11, 0x11));
        assert_ne!(empty.bg_color, DEFAULT_EMPTY_COLOR);
    }
}
