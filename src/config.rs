//! Board configuration.
//!
//! The configuration is a YAML file, by default at
//! `<config dir>/VulcanBoard/config.yml` (see [`default_config_path`]).
//! Loading is all-or-nothing: the raw document is deserialised with unknown
//! keys rejected, then validated and resolved into an immutable [`Config`].
//! Any violation aborts the load with a [`ConfigError`].
//!
//! # Example
//!
//! ```yaml
//! columns: 4
//! rows: 3
//! defaults:
//!   bg_color: "#aaaaff"
//!   fontsize: 16
//! states:
//!   main:
//!     - position: [0, 0]
//!       txt: Terminal
//!       cmd: alacritty
//!     - position: [0, 1]
//!       txt: Media
//!       switch: media
//!   media:
//!     - position: [0, 0]
//!       txt: Back
//!       switch: main
//! ```
//!
//! A top-level `buttons:` list may be given instead of `states:`; it
//! defines a single state named [`LEGACY_STATE_NAME`].

use crate::button::{Action, Button, ButtonState, Position, StateId};
use crate::color::HexColor;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_BG_COLOR: HexColor = HexColor::rgb(0xaa, 0xaa, 0xff);
pub const DEFAULT_FG_COLOR: HexColor = HexColor::rgb(0xff, 0xff, 0xff);
pub const DEFAULT_EMPTY_COLOR: HexColor = HexColor::rgb(0xcc, 0xcc, 0xcc);
pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const DEFAULT_SPACING: u32 = 5;
pub const DEFAULT_PADDING: u32 = 5;

/// Upper bound for `columns` and `rows`.
pub const MAX_DIMENSION: usize = 256;

/// Name of the state created from a top-level `buttons:` list.
pub const LEGACY_STATE_NAME: &str = "main";

/// `<config dir>/VulcanBoard/config.yml`.
///
/// The config dir is `$XDG_CONFIG_HOME` (or `~/.config`) on Linux and
/// `%APPDATA%` on Windows.  `None` if the platform has no config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("VulcanBoard").join("config.yml"))
}

//  Raw schema

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    columns: usize,
    rows: usize,
    #[serde(default = "default_spacing")]
    spacing: u32,
    #[serde(default = "default_padding")]
    padding: u32,
    #[serde(default)]
    borderless: bool,
    #[serde(default)]
    fullscreen: bool,
    #[serde(default)]
    window_position: Option<WindowPosition>,
    #[serde(default)]
    defaults: RawDefaults,
    #[serde(default)]
    initial_state: Option<String>,
    #[serde(default, deserialize_with = "ordered_states")]
    states: Option<Vec<(String, Vec<RawButton>)>>,
    #[serde(default)]
    buttons: Option<Vec<RawButton>>,
}

fn default_spacing() -> u32 {
    DEFAULT_SPACING
}

fn default_padding() -> u32 {
    DEFAULT_PADDING
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefaults {
    bg_color: Option<String>,
    fg_color: Option<String>,
    empty_color: Option<String>,
    fontsize: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawButton {
    position: Position,
    #[serde(default)]
    txt: Option<String>,
    #[serde(default)]
    cmd: Option<String>,
    #[serde(default)]
    switch: Option<String>,
    #[serde(default)]
    bg_color: Option<String>,
    #[serde(default)]
    fg_color: Option<String>,
    #[serde(default)]
    fontsize: Option<u32>,
    #[serde(default)]
    icon: Option<PathBuf>,
}

/// Deserialise the `states:` mapping while keeping document order, which
/// decides the default initial state.
fn ordered_states<'de, D>(deserializer: D) -> Result<Option<Vec<(String, Vec<RawButton>)>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{MapAccess, Visitor};
    struct V;
    impl<'de> Visitor<'de> for V {
        type Value = Vec<(String, Vec<RawButton>)>;
        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a mapping of state name to a list of buttons")
        }
        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut states = Vec::new();
            while let Some(name) = map.next_key::<String>()? {
                let buttons: Vec<RawButton> = map.next_value()?;
                states.push((name, buttons));
            }
            Ok(states)
        }
    }
    deserializer.deserialize_map(V).map(Some)
}

//  Resolved config

/// Grid spacing, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Gap between neighbouring buttons.
    pub spacing: u32,
    /// Gap between the grid and the window edge.
    pub padding: u32,
}

/// Requested window origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSettings {
    pub borderless: bool,
    pub fullscreen: bool,
    pub position: Option<WindowPosition>,
}

/// Board-wide appearance defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub bg_color: HexColor,
    pub fg_color: HexColor,
    /// Background of cells without a button.
    pub empty_color: HexColor,
    pub font_size: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bg_color: DEFAULT_BG_COLOR,
            fg_color: DEFAULT_FG_COLOR,
            empty_color: DEFAULT_EMPTY_COLOR,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// A validated board configuration.
///
/// Only obtainable through [`Config::load`] or [`Config::from_yaml_str`],
/// so every `Config` upholds:
///
/// * `columns` and `rows` are non-zero;
/// * every button lies inside the grid and positions are unique per state;
/// * every [`Action::SwitchState`] points at an existing state;
/// * state names are unique and there is at least one state.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    columns: usize,
    rows: usize,
    layout: Layout,
    window: WindowSettings,
    style: Style,
    states: Vec<ButtonState>,
    initial_state: StateId,
}

impl Config {
    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        resolve(raw)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn window(&self) -> WindowSettings {
        self.window
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// All states in document order.
    pub fn states(&self) -> &[ButtonState] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&ButtonState> {
        self.states.get(id.0)
    }

    /// Look up a state by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name() == name).map(StateId)
    }

    /// The state that is active at startup.
    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    /// Total number of buttons across all states.
    pub fn button_count(&self) -> usize {
        self.states.iter().map(ButtonState::len).sum()
    }
}

//  Validation

/// Where in the document a problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Defaults,
    InitialState,
    Button { state: String, position: Position },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Defaults => write!(f, "in defaults"),
            Location::InitialState => write!(f, "in initial_state"),
            Location::Button { state, position } => {
                write!(f, "for button {} in state {:?}", position, state)
            }
        }
    }
}

/// Error from loading, parsing or validating a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not access config file at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error(
        "invalid dimension {name}: {value} (must be between 1 and {max})",
        max = MAX_DIMENSION
    )]
    InvalidDimension { name: &'static str, value: usize },
    #[error("invalid {field} {value:?} {location}: expected #RRGGBB")]
    InvalidColor {
        field: &'static str,
        value: String,
        location: Location,
    },
    #[error("invalid fontsize {value} {location}: must be at least 1")]
    InvalidFontSize { value: u32, location: Location },
    #[error("position {position} in state {state:?} is outside the {rows}x{columns} grid")]
    PositionOutOfBounds {
        state: String,
        position: Position,
        rows: usize,
        columns: usize,
    },
    #[error("duplicate position {position} in state {state:?}")]
    DuplicatePosition { state: String, position: Position },
    #[error("both cmd and switch given {location}")]
    ConflictingAction { location: Location },
    #[error("unknown state {name:?} {location}")]
    UnknownState { name: String, location: Location },
    #[error("duplicate state {0:?}")]
    DuplicateState(String),
    #[error("state names must not be empty")]
    EmptyStateName,
    #[error("no states defined")]
    NoStates,
    #[error("'states' and 'buttons' are mutually exclusive")]
    AmbiguousButtons,
}

fn check_dimension(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(ConfigError::InvalidDimension { name, value });
    }
    Ok(value)
}

fn color_or(
    raw: Option<&str>,
    fallback: HexColor,
    field: &'static str,
    location: impl FnOnce() -> Location,
) -> Result<HexColor, ConfigError> {
    match raw {
        None => Ok(fallback),
        Some(s) => HexColor::parse(s).map_err(|_| ConfigError::InvalidColor {
            field,
            value: s.to_string(),
            location: location(),
        }),
    }
}

fn font_size_or(
    raw: Option<u32>,
    fallback: u32,
    location: impl FnOnce() -> Location,
) -> Result<u32, ConfigError> {
    match raw {
        Some(0) => Err(ConfigError::InvalidFontSize {
            value: 0,
            location: location(),
        }),
        Some(size) => Ok(size),
        None => Ok(fallback),
    }
}

fn resolve_style(raw: &RawDefaults) -> Result<Style, ConfigError> {
    let builtin = Style::default();
    Ok(Style {
        bg_color: color_or(raw.bg_color.as_deref(), builtin.bg_color, "bg_color", || Location::Defaults)?,
        fg_color: color_or(raw.fg_color.as_deref(), builtin.fg_color, "fg_color", || Location::Defaults)?,
        empty_color: color_or(
            raw.empty_color.as_deref(),
            builtin.empty_color,
            "empty_color",
            || Location::Defaults,
        )?,
        font_size: font_size_or(raw.fontsize, builtin.font_size, || Location::Defaults)?,
    })
}

struct Resolver<'a> {
    columns: usize,
    rows: usize,
    style: Style,
    ids: HashMap<&'a str, StateId>,
}

impl Resolver<'_> {
    fn button(&self, state: &str, raw: &RawButton) -> Result<Button, ConfigError> {
        let position = raw.position;
        if position.row >= self.rows || position.col >= self.columns {
            return Err(ConfigError::PositionOutOfBounds {
                state: state.to_string(),
                position,
                rows: self.rows,
                columns: self.columns,
            });
        }
        let location = || Location::Button {
            state: state.to_string(),
            position,
        };

        if raw.cmd.is_some() && raw.switch.is_some() {
            return Err(ConfigError::ConflictingAction {
                location: location(),
            });
        }
        let command = raw
            .cmd
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let action = match (command, raw.switch.as_deref()) {
            (Some(cmd), _) => Some(Action::Command(cmd.to_string())),
            (None, Some(target)) => {
                let id = self.ids.get(target).ok_or_else(|| ConfigError::UnknownState {
                    name: target.to_string(),
                    location: location(),
                })?;
                Some(Action::SwitchState(*id))
            }
            (None, None) => None,
        };

        Ok(Button {
            position,
            label: raw.txt.clone().unwrap_or_default(),
            bg_color: color_or(raw.bg_color.as_deref(), self.style.bg_color, "bg_color", location)?,
            fg_color: color_or(raw.fg_color.as_deref(), self.style.fg_color, "fg_color", location)?,
            font_size: font_size_or(raw.fontsize, self.style.font_size, location)?,
            icon: raw.icon.clone(),
            action,
        })
    }
}

fn resolve(raw: RawConfig) -> Result<Config, ConfigError> {
    let columns = check_dimension("columns", raw.columns)?;
    let rows = check_dimension("rows", raw.rows)?;
    let style = resolve_style(&raw.defaults)?;

    let pages = match (raw.states, raw.buttons) {
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousButtons),
        (Some(states), None) => states,
        (None, Some(buttons)) => vec![(LEGACY_STATE_NAME.to_string(), buttons)],
        (None, None) => Vec::new(),
    };
    if pages.is_empty() {
        return Err(ConfigError::NoStates);
    }

    let mut ids = HashMap::with_capacity(pages.len());
    for (index, (name, _)) in pages.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyStateName);
        }
        if ids.insert(name.as_str(), StateId(index)).is_some() {
            return Err(ConfigError::DuplicateState(name.clone()));
        }
    }

    let initial_state = match raw.initial_state.as_deref() {
        Some(name) => *ids.get(name).ok_or_else(|| ConfigError::UnknownState {
            name: name.to_string(),
            location: Location::InitialState,
        })?,
        None => StateId(0),
    };

    let resolver = Resolver {
        columns,
        rows,
        style,
        ids,
    };

    let mut states = Vec::with_capacity(pages.len());
    for (name, raw_buttons) in &pages {
        let mut buttons = BTreeMap::new();
        for raw_button in raw_buttons {
            let button = resolver.button(name, raw_button)?;
            let position = button.position;
            if buttons.insert(position, button).is_some() {
                return Err(ConfigError::DuplicatePosition {
                    state: name.clone(),
                    position,
                });
            }
        }
        states.push(ButtonState::new(name.clone(), buttons));
    }

    Ok(Config {
        columns,
        rows,
        layout: Layout {
            spacing: raw.spacing,
            padding: raw.padding,
        },
        window: WindowSettings {
            borderless: raw.borderless,
            fullscreen: raw.fullscreen,
            position: raw.window_position,
        },
        style,
        states,
        initial_state,
    })
}
