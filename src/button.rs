//! Buttons and button states.
//!
//! A [`ButtonState`] is one page of the board: a sparse `rows × columns`
//! grid of [`Button`]s keyed by [`Position`].  Exactly one state is active
//! at a time; buttons with an [`Action::SwitchState`] move between them.
//!
//! Everything here is built once by the config loader and never mutated
//! afterwards.

use crate::color::HexColor;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A cell of the grid, `row` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Parse `"row col"` (whitespace or comma separated).
pub(crate) fn parse_position(s: &str) -> Option<Position> {
    let parts: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [row, col] => Some(Position::new(row.parse().ok()?, col.parse().ok()?)),
        _ => None,
    }
}

/// Accepts `[row, col]`, `{row: .., col: ..}` or the string `"row col"`.
impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Position;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[row, col], {{row, col}} or string \"row col\"")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Position, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let row = seq
                    .next_element()?
                    .ok_or_else(|| DeError::invalid_length(0, &self))?;
                let col = seq
                    .next_element()?
                    .ok_or_else(|| DeError::invalid_length(1, &self))?;
                if seq.next_element::<serde::de::IgnoredAny>()?.is_some() {
                    return Err(DeError::invalid_length(3, &self));
                }
                Ok(Position::new(row, col))
            }
            fn visit_map<A>(self, mut map: A) -> Result<Position, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut row = None;
                let mut col = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "row" => row = Some(map.next_value()?),
                        "col" | "column" => col = Some(map.next_value()?),
                        other => return Err(DeError::unknown_field(other, &["row", "col"])),
                    }
                }
                Ok(Position::new(
                    row.ok_or_else(|| DeError::missing_field("row"))?,
                    col.ok_or_else(|| DeError::missing_field("col"))?,
                ))
            }
            fn visit_str<E>(self, s: &str) -> Result<Position, E>
            where
                E: DeError,
            {
                parse_position(s).ok_or_else(|| {
                    DeError::custom(format!("position: expected \"row col\", got {:?}", s))
                })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Index of a [`ButtonState`] inside its [`Config`](crate::config::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub usize);

/// What happens when a button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a shell command, detached.
    Command(String),
    /// Make another state the active one.
    SwitchState(StateId),
}

/// A fully resolved button: defaults are already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub position: Position,
    pub label: String,
    pub bg_color: HexColor,
    pub fg_color: HexColor,
    pub font_size: u32,
    pub icon: Option<PathBuf>,
    /// `None` for label-only buttons.
    pub action: Option<Action>,
}

/// A named page of buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    name: String,
    buttons: BTreeMap<Position, Button>,
}

impl ButtonState {
    /// Build a state from buttons whose positions the caller has already
    /// checked for uniqueness.
    pub(crate) fn new(name: String, buttons: BTreeMap<Position, Button>) -> Self {
        Self { name, buttons }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The button at `position`, if the cell is populated.
    pub fn button_at(&self, position: Position) -> Option<&Button> {
        self.buttons.get(&position)
    }

    /// Buttons in row-major order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.buttons.values()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
