//! **vulcanboard**: a touchscreen hotkey board.
//!
//! A YAML file describes a `rows × columns` grid of buttons organised in
//! named *states* (pages).  Each button either runs a shell command or
//! switches to another state.  The configuration is loaded and validated
//! once at startup and never changes afterwards.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::Launcher`]: runs commands, so the [`board::Board`] is not
//!   coupled to process spawning.
//! * [`traits::EventSource`]: delivers presses and switches (stdin lines,
//!   GTK clicks, a test harness, …) so the board is not coupled to any
//!   particular input.
//!
//! Concrete implementations live in [`launcher`] (the system shell) and
//! [`input`] (line protocol).  The optional GTK4 window lives in
//! [`frontend`].

pub mod board;
pub mod button;
pub mod color;
pub mod config;
pub mod event;
pub mod frontend;
pub mod input;
pub mod launcher;
pub mod traits;
