//! Frontends that put the board on screen.
//!
//! When the `frontend-gtk` feature is enabled, [`gtk::run_main_loop`]
//! takes over the main thread and drives both event processing and
//! rendering through the GLib main loop.  The CSS generation it uses is
//! toolkit-independent and always available in [`css`].

pub mod css;
#[cfg(feature = "frontend-gtk")]
pub mod gtk;
