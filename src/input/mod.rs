//! Event sources that read the line protocol.
//!
//! Scripts and other programs can drive the board by writing
//! newline-delimited events (see [`crate::event`]) to its stdin.

pub mod lines;
