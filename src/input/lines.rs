//! Line-oriented [`EventSource`] implementation.
//!
//! Reads any [`BufRead`] (normally stdin) one line at a time and parses
//! each line with [`parse_line`].  Malformed lines are logged and skipped.
//! The source ends at end of input, after a `Quit` event, or when the
//! receiving side hangs up.

use crate::event::{parse_line, BoardEvent};
use crate::traits::EventSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader, Stdin};
use std::sync::mpsc;

/// An [`EventSource`] over newline-delimited events.
pub struct LineSource<R> {
    reader: R,
}

/// Errors produced by the line source.
#[derive(Debug, thiserror::Error)]
pub enum LineSourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineSource<BufReader<Stdin>> {
    /// Read events from the process's stdin.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead + Send> EventSource for LineSource<R> {
    type Error = LineSourceError;

    /// Forward events until the input is exhausted.
    ///
    /// This method **blocks** on the reader.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<BoardEvent>) -> Result<(), Self::Error> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                debug!("end of input");
                return Ok(());
            }
            let event = match parse_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    error!("bad event {:?}: {}", line.trim(), e);
                    continue;
                }
            };
            debug!("received {:?}", event);
            let quit = event == BoardEvent::Quit;
            if sink.send(event).is_err() {
                info!("sink closed, shutting down");
                return Ok(());
            }
            if quit {
                return Ok(());
            }
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Position;
    use std::io::Cursor;

    fn collect(input: &str) -> Vec<BoardEvent> {
        let (tx, rx) = mpsc::channel();
        LineSource::new(Cursor::new(input.to_string())).run(tx).unwrap();
        rx.try_iter().collect()
    }

    #[test]
    fn forwards_events_in_order() {
        let events = collect("press 0 1\n{\"Switch\":\"media\"}\n1 2\n");
        assert_eq!(
            events,
            vec![
                BoardEvent::Press(Position::new(0, 1)),
                BoardEvent::Switch("media".into()),
                BoardEvent::Press(Position::new(1, 2)),
            ]
        );
    }

    #[test]
    fn malformed_lines_do_not_stop_the_source() {
        let events = collect("not an event\n\n# comment\n{broken\npress 0 0");
        assert_eq!(events, vec![BoardEvent::Press(Position::new(0, 0))]);
    }

    #[test]
    fn stops_after_quit() {
        let events = collect("press 0 0\nquit\npress 1 1\n");
        assert_eq!(
            events,
            vec![BoardEvent::Press(Position::new(0, 0)), BoardEvent::Quit]
        );
    }

    #[test]
    fn stops_when_sink_is_dropped() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        LineSource::new(Cursor::new("press 0 0\npress 0 1\n"))
            .run(tx)
            .unwrap();
    }

    #[test]
    fn runs_on_a_background_thread() {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            let mut source = LineSource::new(Cursor::new(b"switch media\n".to_vec()));
            source.run(tx)
        });
        assert_eq!(rx.recv().unwrap(), BoardEvent::Switch("media".into()));
        handle.join().unwrap().unwrap();
    }
}
