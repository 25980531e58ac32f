//! Input event abstraction
//!
//! The run loop reads events through this trait so tests can drive the app
//! with a scripted sequence instead of a real keyboard.

use std::time::Duration;

use anyhow::Result;
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub trait EventSource {
    /// Poll for events with a timeout
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<Event>;
}

/// Real keyboard input via crossterm
pub struct KeyboardEvents;

impl EventSource for KeyboardEvents {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Scripted input for tests; ends with an implicit quit
pub struct ScriptedEvents {
    events: std::vec::IntoIter<Event>,
}

impl ScriptedEvents {
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }

    #[must_use]
    pub fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        })
    }

    #[must_use]
    pub fn char_key(c: char) -> Event {
        Self::key(KeyCode::Char(c))
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(self
            .events
            .next()
            .unwrap_or_else(|| Self::char_key('q')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_events_replay_in_order_then_quit() {
        let mut source = ScriptedEvents::new(vec![
            ScriptedEvents::char_key('l'),
            ScriptedEvents::key(KeyCode::Left),
        ]);

        assert!(source.poll(Duration::ZERO).unwrap());
        let Event::Key(key) = source.read().unwrap() else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Char('l'));

        let Event::Key(key) = source.read().unwrap() else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Left);

        let Event::Key(key) = source.read().unwrap() else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Char('q'));
    }
}
