//! Live text feed of door commands.
//!
//! An external process appends lines like
//!
//! ```text
//! door 3 close
//! door 3 open
//! ```
//!
//! to a shared text source.  A [`FeedCursor`] remembers how many lines it has
//! already consumed and turns only the new ones into events stamped with the
//! time they were seen.

use std::path::Path;

use nav_core::SegmentId;

use crate::{Event, EventAction, EventResult};

#[derive(Clone, Debug, Default)]
pub struct FeedCursor {
    consumed: usize,
}

impl FeedCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Parse the lines of `text` after the last consumed one.  Lines for
    /// other entity types and malformed lines are skipped with a warning.
    pub fn poll(&mut self, text: &str, now: f64) -> Vec<Event> {
        let mut events = Vec::new();
        let mut seen = 0;
        for (n, line) in text.lines().enumerate() {
            seen = n + 1;
            if n < self.consumed {
                continue;
            }
            if let Some(e) = parse_line(line, now, n + 1) {
                events.push(e);
            }
        }
        self.consumed = self.consumed.max(seen);
        events
    }

    /// [`poll`](Self::poll) over the current contents of a file.
    pub fn poll_file(&mut self, path: &Path, now: f64) -> EventResult<Vec<Event>> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.poll(&text, now))
    }
}

fn parse_line(line: &str, now: f64, lineno: usize) -> Option<Event> {
    let mut words = line.split_whitespace();
    let entity = words.next()?;
    if !entity.eq_ignore_ascii_case("door") {
        tracing::warn!(line = lineno, entity, "feed entity not supported; skipped");
        return None;
    }
    let (Some(id), Some(state)) = (words.next(), words.next()) else {
        tracing::warn!(line = lineno, "feed line needs `door <id> <state>`; skipped");
        return None;
    };
    let Ok(id) = id.parse::<u32>() else {
        tracing::warn!(line = lineno, id, "feed door id is not a number; skipped");
        return None;
    };
    match state.parse::<EventAction>() {
        Ok(EventAction::Nothing) | Err(_) => {
            tracing::warn!(line = lineno, state, "feed door state not recognised; skipped");
            None
        }
        Ok(action) => Some(Event::new(SegmentId(id), now, action)),
    }
}
