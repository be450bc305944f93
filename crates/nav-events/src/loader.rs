//! CSV event loader.
//!
//! # CSV format
//!
//! One row per event, any order:
//!
//! ```csv
//! time,segment,action
//! 5.0,1,close
//! 20,1,open
//! 30.5,4,temp_close
//! ```
//!
//! `action` is one of `open`, `close`, `temp_close`, `reset`, `nothing`
//! (case-insensitive).  Rows are returned sorted by time; rows with equal
//! times keep file order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nav_core::SegmentId;

use crate::{Event, EventAction, EventError, EventResult};

#[derive(Deserialize)]
struct EventRecord {
    time:    f64,
    segment: u32,
    action:  String,
}

/// Load door events from a CSV file.
pub fn load_events_csv(path: &Path) -> EventResult<Vec<Event>> {
    let file = std::fs::File::open(path)?;
    load_events_reader(file)
}

/// Like [`load_events_csv`] but accepts any `Read` source.
pub fn load_events_reader<R: Read>(reader: R) -> EventResult<Vec<Event>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut events = Vec::new();

    for (row, result) in csv_reader.deserialize::<EventRecord>().enumerate() {
        let rec = result.map_err(|e| EventError::Parse(e.to_string()))?;
        let action: EventAction = rec.action.parse()?;
        let event = Event::new(SegmentId(rec.segment), rec.time, action)
            .validated()
            .map_err(|e| EventError::Parse(format!("row {}: {e}", row + 1)))?;
        events.push(event);
    }

    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    tracing::debug!(events = events.len(), "event file loaded");
    Ok(events)
}
