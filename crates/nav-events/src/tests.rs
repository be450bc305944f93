//! Unit tests for nav-events.

use nav_core::{SegmentId, SimClock, Tick};

use crate::{Event, EventAction};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ev(seg: u32, time: f64, action: EventAction) -> Event {
    Event::new(SegmentId(seg), time, action)
}

/// 0.1 s steps.
fn clock() -> SimClock {
    SimClock::new(0.1)
}

// ── Event ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event {
    use super::*;
    use crate::EventError;

    #[test]
    fn action_names_are_case_insensitive() {
        assert_eq!("OPEN".parse::<EventAction>().unwrap(), EventAction::Open);
        assert_eq!(" Temp_Close ".parse::<EventAction>().unwrap(), EventAction::TempClose);
        assert_eq!("reset".parse::<EventAction>().unwrap(), EventAction::ResetUsage);
        assert_eq!("reset_usage".parse::<EventAction>().unwrap(), EventAction::ResetUsage);
        assert_eq!("nothing".parse::<EventAction>().unwrap(), EventAction::Nothing);
        assert!(matches!("explode".parse::<EventAction>(), Err(EventError::UnknownAction(_))));
    }

    #[test]
    fn display_round_trips_through_name() {
        for a in [
            EventAction::Open,
            EventAction::Close,
            EventAction::TempClose,
            EventAction::ResetUsage,
            EventAction::Nothing,
        ] {
            assert_eq!(a.to_string().parse::<EventAction>().unwrap(), a);
        }
    }

    #[test]
    fn invalid_times_are_rejected() {
        assert!(ev(1, -1.0, EventAction::Open).validated().is_err());
        assert!(ev(1, f64::NAN, EventAction::Open).validated().is_err());
        assert!(ev(1, 0.0, EventAction::Open).validated().is_ok());
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;
    use crate::EventQueue;

    #[test]
    fn events_file_under_first_reaching_tick() {
        let c = clock();
        let mut q = EventQueue::new();
        q.push(ev(1, 5.0, EventAction::Close), &c);
        q.push(ev(2, 0.25, EventAction::Close), &c);
        q.push(ev(3, 0.0, EventAction::Open), &c);
        assert_eq!(q.len(), 3);
        assert_eq!(q.tick_count(), 3);
        assert_eq!(q.next_tick(), Some(Tick(0)));

        assert_eq!(q.drain_due(Tick(0)).len(), 1);
        assert!(q.drain_due(Tick(2)).is_empty());
        // 0.25 s falls between steps 2 and 3: it fires on step 3.
        let due = q.drain_due(Tick(3));
        assert_eq!(due, vec![ev(2, 0.25, EventAction::Close)]);
        assert_eq!(q.next_tick(), Some(Tick(50)));
    }

    #[test]
    fn event_within_eps_of_step_fires_on_it() {
        let c = clock();
        let mut q = EventQueue::new();
        q.push(ev(1, 0.3 + 5e-8, EventAction::Open), &c);
        q.push(ev(2, 0.3 - 5e-8, EventAction::Open), &c);
        assert_eq!(q.drain_due(Tick(3)).len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn late_drain_catches_up_in_time_order() {
        let c = clock();
        let mut q = EventQueue::from_events(
            [
                ev(1, 0.5, EventAction::Open),
                ev(2, 0.1, EventAction::Close),
                ev(3, 0.5, EventAction::TempClose),
                ev(4, 9.0, EventAction::Open),
            ],
            &c,
        );
        let due = q.drain_due(Tick(10));
        let order: Vec<u32> = due.iter().map(|e| e.segment.0).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(Tick(u64::MAX)).len(), 1);
        assert!(q.is_empty());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{load_events_csv, load_events_reader, EventError};

    #[test]
    fn reads_and_sorts_rows() {
        let csv = "time,segment,action\n20,1,open\n5.0,1,Close\n 30.5 , 4 , temp_close \n";
        let events = load_events_reader(Cursor::new(csv)).unwrap();
        assert_eq!(
            events,
            vec![
                ev(1, 5.0, EventAction::Close),
                ev(1, 20.0, EventAction::Open),
                ev(4, 30.5, EventAction::TempClose),
            ]
        );
    }

    #[test]
    fn bad_rows_fail_the_load() {
        let unknown = "time,segment,action\n1,1,explode\n";
        assert!(matches!(load_events_reader(Cursor::new(unknown)), Err(EventError::UnknownAction(_))));
        let negative = "time,segment,action\n-1,1,open\n";
        assert!(matches!(load_events_reader(Cursor::new(negative)), Err(EventError::Parse(_))));
        let garbage = "time,segment,action\nsoon,1,open\n";
        assert!(matches!(load_events_reader(Cursor::new(garbage)), Err(EventError::Parse(_))));
    }

    #[test]
    fn reads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "time,segment,action").unwrap();
        writeln!(f, "5,1,close").unwrap();
        writeln!(f, "20,1,open").unwrap();
        f.flush().unwrap();
        assert_eq!(load_events_csv(f.path()).unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_events_csv(&dir.path().join("none.csv")).unwrap_err();
        assert!(matches!(err, EventError::Io(_)));
    }
}

// ── DoorSchedule ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{load_schedule_csv, load_schedule_reader, DoorSchedule, EventError};

    #[test]
    fn expand_opens_then_temp_closes_every_member() {
        let mut s = DoorSchedule::new();
        s.add_member(0, SegmentId(3));
        s.add_member(0, SegmentId(4));
        s.add_time(0, 10.0, 5.0, false);
        let events = s.expand().unwrap();
        assert_eq!(
            events,
            vec![
                ev(3, 10.0, EventAction::Open),
                ev(4, 10.0, EventAction::Open),
                ev(3, 15.0, EventAction::TempClose),
                ev(4, 15.0, EventAction::TempClose),
            ]
        );
    }

    #[test]
    fn reset_flag_emits_usage_reset() {
        let mut s = DoorSchedule::new();
        s.add_member(1, SegmentId(7));
        s.add_time(1, 15.0, 10.0, true);
        assert_eq!(
            s.expand().unwrap(),
            vec![ev(7, 15.0, EventAction::ResetUsage), ev(7, 25.0, EventAction::TempClose)]
        );
    }

    #[test]
    fn unknown_group_and_bad_closing_time() {
        let mut s = DoorSchedule::new();
        s.add_time(9, 1.0, 1.0, false);
        assert!(matches!(s.expand(), Err(EventError::UnknownGroup(9))));

        let mut s = DoorSchedule::new();
        s.add_member(0, SegmentId(1));
        s.add_time(0, 1.0, 0.0, false);
        assert!(matches!(s.expand(), Err(EventError::InvalidTime(_))));
    }

    #[test]
    fn loads_groups_times_and_limits() {
        let groups = "group,segment,max_agents\n0,3,20\n0,4,20\n1,7,\n";
        let times = "group,t,closing_time,reset\n0,10,5,false\n0,40,5,FALSE\n1,15,10,true\n";
        let s = load_schedule_reader(Cursor::new(groups), Cursor::new(times)).unwrap();
        assert_eq!(s.groups[&0].members, vec![SegmentId(3), SegmentId(4)]);
        assert_eq!(s.groups[&1].max_agents, None);
        assert_eq!(s.usage_limits(), vec![(SegmentId(3), 20), (SegmentId(4), 20)]);
        assert!(s.times[2].reset && !s.times[1].reset);
        // 2 openings × 2 doors × 2 events + 1 opening × 1 door × 2 events.
        assert_eq!(s.expand().unwrap().len(), 10);
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let gp = dir.path().join("groups.csv");
        let tp = dir.path().join("times.csv");
        let mut g = std::fs::File::create(&gp).unwrap();
        writeln!(g, "group,segment,max_agents\n2,5,").unwrap();
        let mut t = std::fs::File::create(&tp).unwrap();
        writeln!(t, "group,t,closing_time,reset\n2,1.5,2,").unwrap();
        let s = load_schedule_csv(&gp, &tp).unwrap();
        assert_eq!(
            s.expand().unwrap(),
            vec![ev(5, 1.5, EventAction::Open), ev(5, 3.5, EventAction::TempClose)]
        );
    }
}

// ── FeedCursor ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod feed {
    use std::io::Write;

    use super::*;
    use crate::FeedCursor;

    #[test]
    fn only_new_lines_are_parsed() {
        let mut cur = FeedCursor::new();
        let mut text = String::from("door 3 close\n");
        assert_eq!(cur.poll(&text, 1.0), vec![ev(3, 1.0, EventAction::Close)]);
        assert!(cur.poll(&text, 2.0).is_empty());

        text.push_str("door 3 open\ndoor 4 TEMP_CLOSE\n");
        assert_eq!(
            cur.poll(&text, 3.0),
            vec![ev(3, 3.0, EventAction::Open), ev(4, 3.0, EventAction::TempClose)]
        );
        assert_eq!(cur.consumed(), 3);
    }

    #[test]
    fn other_entities_and_junk_are_skipped() {
        let mut cur = FeedCursor::new();
        let text = "elevator 2 open\n\ndoor x open\ndoor 5\ndoor 5 nothing\ndoor 5 reset\n";
        assert_eq!(cur.poll(text, 0.5), vec![ev(5, 0.5, EventAction::ResetUsage)]);
        assert_eq!(cur.consumed(), 6);
    }

    #[test]
    fn polls_a_growing_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        let mut cur = FeedCursor::new();
        writeln!(f, "door 1 close").unwrap();
        f.flush().unwrap();
        assert_eq!(cur.poll_file(f.path(), 1.0).unwrap().len(), 1);
        writeln!(f, "door 1 open").unwrap();
        f.flush().unwrap();
        assert_eq!(cur.poll_file(f.path(), 2.0).unwrap(), vec![ev(1, 2.0, EventAction::Open)]);
    }
}
