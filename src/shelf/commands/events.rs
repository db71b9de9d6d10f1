use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Event, Reminder};
use crate::store::{RecordStore, StorageBackend};
use chrono::NaiveDate;

/// Which event(s) on a date a delete targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSelector {
    /// The n-th event on that date (0-based, insertion order).
    Position(usize),
    /// Every event on that date with exactly this name.
    Name(String),
}

pub fn add<B: StorageBackend>(
    store: &mut RecordStore<Event, B>,
    date: NaiveDate,
    name: &str,
    reminder: Reminder,
) -> Result<CmdResult<Event>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(CmdResult::warning("Please enter both date and event name."));
    }

    let event = Event::new(date, name, reminder);
    store.add(event.clone())?;

    let mut result = CmdResult::default().with_affected(vec![event]);
    result.add_message(CmdMessage::success(format!(
        "Event '{}' added on {}.",
        name, date
    )));
    Ok(result)
}

/// All events, oldest date first. Events sharing a date keep insertion order.
pub fn list<B: StorageBackend>(store: &RecordStore<Event, B>) -> Result<CmdResult<Event>> {
    let mut events = store.records().to_vec();
    events.sort_by_key(|e| e.date);

    let mut result = CmdResult::default();
    if events.is_empty() {
        result.add_message(CmdMessage::info("No events available."));
    }
    Ok(result.with_listed(events))
}

pub fn on_date<B: StorageBackend>(
    store: &RecordStore<Event, B>,
    date: NaiveDate,
) -> Result<CmdResult<Event>> {
    let events: Vec<Event> = store
        .records()
        .iter()
        .filter(|e| e.date == date)
        .cloned()
        .collect();

    let mut result = CmdResult::default();
    if events.is_empty() {
        result.add_message(CmdMessage::info(format!("No events on {}.", date)));
    }
    Ok(result.with_listed(events))
}

pub fn search<B: StorageBackend>(
    store: &RecordStore<Event, B>,
    term: &str,
) -> Result<CmdResult<Event>> {
    if term.trim().is_empty() {
        return Ok(CmdResult::warning("Please enter an event name to search."));
    }

    let found: Vec<Event> = store.search(term.trim()).into_iter().cloned().collect();
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("No events found."));
    }
    Ok(result.with_listed(found))
}

pub fn delete<B: StorageBackend>(
    store: &mut RecordStore<Event, B>,
    date: NaiveDate,
    selector: &EventSelector,
) -> Result<CmdResult<Event>> {
    let removed = match selector {
        EventSelector::Position(n) => store
            .remove_nth_where(|e| e.date == date, *n)?
            .into_iter()
            .collect::<Vec<_>>(),
        EventSelector::Name(name) => {
            store.remove_where(|e| e.date == date && e.name == *name)?
        }
    };

    if removed.is_empty() {
        return Ok(CmdResult::warning("No matching event found to delete."));
    }

    let mut result = CmdResult::default();
    for event in &removed {
        result.add_message(CmdMessage::success(format!(
            "Event '{}' on {} deleted.",
            event.name, event.date
        )));
    }
    Ok(result.with_affected(removed))
}

/// Events whose reminder has come due by `today` and that have not passed yet.
pub fn reminders<B: StorageBackend>(
    store: &RecordStore<Event, B>,
    today: NaiveDate,
) -> Result<CmdResult<Event>> {
    let mut due: Vec<Event> = store
        .records()
        .iter()
        .filter(|e| e.date >= today)
        .filter(|e| e.reminder_date().is_some_and(|fires| fires <= today))
        .cloned()
        .collect();
    due.sort_by_key(|e| e.date);

    let mut result = CmdResult::default();
    if due.is_empty() {
        result.add_message(CmdMessage::info("No reminders set."));
    }
    Ok(result.with_listed(due))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::Scope;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{date, open_mem};

    #[test]
    fn add_then_load_then_delete_by_position() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);
        let new_year = date("2024-01-01");

        add(&mut store, new_year, "New Year", Reminder::None).unwrap();

        let reopened = RecordStore::<Event, _>::open(&backend, Scope::Project).unwrap();
        let on_day = on_date(&reopened, new_year).unwrap();
        assert_eq!(on_day.listed.len(), 1);
        assert_eq!(on_day.listed[0].name, "New Year");

        let result = delete(&mut store, new_year, &EventSelector::Position(0)).unwrap();
        assert_eq!(result.affected.len(), 1);

        let reopened = RecordStore::<Event, _>::open(&backend, Scope::Project).unwrap();
        assert!(on_date(&reopened, new_year).unwrap().listed.is_empty());
    }

    #[test]
    fn blank_name_is_rejected_without_writing() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);

        let result = add(&mut store, date("2024-01-01"), "   ", Reminder::None).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert!(store.is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn delete_by_name_removes_all_matches_on_that_date() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);
        let day = date("2024-06-01");
        add(&mut store, day, "Standup", Reminder::None).unwrap();
        add(&mut store, day, "Standup", Reminder::None).unwrap();
        add(&mut store, date("2024-06-02"), "Standup", Reminder::None).unwrap();

        let result = delete(&mut store, day, &EventSelector::Name("Standup".into())).unwrap();
        assert_eq!(result.affected.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].date, date("2024-06-02"));
    }

    #[test]
    fn delete_missing_reports_not_found() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);
        add(&mut store, date("2024-01-01"), "New Year", Reminder::None).unwrap();
        let revision = store.revision();

        let by_pos = delete(&mut store, date("2024-01-01"), &EventSelector::Position(3)).unwrap();
        let by_name =
            delete(&mut store, date("2024-01-02"), &EventSelector::Name("New Year".into())).unwrap();

        for result in [by_pos, by_name] {
            assert!(result.affected.is_empty());
            assert!(result.has_level(MessageLevel::Warning));
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn list_sorts_by_date_keeping_insertion_order_for_ties() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);
        add(&mut store, date("2024-03-01"), "later", Reminder::None).unwrap();
        add(&mut store, date("2024-01-01"), "early-a", Reminder::None).unwrap();
        add(&mut store, date("2024-01-01"), "early-b", Reminder::None).unwrap();

        let names: Vec<_> = list(&store)
            .unwrap()
            .listed
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["early-a", "early-b", "later"]);
    }

    #[test]
    fn search_finds_added_event_by_substring() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);
        add(&mut store, date("2024-12-25"), "Christmas Dinner", Reminder::OneWeek).unwrap();

        let result = search(&store, "dinner").unwrap();
        assert_eq!(result.listed.len(), 1);

        let none = search(&store, "birthday").unwrap();
        assert!(none.listed.is_empty());
        assert!(none.has_level(MessageLevel::Info));

        let blank = search(&store, "  ").unwrap();
        assert!(blank.has_level(MessageLevel::Warning));
    }

    #[test]
    fn reminders_due_within_window() {
        let backend = MemBackend::new();
        let mut store = open_mem::<Event>(&backend);
        add(&mut store, date("2024-03-10"), "week-ahead", Reminder::OneWeek).unwrap();
        add(&mut store, date("2024-03-05"), "tomorrow", Reminder::OneDay).unwrap();
        add(&mut store, date("2024-03-20"), "too-early", Reminder::OneDay).unwrap();
        add(&mut store, date("2024-03-01"), "already-past", Reminder::OneWeek).unwrap();
        add(&mut store, date("2024-03-06"), "no-reminder", Reminder::None).unwrap();

        let result = reminders(&store, date("2024-03-04")).unwrap();
        let names: Vec<_> = result.listed.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["tomorrow", "week-ahead"]);
    }
}
