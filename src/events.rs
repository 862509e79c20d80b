//! Named transition events.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// An append-only sink for `(category, message)` events.
pub trait EventSink {
    fn log(&mut self, category: &str, message: &str);
}

/// A logged event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub category: String,
    pub message: String,
}

/// An in-memory [`EventSink`] that mirrors every event to the `log` facade.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns `true` if an event with this category and message was logged.
    pub fn contains(&self, category: &str, message: &str) -> bool {
        self.events
            .iter()
            .any(|event| event.category == category && event.message == message)
    }

    /// The messages logged under `category`, oldest first.
    pub fn messages<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.events
            .iter()
            .filter(move |event| event.category == category)
            .map(|event| event.message.as_str())
    }
}

impl EventSink for EventLog {
    fn log(&mut self, category: &str, message: &str) {
        log::info!("{}: {}", category, message);
        self.events.push(Event {
            category: category.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_events_in_order() {
        let mut log = EventLog::new();
        log.log("mission", "land");
        log.log("land", "start flare");
        log.log("land", "glide slope capture");

        assert_eq!(log.events().len(), 3);
        assert!(log.contains("mission", "land"));
        assert!(!log.contains("land", "land"));

        let land: Vec<&str> = log.messages("land").collect();
        assert_eq!(land, ["start flare", "glide slope capture"]);
    }
}
