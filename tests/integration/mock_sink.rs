//! Recording event sink for integration tests.

use tcpecho::app::events::AppEvent;
use tcpecho::app::ports::EventSink;

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Session(_)))
            .count()
    }

    pub fn summaries(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Summary(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
