use std::sync::{Arc, Mutex};

use changecheck::dispatch::{ChangeEvent, ChangeHandler};

/// A handler that records every event it receives, shareable with the test
/// body while the consumer task owns the handler.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ChangeHandler for RecordingHandler {
    fn handle(&mut self, event: ChangeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
