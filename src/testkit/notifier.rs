//! Recording notifier capturing events for assertions.

use std::sync::{Arc, Mutex};

use crate::port::outbound::notifier::{Event, Notifier};

/// A notifier that records every event it receives.
///
/// Clone-cheap: clones share the same event buffer.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("recording notifier lock").clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().expect("recording notifier lock").len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events
            .lock()
            .expect("recording notifier lock")
            .push(event);
    }
}
