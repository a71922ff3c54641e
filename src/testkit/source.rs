//! Mock [`ObservationSource`] implementation for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::RawObservation;
use crate::error::{Error, Result};
use crate::port::outbound::source::ObservationSource;

/// A mock source with a fixed queue of fetch results.
///
/// Each call to `fetch()` pops the next result from the queue; an exhausted
/// queue yields an empty batch. Use [`with_fetch_error`](Self::with_fetch_error)
/// to script a failing cycle.
pub struct ScriptedSource {
    roastery: String,
    results: Mutex<VecDeque<Result<Vec<RawObservation>>>>,
}

impl ScriptedSource {
    pub fn new(roastery: impl Into<String>) -> Self {
        Self {
            roastery: roastery.into(),
            results: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a successful fetch returning the given observations.
    #[must_use]
    pub fn with_batch(self, observations: Vec<RawObservation>) -> Self {
        self.results
            .lock()
            .expect("scripted source lock")
            .push_back(Ok(observations));
        self
    }

    /// Queue a failing fetch.
    #[must_use]
    pub fn with_fetch_error(self, message: &str) -> Self {
        self.results
            .lock()
            .expect("scripted source lock")
            .push_back(Err(Error::Source(message.to_string())));
        self
    }
}

#[async_trait]
impl ObservationSource for ScriptedSource {
    fn roastery(&self) -> &str {
        &self.roastery
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        self.results
            .lock()
            .expect("scripted source lock")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
