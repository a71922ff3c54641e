//! Observation source port.
//!
//! A source yields the raw product observations for one roastery per check
//! cycle. How the observations are obtained (structured feed, scraper,
//! fixture) is the adapter's concern; the monitor receives plain data and
//! never reaches into a live session.

use async_trait::async_trait;

use crate::domain::RawObservation;
use crate::error::Result;

/// Supplier of one roastery's current product listings.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the monitor holds a boxed list of
/// sources across await points.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// The roastery this source observes.
    fn roastery(&self) -> &str;

    /// Fetch the current listings.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failure. A failed fetch is
    /// isolated to this roastery: the cycle continues with the others, and
    /// no missing-from-batch sweep runs for a roastery that failed.
    async fn fetch(&self) -> Result<Vec<RawObservation>>;
}
