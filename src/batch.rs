//! Background fetch batches
//!
//! Each range change starts a batch in a spawned tokio task. Results come back
//! over a channel tagged with the batch generation, so the app can discard
//! batches that were superseded while in flight.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::data::{DateRange, Rate};
use crate::fetcher::{FetchError, RateFetcher};

/// Outcome of one batch, sent from the background task to the app
#[derive(Debug)]
pub struct BatchMessage {
    /// Generation the batch was started under
    pub generation: u64,
    /// Range the batch was started for
    pub range: DateRange,
    /// The full series, or the first failure
    pub result: Result<Vec<Rate>, FetchError>,
}

/// Starts batches and collects their results
pub struct BatchRunner {
    sender: mpsc::Sender<BatchMessage>,
    receiver: mpsc::Receiver<BatchMessage>,
    generation: u64,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            sender,
            receiver,
            generation: 0,
        }
    }

    /// Generation of the most recently started (or invalidated) batch
    #[cfg(test)]
    pub(crate) fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Marks every in-flight batch as stale without starting a new one
    ///
    /// In-flight requests are not aborted; their results are dropped on arrival.
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Spawns a batch fetching every date of `range`
    ///
    /// Must be called from within a tokio runtime. Returns the new generation.
    pub fn spawn(&mut self, fetcher: Arc<RateFetcher>, range: DateRange) -> u64 {
        let generation = self.invalidate();
        let sender = self.sender.clone();

        tokio::spawn(async move {
            let dates = range.fetch_dates();
            let result = fetcher.fetch_range(&dates).await;
            // The receiver lives as long as the app; a send error means shutdown
            let _ = sender
                .send(BatchMessage {
                    generation,
                    range,
                    result,
                })
                .await;
        });

        generation
    }

    /// Returns a finished batch without blocking, if one is pending
    pub fn try_recv(&mut self) -> Option<BatchMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished batch
    pub async fn recv(&mut self) -> Option<BatchMessage> {
        self.receiver.recv().await
    }

    /// Whether a message belongs to the latest generation
    pub fn is_current(&self, message: &BatchMessage) -> bool {
        message.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RateCache;
    use crate::fetcher::test_support::{date, FakeSource};

    fn fetcher(source: Arc<FakeSource>) -> Arc<RateFetcher> {
        Arc::new(RateFetcher::new(source, Arc::new(RateCache::default()), "ILS"))
    }

    #[test]
    fn test_new_runner_has_generation_zero() {
        let runner = BatchRunner::new();
        assert_eq!(runner.current_generation(), 0);
    }

    #[test]
    fn test_invalidate_bumps_generation() {
        let mut runner = BatchRunner::new();
        assert_eq!(runner.invalidate(), 1);
        assert_eq!(runner.invalidate(), 2);
    }

    #[test]
    fn test_try_recv_empty() {
        let mut runner = BatchRunner::new();
        assert!(runner.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_spawned_batch_reports_series() {
        let source = Arc::new(
            FakeSource::new()
                .with_rate(date(2023, 1, 1), 3.60)
                .with_rate(date(2023, 1, 2), 3.62),
        );
        let mut runner = BatchRunner::new();
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 3));

        let generation = runner.spawn(fetcher(source), range);
        let message = runner.recv().await.expect("batch should report");

        assert_eq!(message.generation, generation);
        assert_eq!(message.range, range);
        assert!(runner.is_current(&message));
        assert_eq!(message.result.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_batch_is_not_current() {
        let source = Arc::new(FakeSource::new().with_rate(date(2023, 1, 1), 3.60));
        let mut runner = BatchRunner::new();
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 2));

        runner.spawn(fetcher(source), range);
        runner.invalidate();
        let message = runner.recv().await.expect("batch should report");

        assert!(!runner.is_current(&message));
    }
}
