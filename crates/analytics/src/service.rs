use crate::engine::MovingAverageEngine;
use crate::error::AnalyticsError;
use crate::report::MovingAverageReport;
use crate::source::AmountSource;
use core_types::UserId;

/// Every way a moving-average request can end.
///
/// A user with zero recorded amounts is `NotFound`, never an empty `Success`,
/// and a store that cannot be read is always `Failure`.
#[derive(Debug)]
pub enum MovingAverageOutcome {
    Success(MovingAverageReport),
    /// The window was below 1. The source was not queried.
    InvalidWindow(i64),
    NotFound(UserId),
    Failure(AnalyticsError),
}

/// Wires an `AmountSource` to the `MovingAverageEngine`.
#[derive(Debug, Clone)]
pub struct AnalyticsService<S> {
    source: S,
    engine: MovingAverageEngine,
}

impl<S: AmountSource> AnalyticsService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            engine: MovingAverageEngine::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the user's ordered amounts and computes their moving average.
    #[tracing::instrument(skip(self))]
    pub async fn moving_average(&self, user_id: UserId, window: i64) -> MovingAverageOutcome {
        let window_size = match MovingAverageEngine::validate_window(window) {
            Ok(size) => size,
            Err(_) => {
                tracing::debug!("Rejected window before reading amounts.");
                return MovingAverageOutcome::InvalidWindow(window);
            }
        };

        let amounts = match self.source.fetch_amounts(user_id).await {
            Ok(amounts) => amounts,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to read amounts.");
                return MovingAverageOutcome::Failure(e.into());
            }
        };

        if amounts.is_empty() {
            tracing::info!("No amounts recorded for user.");
            return MovingAverageOutcome::NotFound(user_id);
        }

        match self.engine.compute(&amounts, window) {
            Ok(series) => {
                tracing::debug!(amounts = amounts.len(), points = series.len(), "Computed moving average.");
                MovingAverageOutcome::Success(MovingAverageReport::new(user_id, window_size, series))
            }
            Err(e) => {
                tracing::error!(error = ?e, "Moving average computation failed.");
                MovingAverageOutcome::Failure(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{InMemorySource, SourceError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts reads and fails every one of them.
    #[derive(Default)]
    struct BrokenSource {
        reads: AtomicUsize,
    }

    #[async_trait]
    impl AmountSource for BrokenSource {
        async fn fetch_amounts(&self, _user_id: UserId) -> Result<Vec<f64>, SourceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn success_carries_the_full_report() {
        let source = InMemorySource::new().with_amounts(UserId(100), [10.0, 20.0, 30.0, 40.0]);
        let service = AnalyticsService::new(source);

        match service.moving_average(UserId(100), 2).await {
            MovingAverageOutcome::Success(report) => {
                assert_eq!(report.user_id, UserId(100));
                assert_eq!(report.window_size, 2);
                assert_eq!(report.count, 3);
                assert_eq!(report.moving_averages, vec![15.0, 25.0, 35.0]);
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn user_without_amounts_is_not_found() {
        let service = AnalyticsService::new(InMemorySource::new());
        assert!(matches!(
            service.moving_average(UserId(5), 7).await,
            MovingAverageOutcome::NotFound(UserId(5))
        ));
    }

    #[tokio::test]
    async fn short_history_is_an_empty_success() {
        let source = InMemorySource::new().with_amounts(UserId(1), [1.0, 2.0, 3.0]);
        let service = AnalyticsService::new(source);

        match service.moving_average(UserId(1), 5).await {
            MovingAverageOutcome::Success(report) => {
                assert_eq!(report.count, 0);
                assert!(report.moving_averages.is_empty());
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_window_skips_the_source() {
        let service = AnalyticsService::new(BrokenSource::default());

        assert!(matches!(
            service.moving_average(UserId(1), 0).await,
            MovingAverageOutcome::InvalidWindow(0)
        ));
        assert!(matches!(
            service.moving_average(UserId(1), -1).await,
            MovingAverageOutcome::InvalidWindow(-1)
        ));
        assert_eq!(service.source().reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn source_errors_become_failures() {
        let service = AnalyticsService::new(BrokenSource::default());

        match service.moving_average(UserId(1), 3).await {
            MovingAverageOutcome::Failure(AnalyticsError::Source(SourceError::Unavailable(msg))) => {
                assert_eq!(msg, "connection refused");
            }
            other => panic!("expected Failure, got {other:?}"),
        }
        assert_eq!(service.source().reads.load(Ordering::SeqCst), 1);
    }
}
