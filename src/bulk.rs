//! Bulk operations
//!
//! Runs one independent call per id, all in flight at once. A failing id
//! never aborts or rolls back the others; the outcome lists both sides.

use crate::api::ApiError;
use futures::future::join_all;
use std::future::Future;
use thiserror::Error;

/// One id that failed within a batch
#[derive(Debug)]
pub struct BulkFailure {
    pub id: String,
    pub error: ApiError,
}

/// Result of a batch, in the order the ids were given
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

/// Some ids in a batch failed
#[derive(Error, Debug)]
#[error("{} of {} operations failed", .failed.len(), .total)]
pub struct PartialBulkFailure {
    pub failed: Vec<BulkFailure>,
    pub total: usize,
}

impl BulkOutcome {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ok with the succeeded ids, or the failures when at least one id failed
    pub fn into_result(self) -> Result<Vec<String>, PartialBulkFailure> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            let total = self.total();
            Err(PartialBulkFailure {
                failed: self.failed,
                total,
            })
        }
    }

    /// One-line status for the UI, e.g. `Deleted 4 of 5 (1 failed)`
    pub fn summary(&self, verb: &str) -> String {
        if self.failed.is_empty() {
            format!("{} {}", verb, self.succeeded.len())
        } else {
            format!(
                "{} {} of {} ({} failed)",
                verb,
                self.succeeded.len(),
                self.total(),
                self.failed.len()
            )
        }
    }
}

/// Fire `operation` for every id concurrently and collect the outcome
pub async fn run<F, Fut, T>(ids: &[String], operation: F) -> BulkOutcome
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let results = join_all(ids.iter().cloned().map(&operation)).await;

    let mut outcome = BulkOutcome::default();
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(_) => outcome.succeeded.push(id.clone()),
            Err(error) => {
                tracing::warn!("Bulk operation failed for {}: {}", id, error);
                outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        "Bulk operation finished: {} succeeded, {} failed",
        outcome.succeeded.len(),
        outcome.failed.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_test::block_on;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_failure_does_not_abort_others() {
        let calls = AtomicUsize::new(0);
        let outcome = block_on(run(&ids(&["a", "b", "c"]), |id| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if id == "b" {
                    Err(ApiError::Http {
                        status: 500,
                        status_text: "Internal Server Error".into(),
                    })
                } else {
                    Ok(())
                }
            }
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.succeeded, vec!["a", "c"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, "b");
        assert_eq!(outcome.summary("Deleted"), "Deleted 2 of 3 (1 failed)");
    }

    #[test]
    fn test_into_result() {
        let ok = block_on(run(&ids(&["a"]), |_| async { Ok::<_, ApiError>(()) }));
        assert!(ok.is_success());
        assert_eq!(ok.into_result().unwrap(), vec!["a"]);

        let partial = block_on(run(&ids(&["a", "b"]), |_| async {
            Err::<(), _>(ApiError::Network("offline".into()))
        }));
        let err = partial.into_result().unwrap_err();
        assert_eq!(err.total, 2);
        assert_eq!(err.to_string(), "2 of 2 operations failed");
    }

    #[test]
    fn test_empty_batch() {
        let outcome = block_on(run(&[], |_| async { Ok::<_, ApiError>(()) }));
        assert_eq!(outcome.total(), 0);
        assert_eq!(outcome.summary("Deleted"), "Deleted 0");
    }

    #[tokio::test]
    async fn test_calls_are_in_flight_together() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outcome = run(&ids(&["a", "b", "c", "d"]), |_| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, ApiError>(())
            }
        })
        .await;

        assert!(outcome.is_success());
        assert_eq!(peak.load(Ordering::SeqCst), 4);
    }
}
