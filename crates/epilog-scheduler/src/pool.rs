//! Bounded worker pool used by every parallel phase

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Run `f` over `items` with at most `limit` invocations in flight
///
/// Results are returned in completion order, which is non-deterministic.
/// A panicked worker is logged and dropped; it never deadlocks the join.
/// This keeps the tier scheduler free of low-level concurrency
/// primitives: both the query phase and the extraction phase are one
/// call to this helper with their own limit.
pub async fn run_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let f = Arc::new(f);
    let mut workers = JoinSet::new();

    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let f = Arc::clone(&f);
        workers.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("pool semaphore closed");
            f(item).await
        });
    }

    let mut results = Vec::with_capacity(workers.len());
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => warn!("Pool worker failed: {}", e),
        }
    }
    results
}
