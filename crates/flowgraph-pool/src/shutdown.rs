//! Two-phase shutdown: polite drain, then forced cancellation.
//!
//! Rust has no portable thread-interrupt primitive, so this polls an
//! atomic exit counter against a deadline. `thread::park`/`unpark` supply
//! the "cancel in-flight" nudge in phase 2.

use crate::pool::Pool;
use std::time::{Duration, Instant};

const PHASE_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outcome of a two-phase shutdown attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// All workers exited during phase 1 (the polite drain).
    DrainedInPhase1,
    /// All workers exited only after phase 2's forced cancellation nudge.
    DrainedInPhase2,
    /// Workers had not exited after both phases; they were left running.
    DidNotTerminate,
}

/// Phase 1: refuse new tasks (the pool's `shutdown` flag is now set,
/// `enqueue`-style callers should check `is_shutting_down`), let running
/// tasks drain, wait up to 60s.
///
/// Phase 2: if not drained, unpark any parked workers and wait another
/// 60s. If still not drained, log and return without blocking further —
/// the calling thread is never hung indefinitely.
pub fn two_phase_shutdown(pool: &Pool) -> ShutdownOutcome {
    pool.request_shutdown();

    if wait_for_drain(pool, PHASE_TIMEOUT) {
        join_all(pool);
        return ShutdownOutcome::DrainedInPhase1;
    }

    tracing::warn!(
        pool = pool.name(),
        "pool did not terminate in phase 1, entering forced phase"
    );
    pool.unpark_all();

    if wait_for_drain(pool, PHASE_TIMEOUT) {
        join_all(pool);
        return ShutdownOutcome::DrainedInPhase2;
    }

    tracing::warn!(pool = pool.name(), "pool did not terminate");
    ShutdownOutcome::DidNotTerminate
}

fn wait_for_drain(pool: &Pool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if pool.exited_workers() >= pool.total_workers() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn join_all(pool: &Pool) {
    for handle in pool.take_handles() {
        let _ = handle.join();
    }
}

/// Exposed so non-graph convenience ops can observe drain progress without
/// pulling in the full shutdown sequence.
pub fn exited_worker_count(pool: &Pool) -> usize {
    pool.exited_workers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    #[test]
    fn drains_cooperative_workers_in_phase1() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticks2 = Arc::clone(&ticks);
        let pool = Pool::queue_work("shutdown-test", 3, move || {
            ticks2.fetch_add(1, Ordering::Relaxed);
            std::thread::sleep(StdDuration::from_millis(1));
        })
        .unwrap();

        std::thread::sleep(StdDuration::from_millis(20));
        let outcome = two_phase_shutdown(&pool);

        assert_eq!(outcome, ShutdownOutcome::DrainedInPhase1);
        assert!(ticks.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn idempotent_to_call_twice() {
        let pool = Pool::queue_work("shutdown-idempotent", 1, || {
            std::thread::sleep(StdDuration::from_millis(1));
        })
        .unwrap();

        let first = two_phase_shutdown(&pool);
        let second = two_phase_shutdown(&pool);
        assert_eq!(first, ShutdownOutcome::DrainedInPhase1);
        // Second call observes workers already exited — still drains cleanly.
        assert_eq!(second, ShutdownOutcome::DrainedInPhase1);
    }
}
