//! Scheduled refill: feed a root's ingress from a producer function
//! whenever the queue runs dry.

use crate::pool_exec::GraphHandle;
use flowgraph_core::Shutdowner;
use flowgraph_pool::{schedule_work, ScheduleHandle};
use std::sync::Arc;
use std::time::Duration;

/// A handle to a running refill schedule. Dropping this does not stop
/// the schedule — call `stop` or let the graph's own `kill_graph` reach
/// it via a `shutdown` thunk (`schedule_refill` appends one to `root`).
pub struct RefillHandle {
    schedule: Arc<ScheduleHandle>,
}

impl RefillHandle {
    pub fn stop(&self) {
        self.schedule.stop();
    }
}

/// Every `freq`, if `root`'s ingress queue is empty, call `refill_fn` and
/// `offer` each item it returns into `root`. A refill tick that lands on
/// a non-empty queue is skipped — this is a best-effort "top up when
/// idle" policy, not a guaranteed production rate.
///
/// Per-item offer errors/panics are logged via `tracing::warn!` and
/// swallowed, so one bad item in a batch does not block the rest.
/// Appends a shutdown thunk to `root` that stops the scheduled thread.
pub fn schedule_refill<T, R>(refill_fn: R, freq: Duration, root: &mut GraphHandle<T>) -> RefillHandle
where
    T: Clone + Send + Sync + 'static,
    R: Fn() -> Vec<T> + Send + Sync + 'static,
{
    let offer = root.offer_fn();
    let is_empty = root.is_empty_fn();

    let tick = move || {
        if !is_empty() {
            return;
        }
        for item in refill_fn() {
            let offer = Arc::clone(&offer);
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| offer(item)));
            if outcome.is_err() {
                tracing::warn!("refill item offer panicked; continuing with next item");
            }
        }
    };

    let schedule = Arc::new(schedule_work(tick, freq));
    let schedule_for_shutdown = Arc::clone(&schedule);
    root.root.shutdown.push(Arc::new(move || {
        schedule_for_shutdown.stop();
    }) as Arc<dyn Shutdowner>);

    RefillHandle { schedule }
}
