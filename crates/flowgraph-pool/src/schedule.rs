//! Scheduled periodic work: a single dedicated thread firing callbacks at
//! a fixed rate. Poll/act, then sleep until the next deadline, looping
//! until a shutdown flag is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Handle to a running scheduled-work thread. Dropping this handle does
/// not stop the thread — call `stop` (or `stop_and_join`) explicitly, the
/// way the graph executor's shutdown thunks do.
pub struct ScheduleHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ScheduleHandle {
    /// Request the scheduled thread stop after its current tick.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Request stop and block until the thread has exited.
    pub fn stop_and_join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Fire `f` every `period`, on a dedicated thread, until stopped.
///
/// A panic from `f` is caught, logged, and swallowed — the scheduler
/// keeps ticking.
pub fn schedule_work<F>(f: F, period: Duration) -> ScheduleHandle
where
    F: Fn() + Send + 'static,
{
    schedule_many(vec![(Box::new(f) as Box<dyn Fn() + Send>, period)])
}

/// Fire several `(f, period)` pairs on one dedicated thread, each on its
/// own cadence. Every job's next-fire time is tracked independently; the
/// thread sleeps until whichever job is due soonest.
pub fn schedule_many(jobs: Vec<(Box<dyn Fn() + Send>, Duration)>) -> ScheduleHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);

    let handle = thread::Builder::new()
        .name("flowgraph-scheduler".into())
        .spawn(move || scheduler_loop(jobs, shutdown_clone))
        .expect("failed to spawn scheduler thread");

    ScheduleHandle {
        shutdown,
        handle: Some(handle),
    }
}

fn scheduler_loop(jobs: Vec<(Box<dyn Fn() + Send>, Duration)>, shutdown: Arc<AtomicBool>) {
    let now = Instant::now();
    let mut next_fire: Vec<Instant> = jobs.iter().map(|(_, period)| now + *period).collect();

    while !shutdown.load(Ordering::Relaxed) {
        let now = Instant::now();

        for (i, (f, period)) in jobs.iter().enumerate() {
            if next_fire[i] <= now {
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f()));
                if outcome.is_err() {
                    tracing::error!("scheduled job panicked; continuing");
                }
                next_fire[i] = now + *period;
            }
        }

        let sleep_until = next_fire.iter().min().copied().unwrap_or(now + Duration::from_secs(1));
        let sleep_for = sleep_until.saturating_duration_since(Instant::now());
        if sleep_for > Duration::ZERO {
            thread::sleep(sleep_for.min(Duration::from_millis(200)));
        }
    }
}
