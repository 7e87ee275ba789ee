//! Fixed-size worker pool: spawn N named OS threads up front, share state
//! through one `Arc`, no dynamic scaling.

use crate::error::PoolError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// A fixed-size set of worker threads, each repeatedly invoking the same
/// `work_fn` until the pool is shut down.
pub struct Pool {
    shutdown: Arc<AtomicBool>,
    exited: Arc<AtomicUsize>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    total: usize,
    name: String,
}

impl Pool {
    /// Spawn a pool of `n` workers, each running `work_fn` in a loop until
    /// `shutdown`/`two_phase_shutdown` is called.
    ///
    /// `n == 0` is a hard error (`PoolError::ZeroThreads`).
    pub fn queue_work<F>(name: impl Into<String>, n: usize, work_fn: F) -> Result<Self, PoolError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        if n == 0 {
            return Err(PoolError::ZeroThreads);
        }
        let name = name.into();
        let shutdown = Arc::new(AtomicBool::new(false));
        let exited = Arc::new(AtomicUsize::new(0));
        let work_fn = Arc::new(work_fn);

        let mut handles = Vec::with_capacity(n);
        for worker_id in 0..n {
            let shutdown = Arc::clone(&shutdown);
            let exited = Arc::clone(&exited);
            let work_fn = Arc::clone(&work_fn);
            let handle = thread::Builder::new()
                .name(format!("{name}-worker-{worker_id}"))
                .spawn(move || {
                    while !shutdown.load(Ordering::Relaxed) {
                        work_fn();
                    }
                    exited.fetch_add(1, Ordering::SeqCst);
                })
                .expect("failed to spawn worker thread");
            handles.push(handle);
        }

        Ok(Pool {
            shutdown,
            exited,
            handles: Mutex::new(handles),
            total: n,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_workers(&self) -> usize {
        self.total
    }

    pub fn exited_workers(&self) -> usize {
        self.exited.load(Ordering::SeqCst)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Flip the shutdown flag. Workers observe it at the top of their next
    /// loop iteration; this alone does not wait for them to exit — see
    /// `two_phase_shutdown`.
    pub(crate) fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Unpark any parked worker threads so they notice the shutdown flag
    /// promptly instead of waiting out a sleep.
    pub(crate) fn unpark_all(&self) {
        for handle in self.handles.lock().unwrap().iter() {
            handle.thread().unpark();
        }
    }

    pub(crate) fn take_handles(&self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut *self.handles.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as StdAtomicUsize;
    use std::time::Duration;

    #[test]
    fn zero_threads_is_rejected() {
        let err = Pool::queue_work("t", 0, || {});
        assert!(matches!(err, Err(PoolError::ZeroThreads)));
    }

    #[test]
    fn workers_run_until_shutdown() {
        let counter = Arc::new(StdAtomicUsize::new(0));
        let counter2 = Arc::clone(&counter);
        let pool = Pool::queue_work("t", 2, move || {
            counter2.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(1));
        })
        .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        pool.request_shutdown();
        for h in pool.take_handles() {
            h.join().unwrap();
        }

        assert!(counter.load(Ordering::SeqCst) > 0);
        assert_eq!(pool.exited_workers(), 2);
    }
}
