//! High-level pool operations: `seq_work`, `map_work`, `filter_work`,
//! `do_work`, `reduce_work`.
//!
//! Each tolerates either spinning up its own pool from a thread count, or
//! running on a pool the caller already owns and will shut down itself.

use crate::error::PoolError;
use crate::pool::Pool;
use crate::shutdown::two_phase_shutdown;
use crate::worker::{ExecStrategy, Sink, Source, WorkBundle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Where a convenience op gets its threads from.
pub enum PoolSize<'a> {
    /// Spin up a fresh pool with this many threads, and tear it down when
    /// the op completes.
    Owned(usize),
    /// Run on a pool the caller owns; it is not shut down by the op.
    Borrowed(&'a Pool),
}

struct VecSource<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Send> Source<T> for VecSource<T> {
    fn poll(&self) -> Option<T> {
        self.items.lock().unwrap().pop()
    }
}

struct CollectingSink<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Send> Sink<T> for CollectingSink<T> {
    fn send(&self, value: T) {
        self.items.lock().unwrap().push(value);
    }
}

/// Drain `items` by running `f` on each one, in parallel across the pool,
/// with no result collected back — fire-and-forget side effects.
pub fn do_work<T, F>(size: PoolSize<'_>, items: Vec<T>, f: F) -> Result<(), PoolError>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let total = items.len();
    let source = Arc::new(VecSource {
        items: Mutex::new(items),
    });
    let sink: Arc<CollectingSink<()>> = Arc::new(CollectingSink {
        items: Mutex::new(Vec::new()),
    });
    let exec = Arc::new(ExecStrategy::sync(move |item: T| f(item)));

    run_to_exhaustion(size, total, source, sink, exec)?;
    Ok(())
}

/// Apply `f` to every item, in parallel, collecting results in
/// completion order, not input order.
pub fn map_work<In, Out, F>(size: PoolSize<'_>, items: Vec<In>, f: F) -> Result<Vec<Out>, PoolError>
where
    In: Send + 'static,
    Out: Send + 'static,
    F: Fn(In) -> Out + Send + Sync + 'static,
{
    let total = items.len();
    let source = Arc::new(VecSource {
        items: Mutex::new(items),
    });
    let sink = Arc::new(CollectingSink {
        items: Mutex::new(Vec::new()),
    });
    let exec = Arc::new(ExecStrategy::sync(f));

    run_to_exhaustion(size, total, source, sink.clone(), exec)?;
    Ok(std::mem::take(&mut *sink.items.lock().unwrap()))
}

/// Keep only the items for which `predicate` returns true, evaluated in
/// parallel across the pool.
pub fn filter_work<T, F>(size: PoolSize<'_>, items: Vec<T>, predicate: F) -> Result<Vec<T>, PoolError>
where
    T: Send + Clone + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    let total = items.len();
    let source = Arc::new(VecSource {
        items: Mutex::new(items),
    });
    let sink = Arc::new(CollectingSink {
        items: Mutex::new(Vec::new()),
    });
    let exec = Arc::new(ExecStrategy::sync(move |item: T| {
        let keep = predicate(&item);
        (item, keep)
    }));

    run_to_exhaustion(size, total, source, sink.clone(), exec)?;
    let kept = std::mem::take(&mut *sink.items.lock().unwrap())
        .into_iter()
        .filter_map(|(item, keep): (T, bool)| keep.then_some(item))
        .collect();
    Ok(kept)
}

/// Combine every item into a single accumulator using `f`, via parallel
/// partial folds merged with `combine`. Unlike a sequential fold, the
/// order items are folded in is not guaranteed — `f`/`combine` must be
/// associative and commutative for a deterministic result.
pub fn reduce_work<T, F, C>(
    size: PoolSize<'_>,
    items: Vec<T>,
    identity: T,
    combine: C,
) -> Result<T, PoolError>
where
    T: Send + Clone + 'static,
    C: Fn(T, T) -> T + Send + Sync + 'static,
{
    let partials: Arc<Mutex<T>> = Arc::new(Mutex::new(identity));
    let partials_for_sink = Arc::clone(&partials);
    let combine = Arc::new(combine);

    struct FoldSink<T, C> {
        acc: Arc<Mutex<T>>,
        combine: Arc<C>,
    }
    impl<T: Send, C: Fn(T, T) -> T + Send + Sync> Sink<T> for FoldSink<T, C>
    where
        T: Clone,
    {
        fn send(&self, value: T) {
            let mut guard = self.acc.lock().unwrap();
            let current = guard.clone();
            *guard = (self.combine)(current, value);
        }
    }

    let total = items.len();
    let source = Arc::new(VecSource {
        items: Mutex::new(items),
    });
    let sink = Arc::new(FoldSink {
        acc: partials_for_sink,
        combine,
    });
    let exec: Arc<ExecStrategy<T, T>> = Arc::new(ExecStrategy::sync(|x: T| x));

    run_to_exhaustion(size, total, source, sink, exec)?;
    let result = partials.lock().unwrap().clone();
    Ok(result)
}

/// Run a sequence of transforms over `item`, threading the output of one
/// into the next, as a single-item pipeline on the pool: useful when the
/// chain itself should run off the calling thread.
pub fn seq_work<T>(size: PoolSize<'_>, item: T, stages: Vec<Box<dyn Fn(T) -> T + Send + Sync>>) -> Result<T, PoolError>
where
    T: Send + 'static,
{
    let chained = move |input: T| {
        stages.iter().fold(input, |acc, stage| stage(acc))
    };
    let source = Arc::new(VecSource {
        items: Mutex::new(vec![item]),
    });
    let sink = Arc::new(CollectingSink {
        items: Mutex::new(Vec::new()),
    });
    let exec = Arc::new(ExecStrategy::sync(chained));

    run_to_exhaustion(size, 1, source, sink.clone(), exec)?;
    let mut results = std::mem::take(&mut *sink.items.lock().unwrap());
    Ok(results.pop().expect("single item always produces one result"))
}

/// A sink wrapper that counts completions down to zero, so the caller can
/// tell when every submitted item has been processed without racing
/// worker threads for items on `source` itself.
struct CountingSink<Out> {
    inner: Arc<dyn Sink<Out>>,
    remaining: Arc<AtomicUsize>,
}

impl<Out: Send> Sink<Out> for CountingSink<Out> {
    fn send(&self, value: Out) {
        self.inner.send(value);
        self.remaining.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drive `source` to exhaustion on a pool (owned or borrowed), blocking
/// until every one of `total` submitted items has been processed.
///
/// Relies on each `exec.run` emitting exactly once per input (true for
/// every `ExecStrategy::sync` strategy the convenience ops build) so a
/// completion counter, not re-polling `source`, tells us when to stop.
fn run_to_exhaustion<In, Out>(
    size: PoolSize<'_>,
    total: usize,
    source: Arc<dyn Source<In>>,
    sink: Arc<dyn Sink<Out>>,
    exec: Arc<ExecStrategy<In, Out>>,
) -> Result<(), PoolError>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    let remaining = Arc::new(AtomicUsize::new(total));
    let counting_sink: Arc<dyn Sink<Out>> = Arc::new(CountingSink {
        inner: sink,
        remaining: Arc::clone(&remaining),
    });

    let scheduler = {
        let source = Arc::clone(&source);
        let sink = Arc::clone(&counting_sink);
        let exec = Arc::clone(&exec);
        move || WorkBundle {
            input: Arc::clone(&source),
            output: Arc::clone(&sink),
            exec: Arc::clone(&exec),
        }
    };
    let work_fn = crate::worker::work(scheduler, crate::worker::sleepy_yield(std::time::Duration::from_millis(1)));

    match size {
        PoolSize::Owned(n) => {
            let pool = Pool::queue_work("convenience", n, work_fn)?;
            while remaining.load(Ordering::SeqCst) > 0 {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            two_phase_shutdown(&pool);
        }
        PoolSize::Borrowed(pool) => {
            // The caller's pool is already looping its own work function;
            // for a borrowed pool we run inline on the calling thread
            // instead, since we cannot swap a running pool's work
            // function out from under it.
            let _ = pool;
            while let Some(task) = source.poll() {
                exec.run(task, counting_sink.as_ref());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn do_work_runs_every_item() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        do_work(PoolSize::Owned(4), vec![1, 2, 3, 4, 5], move |x: i32| {
            seen2.lock().unwrap().push(x);
        })
        .unwrap();

        let mut result = seen.lock().unwrap().clone();
        result.sort();
        assert_eq!(result, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn map_work_transforms_every_item() {
        let mut result = map_work(PoolSize::Owned(3), vec![1, 2, 3], |x: i32| x * 10).unwrap();
        result.sort();
        assert_eq!(result, vec![10, 20, 30]);
    }

    #[test]
    fn filter_work_keeps_matching_items() {
        let mut result = filter_work(PoolSize::Owned(2), vec![1, 2, 3, 4, 5, 6], |x: &i32| x % 2 == 0).unwrap();
        result.sort();
        assert_eq!(result, vec![2, 4, 6]);
    }

    #[test]
    fn reduce_work_sums_items() {
        let result = reduce_work(PoolSize::Owned(3), vec![1, 2, 3, 4], 0, |a, b| a + b).unwrap();
        assert_eq!(result, 10);
    }

    #[test]
    fn seq_work_chains_stages() {
        let stages: Vec<Box<dyn Fn(i32) -> i32 + Send + Sync>> =
            vec![Box::new(|x| x + 1), Box::new(|x| x * 2)];
        let result = seq_work(PoolSize::Owned(1), 3, stages).unwrap();
        assert_eq!(result, 8);
    }

    #[test]
    fn borrowed_pool_variant_runs_inline() {
        let pool = Pool::queue_work("borrowed-test", 1, || {
            std::thread::sleep(std::time::Duration::from_millis(1));
        })
        .unwrap();

        let result = map_work(PoolSize::Borrowed(&pool), vec![1, 2, 3], |x: i32| x + 1).unwrap();
        let mut sorted = result;
        sorted.sort();
        assert_eq!(sorted, vec![2, 3, 4]);

        two_phase_shutdown(&pool);
    }
}
