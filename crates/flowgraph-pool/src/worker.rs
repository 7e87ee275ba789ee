//! The generic worker-loop contract: poll a queue, execute on a hit, sleep
//! briefly on a miss. The queue, the business function, and the emission
//! strategy are all generic, so the same loop shape drives every pooled
//! graph node.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

/// A non-blocking source of tasks. `poll` returns `None` immediately when
/// empty — this is the signal the worker loop uses to yield.
pub trait Source<T>: Send + Sync {
    fn poll(&self) -> Option<T>;
}

/// A destination for a transform's output. May be invoked zero, one, or
/// many times per task (see `ExecStrategy::Async`).
pub trait Sink<T>: Send + Sync {
    fn send(&self, value: T);
}

/// A pure transform: one input value in, one output value out.
pub trait Transform<In, Out>: Send + Sync {
    fn apply(&self, input: In) -> Out;
}

impl<In, Out, F> Transform<In, Out> for F
where
    F: Fn(In) -> Out + Send + Sync,
{
    fn apply(&self, input: In) -> Out {
        self(input)
    }
}

/// A transform that owns emission: it decides how many times (if any) to
/// call `out`, and may call it after returning from `apply_async` if it
/// has stashed `out` elsewhere — the loop does not wait on it.
pub trait AsyncTransform<In, Out>: Send + Sync {
    fn apply_async(&self, input: In, out: &dyn Sink<Out>);
}

impl<In, Out, F> AsyncTransform<In, Out> for F
where
    F: Fn(In, &dyn Sink<Out>) + Send + Sync,
{
    fn apply_async(&self, input: In, out: &dyn Sink<Out>) {
        self(input, out)
    }
}

/// How a node turns a task into output: apply-then-emit, or hand the
/// emitter to the business function and let it decide.
///
/// Modeled as an enum over two small traits (rather than a bare stored
/// function) so the async contract — who calls `out`, how many times — is
/// a documented seam instead of an implicit calling convention.
pub enum ExecStrategy<In, Out> {
    Sync(Box<dyn Transform<In, Out>>),
    Async(Box<dyn AsyncTransform<In, Out>>),
}

impl<In, Out> ExecStrategy<In, Out> {
    pub fn sync(f: impl Transform<In, Out> + 'static) -> Self {
        ExecStrategy::Sync(Box::new(f))
    }

    pub fn async_fn(f: impl AsyncTransform<In, Out> + 'static) -> Self {
        ExecStrategy::Async(Box::new(f))
    }

    /// Apply this strategy's function to `task`, routing output to `out`.
    pub fn run(&self, task: In, out: &dyn Sink<Out>) {
        match self {
            ExecStrategy::Sync(f) => out.send(f.apply(task)),
            ExecStrategy::Async(f) => f.apply_async(task, out),
        }
    }
}

/// The `{input, output, exec}` bundle a scheduler hands the worker loop
/// on each iteration. `exec` already closes over the node's transform.
pub struct WorkBundle<In, Out> {
    pub input: std::sync::Arc<dyn Source<In>>,
    pub output: std::sync::Arc<dyn Sink<Out>>,
    pub exec: std::sync::Arc<ExecStrategy<In, Out>>,
}

impl<In, Out> Clone for WorkBundle<In, Out> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            output: self.output.clone(),
            exec: self.exec.clone(),
        }
    }
}

/// Default "nothing to do" behavior: sleep for `duration`.
pub fn sleepy_yield(duration: Duration) -> impl Fn() + Send + Sync + 'static {
    move || std::thread::sleep(duration)
}

/// The default yield: sleep 5 seconds.
pub fn default_yield() -> impl Fn() + Send + Sync + 'static {
    sleepy_yield(Duration::from_secs(5))
}

/// Produce a repeatable unit of work for a pool worker thread: poll the
/// scheduler's current bundle, execute on a hit, yield on a miss.
///
/// A business-function panic is caught at this boundary, logged, and
/// swallowed — the worker loop itself never dies on a business error.
pub fn work<In, Out, Sch, Y>(scheduler: Sch, yield_fn: Y) -> impl Fn() + Send + Sync + 'static
where
    In: Send + 'static,
    Out: Send + 'static,
    Sch: Fn() -> WorkBundle<In, Out> + Send + Sync + 'static,
    Y: Fn() + Send + Sync + 'static,
{
    move || {
        let bundle = scheduler();
        match bundle.input.poll() {
            Some(task) => {
                let exec = &bundle.exec;
                let output = bundle.output.as_ref();
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    exec.run(task, output);
                }));
                if outcome.is_err() {
                    tracing::error!("worker: business function panicked; continuing");
                }
            }
            None => yield_fn(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct VecSource<T>(Mutex<Vec<T>>);
    impl<T: Send> Source<T> for VecSource<T> {
        fn poll(&self) -> Option<T> {
            self.0.lock().unwrap().pop()
        }
    }

    struct VecSink<T>(Mutex<Vec<T>>);
    impl<T: Send> Sink<T> for VecSink<T> {
        fn send(&self, value: T) {
            self.0.lock().unwrap().push(value);
        }
    }

    #[test]
    fn sync_strategy_applies_then_emits() {
        let input = Arc::new(VecSource(Mutex::new(vec![3, 2, 1])));
        let output = Arc::new(VecSink(Mutex::new(Vec::new())));
        let exec = Arc::new(ExecStrategy::sync(|x: i32| x * 2));

        let bundle = WorkBundle {
            input: input.clone(),
            output: output.clone(),
            exec,
        };
        let work_fn = work(move || bundle.clone(), || {});

        work_fn();
        work_fn();
        work_fn();

        assert_eq!(*output.0.lock().unwrap(), vec![2, 4, 6]);
    }

    #[test]
    fn async_strategy_controls_emission() {
        let input = Arc::new(VecSource(Mutex::new(vec![1])));
        let output = Arc::new(VecSink(Mutex::new(Vec::new())));
        let exec = Arc::new(ExecStrategy::async_fn(|x: i32, out: &dyn Sink<i32>| {
            out.send(x);
            out.send(x * 100);
        }));

        let bundle = WorkBundle {
            input,
            output: output.clone(),
            exec,
        };
        work(move || bundle.clone(), || {})();

        assert_eq!(*output.0.lock().unwrap(), vec![1, 100]);
    }

    #[test]
    fn empty_input_invokes_yield() {
        let input: Arc<VecSource<i32>> = Arc::new(VecSource(Mutex::new(Vec::new())));
        let output = Arc::new(VecSink(Mutex::new(Vec::new())));
        let exec = Arc::new(ExecStrategy::sync(|x: i32| x));
        let yielded = Arc::new(AtomicUsize::new(0));
        let yielded2 = yielded.clone();

        let bundle = WorkBundle {
            input,
            output,
            exec,
        };
        let work_fn = work(move || bundle.clone(), move || {
            yielded2.fetch_add(1, Ordering::SeqCst);
        });

        work_fn();
        work_fn();

        assert_eq!(yielded.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_transform_is_caught_and_swallowed() {
        let input = Arc::new(VecSource(Mutex::new(vec![1])));
        let output: Arc<VecSink<i32>> = Arc::new(VecSink(Mutex::new(Vec::new())));
        let exec = Arc::new(ExecStrategy::sync(|_: i32| -> i32 {
            panic!("business error");
        }));

        let bundle = WorkBundle {
            input,
            output,
            exec,
        };
        // Must not unwind out of the work_fn call.
        work(move || bundle.clone(), || {})();
    }
}
