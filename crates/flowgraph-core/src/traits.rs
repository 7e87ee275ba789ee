//! Single-method seams for the function-valued fields on a `Node`:
//! `when` and `shutdown`. `Transform`, `Source`, and `Sink` are reused
//! from `flowgraph-pool` rather than redeclared here.

/// A gate on whether a node runs for a given input. `false` means the
/// node (and by extension its subtree, for that input) is skipped
/// entirely.
pub trait Predicate<T>: Send + Sync {
    fn test(&self, value: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn test(&self, value: &T) -> bool {
        self(value)
    }
}

/// A zero-argument termination action appended to `Node::shutdown` by
/// lowering passes. Must be idempotent and safe to call on a
/// partially-constructed graph.
pub trait Shutdowner: Send + Sync {
    fn shutdown(&self);
}

impl<F> Shutdowner for F
where
    F: Fn() + Send + Sync,
{
    fn shutdown(&self) {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_satisfies_predicate() {
        let p: Box<dyn Predicate<i32>> = Box::new(|x: &i32| *x % 2 == 0);
        assert!(p.test(&4));
        assert!(!p.test(&3));
    }

    #[test]
    fn closure_satisfies_shutdowner() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = Arc::clone(&ran);
        let s: Box<dyn Shutdowner> = Box::new(move || ran2.store(true, Ordering::SeqCst));
        s.shutdown();
        assert!(ran.load(Ordering::SeqCst));
    }
}
