//! Integration tests exercising the facade's full public surface across
//! both execution modes.

use flowgraph::{
    kill_graph, priority_in, run_pool, run_sync, schedule_refill, Graph, Node, NodeOpts,
    PriorityConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn identity_plus_double() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log2 = Arc::clone(&log);

    let mut cursor = Graph::<i32>::new();
    cursor = cursor.each(
        move |x: i32| {
            log2.lock().unwrap().push(x * 2);
            x * 2
        },
        NodeOpts::default(),
    );
    let root = cursor.root().into_root();

    run_sync(&root, vec![1, 2, 3]);
    assert_eq!(*log.lock().unwrap(), vec![2, 4, 6]);
}

#[test]
fn multimap_fan_out() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log2 = Arc::clone(&log);

    let mut cursor = Graph::<i32>::new();
    cursor = cursor.multimap(|x: i32| vec![x, x + 10], NodeOpts::default());
    cursor = cursor.each(
        move |x: i32| {
            log2.lock().unwrap().push(x);
            x
        },
        NodeOpts::default(),
    );
    let root = cursor.root().into_root();

    run_sync(&root, vec![1, 2]);
    assert_eq!(*log.lock().unwrap(), vec![1, 11, 2, 12]);
}

#[test]
fn predicate_gating() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log2 = Arc::clone(&log);

    let mut root: Node<i32> = Node::new(|x: i32| x, NodeOpts::default());
    root.children.push(Node::new(
        move |x: i32| {
            log2.lock().unwrap().push(x);
            x
        },
        NodeOpts {
            when: Some(Arc::new(|x: &i32| x % 2 == 1)),
            ..Default::default()
        },
    ));

    run_sync(&root, vec![1, 2, 3, 4]);
    assert_eq!(*log.lock().unwrap(), vec![1, 3]);
}

#[test]
fn priority_ingress_orders_largest_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log2 = Arc::clone(&log);

    let mut root: Node<i32> = Node::new(
        move |x: i32| {
            log2.lock().unwrap().push(x);
            x
        },
        NodeOpts {
            threads: Some(1),
            ..Default::default()
        },
    );

    let handle = priority_in(|x: &i32| -*x, &mut root, PriorityConfig::default()).unwrap();
    handle.offer(3).unwrap();
    handle.offer(1).unwrap();
    handle.offer(2).unwrap();

    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(*log.lock().unwrap(), vec![3, 2, 1]);
}

#[test]
fn refill_on_empty() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let received2 = Arc::clone(&received);

    let root: Node<i32> = Node::new(
        move |x: i32| {
            received2.lock().unwrap().push(x);
            x
        },
        NodeOpts::default(),
    );
    let mut handle = run_pool(root).unwrap();

    let refill = schedule_refill(|| vec![10, 20, 30], Duration::from_millis(20), &mut handle);
    std::thread::sleep(Duration::from_millis(150));
    refill.stop();
    std::thread::sleep(Duration::from_millis(50));

    assert_eq!(*received.lock().unwrap(), vec![10, 20, 30]);
    kill_graph(&handle.root);
}

/// A node whose `f` would otherwise run forever is expected to treat a
/// shutdown flag it captures itself as a cooperative stop hint —
/// `kill_graph` does not wait out an uncooperative worker.
#[test]
fn shutdown_stops_promptly_for_a_cooperative_worker() {
    let observations = Arc::new(Mutex::new(Vec::new()));
    let observations2 = Arc::clone(&observations);
    let stop = Arc::new(AtomicBool::new(false));
    let stop2 = Arc::clone(&stop);

    let root: Node<i32> = Node::new(
        move |x: i32| {
            while !stop2.load(Ordering::Relaxed) {
                std::thread::sleep(Duration::from_millis(5));
            }
            observations2.lock().unwrap().push(x);
            x
        },
        NodeOpts::default(),
    );
    let handle = run_pool(root).unwrap();
    handle.offer(1);
    std::thread::sleep(Duration::from_millis(20));

    stop.store(true, Ordering::Relaxed);
    let started = std::time::Instant::now();
    kill_graph(&handle.root);
    assert!(started.elapsed() < Duration::from_secs(5));

    let seen_at_kill = observations.lock().unwrap().len();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(observations.lock().unwrap().len(), seen_at_kill.max(1));
}
