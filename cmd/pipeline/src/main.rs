//! Pool-mode example: a root feeding a pool-backed worker per node,
//! a scheduled refill keeping the root fed while it is idle, and a
//! clean two-phase shutdown on exit.

use flowgraph::{kill_graph, run_pool, schedule_refill, Node, NodeOpts};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== flowgraph pipeline (pool mode) ===\n");

    let processed = Arc::new(AtomicUsize::new(0));
    let processed2 = Arc::clone(&processed);

    let mut root: Node<i32> = Node::new(
        |x: i32| {
            println!("[stage-1] doubling {x}");
            x * 2
        },
        NodeOpts::default(),
    );
    root.children.push(Node::new(
        move |x: i32| {
            println!("[stage-2] reporting {x}");
            processed2.fetch_add(1, Ordering::SeqCst);
            x
        },
        NodeOpts::default(),
    ));

    let mut handle = run_pool(root).expect("pool construction");

    let next = Arc::new(AtomicUsize::new(0));
    let refill = schedule_refill(
        move || {
            let start = next.fetch_add(3, Ordering::SeqCst) as i32;
            (start..start + 3).collect()
        },
        Duration::from_millis(200),
        &mut handle,
    );

    std::thread::sleep(Duration::from_secs(2));
    refill.stop();
    std::thread::sleep(Duration::from_millis(200));

    println!(
        "\nprocessed {} values before shutdown",
        processed.load(Ordering::SeqCst)
    );

    kill_graph(&handle.root);
    println!("=== done ===");
}
