//! Sync-mode example: build a small tree and run it inline, no queues,
//! no pools — `run_sync` compiles the graph once and applies it to every
//! input on the caller's thread.

use flowgraph::{run_sync, Graph, NodeOpts};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== flowgraph basic (sync mode) ===\n");

    let mut cursor = Graph::<i32>::new();
    cursor = cursor.each(
        |x: i32| {
            let y = x * 2;
            println!("[double] {x} -> {y}");
            y
        },
        NodeOpts::default(),
    );
    cursor = cursor.each(
        |x: i32| {
            println!("[report] leaf saw {x}");
            x
        },
        NodeOpts::default(),
    );
    let root = cursor.root().into_root();

    run_sync(&root, vec![1, 2, 3, 4, 5]);

    println!("\n=== done ===");
}
