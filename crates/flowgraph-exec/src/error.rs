use thiserror::Error;

/// Errors raised by the lowering passes and pub/sub integration.
#[derive(Debug, Error)]
pub enum ExecError {
    /// `priority_in` was given a root with no transform attached.
    #[error("priority_in requires the root to have a transform")]
    RootHasNoTransform,

    /// `subscribe` was given a `Subscriber` that already carries a
    /// transform — a subscriber is a pure sink into the graph boundary.
    #[error("subscriber must not carry its own transform")]
    SubscriberHasTransform,

    /// `publish` was given a `PublishConfig` with an empty topic.
    #[error("publish config is missing a topic")]
    MissingTopic,

    #[error(transparent)]
    Pool(#[from] flowgraph_pool::PoolError),

    #[error(transparent)]
    Graph(#[from] flowgraph_core::GraphError),
}
