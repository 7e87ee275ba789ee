//! Trait seams for external collaborators — a message bus feeding the
//! graph's ingress, and a store backing published output — plus the two
//! functions that wire a graph to them. Neither collaborator ships a
//! concrete implementation here; a caller supplies one.

use crate::error::ExecError;
use crate::pool_exec::GraphHandle;
use flowgraph_core::{append_child, Node, NodeId, NodeOpts};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store write to topic {topic:?} failed: {reason}")]
    WriteFailed { topic: String, reason: String },
}

/// One registration against a `MessageBus`: `id` names the subscription,
/// `f` is left `None` by `subscribe` — a subscriber delivering into a
/// graph is a pure sink, not a transform in its own right.
pub struct Subscriber<T> {
    pub id: String,
    pub f: Option<Arc<dyn Fn(T) + Send + Sync>>,
}

/// An external message bus: routes values arriving on `local` to every
/// subscriber registered against it.
pub trait MessageBus<T> {
    fn add_subscriber(&self, local: &str, subscriber: Subscriber<T>);
}

/// An external persistent store: a named-topic write sink.
pub trait Store<T> {
    fn write(&self, topic: &str, value: T) -> Result<(), StoreError>;
}

/// Tunables for `publish`: the topic a publisher node writes to.
pub struct PublishConfig {
    pub topic: String,
}

/// Register a subscription on `bus` that forwards every delivered value
/// straight into `root`'s ingress via `offer`. Errors with
/// `ExecError::SubscriberHasTransform` if `subscriber` already carries an
/// `f` — `subscribe` always builds its own pass-through subscriber and
/// does not accept a caller-supplied transform in its place.
pub fn subscribe<T, B>(
    bus: &B,
    subscriber_id: impl Into<String>,
    subscriber: Subscriber<T>,
    root: &GraphHandle<T>,
) -> Result<(), ExecError>
where
    T: Clone + Send + Sync + 'static,
    B: MessageBus<T>,
{
    if subscriber.f.is_some() {
        return Err(ExecError::SubscriberHasTransform);
    }

    let offer = root.offer_fn();
    let id = subscriber_id.into();
    bus.add_subscriber(
        &id,
        Subscriber {
            id,
            f: Some(Arc::new(move |value: T| offer(value))),
        },
    );
    Ok(())
}

/// Construct a publisher node writing every value it sees to
/// `config.topic` via `Store::write`, and append it as a child of
/// `parent_id`. Errors with `ExecError::MissingTopic` if the topic is
/// empty.
pub fn publish<T, S>(
    bus: &Arc<S>,
    parent_id: NodeId,
    config: PublishConfig,
    root: &mut Node<T>,
) -> Result<(), ExecError>
where
    T: Clone + Send + Sync + 'static,
    S: Store<T> + Send + Sync + 'static,
{
    if config.topic.is_empty() {
        return Err(ExecError::MissingTopic);
    }

    let topic = config.topic;
    let store = Arc::clone(bus);
    let publisher = Node::new(
        move |value: T| {
            if let Err(err) = store.write(&topic, value.clone()) {
                tracing::error!(%topic, %err, "publish write failed");
            }
            value
        },
        NodeOpts::default(),
    );

    append_child(root, parent_id, publisher)?;
    Ok(())
}
