//! Event bus port — publish/subscribe for domain events.

use std::future::Future;

use luxmon_domain::error::LuxmonError;
use luxmon_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LuxmonError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LuxmonError>> + Send {
        (**self).publish(event)
    }
}
