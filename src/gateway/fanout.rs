use async_trait::async_trait;
use tracing::debug;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// FanoutPublisher appends every event to the audit log before notifying subscribers.
// A failed audit write stops the event; topics belong to the notifier.
pub(crate) struct FanoutPublisher {
    audit: Box<dyn EventPublisher>,
    notify: Box<dyn EventPublisher>,
}

impl FanoutPublisher {
    pub(crate) fn new(audit: Box<dyn EventPublisher>, notify: Box<dyn EventPublisher>) -> Self {
        Self {
            audit,
            notify,
        }
    }
}

#[async_trait]
impl EventPublisher for FanoutPublisher {
    async fn create_topic(&mut self, topic: &str) -> Result<String, LibraryError> {
        self.notify.create_topic(topic).await
    }

    async fn get_topics(&mut self) -> Result<Vec<String>, LibraryError> {
        self.notify.get_topics().await
    }

    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        self.audit.publish(event).await?;
        debug!("audited event {} {}", event.name, event.event_id);
        self.notify.publish(event).await
    }
}
