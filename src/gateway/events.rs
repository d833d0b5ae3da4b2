use async_trait::async_trait;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;

// EventPublisher fans domain events out to the audit log or a topic
#[async_trait]
pub(crate) trait EventPublisher: Sync + Send {
    async fn create_topic(&mut self, topic: &str) -> Result<String, LibraryError>;
    async fn get_topics(&mut self) -> Result<Vec<String>, LibraryError>;
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError>;
}
