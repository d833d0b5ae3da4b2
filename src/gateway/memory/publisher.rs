use async_trait::async_trait;
use tracing::info;
use crate::core::domain::Identifiable;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::core::repository::Repository;
use crate::gateway::events::EventPublisher;
use crate::utils::memory::MemoryRepository;

impl Identifiable for DomainEvent {
    fn id(&self) -> String {
        self.event_id.to_string()
    }

    fn version(&self) -> i64 {
        0
    }
}

// MemoryPublisher logs each event and keeps it in the process-wide events table.
#[derive(Debug)]
pub(crate) struct MemoryPublisher {
    events: MemoryRepository<DomainEvent>,
}

impl MemoryPublisher {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            events: MemoryRepository::new(table_name),
        }
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn create_topic(&mut self, _topic: &str) -> Result<String, LibraryError> {
        Ok("".to_string())
    }

    async fn get_topics(&mut self) -> Result<Vec<String>, LibraryError> {
        Ok(vec![])
    }

    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        info!("event {} {:?} {} {}", event.name, event.kind, event.group, event.key);
        self.events.create(event).await.map(|_| ())
    }
}
