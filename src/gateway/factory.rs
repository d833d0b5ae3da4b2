use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::ddb::publisher::DDBPublisher;
use crate::gateway::events::EventPublisher;
use crate::gateway::fanout::FanoutPublisher;
use crate::gateway::GatewayPublisherVia;
use crate::gateway::memory::publisher::MemoryPublisher;
use crate::gateway::sns::publisher::SNSPublisher;
use crate::utils::ddb::{build_db_client, build_sns_client, create_table};

pub(crate) const EVENTS_TABLE: &str = "events";

pub(crate) async fn create_publisher(via: GatewayPublisherVia) -> LibraryResult<Box<dyn EventPublisher>> {
    match via {
        GatewayPublisherVia::DynamoDBAndSns => {
            let client = build_db_client(RepositoryStore::DynamoDB).await?;
            let audit = DDBPublisher::new(client, EVENTS_TABLE);
            let notify = SNSPublisher::new(build_sns_client().await);
            Ok(Box::new(FanoutPublisher::new(Box::new(audit), Box::new(notify))))
        }
        GatewayPublisherVia::Sns => {
            let client = build_sns_client().await;
            Ok(Box::new(SNSPublisher::new(client)))
        }
        GatewayPublisherVia::LocalDynamoDB => {
            let client = build_db_client(RepositoryStore::LocalDynamoDB).await?;
            let _ = create_table(&client, EVENTS_TABLE, "event_id", Some("key"), None).await;
            Ok(Box::new(DDBPublisher::new(client, EVENTS_TABLE)))
        }
        GatewayPublisherVia::InMemory => {
            Ok(Box::new(MemoryPublisher::new(EVENTS_TABLE)))
        }
    }
}
