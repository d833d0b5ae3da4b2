use async_trait::async_trait;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::gateway::GatewayPublisherVia;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity, fails with DuplicateKey when the id is taken
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // updates an entity guarded by its version
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, id: &str) -> LibraryResult<usize>;

    // find by exact attribute matches
    async fn query(&self, predicate: &HashMap::<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    InMemory,
}

impl RepositoryStore {
    pub fn gateway_publisher(&self) -> GatewayPublisherVia {
        match self {
            RepositoryStore::DynamoDB => { GatewayPublisherVia::DynamoDBAndSns }
            RepositoryStore::LocalDynamoDB => { GatewayPublisherVia::LocalDynamoDB }
            RepositoryStore::InMemory => { GatewayPublisherVia::InMemory }
        }
    }
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "dynamodb" | "ddb" => RepositoryStore::DynamoDB,
            "local" | "localdynamodb" => RepositoryStore::LocalDynamoDB,
            _ => RepositoryStore::InMemory,
        }
    }
}
