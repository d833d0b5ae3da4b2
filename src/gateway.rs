pub mod ddb;
pub mod events;
pub mod fanout;
pub mod memory;
pub mod sns;
pub mod factory;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GatewayPublisherVia {
    // audit table in DynamoDB, then an SNS topic per event
    DynamoDBAndSns,
    Sns,
    LocalDynamoDB,
    InMemory,
}
