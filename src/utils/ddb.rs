use std::collections::HashMap;
use std::env;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::RepositoryStore;

const LOCAL_ENDPOINT: &str = "http://localhost:8000";

// creates a table keyed by a string `pk` with an optional `{table}_ndx` secondary index
pub(crate) async fn create_table(client: &Client,
                                 table_name: &str, pk: &str,
                                 gsi_pk: Option<&str>, gsi_sk: Option<&str>) -> LibraryResult<()> {
    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .attribute_definitions(string_attribute(pk))
        .provisioned_throughput(throughput());

    if let Some(gsi_pk) = gsi_pk {
        let mut gsi = GlobalSecondaryIndex::builder()
            .index_name(format!("{}_ndx", table_name))
            .key_schema(KeySchemaElement::builder()
                .attribute_name(gsi_pk)
                .key_type(KeyType::Hash).build())
            .projection(Projection::builder().projection_type(ProjectionType::All).build())
            .provisioned_throughput(throughput());
        request = request.attribute_definitions(string_attribute(gsi_pk));
        if let Some(gsi_sk) = gsi_sk {
            gsi = gsi.key_schema(KeySchemaElement::builder()
                .attribute_name(gsi_sk)
                .key_type(KeyType::Range).build());
            request = request.attribute_definitions(string_attribute(gsi_sk));
        }
        request = request.global_secondary_indexes(gsi.build());
    }

    match request.send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to create {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

fn string_attribute(name: &str) -> AttributeDefinition {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
}

fn throughput() -> ProvisionedThroughput {
    ProvisionedThroughput::builder()
        .read_capacity_units(10)
        .write_capacity_units(10)
        .build()
}

pub(crate) async fn delete_table(client: &Client, table_name: &str) -> LibraryResult<()> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Deleting).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to delete {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        if let Ok(status) = describe_table(client, table_name).await {
            if status != other_status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(LibraryError::runtime(format!("failed to describe {} table",
                                              table_name).as_str(), None))
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to describe {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("failed to parse{:?}", other)),
    }
}

// reads a DynamoDB item back into an entity through its serde representation
pub(crate) fn parse_entity<T: DeserializeOwned>(map: &HashMap<String, AttributeValue>) -> LibraryResult<T> {
    let object: Map<String, Value> = map.iter()
        .map(|(k, v)| (k.clone(), item_to_value(v)))
        .collect();
    serde_json::from_value(Value::Object(object)).map_err(LibraryError::from)
}

pub(crate) fn string_number(n: i64) -> AttributeValue {
    AttributeValue::N(n.to_string())
}

// builds `#name = :name` clauses joined by AND; a key may carry its operator as `name:op`
pub(crate) fn add_filter_expr(k: &str, filter_expr: &mut String) -> String {
    let mut op = "=";
    let mut ks = k;
    let parts = k.split(':').collect::<Vec<&str>>();
    if parts.len() > 1 {
        ks = parts[0];
        op = parts[1];
    }
    if filter_expr.is_empty() {
        filter_expr.push_str(format!("#{} {} :{}", ks, op, ks).as_str());
    } else {
        filter_expr.push_str(format!(" AND #{} {} :{}", ks, op, ks).as_str());
    }
    ks.to_string()
}

pub(crate) fn to_ddb_page(page: Option<&str>) -> Option<HashMap<String, AttributeValue>> {
    if let Some(page) = page {
        if let Ok(str_map) = serde_json::from_str::<HashMap<String, String>>(page) {
            let mut attr_map = HashMap::new();
            for (k, v) in str_map {
                attr_map.insert(k, AttributeValue::S(v));
            }
            return Some(attr_map);
        }
    }
    None
}

pub(crate) fn from_ddb<T>(page: Option<&str>, page_size: usize,
                          last_evaluated_key: Option<&HashMap<String, AttributeValue>>,
                          records: Vec<T>) -> PaginatedResult<T> {
    let mut next_page: Option<String> = None;
    if let Some(attr_map) = last_evaluated_key {
        let mut str_map = HashMap::new();
        for (k, v) in attr_map {
            if let AttributeValue::S(val) = v {
                str_map.insert(k.clone(), val.to_string());
            }
        }
        if let Ok(j) = serde_json::to_string(&str_map) {
            next_page = Some(j);
        }
    }
    PaginatedResult::new(page, page_size, next_page, records)
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => {
            AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect())
        }
    }
}

fn item_to_value(item: &AttributeValue) -> Value {
    match item {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Value::from(i)
            } else if let Some(f) = n.parse::<f64>().ok().and_then(Number::from_f64) {
                Value::Number(f)
            } else {
                Value::String(n.clone())
            }
        }
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::L(l) => Value::Array(l.iter().map(item_to_value).collect()),
        AttributeValue::M(m) => {
            Value::Object(m.iter().map(|(k, v)| (k.clone(), item_to_value(v))).collect())
        }
        AttributeValue::Ss(ss) => Value::Array(ss.iter().map(|s| Value::String(s.clone())).collect()),
        _ => Value::Null,
    }
}

// helper method to build db-client with tracing enabled
pub(crate) async fn build_db_client(store: RepositoryStore) -> LibraryResult<Client> {
    match store {
        RepositoryStore::DynamoDB => {
            //Get config from environment.
            let config = aws_config::load_from_env().await;
            //Create the DynamoDB client.
            Ok(Client::new(&config))
        }
        RepositoryStore::LocalDynamoDB => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let endpoint = env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| LOCAL_ENDPOINT.to_string());
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(endpoint)
                .build();
            Ok(Client::from_conf(dynamodb_local_config))
        }
        RepositoryStore::InMemory => {
            Err(LibraryError::runtime("in-memory store has no dynamodb client", None))
        }
    }
}

// helper method to build sns-client with tracing enabled
pub async fn build_sns_client() -> aws_sdk_sns::Client {
    //Get config from environment.
    let config = aws_config::load_from_env().await;
    //Create the SNS client.
    aws_sdk_sns::Client::new(&config)
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .init();
}

// a failed condition expression on create means the key is taken
pub(crate) fn put_error(err: SdkError<PutItemError>, key: &str, creating: bool) -> LibraryError {
    let failed_condition = matches!(&err, SdkError::ServiceError(e) if e.err().is_conditional_check_failed_exception());
    if failed_condition && creating {
        LibraryError::duplicate_key(format!("{} already exists", key).as_str())
    } else if failed_condition {
        LibraryError::unavailable(format!("stale version for {}", key).as_str(),
                                  Some("ConditionalCheckFailed".to_string()), true)
    } else {
        LibraryError::from(err)
    }
}

pub(crate) fn update_error(err: SdkError<UpdateItemError>, key: &str) -> LibraryError {
    if matches!(&err, SdkError::ServiceError(e) if e.err().is_conditional_check_failed_exception()) {
        LibraryError::unavailable(format!("condition failed for {}", key).as_str(),
                                  Some("ConditionalCheckFailed".to_string()), true)
    } else {
        LibraryError::from(err)
    }
}

impl From<SdkError<UpdateItemError>> for LibraryError {
    fn from(err: SdkError<UpdateItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<PutItemError>> for LibraryError {
    fn from(err: SdkError<PutItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<GetItemError>> for LibraryError {
    fn from(err: SdkError<GetItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<DeleteItemError>> for LibraryError {
    fn from(err: SdkError<DeleteItemError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<QueryError>> for LibraryError {
    fn from(err: SdkError<QueryError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<ScanError>> for LibraryError {
    fn from(err: SdkError<ScanError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

// throughput errors carry "...ExceededException" in the body
fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    opts.map(|b| b.windows(6).any(|w| w == &b"ceeded"[..])).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::types::AttributeValue;
    use serde::{Deserialize, Serialize};
    use crate::core::library::LibraryError;
    use crate::core::repository::RepositoryStore;
    use aws_sdk_dynamodb::error::SdkError;
    use aws_sdk_dynamodb::operation::put_item::PutItemError;
    use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
    use aws_sdk_dynamodb::types::error::{ConditionalCheckFailedException, ResourceNotFoundException};
    use aws_smithy_http::body::SdkBody;
    use aws_smithy_http::operation;
    use crate::utils::ddb::{add_filter_expr, build_db_client, from_ddb, has_exceeded_limit, parse_entity, parse_item, put_error, to_ddb_page, update_error};

    fn service_error<E>(err: E, body: &str) -> SdkError<E> {
        let raw = http::Response::builder()
            .status(400)
            .body(SdkBody::from(body))
            .expect("should build response");
        SdkError::service_error(err, operation::Response::new(raw))
    }

    fn failed_put() -> SdkError<PutItemError> {
        service_error(PutItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().message("The conditional request failed").build()),
                      "ConditionalCheckFailedException")
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        count: i64,
        note: Option<String>,
        tags: HashMap<String, String>,
    }

    #[tokio::test]
    async fn test_should_convert_items() {
        let row = Row { id: "1".to_string(), count: 3, note: None, tags: HashMap::from([("k".to_string(), "v".to_string())]) };
        let item = parse_item(serde_json::to_value(&row).expect("should serialize")).expect("should parse");
        assert_eq!(Some(&AttributeValue::N("3".to_string())), item.get("count"));
        assert_eq!(Some(&AttributeValue::Null(true)), item.get("note"));
        let loaded: Row = parse_entity(&item).expect("should read back");
        assert_eq!(row, loaded);
    }

    #[tokio::test]
    async fn test_should_build_filter_expr() {
        let mut expr = String::new();
        assert_eq!("title", add_filter_expr("title", &mut expr));
        assert_eq!("version", add_filter_expr("version:>", &mut expr));
        assert_eq!("#title = :title AND #version > :version", expr.as_str());
    }

    #[tokio::test]
    async fn test_should_round_trip_page_token() {
        let key = HashMap::from([("book_id".to_string(), AttributeValue::S("b1".to_string()))]);
        let res = from_ddb::<i64>(None, 10, Some(&key), vec![]);
        let token = res.next_page.expect("should have next page");
        assert_eq!(Some(key), to_ddb_page(Some(token.as_str())));
        assert_eq!(None, to_ddb_page(None));
    }

    #[tokio::test]
    async fn test_should_detect_exceeded_limit() {
        assert!(has_exceeded_limit(Some(&b"ProvisionedThroughputExceededException"[..])));
        assert!(!has_exceeded_limit(Some(&b"short"[..])));
        assert!(!has_exceeded_limit(None));
    }

    #[tokio::test]
    async fn test_should_not_build_client_for_memory_store() {
        let res = build_db_client(RepositoryStore::InMemory).await;
        assert!(matches!(res, Err(LibraryError::Runtime { .. })));
    }

    #[tokio::test]
    async fn test_should_map_failed_condition_on_create_to_duplicate_key() {
        let err = put_error(failed_put(), "b1", true);
        assert!(matches!(err, LibraryError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_should_map_failed_condition_on_update_to_retryable_conflict() {
        let err = put_error(failed_put(), "b1", false);
        match err {
            LibraryError::CurrentlyUnavailable { reason_code, retryable, .. } => {
                assert!(retryable);
                assert_eq!(Some("ConditionalCheckFailed".to_string()), reason_code);
            }
            other => panic!("unexpected {:?}", other),
        }
        let flipped = update_error(service_error(UpdateItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().build()), "ConditionalCheckFailedException"), "t1");
        assert!(matches!(flipped, LibraryError::CurrentlyUnavailable { retryable: true, .. }));
    }

    #[tokio::test]
    async fn test_should_not_treat_other_service_errors_as_conflicts() {
        let err = put_error(service_error(PutItemError::ResourceNotFoundException(
            ResourceNotFoundException::builder().message("no table").build()), "ResourceNotFoundException"), "b1", true);
        assert!(!matches!(err, LibraryError::DuplicateKey { .. }));
        assert!(!err.retryable());
    }
}
