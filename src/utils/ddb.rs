use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use serde_json::Value;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::RepositoryStore;

// Creates a table keyed by a single string hash key and waits for it to leave CREATING.
pub(crate) async fn create_table(client: &Client, table_name: &str, pk: &str) -> LibraryResult<()> {
    let key = KeySchemaElement::builder().attribute_name(pk).key_type(KeyType::Hash).build();
    let attr = AttributeDefinition::builder().attribute_name(pk).attribute_type(ScalarAttributeType::S).build();
    let throughput = ProvisionedThroughput::builder().read_capacity_units(10).write_capacity_units(10).build();
    client.create_table()
        .table_name(table_name)
        .key_schema(key)
        .attribute_definitions(attr)
        .provisioned_throughput(throughput)
        .send()
        .await
        .map_err(|err| table_error("create", table_name, err))?;
    wait_for_table_status_change(client, table_name, TableStatus::Creating).await;
    Ok(())
}

pub async fn delete_table(client: &Client, table_name: &str) -> LibraryResult<()> {
    client.delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|err| table_error("delete", table_name, err))?;
    wait_for_table_status_change(client, table_name, TableStatus::Deleting).await;
    Ok(())
}

fn table_error<E: std::fmt::Display>(action: &str, table_name: &str, err: E) -> LibraryError {
    LibraryError::database_or_unavailable(
        format!("failed to {} table {}: {}", action, table_name, err).as_str(), None, false)
}

async fn wait_for_table_status_change(client: &Client, table_name: &str, pending: TableStatus) {
    for _ in 0..30 {
        match table_status(client, table_name).await {
            Ok(status) if status != pending => return,
            _ => tokio::time::sleep(Duration::from_secs(1)).await,
        }
    }
}

async fn table_status(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    let out = client.describe_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|err| table_error("describe", table_name, err))?;
    out.table()
        .and_then(|table| table.table_status())
        .cloned()
        .ok_or_else(|| LibraryError::runtime(format!("no status for table {}", table_name).as_str(), None))
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("failed to parse{:?}", other)),
    }
}

pub(crate) fn parse_string_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<String> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        return Some(str.clone());
    }
    None
}

pub(crate) fn parse_float_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<f64> {
    match map.get(name) {
        Some(AttributeValue::N(str)) => str.parse::<f64>().ok(),
        _ => None,
    }
}

// Turns a page token from `from_ddb` back into an exclusive start key.
pub(crate) fn to_ddb_page(page: Option<&str>) -> Option<HashMap<String, AttributeValue>> {
    let str_map = serde_json::from_str::<HashMap<String, String>>(page?).ok()?;
    Some(str_map.into_iter().map(|(k, v)| (k, AttributeValue::S(v))).collect())
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

// helper method to build db-client for the configured store
pub(crate) async fn build_db_client(config: &Configuration) -> Client {
    match config.store {
        RepositoryStore::LocalDynamoDB => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(config.endpoint_url.as_str())
                .build();
            Client::from_conf(dynamodb_local_config)
        }
        _ => {
            //Get config from environment.
            let aws_config = aws_config::load_from_env().await;
            Client::new(&aws_config)
        }
    }
}

// JSON lines for CloudWatch, which adds its own ingestion timestamp.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .json()
        .init();
}

macro_rules! impl_from_sdk_error {
    ($($op:ty),+) => {
        $(
        impl From<SdkError<$op>> for LibraryError {
            fn from(err: SdkError<$op>) -> Self {
                let (retryable, reason) = retryable_sdk_error(&err);
                LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
            }
        }
        )+
    };
}

impl_from_sdk_error!(UpdateItemError, GetItemError, DeleteItemError, ScanError);

// True when the service rejected the request with an error matching `check`,
// e.g. `UpdateItemError::is_conditional_check_failed_exception`.
pub(crate) fn is_service_error<E, R>(err: &SdkError<E, R>, check: impl Fn(&E) -> bool) -> bool {
    matches!(err, SdkError::ServiceError(ctx) if check(ctx.err()))
}

// A failed `attribute_not_exists` condition on put means the id is taken.
impl From<SdkError<PutItemError>> for LibraryError {
    fn from(err: SdkError<PutItemError>) -> Self {
        if is_service_error(&err, PutItemError::is_conditional_check_failed_exception) {
            return LibraryError::duplicate_key(format!("book already exists: {:?}", err).as_str());
        }
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

// (retryable, reason) where reason is the HTTP status for service errors.
fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    let (retryable, reason) = match err {
        SdkError::ConstructionFailure(_) => (false, "ConstructionFailure".to_string()),
        SdkError::TimeoutError(_) => (true, "TimeoutError".to_string()),
        SdkError::DispatchFailure(_) => (true, "DispatchFailure".to_string()),
        SdkError::ResponseError { .. } => (true, "ResponseError".to_string()),
        SdkError::ServiceError(ctx) => {
            let http = ctx.raw().http();
            (http.status().is_server_error() || has_exceeded_limit(http.body().bytes()), http.status().to_string())
        }
        _ => (true, "Unknown".to_string()),
    };
    (retryable, Some(reason))
}

// throughput and rate errors carry "...Exceeded..." in the body
fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    opts.map(|b| b.windows(6).any(|w| w == b"ceeded")).unwrap_or(false)
}
