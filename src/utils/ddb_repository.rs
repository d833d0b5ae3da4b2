use std::cmp;
use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::date::DATE_FMT;
use crate::utils::ddb::{add_filter_expr, from_ddb, parse_entity, parse_item, put_error, string_number, to_ddb_page};

// upper bound on compare-and-swap rounds before a contended write gives up
pub(crate) const MAX_CAS_ATTEMPTS: usize = 8;

// DDBRepository stores an entity as a single item keyed by `pk`, with an optional
// `{table}_ndx` secondary index for the aggregate's main lookup.
#[derive(Debug)]
pub(crate) struct DDBRepository<E> {
    client: Client,
    table_name: String,
    pk: String,
    index: Option<(String, String)>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> DDBRepository<E>
    where E: Identifiable + Serialize + DeserializeOwned + 'static {
    pub(crate) fn new(client: Client, table_name: &str, pk: &str, index_pk: Option<&str>) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            pk: pk.to_string(),
            index: index_pk.map(|k| (format!("{}_ndx", table_name), k.to_string())),
            _entity: PhantomData,
        }
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    // reads every item matching the predicate, following pagination to the end
    pub(crate) async fn scan_all(&self, predicate: &HashMap<String, String>) -> LibraryResult<Vec<E>> {
        let mut all = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.scan(predicate, next_page.as_deref(), 500).await?;
            all.extend(res.records);
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        Ok(all)
    }

    async fn scan(&self, predicate: &HashMap<String, String>,
                  page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<E>> {
        let mut request = self.client
            .scan()
            .table_name(self.table_name.as_str())
            .consistent_read(true)
            .set_exclusive_start_key(to_ddb_page(page))
            .limit(cmp::min(page_size, 500) as i32);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            let ks = add_filter_expr(k.as_str(), &mut filter_expr);
            request = request
                .expression_attribute_names(format!("#{}", ks), ks.as_str())
                .expression_attribute_values(format!(":{}", ks), AttributeValue::S(v.to_string()));
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        let out = request.send().await.map_err(LibraryError::from)?;
        let records = out.items().unwrap_or_default().iter()
            .map(parse_entity)
            .collect::<LibraryResult<Vec<E>>>()?;
        Ok(from_ddb(page, page_size, out.last_evaluated_key(), records))
    }

    async fn query_index(&self, index_name: &str, index_pk: &str, predicate: &HashMap<String, String>,
                         page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<E>> {
        let key_value = predicate.get(index_pk).cloned().unwrap_or_default();
        let mut request = self.client
            .query()
            .table_name(self.table_name.as_str())
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .scan_index_forward(false)
            .set_exclusive_start_key(to_ddb_page(page))
            .key_condition_expression("#ndx_pk = :ndx_pk")
            .expression_attribute_names("#ndx_pk", index_pk)
            .expression_attribute_values(":ndx_pk", AttributeValue::S(key_value));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != index_pk {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request
                    .expression_attribute_names(format!("#{}", ks), ks.as_str())
                    .expression_attribute_values(format!(":{}", ks), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        let out = request.send().await.map_err(LibraryError::from)?;
        let records = out.items().unwrap_or_default().iter()
            .map(parse_entity)
            .collect::<LibraryResult<Vec<E>>>()?;
        Ok(from_ddb(page, page_size, out.last_evaluated_key(), records))
    }

    // Reads the item, applies `change` and writes it back conditioned on the version it read.
    // A lost race re-reads and re-applies, so `change` must be a pure function of the entity.
    pub(crate) async fn update_with<F>(&self, id: &str, change: F) -> LibraryResult<E>
        where F: Fn(&mut E) -> LibraryResult<()> + Send + Sync {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let mut entity = self.get(id).await?;
            change(&mut entity)?;
            match self.update(&entity).await {
                Ok(_) => return self.get(id).await,
                Err(LibraryError::CurrentlyUnavailable { retryable: true, .. }) => {
                    debug!("version conflict on {} {} attempt {}", self.table_name, id, attempt);
                }
                Err(err) => return Err(err),
            }
        }
        Err(LibraryError::unavailable(format!("too much contention on {} {}", self.table_name, id).as_str(),
                                      Some("ConditionalCheckFailed".to_string()), true))
    }
}

#[async_trait]
impl<E> Repository<E> for DDBRepository<E>
    where E: Identifiable + Serialize + DeserializeOwned + 'static {
    async fn create(&self, entity: &E) -> LibraryResult<usize> {
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", self.pk.as_str())
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(|err| put_error(err, entity.id().as_str(), true))
    }

    async fn update(&self, entity: &E) -> LibraryResult<usize> {
        let mut val = serde_json::to_value(entity)?;
        if let Value::Object(ref mut map) = val {
            map.insert("version".to_string(), Value::from(entity.version() + 1));
            if map.contains_key("updated_at") {
                let now = Utc::now().naive_utc().format(DATE_FMT).to_string();
                map.insert("updated_at".to_string(), Value::String(now));
            }
        }
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .set_item(Some(parse_item(val)?))
            .expression_attribute_values(":old_version", string_number(entity.version()))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(|err| put_error(err, entity.id().as_str(), false))
    }

    async fn get(&self, id: &str) -> LibraryResult<E> {
        let out = self.client
            .get_item()
            .table_name(self.table_name.as_str())
            .consistent_read(true)
            .key(self.pk.as_str(), AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(LibraryError::from)?;
        match out.item() {
            Some(map) => parse_entity(map),
            None => Err(LibraryError::not_found(format!("{} not found for {}", self.table_name, id).as_str())),
        }
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.client.delete_item()
            .table_name(self.table_name.as_str())
            .key(self.pk.as_str(), AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Uses the secondary index when the predicate names its key, otherwise a filtered scan.
    // Attribute names go through placeholders since many of ours are reserved words.
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<E>> {
        match &self.index {
            Some((index_name, index_pk)) if predicate.contains_key(index_pk) => {
                self.query_index(index_name, index_pk, predicate, page, page_size).await
            }
            _ => self.scan(predicate, page, page_size).await,
        }
    }
}
