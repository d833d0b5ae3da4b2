use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::date::DATE_FMT;

type Rows = BTreeMap<String, Value>;

// Process-wide tables so that every repository built by a factory for the same table name
// sees the same rows, the way separate DynamoDB clients share a table.
lazy_static! {
    static ref TABLES: Mutex<HashMap<String, Arc<Mutex<Rows>>>> = Mutex::new(HashMap::new());
    static ref SEQUENCES: Mutex<HashMap<String, i64>> = Mutex::new(HashMap::new());
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn next_sequence(name: &str) -> i64 {
    let mut sequences = lock(&SEQUENCES);
    let next = sequences.entry(name.to_string()).or_insert(0);
    *next += 1;
    *next
}

#[derive(Debug, Clone)]
pub(crate) struct MemoryTable {
    name: String,
    rows: Arc<Mutex<Rows>>,
}

impl MemoryTable {
    pub(crate) fn open(name: &str) -> Self {
        let mut tables = lock(&TABLES);
        let rows = tables.entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(BTreeMap::new())))
            .clone();
        Self {
            name: name.to_string(),
            rows,
        }
    }

    fn rows(&self) -> MutexGuard<'_, Rows> {
        lock(&self.rows)
    }
}

// MemoryRepository keeps entities as JSON documents keyed by their id.
#[derive(Debug)]
pub(crate) struct MemoryRepository<E> {
    table: MemoryTable,
    _entity: PhantomData<fn() -> E>,
}

impl<E> MemoryRepository<E>
    where E: Identifiable + Serialize + DeserializeOwned + 'static {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::open(table_name),
            _entity: PhantomData,
        }
    }

    pub(crate) fn scan(&self) -> LibraryResult<Vec<E>> {
        let rows = self.table.rows();
        rows.values().map(|v| parse_row(v.clone())).collect()
    }

    pub(crate) fn scan_where<F>(&self, predicate: F) -> LibraryResult<Vec<E>>
        where F: Fn(&E) -> bool {
        Ok(self.scan()?.into_iter().filter(|e| predicate(e)).collect())
    }

    // Applies `change` to the stored entity while holding the table lock, so the read, the
    // check inside `change` and the write cannot interleave with another writer.
    pub(crate) fn update_with<F>(&self, id: &str, change: F) -> LibraryResult<E>
        where F: FnOnce(&mut E) -> LibraryResult<()> {
        let mut rows = self.table.rows();
        let current = rows.get(id).cloned()
            .ok_or_else(|| LibraryError::not_found(format!("{} not found for {}", self.table.name, id).as_str()))?;
        let mut entity: E = parse_row(current)?;
        let version = entity.version();
        change(&mut entity)?;
        let value = bump_version(serde_json::to_value(&entity)?, version);
        rows.insert(id.to_string(), value.clone());
        parse_row(value)
    }
}

#[async_trait]
impl<E> Repository<E> for MemoryRepository<E>
    where E: Identifiable + Serialize + DeserializeOwned + 'static {
    async fn create(&self, entity: &E) -> LibraryResult<usize> {
        let value = serde_json::to_value(entity)?;
        let mut rows = self.table.rows();
        if rows.contains_key(entity.id().as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("{} already exists in {}", entity.id(), self.table.name).as_str()));
        }
        rows.insert(entity.id(), value);
        Ok(1)
    }

    async fn update(&self, entity: &E) -> LibraryResult<usize> {
        let value = serde_json::to_value(entity)?;
        let mut rows = self.table.rows();
        let stored_version = rows.get(entity.id().as_str())
            .map(|v| v.get("version").and_then(Value::as_i64).unwrap_or(0))
            .ok_or_else(|| LibraryError::not_found(
                format!("{} not found for {}", self.table.name, entity.id()).as_str()))?;
        if stored_version != entity.version() {
            return Err(LibraryError::unavailable(
                format!("stale version {} for {} in {}", entity.version(), entity.id(), self.table.name).as_str(),
                Some("ConditionalCheckFailed".to_string()), true));
        }
        rows.insert(entity.id(), bump_version(value, stored_version));
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<E> {
        let rows = self.table.rows();
        match rows.get(id) {
            Some(value) => parse_row(value.clone()),
            None => Err(LibraryError::not_found(format!("{} not found for {}", self.table.name, id).as_str())),
        }
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut rows = self.table.rows();
        Ok(rows.remove(id).map(|_| 1).unwrap_or(0))
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<E>> {
        let rows = self.table.rows();
        let start = match page {
            Some(key) => Bound::Excluded(key.to_string()),
            None => Bound::Unbounded,
        };
        let mut records = vec![];
        let mut last_key = None;
        let mut has_more = false;
        for (key, value) in rows.range((start, Bound::Unbounded)) {
            if !matches_predicate(value, predicate) {
                continue;
            }
            if records.len() == page_size {
                has_more = true;
                break;
            }
            records.push(parse_row(value.clone())?);
            last_key = Some(key.clone());
        }
        let next_page = if has_more { last_key } else { None };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

fn parse_row<E: DeserializeOwned>(value: Value) -> LibraryResult<E> {
    serde_json::from_value(value).map_err(LibraryError::from)
}

fn bump_version(mut value: Value, version: i64) -> Value {
    if let Value::Object(ref mut map) = value {
        map.insert("version".to_string(), Value::from(version + 1));
        if map.contains_key("updated_at") {
            let now = Utc::now().naive_utc().format(DATE_FMT).to_string();
            map.insert("updated_at".to_string(), Value::String(now));
        }
    }
    value
}

fn matches_predicate(value: &Value, predicate: &HashMap<String, String>) -> bool {
    predicate.iter().all(|(k, expected)| {
        match value.get(k.as_str()) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Number(n)) => n.to_string() == *expected,
            Some(Value::Bool(b)) => b.to_string() == *expected,
            Some(Value::Null) | None => expected.is_empty(),
            Some(other) => other.to_string() == *expected,
        }
    })
}
