use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use crate::accounts::domain::model::{AccountEntity, SessionEntity};
use crate::accounts::repository::{AccountRepository, SessionRepository};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{string_number, update_error};
use crate::utils::ddb_repository::DDBRepository;

pub(crate) const COUNTERS_TABLE: &str = "counters";

pub(crate) type DDBAccountRepository = DDBRepository<AccountEntity>;
pub(crate) type DDBSessionRepository = DDBRepository<SessionEntity>;

#[async_trait]
impl AccountRepository for DDBRepository<AccountEntity> {
    // atomic counter so concurrent signups never share an id
    async fn next_user_id(&self) -> LibraryResult<i64> {
        let out = self.client()
            .update_item()
            .table_name(COUNTERS_TABLE)
            .key("counter_id", AttributeValue::S(self.table_name().to_string()))
            .update_expression("ADD #value :one")
            .expression_attribute_names("#value", "value")
            .expression_attribute_values(":one", string_number(1))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await.map_err(|err| update_error(err, COUNTERS_TABLE))?;
        out.attributes()
            .and_then(|attrs| attrs.get("value"))
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse::<i64>().ok())
            .ok_or_else(|| LibraryError::database("user id counter returned no value", None, false))
    }

    async fn find_by_username(&self, username: &str) -> LibraryResult<Option<AccountEntity>> {
        let predicate = HashMap::from([("username".to_string(), username.to_string())]);
        let res = self.query(&predicate, None, 10).await?;
        Ok(res.records.into_iter().next())
    }

    async fn find_all(&self) -> LibraryResult<Vec<AccountEntity>> {
        let mut accounts = self.scan_all(&HashMap::new()).await?;
        accounts.sort_by_key(|a| a.user_id);
        Ok(accounts)
    }
}

impl SessionRepository for DDBRepository<SessionEntity> {}
