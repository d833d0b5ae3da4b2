use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::NaiveDateTime;
use crate::core::library::{LibraryError, LibraryResult, TransactionType};
use crate::core::repository::Repository;
use crate::ledger::domain::model::{sort_newest_first, TransactionEntity};
use crate::ledger::repository::TransactionRepository;
use crate::utils::date::DATE_FMT;
use crate::utils::ddb::{parse_entity, string_number, update_error};
use crate::utils::ddb_repository::DDBRepository;

pub(crate) type DDBTransactionRepository = DDBRepository<TransactionEntity>;

#[async_trait]
impl TransactionRepository for DDBRepository<TransactionEntity> {
    async fn mark_returned(&self, transaction_id: &str, return_date: NaiveDateTime) -> LibraryResult<Option<TransactionEntity>> {
        let res = self.client()
            .update_item()
            .table_name(self.table_name())
            .key("transaction_id", AttributeValue::S(transaction_id.to_string()))
            .update_expression("SET transaction_type = :returned, return_date = :return_date, version = version + :one")
            .condition_expression("transaction_type = :issued")
            .expression_attribute_values(":returned", AttributeValue::S(TransactionType::Return.to_string()))
            .expression_attribute_values(":issued", AttributeValue::S(TransactionType::Issue.to_string()))
            .expression_attribute_values(":return_date", AttributeValue::S(return_date.format(DATE_FMT).to_string()))
            .expression_attribute_values(":one", string_number(1))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;
        match res {
            Ok(out) => match out.attributes() {
                Some(attrs) => parse_entity(attrs).map(Some),
                None => Err(LibraryError::database("return flip gave no attributes", None, false)),
            },
            Err(err) => match update_error(err, transaction_id) {
                LibraryError::CurrentlyUnavailable { reason_code: Some(ref reason), .. }
                if reason == "ConditionalCheckFailed" => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn find_by_member(&self, member_id: &str) -> LibraryResult<Vec<TransactionEntity>> {
        let predicate = HashMap::from([("member_id".to_string(), member_id.to_string())]);
        let mut all = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.query(&predicate, next_page.as_deref(), 200).await?;
            all.extend(res.records);
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        Ok(sort_newest_first(all))
    }

    async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>> {
        Ok(sort_newest_first(self.scan_all(&HashMap::new()).await?))
    }

    async fn delete_by_book(&self, book_id: &str) -> LibraryResult<usize> {
        let predicate = HashMap::from([("book_id".to_string(), book_id.to_string())]);
        let mut deleted = 0;
        for transaction in self.scan_all(&predicate).await? {
            deleted += self.delete(transaction.transaction_id.as_str()).await?;
        }
        Ok(deleted)
    }
}
