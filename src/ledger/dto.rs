use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::library::TransactionType;
use crate::ledger::domain::model::TransactionEntity;
use crate::utils::date::{opt_serializer, serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TransactionDto {
    pub transaction_id: String,
    pub member_id: String,
    pub book_id: String,
    pub book_title: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    #[serde(with = "serializer")]
    pub issue_date: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer", default)]
    pub return_date: Option<NaiveDateTime>,
    pub notes: String,
    pub overdue: bool,
}

impl From<&TransactionEntity> for TransactionDto {
    fn from(other: &TransactionEntity) -> Self {
        Self {
            transaction_id: other.transaction_id.to_string(),
            member_id: other.member_id.to_string(),
            book_id: other.book_id.to_string(),
            book_title: other.book_title.to_string(),
            transaction_type: other.transaction_type,
            quantity: other.quantity,
            issue_date: other.issue_date,
            due_date: other.due_date,
            return_date: other.return_date,
            notes: other.notes.to_string(),
            overdue: other.is_overdue(Utc::now().naive_utc()),
        }
    }
}

// ReturnOutcome tells a first return apart from a repeated one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ReturnOutcome {
    pub transaction: TransactionDto,
    pub already_returned: bool,
}
