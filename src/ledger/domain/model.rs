use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::books::domain::model::BookEntity;
use crate::core::domain::Identifiable;
use crate::core::library::TransactionType;
use crate::utils::date::{opt_serializer, serializer};

// TransactionEntity is one loan of `quantity` copies. It is created as ISSUE and flipped in
// place to RETURN; there is no way back from RETURN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TransactionEntity {
    pub transaction_id: String,
    pub version: i64,
    pub member_id: String,
    pub book_id: String,
    #[serde(default)]
    pub book_title: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    #[serde(with = "serializer")]
    pub issue_date: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer", default)]
    pub return_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: String,
}

impl TransactionEntity {
    pub fn issue(member_id: &str, book: &BookEntity, quantity: i64, loan_days: i64) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            transaction_id: Uuid::new_v4().to_string(),
            version: 0,
            member_id: member_id.to_string(),
            book_id: book.book_id.to_string(),
            book_title: book.title.to_string(),
            transaction_type: TransactionType::Issue,
            quantity,
            issue_date: now,
            due_date: Some(now + Duration::days(loan_days)),
            return_date: None,
            notes: "".to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.transaction_type == TransactionType::Issue
    }

    pub fn close(&mut self, return_date: NaiveDateTime) {
        self.transaction_type = TransactionType::Return;
        self.return_date = Some(return_date);
    }

    // undoes `close` when the stock could not take the copies back
    pub fn reopen(&mut self) {
        self.transaction_type = TransactionType::Issue;
        self.return_date = None;
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.is_open() && self.due_date.map(|due| due < now).unwrap_or(false)
    }
}

impl Identifiable for TransactionEntity {
    fn id(&self) -> String {
        self.transaction_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// newest loans first
pub(crate) fn sort_newest_first(mut transactions: Vec<TransactionEntity>) -> Vec<TransactionEntity> {
    transactions.sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then_with(|| a.transaction_id.cmp(&b.transaction_id)));
    transactions
}
