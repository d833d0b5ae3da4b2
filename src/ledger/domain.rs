use async_trait::async_trait;
use crate::core::domain::Identity;
use crate::core::library::LibraryResult;
use crate::ledger::dto::{ReturnOutcome, TransactionDto};

pub mod model;
pub mod service;

// LedgerService records loans and keeps the book counters in step with them.
#[async_trait]
pub(crate) trait LedgerService: Sync + Send {
    async fn issue_book(&self, identity: &Identity, book_id: &str) -> LibraryResult<TransactionDto>;

    // returns a loan owned by the caller; a second return is reported, not failed
    async fn return_book(&self, identity: &Identity, transaction_id: &str) -> LibraryResult<ReturnOutcome>;

    // None when the caller has never been registered as a member
    async fn my_books(&self, identity: &Identity) -> LibraryResult<Option<Vec<TransactionDto>>>;

    async fn find_transactions(&self) -> LibraryResult<Vec<TransactionDto>>;
}
