pub mod ddb_transaction_repository;
pub mod memory_transaction_repository;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::ledger::domain::model::TransactionEntity;

#[async_trait]
pub(crate) trait TransactionRepository: Repository<TransactionEntity> {
    // Flips an ISSUE row to RETURN only if it is still ISSUE. Returns None when another
    // return got there first.
    async fn mark_returned(&self, transaction_id: &str, return_date: NaiveDateTime) -> LibraryResult<Option<TransactionEntity>>;

    // loans of a member, newest first
    async fn find_by_member(&self, member_id: &str) -> LibraryResult<Vec<TransactionEntity>>;

    // every loan, newest first
    async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>>;

    // removes the loans of a deleted book and returns how many went
    async fn delete_by_book(&self, book_id: &str) -> LibraryResult<usize>;
}
