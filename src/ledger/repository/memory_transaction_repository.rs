use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::ledger::domain::model::{sort_newest_first, TransactionEntity};
use crate::ledger::repository::TransactionRepository;
use crate::utils::memory::MemoryRepository;

pub(crate) type MemoryTransactionRepository = MemoryRepository<TransactionEntity>;

#[async_trait]
impl TransactionRepository for MemoryRepository<TransactionEntity> {
    async fn mark_returned(&self, transaction_id: &str, return_date: NaiveDateTime) -> LibraryResult<Option<TransactionEntity>> {
        let mut was_open = true;
        let res = self.update_with(transaction_id, |t| {
            if !t.is_open() {
                was_open = false;
                return Err(LibraryError::unavailable("transaction already returned",
                                                     Some("ConditionalCheckFailed".to_string()), false));
            }
            t.close(return_date);
            Ok(())
        });
        match res {
            Ok(transaction) => Ok(Some(transaction)),
            Err(_) if !was_open => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn find_by_member(&self, member_id: &str) -> LibraryResult<Vec<TransactionEntity>> {
        Ok(sort_newest_first(self.scan_where(|t| t.member_id == member_id)?))
    }

    async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>> {
        Ok(sort_newest_first(self.scan()?))
    }

    async fn delete_by_book(&self, book_id: &str) -> LibraryResult<usize> {
        let mut deleted = 0;
        for transaction in self.scan_where(|t| t.book_id == book_id)? {
            deleted += self.delete(transaction.transaction_id.as_str()).await?;
        }
        Ok(deleted)
    }
}
