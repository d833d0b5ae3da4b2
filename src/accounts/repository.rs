pub mod ddb_account_repository;
pub mod memory_account_repository;

use async_trait::async_trait;
use crate::accounts::domain::model::{AccountEntity, SessionEntity};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub(crate) trait AccountRepository: Repository<AccountEntity> {
    // allocates the next numeric user id
    async fn next_user_id(&self) -> LibraryResult<i64>;

    async fn find_by_username(&self, username: &str) -> LibraryResult<Option<AccountEntity>>;

    // all accounts ordered by user id
    async fn find_all(&self) -> LibraryResult<Vec<AccountEntity>>;
}

#[async_trait]
pub(crate) trait SessionRepository: Repository<SessionEntity> {}
