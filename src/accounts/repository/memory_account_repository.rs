use async_trait::async_trait;
use crate::accounts::domain::model::{AccountEntity, SessionEntity};
use crate::accounts::repository::{AccountRepository, SessionRepository};
use crate::core::library::LibraryResult;
use crate::utils::memory::{MemoryRepository, next_sequence};

pub(crate) type MemoryAccountRepository = MemoryRepository<AccountEntity>;
pub(crate) type MemorySessionRepository = MemoryRepository<SessionEntity>;

#[async_trait]
impl AccountRepository for MemoryRepository<AccountEntity> {
    async fn next_user_id(&self) -> LibraryResult<i64> {
        Ok(next_sequence("accounts"))
    }

    async fn find_by_username(&self, username: &str) -> LibraryResult<Option<AccountEntity>> {
        Ok(self.scan_where(|a| a.username == username)?.into_iter().next())
    }

    async fn find_all(&self) -> LibraryResult<Vec<AccountEntity>> {
        let mut accounts = self.scan()?;
        accounts.sort_by_key(|a| a.user_id);
        Ok(accounts)
    }
}

impl SessionRepository for MemoryRepository<SessionEntity> {}
