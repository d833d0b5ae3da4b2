use crate::accounts::domain::AccountService;
use crate::accounts::domain::service::AccountServiceImpl;
use crate::accounts::repository::{AccountRepository, SessionRepository};
use crate::accounts::repository::ddb_account_repository::{COUNTERS_TABLE, DDBAccountRepository, DDBSessionRepository};
use crate::accounts::repository::memory_account_repository::{MemoryAccountRepository, MemorySessionRepository};
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::members::factory::create_member_repository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) const ACCOUNTS_TABLE: &str = "accounts";
pub(crate) const SESSIONS_TABLE: &str = "sessions";

pub(crate) async fn create_account_repository(store: RepositoryStore) -> LibraryResult<Box<dyn AccountRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBAccountRepository::new(client, ACCOUNTS_TABLE, "account_id", Some("username"))))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, ACCOUNTS_TABLE, "account_id", Some("username"), None).await;
            let _ = create_table(&client, COUNTERS_TABLE, "counter_id", None, None).await;
            Ok(Box::new(DDBAccountRepository::new(client, ACCOUNTS_TABLE, "account_id", Some("username"))))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryAccountRepository::new(ACCOUNTS_TABLE)))
        }
    }
}

pub(crate) async fn create_session_repository(store: RepositoryStore) -> LibraryResult<Box<dyn SessionRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBSessionRepository::new(client, SESSIONS_TABLE, "session_id", None)))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, SESSIONS_TABLE, "session_id", None, None).await;
            Ok(Box::new(DDBSessionRepository::new(client, SESSIONS_TABLE, "session_id", None)))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemorySessionRepository::new(SESSIONS_TABLE)))
        }
    }
}

pub(crate) async fn create_account_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn AccountService>> {
    let account_repo = create_account_repository(store).await?;
    let session_repo = create_session_repository(store).await?;
    let member_repo = create_member_repository(store).await?;
    let publisher = create_publisher(store.gateway_publisher()).await?;
    Ok(Box::new(AccountServiceImpl::new(config, account_repo, session_repo, member_repo, publisher)))
}
