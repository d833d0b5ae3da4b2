use crate::books::factory::create_book_repository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::ledger::domain::LedgerService;
use crate::ledger::domain::service::LedgerServiceImpl;
use crate::ledger::repository::TransactionRepository;
use crate::ledger::repository::ddb_transaction_repository::DDBTransactionRepository;
use crate::ledger::repository::memory_transaction_repository::MemoryTransactionRepository;
use crate::members::factory::create_member_repository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) const TRANSACTIONS_TABLE: &str = "transactions";

pub(crate) async fn create_transaction_repository(store: RepositoryStore) -> LibraryResult<Box<dyn TransactionRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBTransactionRepository::new(client, TRANSACTIONS_TABLE, "transaction_id", Some("member_id"))))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, TRANSACTIONS_TABLE, "transaction_id", Some("member_id"), Some("issue_date")).await;
            Ok(Box::new(DDBTransactionRepository::new(client, TRANSACTIONS_TABLE, "transaction_id", Some("member_id"))))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryTransactionRepository::new(TRANSACTIONS_TABLE)))
        }
    }
}

pub(crate) async fn create_ledger_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn LedgerService>> {
    let transaction_repo = create_transaction_repository(store).await?;
    let book_repo = create_book_repository(store).await?;
    let member_repo = create_member_repository(store).await?;
    let publisher = create_publisher(store.gateway_publisher()).await?;
    Ok(Box::new(LedgerServiceImpl::new(config, transaction_repo, book_repo, member_repo, publisher)))
}
