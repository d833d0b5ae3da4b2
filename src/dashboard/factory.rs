use crate::accounts::factory::create_account_repository;
use crate::books::factory::create_book_repository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::dashboard::domain::DashboardService;
use crate::dashboard::domain::service::DashboardServiceImpl;
use crate::ledger::factory::create_transaction_repository;

pub(crate) async fn create_dashboard_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn DashboardService>> {
    let book_repo = create_book_repository(store).await?;
    let account_repo = create_account_repository(store).await?;
    let transaction_repo = create_transaction_repository(store).await?;
    Ok(Box::new(DashboardServiceImpl::new(config, book_repo, account_repo, transaction_repo)))
}
