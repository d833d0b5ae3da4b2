use crate::books::factory::create_book_repository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::categories::factory::create_category_repository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::ledger::factory::create_transaction_repository;

pub(crate) async fn create_catalog_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn CatalogService>> {
    let book_repo = create_book_repository(store).await?;
    let category_repo = create_category_repository(store).await?;
    let transaction_repo = create_transaction_repository(store).await?;
    let publisher = create_publisher(store.gateway_publisher()).await?;
    Ok(Box::new(CatalogServiceImpl::new(config, book_repo, category_repo, transaction_repo, publisher)))
}
