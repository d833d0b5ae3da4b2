use crate::books::factory::create_book_repository;
use crate::categories::domain::CategoryService;
use crate::categories::domain::service::CategoryServiceImpl;
use crate::categories::repository::CategoryRepository;
use crate::categories::repository::ddb_category_repository::DDBCategoryRepository;
use crate::categories::repository::memory_category_repository::MemoryCategoryRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) const CATEGORIES_TABLE: &str = "categories";

pub(crate) async fn create_category_repository(store: RepositoryStore) -> LibraryResult<Box<dyn CategoryRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBCategoryRepository::new(client, CATEGORIES_TABLE, "category_id", None)))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, CATEGORIES_TABLE, "category_id", None, None).await;
            Ok(Box::new(DDBCategoryRepository::new(client, CATEGORIES_TABLE, "category_id", None)))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryCategoryRepository::new(CATEGORIES_TABLE)))
        }
    }
}

pub(crate) async fn create_category_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn CategoryService>> {
    let category_repo = create_category_repository(store).await?;
    let book_repo = create_book_repository(store).await?;
    let publisher = create_publisher(store.gateway_publisher()).await?;
    Ok(Box::new(CategoryServiceImpl::new(config, category_repo, book_repo, publisher)))
}
