pub mod ddb_category_repository;
pub mod memory_category_repository;

use async_trait::async_trait;
use crate::categories::domain::model::CategoryEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub(crate) trait CategoryRepository: Repository<CategoryEntity> {
    async fn find_by_name(&self, name: &str) -> LibraryResult<Option<CategoryEntity>>;

    // all categories ordered by name
    async fn find_all(&self) -> LibraryResult<Vec<CategoryEntity>>;
}

pub(crate) fn sort_by_name(mut categories: Vec<CategoryEntity>) -> Vec<CategoryEntity> {
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    categories
}
