use std::collections::HashMap;
use async_trait::async_trait;
use crate::categories::domain::model::CategoryEntity;
use crate::categories::repository::{CategoryRepository, sort_by_name};
use crate::core::library::LibraryResult;
use crate::utils::ddb_repository::DDBRepository;

pub(crate) type DDBCategoryRepository = DDBRepository<CategoryEntity>;

#[async_trait]
impl CategoryRepository for DDBRepository<CategoryEntity> {
    async fn find_by_name(&self, name: &str) -> LibraryResult<Option<CategoryEntity>> {
        let predicate = HashMap::from([("name".to_string(), name.to_string())]);
        Ok(self.scan_all(&predicate).await?.into_iter().next())
    }

    async fn find_all(&self) -> LibraryResult<Vec<CategoryEntity>> {
        Ok(sort_by_name(self.scan_all(&HashMap::new()).await?))
    }
}
