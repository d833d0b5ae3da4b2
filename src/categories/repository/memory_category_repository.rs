use async_trait::async_trait;
use crate::categories::domain::model::CategoryEntity;
use crate::categories::repository::{CategoryRepository, sort_by_name};
use crate::core::library::LibraryResult;
use crate::utils::memory::MemoryRepository;

pub(crate) type MemoryCategoryRepository = MemoryRepository<CategoryEntity>;

#[async_trait]
impl CategoryRepository for MemoryRepository<CategoryEntity> {
    async fn find_by_name(&self, name: &str) -> LibraryResult<Option<CategoryEntity>> {
        Ok(self.scan_where(|c| c.name == name)?.into_iter().next())
    }

    async fn find_all(&self) -> LibraryResult<Vec<CategoryEntity>> {
        Ok(sort_by_name(self.scan()?))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use crate::categories::domain::model::CategoryEntity;
    use crate::categories::repository::CategoryRepository;
    use crate::categories::repository::memory_category_repository::MemoryCategoryRepository;
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_find_category_by_name() {
        let repo = MemoryCategoryRepository::new("categories");
        let name = Uuid::new_v4().to_string();
        let category = CategoryEntity::new(name.as_str(), "");
        repo.create(&category).await.expect("should create category");
        let found = repo.find_by_name(name.as_str()).await.expect("should query");
        assert_eq!(Some(category), found);
        assert!(repo.find_by_name("no such category").await.expect("should query").is_none());
    }
}
