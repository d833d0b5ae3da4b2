use async_trait::async_trait;
use crate::categories::dto::{CategoryDto, CategoryForm};
use crate::core::domain::Identity;
use crate::core::library::LibraryResult;

pub mod model;
pub mod service;

#[async_trait]
pub(crate) trait CategoryService: Sync + Send {
    async fn add_category(&self, identity: &Identity, form: &CategoryForm) -> LibraryResult<CategoryDto>;
    // deletes the category; its books stay in the catalogue with no category
    async fn remove_category(&self, identity: &Identity, id: &str) -> LibraryResult<CategoryDto>;
    async fn find_category_by_id(&self, id: &str) -> LibraryResult<CategoryDto>;
    async fn find_categories(&self) -> LibraryResult<Vec<CategoryDto>>;
}
