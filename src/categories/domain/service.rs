use std::collections::HashMap;
use async_trait::async_trait;
use tracing::info;
use crate::books::repository::BookRepository;
use crate::categories::domain::CategoryService;
use crate::categories::domain::model::CategoryEntity;
use crate::categories::dto::{CategoryDto, CategoryForm};
use crate::categories::repository::CategoryRepository;
use crate::core::domain::{Configuration, Identity};
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::events::EventPublisher;

pub(crate) struct CategoryServiceImpl {
    category_repository: Box<dyn CategoryRepository>,
    book_repository: Box<dyn BookRepository>,
    events_publisher: Box<dyn EventPublisher>,
}

impl CategoryServiceImpl {
    pub(crate) fn new(_config: &Configuration, category_repository: Box<dyn CategoryRepository>,
                      book_repository: Box<dyn BookRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            category_repository,
            book_repository,
            events_publisher,
        }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn add_category(&self, identity: &Identity, form: &CategoryForm) -> LibraryResult<CategoryDto> {
        identity.require_staff()?;
        let form = CategoryForm::new(form.name.as_str(), form.description.as_str());
        form.validate()?;
        if self.category_repository.find_by_name(form.name.as_str()).await?.is_some() {
            return Err(LibraryError::invalid_field("name", "Category with this Name already exists."));
        }
        let category = CategoryEntity::new(form.name.as_str(), form.description.as_str());
        self.category_repository.create(&category).await?;
        let dto = CategoryDto::from(&category);
        self.events_publisher.publish(&DomainEvent::added(
            "categories", "categories", dto.category_id.as_str(), &HashMap::new(), &dto)?).await?;
        Ok(dto)
    }

    async fn remove_category(&self, identity: &Identity, id: &str) -> LibraryResult<CategoryDto> {
        identity.require_staff()?;
        let category = self.category_repository.get(id).await?;
        let books = self.book_repository.find_by_category(id).await?;
        for book in &books {
            self.book_repository.clear_category(book.book_id.as_str()).await?;
        }
        self.category_repository.delete(id).await?;
        info!("deleted category {} and detached {} books", category.name, books.len());
        let dto = CategoryDto::from(&category);
        self.events_publisher.publish(&DomainEvent::deleted(
            "categories", "categories", id, &HashMap::new(), &dto)?).await?;
        Ok(dto)
    }

    async fn find_category_by_id(&self, id: &str) -> LibraryResult<CategoryDto> {
        self.category_repository.get(id).await.map(|c| CategoryDto::from(&c))
    }

    async fn find_categories(&self) -> LibraryResult<Vec<CategoryDto>> {
        let categories = self.category_repository.find_all().await?;
        Ok(categories.iter().map(CategoryDto::from).collect())
    }
}
