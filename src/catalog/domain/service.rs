use std::collections::HashMap;
use async_trait::async_trait;
use tracing::info;
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookDto, BookForm};
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::categories::repository::CategoryRepository;
use crate::core::domain::{Configuration, Identity};
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::events::EventPublisher;
use crate::ledger::repository::TransactionRepository;

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
    category_repository: Box<dyn CategoryRepository>,
    transaction_repository: Box<dyn TransactionRepository>,
    events_publisher: Box<dyn EventPublisher>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration,
                      book_repository: Box<dyn BookRepository>,
                      category_repository: Box<dyn CategoryRepository>,
                      transaction_repository: Box<dyn TransactionRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            book_repository,
            category_repository,
            transaction_repository,
            events_publisher,
        }
    }

    // isbn and (title, authors, publisher) are unique; `current` is the book being edited
    async fn check_unique(&self, form: &BookForm, current: Option<&str>) -> LibraryResult<()> {
        let is_other = |book: &BookEntity| Some(book.book_id.as_str()) != current;
        if let Some(isbn) = &form.isbn {
            if self.book_repository.find_by_isbn(isbn.as_str()).await?.filter(is_other).is_some() {
                return Err(LibraryError::invalid_field("isbn", "Book with this Isbn already exists."));
            }
        }
        if self.book_repository.find_by_natural_key(
            form.title.as_str(), form.authors.as_str(), form.publisher.as_str()).await?.filter(is_other).is_some() {
            return Err(LibraryError::validation("Book with this Title, Authors and Publisher already exists.", None));
        }
        Ok(())
    }

    async fn check_category(&self, form: &BookForm) -> LibraryResult<()> {
        if let Some(category_id) = &form.category_id {
            match self.category_repository.get(category_id.as_str()).await {
                Ok(_) => {}
                Err(LibraryError::NotFound { .. }) => {
                    return Err(LibraryError::invalid_field(
                        "category_id", "Select a valid choice. That choice is not one of the available choices."));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    async fn checked_form(&self, form: &BookForm, current: Option<&str>) -> LibraryResult<BookForm> {
        let form = form.normalized();
        form.validate()?;
        self.check_unique(&form, current).await?;
        self.check_category(&form).await?;
        Ok(form)
    }
}

// copies the editable fields onto the stored book; the stock moves with total_quantity
fn apply_form(book: &mut BookEntity, form: &BookForm) -> LibraryResult<()> {
    book.title = form.title.to_string();
    book.subtitle = form.subtitle.to_string();
    book.authors = form.authors.to_string();
    book.isbn = form.isbn.clone();
    book.publisher = form.publisher.to_string();
    book.category_id = form.category_id.clone();
    book.description = form.description.to_string();
    book.price = form.price;
    book.cover_image = form.cover_image.clone();
    book.change_total(form.total_quantity)
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn book_form(&self, identity: &Identity, id: Option<&str>) -> LibraryResult<BookForm> {
        identity.require_staff()?;
        match id {
            Some(id) => self.find_book_by_id(id).await.map(|b| BookForm::from(&b)),
            None => Ok(BookForm::default()),
        }
    }

    async fn add_book(&self, identity: &Identity, form: &BookForm) -> LibraryResult<BookDto> {
        identity.require_staff()?;
        let form = self.checked_form(form, None).await?;
        let book = form.build_book();
        self.book_repository.create(&BookEntity::from(&book)).await?;
        info!("{} added '{}' with {} copies", identity.username, book.title, book.total_quantity);
        self.events_publisher.publish(&DomainEvent::added(
            "books", "books", book.book_id.as_str(), &HashMap::new(), &book)?).await?;
        Ok(book)
    }

    async fn update_book(&self, identity: &Identity, id: &str, form: &BookForm) -> LibraryResult<BookDto> {
        identity.require_staff()?;
        let form = self.checked_form(form, Some(id)).await?;
        let updated = self.book_repository.update_stock(
            id, &move |b: &mut BookEntity| apply_form(b, &form)).await?;
        let book = BookDto::from(&updated);
        self.events_publisher.publish(&DomainEvent::updated(
            "books", "books", id, &HashMap::new(), &book)?).await?;
        Ok(book)
    }

    async fn confirm_remove_book(&self, identity: &Identity, id: &str) -> LibraryResult<BookDto> {
        identity.require_staff()?;
        self.find_book_by_id(id).await
    }

    async fn remove_book(&self, identity: &Identity, id: &str) -> LibraryResult<BookDto> {
        identity.require_staff()?;
        let book = self.book_repository.get(id).await?;
        let removed = self.transaction_repository.delete_by_book(id).await?;
        self.book_repository.delete(id).await?;
        info!("{} deleted '{}' and {} transactions", identity.username, book.title, removed);
        let dto = BookDto::from(&book);
        let metadata = HashMap::from([("transactions".to_string(), removed.to_string())]);
        self.events_publisher.publish(&DomainEvent::deleted(
            "books", "books", id, &metadata, &dto)?).await?;
        Ok(dto)
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn search_books(&self, query: Option<&str>) -> LibraryResult<Vec<BookDto>> {
        let books = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => self.book_repository.search_by_title(q).await?,
            None => self.book_repository.find_all().await?,
        };
        Ok(books.iter().map(BookDto::from).collect())
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            version: other.version,
            title: other.title.to_string(),
            subtitle: other.subtitle.to_string(),
            authors: other.authors.to_string(),
            isbn: other.isbn.clone(),
            publisher: other.publisher.to_string(),
            category_id: other.category_id.clone(),
            description: other.description.to_string(),
            total_quantity: other.total_quantity,
            available_quantity: other.available_quantity,
            price: other.price,
            cover_image: other.cover_image.clone(),
            added_at: other.added_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            version: other.version,
            title: other.title.to_string(),
            subtitle: other.subtitle.to_string(),
            authors: other.authors.to_string(),
            isbn: other.isbn.clone(),
            publisher: other.publisher.to_string(),
            category_id: other.category_id.clone(),
            description: other.description.to_string(),
            total_quantity: other.total_quantity,
            available_quantity: other.available_quantity,
            price: other.price,
            cover_image: other.cover_image.clone(),
            added_at: other.added_at,
            updated_at: other.updated_at,
        }
    }
}
