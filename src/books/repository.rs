pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

// StockChange mutates the counters of a freshly read book; it may run more than once
pub(crate) type StockChange = dyn Fn(&mut BookEntity) -> LibraryResult<()> + Send + Sync;

#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // applies `change` atomically against concurrent writers and returns the stored book
    async fn update_stock(&self, book_id: &str, change: &StockChange) -> LibraryResult<BookEntity>;

    // detaches the book from its category without touching the counters
    async fn clear_category(&self, book_id: &str) -> LibraryResult<BookEntity>;

    // all books ordered by title
    async fn find_all(&self) -> LibraryResult<Vec<BookEntity>>;

    // case-insensitive title substring, ordered by title
    async fn search_by_title(&self, query: &str) -> LibraryResult<Vec<BookEntity>>;

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>>;

    async fn find_by_natural_key(&self, title: &str, authors: &str, publisher: &str) -> LibraryResult<Option<BookEntity>>;

    async fn find_by_category(&self, category_id: &str) -> LibraryResult<Vec<BookEntity>>;
}

pub(crate) fn sort_by_title(mut books: Vec<BookEntity>) -> Vec<BookEntity> {
    books.sort_by(|a, b| {
        a.title.to_lowercase().cmp(&b.title.to_lowercase()).then_with(|| a.book_id.cmp(&b.book_id))
    });
    books
}
