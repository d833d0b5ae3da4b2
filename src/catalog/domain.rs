pub mod service;

use async_trait::async_trait;
use crate::books::dto::{BookDto, BookForm};
use crate::core::domain::Identity;
use crate::core::library::LibraryResult;

// CatalogService is the staff-facing book store plus the browse and detail views that every
// signed-in user gets.
#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    // blank form for a new book, or the current values of an existing one
    async fn book_form(&self, identity: &Identity, id: Option<&str>) -> LibraryResult<BookForm>;
    async fn add_book(&self, identity: &Identity, form: &BookForm) -> LibraryResult<BookDto>;
    async fn update_book(&self, identity: &Identity, id: &str, form: &BookForm) -> LibraryResult<BookDto>;
    // the book as it will be deleted, for the confirmation step
    async fn confirm_remove_book(&self, identity: &Identity, id: &str) -> LibraryResult<BookDto>;
    async fn remove_book(&self, identity: &Identity, id: &str) -> LibraryResult<BookDto>;
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto>;
    async fn search_books(&self, query: Option<&str>) -> LibraryResult<Vec<BookDto>>;
}
