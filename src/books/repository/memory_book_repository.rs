use async_trait::async_trait;

use crate::books::domain::model::BookEntity;
use crate::books::repository::{BookRepository, sort_by_title, StockChange};
use crate::core::library::LibraryResult;
use crate::utils::memory::MemoryRepository;

pub(crate) type MemoryBookRepository = MemoryRepository<BookEntity>;

#[async_trait]
impl BookRepository for MemoryRepository<BookEntity> {
    async fn update_stock(&self, book_id: &str, change: &StockChange) -> LibraryResult<BookEntity> {
        self.update_with(book_id, change)
    }

    async fn clear_category(&self, book_id: &str) -> LibraryResult<BookEntity> {
        self.update_with(book_id, |b: &mut BookEntity| {
            b.category_id = None;
            Ok(())
        })
    }

    async fn find_all(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(sort_by_title(self.scan()?))
    }

    async fn search_by_title(&self, query: &str) -> LibraryResult<Vec<BookEntity>> {
        Ok(sort_by_title(self.scan_where(|b| b.matches_title(query))?))
    }

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.scan_where(|b| b.isbn.as_deref() == Some(isbn))?.into_iter().next())
    }

    async fn find_by_natural_key(&self, title: &str, authors: &str, publisher: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.scan_where(|b| b.title == title && b.authors == authors && b.publisher == publisher)?
            .into_iter().next())
    }

    async fn find_by_category(&self, category_id: &str) -> LibraryResult<Vec<BookEntity>> {
        Ok(sort_by_title(self.scan_where(|b| b.category_id.as_deref() == Some(category_id))?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use uuid::Uuid;
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("Dune", "Frank Herbert", 3);
        assert_eq!(1, books_repo.create(&book).await.expect("should create book"));
        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(book, loaded);
    }

    #[tokio::test]
    async fn test_should_search_books_by_title() {
        let books_repo = MemoryBookRepository::new("books");
        let marker = Uuid::new_v4().to_string();
        for title in ["b", "A", "c"] {
            let book = BookEntity::new(format!("{} {}", title, marker).as_str(), "anon", 1);
            books_repo.create(&book).await.expect("should create book");
        }
        let found = books_repo.search_by_title(marker.to_uppercase().as_str()).await.expect("should search");
        let titles: Vec<String> = found.iter().map(|b| b.title.chars().take(1).collect()).collect();
        assert_eq!(vec!["A", "b", "c"], titles);
    }

    #[tokio::test]
    async fn test_should_find_by_keys() {
        let books_repo = MemoryBookRepository::new("books");
        let marker = Uuid::new_v4().to_string();
        let mut book = BookEntity::new(marker.as_str(), "Octavia Butler", 1);
        book.isbn = Some(marker.chars().take(13).collect());
        book.publisher = "Four Walls".to_string();
        book.category_id = Some(marker.clone());
        books_repo.create(&book).await.expect("should create book");
        let isbn: String = marker.chars().take(13).collect();
        assert!(books_repo.find_by_isbn(isbn.as_str()).await.expect("should find").is_some());
        assert!(books_repo.find_by_natural_key(marker.as_str(), "Octavia Butler", "Four Walls").await.expect("should find").is_some());
        assert!(books_repo.find_by_natural_key(marker.as_str(), "Octavia Butler", "").await.expect("should find").is_none());
        assert_eq!(1, books_repo.find_by_category(marker.as_str()).await.expect("should find").len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_issue_last_copy_once_under_contention() {
        let books_repo = Arc::new(MemoryBookRepository::new("books"));
        let book = BookEntity::new("Last Copy", "anon", 1);
        books_repo.create(&book).await.expect("should create book");
        let mut handles = vec![];
        for _ in 0..8 {
            let repo = books_repo.clone();
            let id = book.book_id.clone();
            handles.push(tokio::spawn(async move {
                repo.update_stock(id.as_str(), &|b| b.issue_copies(1)).await
            }));
        }
        let mut issued = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.expect("task should finish") {
                Ok(_) => issued += 1,
                Err(LibraryError::InsufficientStock { .. }) => refused += 1,
                Err(other) => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!((1, 7), (issued, refused));
        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(0, loaded.available_quantity);
    }
}
