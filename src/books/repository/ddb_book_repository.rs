use std::collections::HashMap;

use async_trait::async_trait;

use crate::books::domain::model::BookEntity;
use crate::books::repository::{BookRepository, sort_by_title, StockChange};
use crate::core::library::LibraryResult;
use crate::utils::ddb_repository::DDBRepository;

pub(crate) type DDBBookRepository = DDBRepository<BookEntity>;

#[async_trait]
impl BookRepository for DDBRepository<BookEntity> {
    async fn update_stock(&self, book_id: &str, change: &StockChange) -> LibraryResult<BookEntity> {
        self.update_with(book_id, change).await
    }

    async fn clear_category(&self, book_id: &str) -> LibraryResult<BookEntity> {
        self.update_with(book_id, |b: &mut BookEntity| {
            b.category_id = None;
            Ok(())
        }).await
    }

    async fn find_all(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(sort_by_title(self.scan_all(&HashMap::new()).await?))
    }

    // DynamoDB `contains` is case-sensitive, so the title match happens here
    async fn search_by_title(&self, query: &str) -> LibraryResult<Vec<BookEntity>> {
        let books = self.scan_all(&HashMap::new()).await?;
        Ok(sort_by_title(books.into_iter().filter(|b| b.matches_title(query)).collect()))
    }

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        let predicate = HashMap::from([("isbn".to_string(), isbn.to_string())]);
        Ok(self.scan_all(&predicate).await?.into_iter().next())
    }

    async fn find_by_natural_key(&self, title: &str, authors: &str, publisher: &str) -> LibraryResult<Option<BookEntity>> {
        let predicate = HashMap::from([
            ("title".to_string(), title.to_string()),
            ("authors".to_string(), authors.to_string()),
            ("publisher".to_string(), publisher.to_string()),
        ]);
        Ok(self.scan_all(&predicate).await?.into_iter().next())
    }

    async fn find_by_category(&self, category_id: &str) -> LibraryResult<Vec<BookEntity>> {
        let predicate = HashMap::from([("category_id".to_string(), category_id.to_string())]);
        Ok(sort_by_title(self.scan_all(&predicate).await?))
    }
}
