use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) const BOOKS_TABLE: &str = "books";

pub(crate) async fn create_book_repository(store: RepositoryStore) -> LibraryResult<Box<dyn BookRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBBookRepository::new(client, BOOKS_TABLE, "book_id", None)))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, BOOKS_TABLE, "book_id", None, None).await;
            Ok(Box::new(DDBBookRepository::new(client, BOOKS_TABLE, "book_id", None)))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryBookRepository::new(BOOKS_TABLE)))
        }
    }
}
