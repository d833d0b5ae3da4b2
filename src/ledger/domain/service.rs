use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::{Configuration, Identity, ReturnStockPolicy};
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::events::EventPublisher;
use crate::ledger::domain::LedgerService;
use crate::ledger::domain::model::TransactionEntity;
use crate::ledger::dto::{ReturnOutcome, TransactionDto};
use crate::ledger::repository::TransactionRepository;
use crate::members::repository::MemberRepository;

pub(crate) struct LedgerServiceImpl {
    loan_days: i64,
    issue_quantity: i64,
    return_policy: ReturnStockPolicy,
    transaction_repository: Box<dyn TransactionRepository>,
    book_repository: Box<dyn BookRepository>,
    member_repository: Box<dyn MemberRepository>,
    events_publisher: Box<dyn EventPublisher>,
}

impl LedgerServiceImpl {
    pub(crate) fn new(config: &Configuration,
                      transaction_repository: Box<dyn TransactionRepository>,
                      book_repository: Box<dyn BookRepository>,
                      member_repository: Box<dyn MemberRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            loan_days: config.book_loan_days,
            issue_quantity: config.issue_quantity,
            return_policy: config.return_policy,
            transaction_repository,
            book_repository,
            member_repository,
            events_publisher,
        }
    }

    // The row is already written when this runs, so a failed publish is logged and the
    // caller still gets its result.
    async fn record(&self, event: DomainEvent) {
        if let Err(err) = self.events_publisher.publish(&event).await {
            warn!("failed to publish {} for {}: {}", event.name, event.key, err);
        }
    }

    fn metadata(transaction: &TransactionEntity) -> HashMap<String, String> {
        HashMap::from([
            ("book_id".to_string(), transaction.book_id.to_string()),
            ("member_id".to_string(), transaction.member_id.to_string()),
            ("quantity".to_string(), transaction.quantity.to_string()),
        ])
    }
}

#[async_trait]
impl LedgerService for LedgerServiceImpl {
    async fn issue_book(&self, identity: &Identity, book_id: &str) -> LibraryResult<TransactionDto> {
        let book = self.book_repository.get(book_id).await?;
        let member = self.member_repository.get_or_create(identity.user_id).await?;
        if !member.active {
            return Err(LibraryError::not_granted(
                format!("membership {} is not active", member.member_id).as_str(), None));
        }
        let quantity = self.issue_quantity;
        let reserved = self.book_repository.update_stock(
            book.book_id.as_str(), &move |b: &mut BookEntity| b.issue_copies(quantity)).await?;

        let transaction = TransactionEntity::issue(member.member_id.as_str(), &reserved, quantity, self.loan_days);
        if let Err(err) = self.transaction_repository.create(&transaction).await {
            warn!("releasing {} copies of {} after failed issue: {}", quantity, reserved.book_id, err);
            if let Err(release_err) = self.book_repository.update_stock(
                reserved.book_id.as_str(),
                &move |b: &mut BookEntity| b.restore_copies(quantity, ReturnStockPolicy::Clamp).map(|_| ())).await {
                error!("could not release {} copies of {}: {}", quantity, reserved.book_id, release_err);
            }
            return Err(err);
        }
        info!("issued {} x '{}' to {}, {} left", quantity, reserved.title, member.member_id, reserved.available_quantity);
        let dto = TransactionDto::from(&transaction);
        self.record(DomainEvent::added("book_issued", "ledger", transaction.transaction_id.as_str(),
                                       &Self::metadata(&transaction), &dto)?).await;
        Ok(dto)
    }

    async fn return_book(&self, identity: &Identity, transaction_id: &str) -> LibraryResult<ReturnOutcome> {
        let not_found = || LibraryError::not_found(format!("no transaction {} for {}", transaction_id, identity.username).as_str());
        let member = self.member_repository.find_by_user_id(identity.user_id).await?.ok_or_else(not_found)?;
        let transaction = match self.transaction_repository.get(transaction_id).await {
            Ok(transaction) if transaction.member_id == member.member_id => transaction,
            Ok(_) | Err(LibraryError::NotFound { .. }) => return Err(not_found()),
            Err(err) => return Err(err),
        };
        if !transaction.is_open() {
            return Ok(ReturnOutcome { transaction: TransactionDto::from(&transaction), already_returned: true });
        }
        let closed = match self.transaction_repository.mark_returned(transaction_id, Utc::now().naive_utc()).await? {
            Some(closed) => closed,
            None => {
                let current = self.transaction_repository.get(transaction_id).await?;
                return Ok(ReturnOutcome { transaction: TransactionDto::from(&current), already_returned: true });
            }
        };

        let quantity = closed.quantity;
        let policy = self.return_policy;
        let drift = Arc::new(AtomicI64::new(0));
        let absorbed = drift.clone();
        let restored = self.book_repository.update_stock(
            closed.book_id.as_str(),
            &move |b: &mut BookEntity| {
                absorbed.store(b.restore_copies(quantity, policy)?, Ordering::Relaxed);
                Ok(())
            }).await;
        let book = match restored {
            Ok(book) => book,
            Err(err) => {
                let mut reopened = closed.clone();
                reopened.reopen();
                self.transaction_repository.update(&reopened).await?;
                return Err(err);
            }
        };
        let drift = drift.load(Ordering::Relaxed);
        if drift > 0 {
            warn!("stock of '{}' clamped at {}, dropped {} copies", book.title, book.total_quantity, drift);
        }
        info!("returned {} x '{}' from {}, {} available", quantity, book.title, member.member_id, book.available_quantity);
        let dto = TransactionDto::from(&closed);
        self.record(DomainEvent::updated("book_returned", "ledger", transaction_id,
                                         &Self::metadata(&closed), &dto)?).await;
        Ok(ReturnOutcome { transaction: dto, already_returned: false })
    }

    async fn my_books(&self, identity: &Identity) -> LibraryResult<Option<Vec<TransactionDto>>> {
        let member = match self.member_repository.find_by_user_id(identity.user_id).await? {
            Some(member) => member,
            None => return Ok(None),
        };
        let transactions = self.transaction_repository.find_by_member(member.member_id.as_str()).await?;
        Ok(Some(transactions.iter().map(TransactionDto::from).collect()))
    }

    async fn find_transactions(&self) -> LibraryResult<Vec<TransactionDto>> {
        let transactions = self.transaction_repository.find_all().await?;
        Ok(transactions.iter().map(TransactionDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_once::AsyncOnce;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use lazy_static::lazy_static;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use crate::books::repository::{BookRepository, StockChange};
    use crate::core::library::{LibraryResult, PaginatedResult};
    use crate::gateway::factory::create_publisher;
    use crate::gateway::GatewayPublisherVia;
    use crate::ledger::domain::model::TransactionEntity;
    use crate::ledger::domain::service::LedgerServiceImpl;
    use crate::ledger::factory::create_transaction_repository;
    use crate::ledger::repository::TransactionRepository;
    use crate::members::factory::create_member_repository;
    use crate::books::domain::model::BookEntity;
    use crate::books::factory::create_book_repository;
    use crate::core::domain::{Configuration, Identity, ReturnStockPolicy};
    use crate::core::library::{LibraryError, Role, TransactionType};
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::ledger::domain::LedgerService;
    use crate::ledger::factory;
    use crate::utils::memory::next_sequence;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn LedgerService>> = AsyncOnce::new(async {
                factory::create_ledger_service(&Configuration::new("test"), RepositoryStore::InMemory).await
                    .expect("should create ledger service")
            });
    }

    fn reader() -> Identity {
        let user_id = 700_000 + next_sequence("test_ledger_readers");
        Identity::new(user_id, format!("reader{}", user_id).as_str(), "", Role::User)
    }

    async fn shelve(title: &str, total: i64) -> BookEntity {
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let book = BookEntity::new(title, "Anonymous", total);
        books.create(&book).await.expect("should create book");
        book
    }

    async fn available(book_id: &str) -> i64 {
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        books.get(book_id).await.expect("should get book").available_quantity
    }

    #[tokio::test]
    async fn test_should_issue_until_out_of_stock() {
        let svc = SUT_SVC.get().await;
        let user = reader();
        let book = shelve("Three Copies", 3).await;
        let mut issued = vec![];
        for _ in 0..3 {
            issued.push(svc.issue_book(&user, book.book_id.as_str()).await.expect("should issue"));
        }
        assert_eq!(0, available(book.book_id.as_str()).await);

        let fourth = svc.issue_book(&user, book.book_id.as_str()).await;
        assert!(matches!(fourth, Err(LibraryError::InsufficientStock { available: 0, requested: 1, .. })));
        assert_eq!(0, available(book.book_id.as_str()).await);

        let outcome = svc.return_book(&user, issued[0].transaction_id.as_str()).await.expect("should return");
        assert!(!outcome.already_returned);
        assert_eq!(TransactionType::Return, outcome.transaction.transaction_type);
        assert_eq!(1, available(book.book_id.as_str()).await);
    }

    #[tokio::test]
    async fn test_should_refuse_empty_shelf() {
        let svc = SUT_SVC.get().await;
        let user = reader();
        let book = shelve("Nothing Left", 0).await;
        match svc.issue_book(&user, book.book_id.as_str()).await {
            Err(LibraryError::InsufficientStock { message, .. }) => {
                assert_eq!("Cannot issue 'Nothing Left': Out of stock.", message.as_str());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(0, available(book.book_id.as_str()).await);
        let history = svc.my_books(&user).await.expect("should load history").expect("member should exist");
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_should_return_once() {
        let svc = SUT_SVC.get().await;
        let user = reader();
        let book = shelve("Return Twice", 2).await;
        let tx = svc.issue_book(&user, book.book_id.as_str()).await.expect("should issue");
        assert_eq!(1, available(book.book_id.as_str()).await);
        assert!(tx.due_date.is_some());

        let first = svc.return_book(&user, tx.transaction_id.as_str()).await.expect("should return");
        assert!(!first.already_returned);
        assert_eq!(2, available(book.book_id.as_str()).await);

        let second = svc.return_book(&user, tx.transaction_id.as_str()).await.expect("second return should not fail");
        assert!(second.already_returned);
        assert_eq!(2, available(book.book_id.as_str()).await);
    }

    #[tokio::test]
    async fn test_should_hide_other_members_loans() {
        let svc = SUT_SVC.get().await;
        let owner = reader();
        let other = reader();
        let book = shelve("Not Yours", 1).await;
        let tx = svc.issue_book(&owner, book.book_id.as_str()).await.expect("should issue");
        svc.issue_book(&other, shelve("Other Book", 1).await.book_id.as_str()).await.expect("should issue");

        let res = svc.return_book(&other, tx.transaction_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        assert_eq!(0, available(book.book_id.as_str()).await);
        assert!(matches!(svc.return_book(&reader(), tx.transaction_id.as_str()).await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_list_my_books_newest_first() {
        let svc = SUT_SVC.get().await;
        let user = reader();
        assert_eq!(None, svc.my_books(&user).await.expect("should load history"));
        let first = svc.issue_book(&user, shelve("First Loan", 1).await.book_id.as_str()).await.expect("should issue");
        let second = svc.issue_book(&user, shelve("Second Loan", 1).await.book_id.as_str()).await.expect("should issue");
        let history = svc.my_books(&user).await.expect("should load history").expect("member should exist");
        assert_eq!(2, history.len());
        assert_eq!(second.transaction_id, history[0].transaction_id);
        assert_eq!(first.transaction_id, history[1].transaction_id);
        let all = svc.find_transactions().await.expect("should list all");
        assert!(all.iter().any(|t| t.transaction_id == first.transaction_id));
    }

    #[tokio::test]
    async fn test_should_issue_missing_book_as_not_found() {
        let svc = SUT_SVC.get().await;
        let res = svc.issue_book(&reader(), "no-such-book").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_over_return_when_strict() {
        let mut config = Configuration::new("test");
        config.return_policy = ReturnStockPolicy::Strict;
        let svc = factory::create_ledger_service(&config, RepositoryStore::InMemory).await
            .expect("should create ledger service");
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let user = reader();
        let book = shelve("Drifted", 1).await;
        let tx = svc.issue_book(&user, book.book_id.as_str()).await.expect("should issue");
        // a staff edit put the copy back on the shelf while it was still on loan
        books.update_stock(book.book_id.as_str(), &|b: &mut BookEntity| b.adjust_stock(1)).await.expect("should adjust");

        let res = svc.return_book(&user, tx.transaction_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
        assert_eq!(1, available(book.book_id.as_str()).await);
        let history = svc.my_books(&user).await.expect("should load history").expect("member should exist");
        assert_eq!(TransactionType::Issue, history[0].transaction_type);
    }

    #[tokio::test]
    async fn test_should_clamp_over_return_by_default() {
        let svc = SUT_SVC.get().await;
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let user = reader();
        let book = shelve("Clamped", 1).await;
        let tx = svc.issue_book(&user, book.book_id.as_str()).await.expect("should issue");
        books.update_stock(book.book_id.as_str(), &|b: &mut BookEntity| b.adjust_stock(1)).await.expect("should adjust");

        let outcome = svc.return_book(&user, tx.transaction_id.as_str()).await.expect("should return");
        assert!(!outcome.already_returned);
        assert_eq!(1, available(book.book_id.as_str()).await);
    }

    #[tokio::test]
    async fn test_should_hold_stock_bounds_across_random_loans() {
        let svc = SUT_SVC.get().await;
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let readers = [reader(), reader(), reader()];
        let book = shelve("Busy Shelf", 4).await;
        let mut rng = StdRng::seed_from_u64(4_242);
        let mut open: Vec<(usize, String)> = vec![];
        for _ in 0..120 {
            if open.is_empty() || rng.gen_bool(0.55) {
                let who = rng.gen_range(0..readers.len());
                match svc.issue_book(&readers[who], book.book_id.as_str()).await {
                    Ok(tx) => open.push((who, tx.transaction_id)),
                    Err(LibraryError::InsufficientStock { .. }) => assert_eq!(4, open.len()),
                    Err(other) => panic!("unexpected {:?}", other),
                }
            } else {
                let (who, transaction_id) = open.swap_remove(rng.gen_range(0..open.len()));
                let outcome = svc.return_book(&readers[who], transaction_id.as_str()).await.expect("should return");
                assert!(!outcome.already_returned);
            }
            let stored = books.get(book.book_id.as_str()).await.expect("should get book");
            assert!(stored.available_quantity >= 0 && stored.available_quantity <= stored.total_quantity);
            assert_eq!(open.len() as i64, stored.on_loan());
        }
    }

    // transactions that cannot be written
    struct ReadOnlyTransactions {
        inner: Box<dyn TransactionRepository>,
    }

    #[async_trait]
    impl Repository<TransactionEntity> for ReadOnlyTransactions {
        async fn create(&self, _entity: &TransactionEntity) -> LibraryResult<usize> {
            Err(LibraryError::database("transactions table is read only", None, false))
        }

        async fn update(&self, entity: &TransactionEntity) -> LibraryResult<usize> {
            self.inner.update(entity).await
        }

        async fn get(&self, id: &str) -> LibraryResult<TransactionEntity> {
            self.inner.get(id).await
        }

        async fn delete(&self, id: &str) -> LibraryResult<usize> {
            self.inner.delete(id).await
        }

        async fn query(&self, predicate: &HashMap<String, String>,
                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<TransactionEntity>> {
            self.inner.query(predicate, page, page_size).await
        }
    }

    #[async_trait]
    impl TransactionRepository for ReadOnlyTransactions {
        async fn mark_returned(&self, transaction_id: &str, return_date: NaiveDateTime) -> LibraryResult<Option<TransactionEntity>> {
            self.inner.mark_returned(transaction_id, return_date).await
        }

        async fn find_by_member(&self, member_id: &str) -> LibraryResult<Vec<TransactionEntity>> {
            self.inner.find_by_member(member_id).await
        }

        async fn find_all(&self) -> LibraryResult<Vec<TransactionEntity>> {
            self.inner.find_all().await
        }

        async fn delete_by_book(&self, book_id: &str) -> LibraryResult<usize> {
            self.inner.delete_by_book(book_id).await
        }
    }

    // books whose stock can be reserved once and then stops accepting changes
    struct OneShotStock {
        inner: Box<dyn BookRepository>,
        changes: AtomicUsize,
    }

    #[async_trait]
    impl Repository<BookEntity> for OneShotStock {
        async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
            self.inner.create(entity).await
        }

        async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
            self.inner.update(entity).await
        }

        async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
            self.inner.get(id).await
        }

        async fn delete(&self, id: &str) -> LibraryResult<usize> {
            self.inner.delete(id).await
        }

        async fn query(&self, predicate: &HashMap<String, String>,
                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
            self.inner.query(predicate, page, page_size).await
        }
    }

    #[async_trait]
    impl BookRepository for OneShotStock {
        async fn update_stock(&self, book_id: &str, change: &StockChange) -> LibraryResult<BookEntity> {
            if self.changes.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(LibraryError::unavailable("books table is throttled", None, true));
            }
            self.inner.update_stock(book_id, change).await
        }

        async fn clear_category(&self, book_id: &str) -> LibraryResult<BookEntity> {
            self.inner.clear_category(book_id).await
        }

        async fn find_all(&self) -> LibraryResult<Vec<BookEntity>> {
            self.inner.find_all().await
        }

        async fn search_by_title(&self, query: &str) -> LibraryResult<Vec<BookEntity>> {
            self.inner.search_by_title(query).await
        }

        async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
            self.inner.find_by_isbn(isbn).await
        }

        async fn find_by_natural_key(&self, title: &str, authors: &str, publisher: &str) -> LibraryResult<Option<BookEntity>> {
            self.inner.find_by_natural_key(title, authors, publisher).await
        }

        async fn find_by_category(&self, category_id: &str) -> LibraryResult<Vec<BookEntity>> {
            self.inner.find_by_category(category_id).await
        }
    }

    async fn failing_ledger(release_fails: bool) -> LedgerServiceImpl {
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let books: Box<dyn BookRepository> = if release_fails {
            Box::new(OneShotStock { inner: books, changes: AtomicUsize::new(0) })
        } else {
            books
        };
        let transactions = create_transaction_repository(RepositoryStore::InMemory).await
            .expect("should create transaction repository");
        LedgerServiceImpl::new(
            &Configuration::new("test"),
            Box::new(ReadOnlyTransactions { inner: transactions }),
            books,
            create_member_repository(RepositoryStore::InMemory).await.expect("should create member repository"),
            create_publisher(GatewayPublisherVia::InMemory).await.expect("should create publisher"))
    }

    #[tokio::test]
    async fn test_should_release_stock_when_loan_is_not_recorded() {
        let svc = failing_ledger(false).await;
        let book = shelve("Unrecorded", 2).await;
        let res = svc.issue_book(&reader(), book.book_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::Database { .. })));
        assert_eq!(2, available(book.book_id.as_str()).await);
    }

    #[tokio::test]
    async fn test_should_report_original_error_when_release_fails() {
        let svc = failing_ledger(true).await;
        let book = shelve("Stuck Reservation", 2).await;
        match svc.issue_book(&reader(), book.book_id.as_str()).await {
            Err(LibraryError::Database { message, .. }) => {
                assert_eq!("transactions table is read only", message.as_str());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(1, available(book.book_id.as_str()).await);
    }
}
