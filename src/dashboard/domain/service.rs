use async_trait::async_trait;
use tracing::debug;
use crate::accounts::dto::AccountDto;
use crate::accounts::repository::AccountRepository;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::core::domain::{Configuration, Identity};
use crate::core::library::LibraryResult;
use crate::dashboard::domain::DashboardService;
use crate::dashboard::dto::DashboardDto;
use crate::ledger::dto::TransactionDto;
use crate::ledger::repository::TransactionRepository;

pub(crate) struct DashboardServiceImpl {
    book_repository: Box<dyn BookRepository>,
    account_repository: Box<dyn AccountRepository>,
    transaction_repository: Box<dyn TransactionRepository>,
}

impl DashboardServiceImpl {
    pub(crate) fn new(_config: &Configuration,
                      book_repository: Box<dyn BookRepository>,
                      account_repository: Box<dyn AccountRepository>,
                      transaction_repository: Box<dyn TransactionRepository>) -> Self {
        Self {
            book_repository,
            account_repository,
            transaction_repository,
        }
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    async fn overview(&self, identity: &Identity) -> LibraryResult<DashboardDto> {
        identity.require_staff()?;
        let books = self.book_repository.find_all().await?;
        let accounts = self.account_repository.find_all().await?;
        let transactions = self.transaction_repository.find_all().await?;
        debug!("dashboard for {}: {} books {} accounts {} transactions",
            identity.username, books.len(), accounts.len(), transactions.len());
        Ok(DashboardDto::new(
            books.iter().map(BookDto::from).collect(),
            accounts.iter().map(AccountDto::from).collect(),
            transactions.iter().map(TransactionDto::from).collect()))
    }
}
