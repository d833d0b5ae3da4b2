use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::MY_BOOKS_PATH;
use crate::core::domain::Identity;
use crate::ledger::domain::LedgerService;
use crate::ledger::dto::TransactionDto;

pub(crate) struct ReturnBookCommand {
    ledger_service: Box<dyn LedgerService>,
}

impl ReturnBookCommand {
    pub(crate) fn new(ledger_service: Box<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ReturnBookCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) transaction_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReturnBookCommandResponse {
    pub transaction: TransactionDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<ReturnBookCommandRequest, ReturnBookCommandResponse> for ReturnBookCommand {
    async fn execute(&self, req: ReturnBookCommandRequest) -> Result<ReturnBookCommandResponse, CommandError> {
        let outcome = self.ledger_service.return_book(&req.identity, req.transaction_id.as_str()).await
            .map_err(CommandError::from)?;
        let title = outcome.transaction.book_title.as_str();
        let notice = if outcome.already_returned {
            Notice::info(format!("'{}' is already returned.", title).as_str())
        } else {
            Notice::success(format!("You have successfully returned '{}'.", title).as_str())
        };
        Ok(ReturnBookCommandResponse {
            transaction: outcome.transaction,
            notice,
            redirect: MY_BOOKS_PATH.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::books::factory::create_book_repository;
    use crate::core::command::{Command, NoticeLevel};
    use crate::core::domain::{Configuration, Identity};
    use crate::core::library::Role;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::ledger::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest};
    use crate::ledger::factory;

    #[tokio::test]
    async fn test_should_report_repeated_return() {
        let config = Configuration::new("test");
        let svc = factory::create_ledger_service(&config, RepositoryStore::InMemory).await
            .expect("should create ledger service");
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let book = BookEntity::new("Persuasion", "Jane Austen", 1);
        books.create(&book).await.expect("should create book");
        let identity = Identity::new(820_001, "returner", "", Role::User);
        let tx = svc.issue_book(&identity, book.book_id.as_str()).await.expect("should issue");

        let cmd = ReturnBookCommand::new(svc);
        let first = cmd.execute(ReturnBookCommandRequest {
            identity: identity.clone(), transaction_id: tx.transaction_id.clone() }).await.expect("should return");
        assert_eq!(NoticeLevel::Success, first.notice.level);
        assert_eq!("You have successfully returned 'Persuasion'.", first.notice.message.as_str());

        let second = cmd.execute(ReturnBookCommandRequest {
            identity, transaction_id: tx.transaction_id.clone() }).await.expect("should report");
        assert_eq!(NoticeLevel::Info, second.notice.level);
        assert_eq!("'Persuasion' is already returned.", second.notice.message.as_str());
        assert_eq!("/my-books/", second.redirect.as_str());
    }
}
