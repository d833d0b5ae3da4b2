use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::MY_BOOKS_PATH;
use crate::core::domain::Identity;
use crate::ledger::domain::LedgerService;
use crate::ledger::dto::TransactionDto;

pub(crate) struct IssueBookCommand {
    ledger_service: Box<dyn LedgerService>,
}

impl IssueBookCommand {
    pub(crate) fn new(ledger_service: Box<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct IssueBookCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) book_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct IssueBookCommandResponse {
    pub transaction: TransactionDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<IssueBookCommandRequest, IssueBookCommandResponse> for IssueBookCommand {
    async fn execute(&self, req: IssueBookCommandRequest) -> Result<IssueBookCommandResponse, CommandError> {
        let transaction = self.ledger_service.issue_book(&req.identity, req.book_id.as_str()).await
            .map_err(CommandError::from)?;
        Ok(IssueBookCommandResponse {
            notice: Notice::success(format!("You have successfully issued '{}'.", transaction.book_title).as_str()),
            redirect: MY_BOOKS_PATH.to_string(),
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::books::domain::model::BookEntity;
    use crate::books::factory::create_book_repository;
    use crate::core::command::{Command, CommandError, NoticeLevel};
    use crate::core::domain::{Configuration, Identity};
    use crate::core::library::Role;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::ledger::command::issue_book_cmd::{IssueBookCommand, IssueBookCommandRequest};
    use crate::ledger::factory;

    lazy_static! {
        static ref SUT_CMD: AsyncOnce<IssueBookCommand> = AsyncOnce::new(async {
                let svc = factory::create_ledger_service(&Configuration::new("test"), RepositoryStore::InMemory).await
                    .expect("should create ledger service");
                IssueBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_issue_book() {
        let cmd = SUT_CMD.get().await;
        let books = create_book_repository(RepositoryStore::InMemory).await.expect("should create book repository");
        let book = BookEntity::new("Middlemarch", "George Eliot", 1);
        books.create(&book).await.expect("should create book");
        let identity = Identity::new(810_001, "issuer", "", Role::User);

        let res = cmd.execute(IssueBookCommandRequest { identity: identity.clone(), book_id: book.book_id.clone() })
            .await.expect("should issue");
        assert_eq!(NoticeLevel::Success, res.notice.level);
        assert_eq!("You have successfully issued 'Middlemarch'.", res.notice.message.as_str());
        assert_eq!("/my-books/", res.redirect.as_str());

        let again = cmd.execute(IssueBookCommandRequest { identity, book_id: book.book_id.clone() }).await;
        assert!(matches!(again, Err(CommandError::InsufficientStock { .. })));
    }
}
