use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::HOME_PATH;
use crate::core::domain::Identity;
use crate::ledger::domain::LedgerService;
use crate::ledger::dto::TransactionDto;

pub(crate) struct MyBooksCommand {
    ledger_service: Box<dyn LedgerService>,
}

impl MyBooksCommand {
    pub(crate) fn new(ledger_service: Box<dyn LedgerService>) -> Self {
        Self {
            ledger_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct MyBooksCommandRequest {
    pub(crate) identity: Identity,
}

#[derive(Debug, Serialize)]
pub(crate) struct MyBooksCommandResponse {
    pub transactions: Vec<TransactionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

#[async_trait]
impl Command<MyBooksCommandRequest, MyBooksCommandResponse> for MyBooksCommand {
    async fn execute(&self, req: MyBooksCommandRequest) -> Result<MyBooksCommandResponse, CommandError> {
        match self.ledger_service.my_books(&req.identity).await.map_err(CommandError::from)? {
            Some(transactions) => Ok(MyBooksCommandResponse { transactions, notice: None, redirect: None }),
            None => Ok(MyBooksCommandResponse {
                transactions: vec![],
                notice: Some(Notice::warning("You don't have any transactions yet.")),
                redirect: Some(HOME_PATH.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::{Command, NoticeLevel};
    use crate::core::domain::{Configuration, Identity};
    use crate::core::library::Role;
    use crate::core::repository::RepositoryStore;
    use crate::ledger::command::my_books_cmd::{MyBooksCommand, MyBooksCommandRequest};
    use crate::ledger::factory;

    #[tokio::test]
    async fn test_should_warn_without_member() {
        let svc = factory::create_ledger_service(&Configuration::new("test"), RepositoryStore::InMemory).await
            .expect("should create ledger service");
        let res = MyBooksCommand::new(svc).execute(MyBooksCommandRequest {
            identity: Identity::new(830_001, "newcomer", "", Role::Staff),
        }).await.expect("should run");
        assert!(res.transactions.is_empty());
        assert_eq!(Some(NoticeLevel::Warning), res.notice.map(|n| n.level));
        assert_eq!(Some("/".to_string()), res.redirect);
    }
}
