use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::{BookDto, BookForm};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::STAFF_DASHBOARD_PATH;
use crate::core::domain::Identity;

pub(crate) struct AddBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) form: BookForm,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub book: BookDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = self.catalog_service.add_book(&req.identity, &req.form).await.map_err(CommandError::from)?;
        Ok(AddBookCommandResponse {
            notice: Notice::success(format!("Book '{}' added successfully.", book.title).as_str()),
            redirect: STAFF_DASHBOARD_PATH.to_string(),
            book,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::books::dto::BookForm;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError, NoticeLevel};
    use crate::core::domain::{Configuration, Identity};
    use crate::core::library::Role;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref SUT_CMD: AsyncOnce<AddBookCommand> = AsyncOnce::new(async {
                let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::InMemory).await
                    .expect("should create catalog service");
                AddBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_add_book() {
        let cmd = SUT_CMD.get().await;
        let title = format!("Walden {}", Uuid::new_v4());
        let res = cmd.execute(AddBookCommandRequest {
            identity: Identity::new(1, "librarian", "", Role::Staff),
            form: BookForm::new(title.as_str(), "Henry David Thoreau", 2),
        }).await.expect("should add book");
        assert_eq!(NoticeLevel::Success, res.notice.level);
        assert_eq!(format!("Book '{}' added successfully.", title), res.notice.message);
        assert_eq!("/staff-dashboard/", res.redirect.as_str());
    }

    #[tokio::test]
    async fn test_should_deny_reader() {
        let cmd = SUT_CMD.get().await;
        let res = cmd.execute(AddBookCommandRequest {
            identity: Identity::new(2, "reader", "", Role::User),
            form: BookForm::new("Forbidden", "Nobody", 1),
        }).await;
        assert!(matches!(res, Err(CommandError::Access { .. })));
    }
}
