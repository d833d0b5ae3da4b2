use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::{BookDto, BookForm};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::STAFF_DASHBOARD_PATH;
use crate::core::domain::Identity;

pub(crate) struct UpdateBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UpdateBookCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) book_id: String,
    pub(crate) form: BookForm,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub book: BookDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let book = self.catalog_service.update_book(&req.identity, req.book_id.as_str(), &req.form).await
            .map_err(CommandError::from)?;
        Ok(UpdateBookCommandResponse {
            notice: Notice::success(format!("Book '{}' updated successfully.", book.title).as_str()),
            redirect: STAFF_DASHBOARD_PATH.to_string(),
            book,
        })
    }
}
