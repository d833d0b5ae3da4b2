use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::STAFF_DASHBOARD_PATH;
use crate::core::domain::Identity;

pub(crate) struct RemoveBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl RemoveBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RemoveBookCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) book_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveBookCommandResponse {
    pub book: BookDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        let book = self.catalog_service.remove_book(&req.identity, req.book_id.as_str()).await
            .map_err(CommandError::from)?;
        Ok(RemoveBookCommandResponse {
            notice: Notice::success(format!("Book '{}' deleted successfully.", book.title).as_str()),
            redirect: STAFF_DASHBOARD_PATH.to_string(),
            book,
        })
    }
}
