use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::domain::Identity;

pub(crate) struct ConfirmRemoveBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl ConfirmRemoveBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ConfirmRemoveBookCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) book_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfirmRemoveBookCommandResponse {
    pub book: BookDto,
    pub notice: Notice,
}

#[async_trait]
impl Command<ConfirmRemoveBookCommandRequest, ConfirmRemoveBookCommandResponse> for ConfirmRemoveBookCommand {
    async fn execute(&self, req: ConfirmRemoveBookCommandRequest) -> Result<ConfirmRemoveBookCommandResponse, CommandError> {
        let book = self.catalog_service.confirm_remove_book(&req.identity, req.book_id.as_str()).await
            .map_err(CommandError::from)?;
        Ok(ConfirmRemoveBookCommandResponse {
            notice: Notice::warning(format!("Are you sure you want to delete '{}'?", book.title).as_str()),
            book,
        })
    }
}
