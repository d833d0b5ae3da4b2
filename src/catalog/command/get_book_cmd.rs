use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::Book;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl GetBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) book_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    pub book: BookDto,
    pub available: bool,
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        let book = self.catalog_service.find_book_by_id(req.book_id.as_str()).await.map_err(CommandError::from)?;
        Ok(GetBookCommandResponse { available: book.is_available(), book })
    }
}
