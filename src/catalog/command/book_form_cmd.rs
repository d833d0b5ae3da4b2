use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookForm;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::domain::Identity;

pub(crate) struct BookFormCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl BookFormCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct BookFormCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) book_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookFormCommandResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    pub form: BookForm,
}

#[async_trait]
impl Command<BookFormCommandRequest, BookFormCommandResponse> for BookFormCommand {
    async fn execute(&self, req: BookFormCommandRequest) -> Result<BookFormCommandResponse, CommandError> {
        let form = self.catalog_service.book_form(&req.identity, req.book_id.as_deref()).await
            .map_err(CommandError::from)?;
        Ok(BookFormCommandResponse { book_id: req.book_id, form })
    }
}
