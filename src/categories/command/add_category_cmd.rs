use async_trait::async_trait;
use serde::Serialize;
use crate::categories::domain::CategoryService;
use crate::categories::dto::{CategoryDto, CategoryForm};
use crate::core::command::{Command, CommandError, Notice};
use crate::core::domain::Identity;

pub(crate) struct AddCategoryCommand {
    category_service: Box<dyn CategoryService>,
}

impl AddCategoryCommand {
    pub(crate) fn new(category_service: Box<dyn CategoryService>) -> Self {
        Self {
            category_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct AddCategoryCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) form: CategoryForm,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddCategoryCommandResponse {
    pub category: CategoryDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<AddCategoryCommandRequest, AddCategoryCommandResponse> for AddCategoryCommand {
    async fn execute(&self, req: AddCategoryCommandRequest) -> Result<AddCategoryCommandResponse, CommandError> {
        let category = self.category_service.add_category(&req.identity, &req.form).await.map_err(CommandError::from)?;
        Ok(AddCategoryCommandResponse {
            notice: Notice::success(format!("Category '{}' added successfully.", category.name).as_str()),
            redirect: "/categories/".to_string(),
            category,
        })
    }
}
