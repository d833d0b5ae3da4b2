use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::categories::command::add_category_cmd::{AddCategoryCommand, AddCategoryCommandRequest, AddCategoryCommandResponse};
use crate::categories::command::list_categories_cmd::{ListCategoriesCommand, ListCategoriesCommandRequest, ListCategoriesCommandResponse};
use crate::categories::command::remove_category_cmd::{RemoveCategoryCommand, RemoveCategoryCommandRequest, RemoveCategoryCommandResponse};
use crate::categories::domain::CategoryService;
use crate::categories::dto::CategoryForm;
use crate::categories::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::domain::Identity;

async fn build_service(state: &AppState) -> Result<Box<dyn CategoryService>, ServerError> {
    Ok(factory::create_category_service(&state.config, state.store).await?)
}

pub(crate) async fn list_categories(
    State(state): State<AppState>,
    _identity: Identity) -> Result<Json<ListCategoriesCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = ListCategoriesCommand::new(svc).execute(ListCategoriesCommandRequest::default()).await?;
    Ok(Json(res))
}

pub(crate) async fn add_category(
    State(state): State<AppState>,
    identity: Identity,
    json: Json<Value>) -> Result<Json<AddCategoryCommandResponse>, ServerError> {
    let form: CategoryForm = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(&state).await?;
    let res = AddCategoryCommand::new(svc).execute(AddCategoryCommandRequest { identity, form }).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_category(
    State(state): State<AppState>,
    identity: Identity,
    Path(category_id): Path<String>) -> Result<Json<RemoveCategoryCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let req = RemoveCategoryCommandRequest { identity, category_id };
    let res = RemoveCategoryCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
