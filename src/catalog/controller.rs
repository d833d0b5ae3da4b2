use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use crate::books::dto::BookForm;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::book_form_cmd::{BookFormCommand, BookFormCommandRequest, BookFormCommandResponse};
use crate::catalog::command::confirm_remove_book_cmd::{ConfirmRemoveBookCommand, ConfirmRemoveBookCommandRequest, ConfirmRemoveBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest, SearchBooksCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::domain::Identity;

async fn build_service(state: &AppState) -> Result<Box<dyn CatalogService>, ServerError> {
    Ok(factory::create_catalog_service(&state.config, state.store).await?)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    q: Option<String>,
}

pub(crate) async fn search_books(
    State(state): State<AppState>,
    _identity: Identity,
    Query(params): Query<SearchParams>) -> Result<Json<SearchBooksCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = SearchBooksCommand::new(svc).execute(SearchBooksCommandRequest { query: params.q }).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    _identity: Identity,
    Path(book_id): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = GetBookCommand::new(svc).execute(GetBookCommandRequest { book_id }).await?;
    Ok(Json(res))
}

pub(crate) async fn new_book_form(
    State(state): State<AppState>,
    identity: Identity) -> Result<Json<BookFormCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = BookFormCommand::new(svc).execute(BookFormCommandRequest { identity, book_id: None }).await?;
    Ok(Json(res))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    identity: Identity,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let form: BookForm = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(&state).await?;
    let res = AddBookCommand::new(svc).execute(AddBookCommandRequest { identity, form }).await?;
    Ok(Json(res))
}

pub(crate) async fn edit_book_form(
    State(state): State<AppState>,
    identity: Identity,
    Path(book_id): Path<String>) -> Result<Json<BookFormCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = BookFormCommand::new(svc).execute(BookFormCommandRequest { identity, book_id: Some(book_id) }).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    identity: Identity,
    Path(book_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let form: BookForm = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(&state).await?;
    let res = UpdateBookCommand::new(svc).execute(UpdateBookCommandRequest { identity, book_id, form }).await?;
    Ok(Json(res))
}

pub(crate) async fn confirm_remove_book(
    State(state): State<AppState>,
    identity: Identity,
    Path(book_id): Path<String>) -> Result<Json<ConfirmRemoveBookCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = ConfirmRemoveBookCommand::new(svc).execute(ConfirmRemoveBookCommandRequest { identity, book_id }).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    identity: Identity,
    Path(book_id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = RemoveBookCommand::new(svc).execute(RemoveBookCommandRequest { identity, book_id }).await?;
    Ok(Json(res))
}
