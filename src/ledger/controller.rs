use axum::{
    extract::{Path, State},
    response::Json,
};
use crate::core::command::Command;
use crate::core::controller::{AppState, ServerError};
use crate::core::domain::Identity;
use crate::ledger::command::issue_book_cmd::{IssueBookCommand, IssueBookCommandRequest, IssueBookCommandResponse};
use crate::ledger::command::my_books_cmd::{MyBooksCommand, MyBooksCommandRequest, MyBooksCommandResponse};
use crate::ledger::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest, ReturnBookCommandResponse};
use crate::ledger::domain::LedgerService;
use crate::ledger::factory;

async fn build_service(state: &AppState) -> Result<Box<dyn LedgerService>, ServerError> {
    Ok(factory::create_ledger_service(&state.config, state.store).await?)
}

pub(crate) async fn issue_book(
    State(state): State<AppState>,
    identity: Identity,
    Path(book_id): Path<String>) -> Result<Json<IssueBookCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = IssueBookCommand::new(svc).execute(IssueBookCommandRequest { identity, book_id }).await?;
    Ok(Json(res))
}

pub(crate) async fn return_book(
    State(state): State<AppState>,
    identity: Identity,
    Path(transaction_id): Path<String>) -> Result<Json<ReturnBookCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = ReturnBookCommand::new(svc).execute(ReturnBookCommandRequest { identity, transaction_id }).await?;
    Ok(Json(res))
}

pub(crate) async fn my_books(
    State(state): State<AppState>,
    identity: Identity) -> Result<Json<MyBooksCommandResponse>, ServerError> {
    let svc = build_service(&state).await?;
    let res = MyBooksCommand::new(svc).execute(MyBooksCommandRequest { identity }).await?;
    Ok(Json(res))
}
