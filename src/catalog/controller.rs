use axum::{
    body::HttpBody,
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    BoxError, Router,
};
use serde_json::{Value};
use tracing::info;
use crate::books::domain::model::BookPatch;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};

pub fn routes<B>(state: AppState) -> Router<(), B>
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    Router::new()
        .route("/books", post(add_book).get(list_books))
        .route("/books/:id",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .with_state(state)
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.catalog).execute(req).await?;
    info!(book_id = res.book.id.as_str(), "added book");
    Ok(Json(res))
}

pub(crate) async fn list_books(
    State(state): State<AppState>,
    Query(req): Query<ListBooksCommandRequest>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let res = ListBooksCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest { book_id };
    let res = GetBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let patch: BookPatch = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::new(book_id.as_str(), patch);
    let res = UpdateBookCommand::new(state.catalog).execute(req).await?;
    info!(book_id = book_id.as_str(), updated = res.book.is_some(), "updated book");
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest { book_id };
    let res = RemoveBookCommand::new(state.catalog).execute(req).await?;
    info!(removed = res.book.is_some(), "removed book");
    Ok(Json(res))
}
