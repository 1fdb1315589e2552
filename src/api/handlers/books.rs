/*
 * Responsibility
 * - /books CRUD handlers
 * - Guards have already run; handlers only validate payloads and talk to
 *   the repos
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::Message;
use crate::api::dto::books::{
    BookCollectionResponse, BookDeletedResponse, BookPayload, BookResponse, PageQuery,
};
use crate::error::AppError;
use crate::repos::book_repo;
use crate::state::AppState;

pub async fn list_books(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<BookCollectionResponse>, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 100);
    let offset = page.offset.unwrap_or(0).max(0);

    let rows = book_repo::list(&state.db, limit, offset).await?;

    Ok(Json(BookCollectionResponse::new(rows)))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, AppError> {
    let row = book_repo::get(&state.db, book_id)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(Json(BookResponse::from(row)))
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let new_book = payload.validate().map_err(AppError::bad_request)?;

    let row = book_repo::create(&state.db, new_book).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(row))))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Message>, AppError> {
    let new_book = payload.validate().map_err(AppError::bad_request)?;

    book_repo::update(&state.db, book_id, new_book)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(Json(Message::new("Book updated successfully")))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookDeletedResponse>, AppError> {
    let deleted = book_repo::delete(&state.db, book_id).await?;

    if !deleted {
        return Err(AppError::not_found("Book not found"));
    }

    Ok(Json(BookDeletedResponse::new()))
}
