/*
 * Responsibility
 * - Review handlers (listed under a book, mutated by id)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::Message;
use crate::api::dto::reviews::{ReviewCollectionResponse, ReviewPayload, ReviewResponse};
use crate::error::AppError;
use crate::repos::{book_repo, review_repo};
use crate::state::AppState;

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<ReviewCollectionResponse>, AppError> {
    let rows = review_repo::list_for_book(&state.db, book_id).await?;

    if rows.is_empty() {
        return Err(AppError::not_found("No reviews found for this book"));
    }

    Ok(Json(ReviewCollectionResponse::new(book_id, rows)))
}

pub async fn add_review(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Json(payload): Json<ReviewPayload>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let (review_text, rating) = payload.validate().map_err(AppError::bad_request)?;

    if !book_repo::exists(&state.db, book_id).await? {
        return Err(AppError::not_found("Book not found"));
    }

    let row = review_repo::create(&state.db, book_id, review_text, rating).await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(row))))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<Message>, AppError> {
    let (review_text, rating) = payload.validate().map_err(AppError::bad_request)?;

    let updated = review_repo::update(&state.db, review_id, review_text, rating).await?;

    if !updated {
        return Err(AppError::not_found("Review not found"));
    }

    Ok(Json(Message::new("Review updated successfully")))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    // Deleting an absent review is still reported as success.
    review_repo::delete(&state.db, review_id).await?;

    Ok(Json(Message::new("Review deleted successfully")))
}
