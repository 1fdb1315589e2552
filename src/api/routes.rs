/*
 * Responsibility
 * - The URL structure, in one table
 * - Protected routes get the bearer authentication layer plus exactly one
 *   scope guard; reads stay public
 */
use axum::{
    Router,
    extract::Request,
    handler::Handler,
    middleware::{Next, from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};

use crate::api::handlers::{admin, auth, books, health, reviews};
use crate::middleware::auth::{authenticate, check_scope};
use crate::services::auth::rbac::Scope;
use crate::state::AppState;

macro_rules! require_scope {
    ($scope:expr) => {
        from_fn(|req: Request, next: Next| check_scope($scope, req, next))
    };
}

pub fn routes(state: AppState) -> Router<AppState> {
    let bearer = from_fn_with_state(state, authenticate);

    Router::new()
        .route("/health", get(health::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/books",
            get(books::list_books).post(
                books::create_book
                    .layer(require_scope!(Scope::BooksWrite))
                    .layer(bearer.clone()),
            ),
        )
        .route(
            "/books/{book_id}",
            get(books::get_book)
                .put(
                    books::update_book
                        .layer(require_scope!(Scope::BooksWrite))
                        .layer(bearer.clone()),
                )
                .delete(
                    books::delete_book
                        .layer(require_scope!(Scope::BooksWrite))
                        .layer(bearer.clone()),
                ),
        )
        .route(
            "/books/{book_id}/reviews",
            get(reviews::list_reviews).post(
                reviews::add_review
                    .layer(require_scope!(Scope::ReviewsWrite))
                    .layer(bearer.clone()),
            ),
        )
        .route(
            "/reviews/{review_id}",
            put(reviews::update_review
                .layer(require_scope!(Scope::ReviewsWrite))
                .layer(bearer.clone()))
            .delete(
                reviews::delete_review
                    .layer(require_scope!(Scope::ReviewsDelete))
                    .layer(bearer.clone()),
            ),
        )
        .route(
            "/admin/users",
            get(admin::list_users
                .layer(require_scope!(Scope::UsersRead))
                .layer(bearer.clone())),
        )
        .route(
            "/admin/users/{user_id}",
            delete(
                admin::delete_user
                    .layer(require_scope!(Scope::UsersDelete))
                    .layer(bearer.clone()),
            ),
        )
        .route(
            "/admin/users/{user_id}/role",
            put(admin::assign_role
                .layer(require_scope!(Scope::UsersWrite))
                .layer(bearer)),
        )
}
