use axum::Router;

use crate::AppState;

mod auth;
mod error;
mod extract;
mod handlers;
mod pagination;
mod routes;

pub use auth::{AdminToken, AuthUser};
pub use error::AppError;
pub use extract::{ApiJson, ApiPath};
pub use pagination::{Page, PageRequest};

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth())
        .merge(routes::users())
        .merge(routes::posts())
        .merge(routes::chats())
        .merge(routes::admin());

    Router::new()
        .merge(routes::health())
        .nest("/api", api)
        .with_state(state)
}
