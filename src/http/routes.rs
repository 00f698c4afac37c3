use axum::{routing::delete, routing::get, routing::post, Router};

use crate::AppState;
use crate::http::handlers;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/auth/login/", post(handlers::login))
        .route("/auth/refresh/", post(handlers::refresh_token))
        .route("/auth/revoke/", post(handlers::revoke_token))
}

pub fn users() -> Router<AppState> {
    Router::new()
        .route("/users/", post(handlers::register).get(handlers::list_users))
        .route(
            "/users/myself/",
            get(handlers::get_myself).delete(handlers::delete_myself),
        )
        .route("/users/:id/", get(handlers::get_user))
        .route("/users/:id/add/", post(handlers::add_friend))
        .route("/users/:id/delete/", post(handlers::remove_friend))
        .route("/users/:id/friends/", get(handlers::list_friends))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts/", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/posts/:id/",
            get(handlers::get_post)
                .put(handlers::replace_post)
                .patch(handlers::patch_post)
                .delete(handlers::delete_post),
        )
        .route("/reactions/", post(handlers::set_reaction))
        .route(
            "/comments/",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/comments/:id/", delete(handlers::delete_comment))
}

pub fn chats() -> Router<AppState> {
    Router::new()
        .route("/chats/", get(handlers::list_chats).post(handlers::create_chat))
        .route("/chats/:id/", delete(handlers::delete_chat))
        .route("/chats/:id/messages/", get(handlers::list_chat_messages))
        .route("/messages/", post(handlers::create_message))
        .route("/messages/:id/", delete(handlers::delete_message))
}

pub fn admin() -> Router<AppState> {
    Router::new()
        .route("/admin/users/", get(handlers::admin_list_users))
        .route("/admin/posts/", get(handlers::admin_list_posts))
        .route("/admin/comments/", get(handlers::admin_list_comments))
        .route("/admin/reactions/", get(handlers::admin_list_reactions))
}
