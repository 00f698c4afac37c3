use std::collections::BTreeMap;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::app::admin::{
    AdminComment, AdminPost, AdminReaction, AdminService, AdminUser, CommentFilter, PostFilter,
    ReactionFilter, UserFilter,
};
use crate::app::auth::Registration;
use crate::app::chats::ChatService;
use crate::app::engagement::EngagementService;
use crate::app::posts::{PostChanges, PostService};
use crate::app::social::SocialService;
use crate::app::users::UserService;
use crate::domain::chat::{Chat, ChatListItem, Message, MessageView};
use crate::domain::engagement::{Comment, CommentView, Reaction, ReactionValue};
use crate::domain::post::{PostDetail, PostListItem, PostWritten, TITLE_MAX_LEN};
use crate::domain::user::{User, UserListItem, UserProfile};
use crate::http::pagination::{Page, PageQuery, PageRequest};
use crate::http::{AdminToken, ApiJson, ApiPath, AppError, AuthUser};
use crate::AppState;

const MAX_PASSWORD_LEN: usize = 128;
const MAX_NAME_LEN: usize = 150;
const BLANK: &str = "This field may not be blank.";

/// Per-field rejections collected before any service call.
#[derive(Default)]
struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0))
        }
    }
}

fn too_long(max_len: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max_len)
}

fn valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn check_title(errors: &mut FieldErrors, title: &str) {
    if title.trim().is_empty() {
        errors.add("title", BLANK);
    } else if title.chars().count() > TITLE_MAX_LEN {
        errors.add("title", too_long(TITLE_MAX_LEN));
    }
}

fn check_body(errors: &mut FieldErrors, field: &str, body: &str) {
    if body.trim().is_empty() {
        errors.add(field, BLANK);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_uuid_param(field: &str, value: Option<String>) -> Result<Option<Uuid>, AppError> {
    match non_empty(value) {
        Some(raw) => Uuid::parse_str(&raw)
            .map(Some)
            .map_err(|_| AppError::invalid_field(field, "Enter a valid UUID.")),
        None => Ok(None),
    }
}

fn parse_date_param(field: &str, value: Option<String>) -> Result<Option<Date>, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    match non_empty(value) {
        Some(raw) => Date::parse(&raw, &format)
            .map(Some)
            .map_err(|_| AppError::invalid_field(field, "Enter a valid date.")),
        None => Ok(None),
    }
}

fn parse_reaction_value(value: Option<String>) -> Result<Option<ReactionValue>, AppError> {
    match value {
        Some(raw) => ReactionValue::from_db(&raw).map(Some).ok_or_else(|| {
            AppError::invalid_field("value", format!("\"{}\" is not a valid choice.", raw))
        }),
        None => Ok(None),
    }
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub access_expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let tokens = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to login");
            AppError::internal("failed to login")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(AuthTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    let tokens = state
        .auth_service()
        .refresh(&payload.refresh_token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to refresh token");
            AppError::internal("failed to refresh token")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(AuthTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
        None => Err(AppError::unauthorized("invalid refresh token")),
    }
}

pub async fn revoke_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    let revoked = state
        .auth_service()
        .revoke_refresh_token(&payload.refresh_token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to revoke token");
            AppError::internal("failed to revoke token")
        })?;

    if !revoked {
        tracing::debug!("revoke requested for unknown or already revoked token");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let mut errors = FieldErrors::default();

    let username = payload.username.trim().to_string();
    if username.is_empty() {
        errors.add("username", BLANK);
    } else if username.chars().count() > MAX_NAME_LEN {
        errors.add("username", too_long(MAX_NAME_LEN));
    } else if !valid_username(&username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if payload.password.is_empty() {
        errors.add("password", BLANK);
    } else if payload.password.len() > MAX_PASSWORD_LEN {
        errors.add("password", too_long(MAX_PASSWORD_LEN));
    }

    let email = payload.email.trim().to_string();
    if email.is_empty() {
        errors.add("email", BLANK);
    } else if !email.contains('@') {
        errors.add("email", "Enter a valid email address.");
    }

    if payload.first_name.chars().count() > MAX_NAME_LEN {
        errors.add("first_name", too_long(MAX_NAME_LEN));
    }
    if payload.last_name.chars().count() > MAX_NAME_LEN {
        errors.add("last_name", too_long(MAX_NAME_LEN));
    }
    errors.finish()?;

    let user = state
        .auth_service()
        .register(Registration {
            username,
            email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password: payload.password,
        })
        .await
        .map_err(|err| AppError::from_service(err, "failed to register user"))?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<UserListItem>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;

    let service = UserService::new(state.db.clone());
    let (count, users) = service
        .list_users(auth.user_id, page.limit(), page.offset())
        .await
        .map_err(|err| AppError::from_service(err, "failed to list users"))?;

    Ok(Json(Page::new(page, &uri, count, users)?))
}

pub async fn get_myself(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    load_profile(&state, auth.user_id, auth.user_id).await
}

pub async fn get_user(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    load_profile(&state, auth.user_id, id).await
}

async fn load_profile(
    state: &AppState,
    viewer_id: Uuid,
    user_id: Uuid,
) -> Result<Json<UserProfile>, AppError> {
    let service = UserService::new(state.db.clone());
    let profile = service
        .profile(viewer_id, user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch user"))?;

    profile
        .map(Json)
        .ok_or_else(|| AppError::not_found("user not found"))
}

pub async fn delete_myself(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = UserService::new(state.db.clone());
    let deleted = service
        .delete_account(auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete account"))?;

    if !deleted {
        return Err(AppError::not_found("user not found"));
    }
    tracing::info!(user_id = %auth.user_id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn existing_user(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    let service = UserService::new(state.db.clone());
    service
        .get_user(user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch user"))?
        .ok_or_else(|| AppError::not_found("user not found"))
}

pub async fn add_friend(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<String>, AppError> {
    let target = existing_user(&state, id).await?;

    let service = SocialService::new(state.db.clone());
    let created = service
        .add_friend(auth.user_id, target.id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to add friend"))?;

    if created {
        tracing::info!(user_id = %auth.user_id, friend_id = %target.id, "friendship created");
    }
    Ok(Json(format!("{} added to your friends", target.username)))
}

pub async fn remove_friend(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<String>, AppError> {
    let target = existing_user(&state, id).await?;

    let service = SocialService::new(state.db.clone());
    let removed = service
        .remove_friend(auth.user_id, target.id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to remove friend"))?;

    if removed {
        tracing::info!(user_id = %auth.user_id, friend_id = %target.id, "friendship removed");
    }
    Ok(Json(format!(
        "{} was deleted from your friends list",
        target.username
    )))
}

pub async fn list_friends(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<UserListItem>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;
    let user = existing_user(&state, id).await?;

    let service = SocialService::new(state.db.clone());
    let (count, friends) = service
        .list_friends(auth.user_id, user.id, page.limit(), page.offset())
        .await
        .map_err(|err| AppError::from_service(err, "failed to list friends"))?;

    Ok(Json(Page::new(page, &uri, count, friends)?))
}

pub async fn list_posts(
    _auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PostListItem>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;

    let service = PostService::new(state.db.clone());
    let (count, posts) = service
        .list_posts(page.limit(), page.offset())
        .await
        .map_err(|err| AppError::from_service(err, "failed to list posts"))?;

    Ok(Json(Page::new(page, &uri, count, posts)?))
}

#[derive(Deserialize)]
pub struct WritePostRequest {
    pub title: String,
    pub body: String,
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WritePostRequest>,
) -> Result<(StatusCode, Json<PostWritten>), AppError> {
    let mut errors = FieldErrors::default();
    check_title(&mut errors, &payload.title);
    check_body(&mut errors, "body", &payload.body);
    errors.finish()?;

    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(auth.user_id, payload.title, payload.body)
        .await
        .map_err(|err| AppError::from_service(err, "failed to create post"))?;

    tracing::info!(user_id = %auth.user_id, post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn get_post(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PostDetail>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service
        .post_detail(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to fetch post"))?;

    post.map(Json)
        .ok_or_else(|| AppError::not_found("post not found"))
}

pub async fn replace_post(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WritePostRequest>,
) -> Result<Json<PostWritten>, AppError> {
    let mut errors = FieldErrors::default();
    check_title(&mut errors, &payload.title);
    check_body(&mut errors, "body", &payload.body);
    errors.finish()?;

    let changes = PostChanges {
        title: Some(payload.title),
        body: Some(payload.body),
    };
    apply_post_changes(&state, id, auth.user_id, changes).await
}

#[derive(Deserialize)]
pub struct PatchPostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

pub async fn patch_post(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PatchPostRequest>,
) -> Result<Json<PostWritten>, AppError> {
    let mut errors = FieldErrors::default();
    if let Some(title) = &payload.title {
        check_title(&mut errors, title);
    }
    if let Some(body) = &payload.body {
        check_body(&mut errors, "body", body);
    }
    errors.finish()?;

    let changes = PostChanges {
        title: payload.title,
        body: payload.body,
    };
    apply_post_changes(&state, id, auth.user_id, changes).await
}

async fn apply_post_changes(
    state: &AppState,
    post_id: Uuid,
    actor_id: Uuid,
    changes: PostChanges,
) -> Result<Json<PostWritten>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service
        .update_post(post_id, actor_id, changes)
        .await
        .map_err(|err| AppError::from_service(err, "failed to update post"))?;

    Ok(Json(post.into()))
}

pub async fn delete_post(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = PostService::new(state.db.clone());
    service
        .delete_post(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete post"))?;

    tracing::info!(user_id = %auth.user_id, post_id = %id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ReactionRequest {
    pub post: Uuid,
    #[serde(default)]
    pub value: Option<String>,
}

pub async fn set_reaction(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReactionRequest>,
) -> Result<(StatusCode, Json<Reaction>), AppError> {
    let value = parse_reaction_value(payload.value)?;

    let service = EngagementService::new(state.db.clone());
    let reaction = service
        .set_reaction(auth.user_id, payload.post, value)
        .await
        .map_err(|err| AppError::from_service(err, "failed to set reaction"))?;

    tracing::debug!(
        user_id = %auth.user_id,
        post_id = %payload.post,
        value = ?reaction.value,
        "reaction stored"
    );
    Ok((StatusCode::CREATED, Json(reaction)))
}

#[derive(Deserialize)]
pub struct CommentListQuery {
    pub page: Option<String>,
    #[serde(rename = "post__id")]
    pub post_id: Option<String>,
}

pub async fn list_comments(
    _auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Page<CommentView>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;
    let post_id = parse_uuid_param("post__id", query.post_id)?;

    let service = EngagementService::new(state.db.clone());
    let (count, comments) = service
        .list_comments(post_id, page.limit(), page.offset())
        .await
        .map_err(|err| AppError::from_service(err, "failed to list comments"))?;

    Ok(Json(Page::new(page, &uri, count, comments)?))
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub post: Uuid,
    pub body: String,
}

pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let mut errors = FieldErrors::default();
    check_body(&mut errors, "body", &payload.body);
    errors.finish()?;

    let service = EngagementService::new(state.db.clone());
    let comment = service
        .create_comment(auth.user_id, payload.post, payload.body)
        .await
        .map_err(|err| AppError::from_service(err, "failed to create comment"))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = EngagementService::new(state.db.clone());
    service
        .delete_comment(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete comment"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_chats(
    auth: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ChatListItem>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;

    let service = ChatService::new(state.db.clone());
    let (count, chats) = service
        .list_chats(auth.user_id, page.limit(), page.offset())
        .await
        .map_err(|err| AppError::from_service(err, "failed to list chats"))?;

    Ok(Json(Page::new(page, &uri, count, chats)?))
}

#[derive(Deserialize)]
pub struct CreateChatRequest {
    pub user_2: Uuid,
}

/// 201 when the chat is new, 200 when the pair already had one.
pub async fn create_chat(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateChatRequest>,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    let service = ChatService::new(state.db.clone());
    let (chat, created) = service
        .get_or_create_chat(auth.user_id, payload.user_2)
        .await
        .map_err(|err| AppError::from_service(err, "failed to open chat"))?;

    let status = if created {
        tracing::info!(user_id = %auth.user_id, chat_id = %chat.id, "chat created");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(chat)))
}

pub async fn delete_chat(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = ChatService::new(state.db.clone());
    service
        .delete_chat(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete chat"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_chat_messages(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let service = ChatService::new(state.db.clone());
    let messages = service
        .list_messages(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to list messages"))?;

    Ok(Json(messages))
}

#[derive(Deserialize)]
pub struct CreateMessageRequest {
    pub chat: Uuid,
    pub content: String,
}

pub async fn create_message(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let mut errors = FieldErrors::default();
    check_body(&mut errors, "content", &payload.content);
    errors.finish()?;

    let service = ChatService::new(state.db.clone());
    let message = service
        .post_message(auth.user_id, payload.chat, payload.content)
        .await
        .map_err(|err| AppError::from_service(err, "failed to send message"))?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn delete_message(
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = ChatService::new(state.db.clone());
    service
        .delete_message(id, auth.user_id)
        .await
        .map_err(|err| AppError::from_service(err, "failed to delete message"))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct AdminUserQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub joined_from: Option<String>,
    pub joined_to: Option<String>,
}

pub async fn admin_list_users(
    _admin: AdminToken,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdminUserQuery>,
) -> Result<Json<Page<AdminUser>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;
    let filter = UserFilter {
        search: non_empty(query.search),
        joined_from: parse_date_param("joined_from", query.joined_from)?,
        joined_to: parse_date_param("joined_to", query.joined_to)?,
    };

    let service = AdminService::new(state.db.clone());
    let (count, users) = service
        .list_users(&filter, page.limit(), page.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to list users for admin");
            AppError::internal("failed to list users")
        })?;

    Ok(Json(Page::new(page, &uri, count, users)?))
}

#[derive(Deserialize)]
pub struct AdminPostQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub author: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
}

pub async fn admin_list_posts(
    _admin: AdminToken,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdminPostQuery>,
) -> Result<Json<Page<AdminPost>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;
    let filter = PostFilter {
        search: non_empty(query.search),
        author: parse_uuid_param("author", query.author)?,
        created_from: parse_date_param("created_from", query.created_from)?,
        created_to: parse_date_param("created_to", query.created_to)?,
    };

    let service = AdminService::new(state.db.clone());
    let (count, posts) = service
        .list_posts(&filter, page.limit(), page.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to list posts for admin");
            AppError::internal("failed to list posts")
        })?;

    Ok(Json(Page::new(page, &uri, count, posts)?))
}

#[derive(Deserialize)]
pub struct AdminCommentQuery {
    pub page: Option<String>,
    pub author: Option<String>,
    pub post: Option<String>,
}

pub async fn admin_list_comments(
    _admin: AdminToken,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdminCommentQuery>,
) -> Result<Json<Page<AdminComment>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;
    let filter = CommentFilter {
        author: parse_uuid_param("author", query.author)?,
        post: parse_uuid_param("post", query.post)?,
    };

    let service = AdminService::new(state.db.clone());
    let (count, comments) = service
        .list_comments(&filter, page.limit(), page.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to list comments for admin");
            AppError::internal("failed to list comments")
        })?;

    Ok(Json(Page::new(page, &uri, count, comments)?))
}

#[derive(Deserialize)]
pub struct AdminReactionQuery {
    pub page: Option<String>,
    pub author: Option<String>,
    pub post: Option<String>,
    pub value: Option<String>,
}

pub async fn admin_list_reactions(
    _admin: AdminToken,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AdminReactionQuery>,
) -> Result<Json<Page<AdminReaction>>, AppError> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size)?;
    let filter = ReactionFilter {
        author: parse_uuid_param("author", query.author)?,
        post: parse_uuid_param("post", query.post)?,
        value: parse_reaction_value(non_empty(query.value))?,
    };

    let service = AdminService::new(state.db.clone());
    let (count, reactions) = service
        .list_reactions(&filter, page.limit(), page.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to list reactions for admin");
            AppError::internal("failed to list reactions")
        })?;

    Ok(Json(Page::new(page, &uri, count, reactions)?))
}
