pub mod admin;
pub mod auth;
pub mod chats;
pub mod engagement;
pub mod error;
pub mod posts;
pub mod social;
pub mod users;

pub use error::ServiceError;
