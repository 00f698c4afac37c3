pub mod chat;
pub mod engagement;
pub mod post;
pub mod projection;
pub mod social_graph;
pub mod timestamp;
pub mod user;
