//! HTTP adapter for the patient chat.
//!
//! The server holds no conversation state: clients send back the context
//! returned by the previous turn.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ChatAppState;
pub use routes::chat_router;
