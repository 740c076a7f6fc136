pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::ClientError;
pub use routes::Intent;
pub use services::backend::{Backend, HttpBackend};
pub use services::chat_client::{ChatClient, Turn};
pub use services::view::{ChatLog, ChatView, TerminalView};
