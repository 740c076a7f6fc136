pub mod backend;
pub mod chat_client;
pub mod diagram;
pub mod render;
pub mod session;
pub mod view;
pub mod voice;
