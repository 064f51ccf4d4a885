pub mod catalog;
pub mod chat;
pub mod constants;
pub mod fallback;
pub mod inference;
pub mod profile;
pub mod prompt;
pub mod quiz;
pub mod resolver;
pub mod session;
pub mod store;
pub mod web_server;
