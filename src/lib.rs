pub mod categories;
pub mod config;
pub mod description;
pub mod error;
pub mod exchange;
pub mod extract;
pub mod gemini;
pub mod localization;
pub mod rates;
pub mod security;
pub mod server;
