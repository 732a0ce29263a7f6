//! Persistence layer for a Telegram message-forwarding bot, backed by MongoDB.
pub mod db;
pub mod structures;
pub type Result<T> = std::result::Result<T, anyhow::Error>;
