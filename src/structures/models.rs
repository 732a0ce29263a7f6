use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

/// How a source channel's messages are relayed to the destination.
/// `Copy` re-sends the content as a fresh message, `Forward` keeps the
/// original attribution header. Stored as the lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForwardMode {
    #[default]
    Copy,
    Forward,
}

/// A bot user, upserted on every interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub username: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub joined_date: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_active: DateTime<Utc>,
}

/// Presence of a record means the user is banned; unbanning deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedUser {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub username: String,
    pub reason: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub banned_date: DateTime<Utc>,
}

/// A globally registered source channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub channel_id: String,
    pub title: String,
    pub forward_mode: ForwardMode,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub added_date: DateTime<Utc>,
}

/// The global destination channel. Its collection holds at most one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub channel_id: String,
    pub title: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub set_date: DateTime<Utc>,
}

/// Singleton counter document, created once at first connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub total_forwards: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub start_date: DateTime<Utc>,
}

/// A user's Telegram login credentials, one active session per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub user_id: String,
    /// Opaque serialized credential blob, reused across logins.
    pub session_string: String,
    pub phone: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_date: DateTime<Utc>,
}

/// A source channel registered by one user; (user_id, channel_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserChannel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub channel_id: String,
    pub title: String,
    pub forward_mode: ForwardMode,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub added_date: DateTime<Utc>,
}

/// A user's destination channel, at most one document per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDestination {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub channel_id: String,
    pub title: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub set_date: DateTime<Utc>,
}

/// Composite view assembled by `Store::get_stats`. The counts come from
/// separate reads and are not a transactional snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub total_forwards: i64,
    pub total_users: u64,
    pub total_channels: u64,
    pub banned_users: u64,
    pub start_date: DateTime<Utc>,
}

impl Default for StatsReport {
    fn default() -> Self {
        Self {
            total_forwards: 0,
            total_users: 0,
            total_channels: 0,
            banned_users: 0,
            start_date: Utc::now(),
        }
    }
}
