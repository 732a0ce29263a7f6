use crate::structures::models::{
    BannedUser, Channel, Destination, Stats, User, UserChannel, UserDestination, UserSession,
};
use chrono::Utc;
use log::{info, warn};
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use std::sync::Arc;

pub mod ban;
pub mod channel;
pub mod destination;
pub mod session;
pub mod stats;
pub mod user;
pub mod user_channel;

/// Connection handle plus the eight named collections the bot persists into.
/// Constructed once at startup via [`Store::connect`] and shared by clone;
/// every method is a single driver round trip (or a short fixed sequence of
/// them, see the destination setters).
#[derive(Debug, Clone)]
pub struct Store {
    pub users: Arc<Collection<User>>,
    pub channels: Arc<Collection<Channel>>,
    pub destination: Arc<Collection<Destination>>,
    pub stats: Arc<Collection<Stats>>,
    pub banned_users: Arc<Collection<BannedUser>>,
    pub user_sessions: Arc<Collection<UserSession>>,
    pub user_channels: Arc<Collection<UserChannel>>,
    pub user_destinations: Arc<Collection<UserDestination>>,
}

#[macro_export]
macro_rules! collect {
    ($cursor:expr) => {{
        $cursor
            .filter_map(|a| async move { a.ok() })
            .collect()
            .await
    }};
}

impl Store {
    /// Connects to MongoDB, binds the collections, verifies liveness with a
    /// ping and seeds the stats singleton if the collection is empty. This is
    /// the only operation with first-time initialization; everything else
    /// assumes a live connection.
    pub async fn try_connect(uri: &str, db_name: &str) -> crate::Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);

        let store = Self {
            users: Arc::new(db.collection("users")),
            channels: Arc::new(db.collection("channels")),
            destination: Arc::new(db.collection("destination")),
            stats: Arc::new(db.collection("stats")),
            banned_users: Arc::new(db.collection("banned_users")),
            user_sessions: Arc::new(db.collection("user_sessions")),
            user_channels: Arc::new(db.collection("user_channels")),
            user_destinations: Arc::new(db.collection("user_destinations")),
        };

        client
            .database("admin")
            .run_command(doc! {"ping": 1}, None)
            .await?;

        if store.stats.count_documents(doc! {}, None).await? == 0 {
            store
                .stats
                .insert_one(
                    Stats {
                        id: None,
                        total_forwards: 0,
                        start_date: Utc::now(),
                    },
                    None,
                )
                .await?;
        }

        info!("connected to mongodb, database {db_name}");
        Ok(store)
    }

    /// Like [`Store::try_connect`] but never propagates: logs the failure and
    /// returns `None` so the caller can decide whether to bail out.
    pub async fn connect(uri: &str, db_name: &str) -> Option<Self> {
        match Self::try_connect(uri, db_name).await {
            Ok(store) => Some(store),
            Err(err) => {
                warn!("connect: {err:#}");
                None
            }
        }
    }

    /// Wipes every collection. Test fixture helper.
    pub async fn delete_all(&self) -> crate::Result<()> {
        self.users.delete_many(doc!(), None).await?;
        self.channels.delete_many(doc!(), None).await?;
        self.destination.delete_many(doc!(), None).await?;
        self.stats.delete_many(doc!(), None).await?;
        self.banned_users.delete_many(doc!(), None).await?;
        self.user_sessions.delete_many(doc!(), None).await?;
        self.user_channels.delete_many(doc!(), None).await?;
        self.user_destinations.delete_many(doc!(), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::models::ForwardMode;
    use dotenv::dotenv;
    use std::env;

    fn rand_id() -> String {
        rand::random::<u32>().to_string()
    }

    /// Connects to a throwaway database named after a random id so tests can
    /// run in parallel without stepping on each other. Skips (returns None)
    /// when MONGO_URI is not configured.
    async fn test_store() -> Option<Store> {
        dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();
        let uri = env::var("MONGO_URI").ok()?;
        let db_name = format!("forward_store_test_{}", rand_id());
        Some(Store::try_connect(&uri, &db_name).await.unwrap())
    }

    #[tokio::test]
    async fn user_upsert_is_idempotent() {
        let Some(db) = test_store().await else { return };

        assert!(db.add_user(42, "alice").await);
        let first = db.get_all_users().await.remove(0);

        assert!(db.add_user(42, "alice_renamed").await);
        assert_eq!(db.get_user_count().await, 1);

        let users = db.get_all_users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice_renamed");
        // joined_date survives the second touch, last_active moves forward
        assert_eq!(users[0].joined_date, first.joined_date);
        assert!(users[0].last_active >= first.last_active);

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn ban_unban_round_trip() {
        let Some(db) = test_store().await else { return };

        assert!(!db.is_user_banned(7).await);
        assert!(db.ban_user(7, "mallory", Some("spam")).await);
        assert!(db.is_user_banned(7).await);

        let info = db.get_ban_info(7).await.unwrap();
        assert_eq!(info.username, "mallory");
        assert_eq!(info.reason, "spam");

        // omitted reason falls back to the stock one
        assert!(db.ban_user(8, "trudy", None).await);
        assert_eq!(db.get_ban_info(8).await.unwrap().reason, "No reason");
        assert_eq!(db.get_banned_users().await.len(), 2);

        assert!(db.unban_user(7).await);
        assert!(!db.is_user_banned(7).await);
        assert!(db.get_ban_info(7).await.is_none());
        // unbanning an id that is not banned reports false
        assert!(!db.unban_user(7).await);

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_source_channel_is_rejected() {
        let Some(db) = test_store().await else { return };

        assert!(
            db.add_source_channel("-100200", "news", ForwardMode::default())
                .await
        );
        assert!(
            !db.add_source_channel("-100200", "news again", ForwardMode::Forward)
                .await
        );
        assert_eq!(db.get_channel_count().await, 1);

        // the rejected call must not have mutated the existing record
        let channels = db.get_all_channels().await;
        assert_eq!(channels[0].title, "news");
        assert_eq!(channels[0].forward_mode, ForwardMode::Copy);

        assert!(db.set_forward_mode("-100200", ForwardMode::Forward).await);
        assert_eq!(
            db.get_all_channels().await[0].forward_mode,
            ForwardMode::Forward
        );

        assert!(db.remove_source_channel("-100200").await);
        assert!(!db.remove_source_channel("-100200").await);
        assert_eq!(db.get_channel_count().await, 0);

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn destination_is_a_singleton() {
        let Some(db) = test_store().await else { return };

        for i in 0..3 {
            assert!(
                db.set_destination(&format!("-10{i}"), &format!("dest {i}"))
                    .await
            );
        }
        assert_eq!(db.destination.count_documents(doc! {}, None).await.unwrap(), 1);
        assert_eq!(db.get_destination().await.unwrap().channel_id, "-102");

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn user_channels_are_scoped_per_user() {
        let Some(db) = test_store().await else { return };

        assert!(
            db.add_user_source_channel(1, "-a", "first", ForwardMode::default())
                .await
        );
        assert!(
            db.add_user_source_channel(1, "-b", "second", ForwardMode::default())
                .await
        );
        assert!(
            db.add_user_source_channel(2, "-a", "other user, same channel", ForwardMode::default())
                .await
        );
        // duplicate composite key is a no-op
        assert!(
            !db.add_user_source_channel(1, "-a", "again", ForwardMode::default())
                .await
        );

        let mine = db.get_user_channels(1).await;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.user_id == "1"));
        assert_eq!(db.get_user_channel_count(1).await, 2);
        assert_eq!(db.get_user_channel_count(2).await, 1);

        assert!(db.set_user_forward_mode(1, "-a", ForwardMode::Forward).await);
        let mine = db.get_user_channels(1).await;
        let a = mine.iter().find(|c| c.channel_id == "-a").unwrap();
        assert_eq!(a.forward_mode, ForwardMode::Forward);
        // user 2's record for the same channel id is untouched
        assert_eq!(
            db.get_user_channels(2).await[0].forward_mode,
            ForwardMode::Copy
        );

        assert!(db.remove_user_source_channel(1, "-a").await);
        assert!(!db.remove_user_source_channel(1, "-a").await);
        assert_eq!(db.get_user_channel_count(1).await, 1);

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn user_destination_replaces_per_user() {
        let Some(db) = test_store().await else { return };

        assert!(db.set_user_destination(1, "-a", "old").await);
        assert!(db.set_user_destination(1, "-b", "new").await);
        assert!(db.set_user_destination(2, "-c", "theirs").await);

        let mine = db.get_user_destination(1).await.unwrap();
        assert_eq!(mine.channel_id, "-b");
        assert_eq!(mine.title, "new");
        assert_eq!(
            db.user_destinations
                .count_documents(doc! {"user_id": "1"}, None)
                .await
                .unwrap(),
            1
        );
        assert_eq!(db.get_user_destination(2).await.unwrap().channel_id, "-c");
        assert!(db.get_user_destination(3).await.is_none());

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let Some(db) = test_store().await else { return };

        assert!(db.get_user_session(5).await.is_none());
        assert!(db.save_user_session(5, "sess-one", "+1555").await);
        let first = db.get_user_session(5).await.unwrap();
        assert_eq!(first.session_string, "sess-one");

        // re-login overwrites the blob but keeps the original created_date
        assert!(db.save_user_session(5, "sess-two", "+1555").await);
        let second = db.get_user_session(5).await.unwrap();
        assert_eq!(second.session_string, "sess-two");
        assert_eq!(second.created_date, first.created_date);
        assert!(second.updated_date >= first.updated_date);

        assert!(db.delete_user_session(5).await);
        assert!(db.get_user_session(5).await.is_none());
        assert!(!db.delete_user_session(5).await);

        db.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn stats_reflect_counter_and_live_counts() {
        let Some(db) = test_store().await else { return };

        assert_eq!(db.get_stats().await.total_forwards, 0);
        for _ in 0..3 {
            db.increment_forwards().await;
        }

        assert!(db.add_user(42, "alice").await);
        assert_eq!(db.get_user_count().await, 1);
        assert!(db.ban_user(42, "alice", Some("spam")).await);
        assert!(db.is_user_banned(42).await);
        assert!(db.add_source_channel("-1", "src", ForwardMode::default()).await);

        let report = db.get_stats().await;
        assert_eq!(report.total_forwards, 3);
        assert_eq!(report.total_users, 1);
        assert_eq!(report.total_channels, 1);
        assert_eq!(report.banned_users, 1);

        // with the stats document gone the degraded getter hands back the
        // zeroed block instead of erroring
        db.delete_all().await.unwrap();
        let report = db.get_stats().await;
        assert_eq!(report.total_forwards, 0);
        assert_eq!(report.total_users, 0);
    }

    #[tokio::test]
    async fn stats_singleton_is_created_once() {
        dotenv().ok();
        let Ok(uri) = env::var("MONGO_URI") else { return };
        let db_name = format!("forward_store_test_{}", rand_id());

        let db = Store::try_connect(&uri, &db_name).await.unwrap();
        let seeded = db.stats.find_one(doc! {}, None).await.unwrap().unwrap();
        assert_eq!(seeded.total_forwards, 0);

        // reconnecting must not reset or duplicate the counter document
        db.increment_forwards().await;
        let again = Store::try_connect(&uri, &db_name).await.unwrap();
        assert_eq!(again.stats.count_documents(doc! {}, None).await.unwrap(), 1);
        assert_eq!(again.get_stats().await.total_forwards, 1);

        db.delete_all().await.unwrap();
    }
}
