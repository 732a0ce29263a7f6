use crate::collect;
use crate::db::Store;
use crate::structures::models::User;
use futures_util::StreamExt;
use log::warn;
use mongodb::bson::{doc, DateTime};
use mongodb::options::UpdateOptions;

impl Store {
    /// Upsert by user id: refreshes `username` and `last_active` on every
    /// call, sets `joined_date` only when the record is first created.
    pub async fn try_add_user(&self, user_id: i64, username: &str) -> crate::Result<()> {
        self.users
            .update_one(
                doc! {"user_id": user_id.to_string()},
                doc! {
                    "$set": {
                        "username": username,
                        "last_active": DateTime::now(),
                    },
                    "$setOnInsert": {
                        "joined_date": DateTime::now(),
                    },
                },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;
        Ok(())
    }

    pub async fn add_user(&self, user_id: i64, username: &str) -> bool {
        self.try_add_user(user_id, username)
            .await
            .map_err(|err| warn!("add_user: {err:#}"))
            .is_ok()
    }

    pub async fn try_get_all_users(&self) -> crate::Result<Vec<User>> {
        Ok(collect!(self.users.find(doc! {}, None).await?))
    }

    pub async fn get_all_users(&self) -> Vec<User> {
        self.try_get_all_users()
            .await
            .map_err(|err| warn!("get_all_users: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_get_user_count(&self) -> crate::Result<u64> {
        Ok(self.users.count_documents(doc! {}, None).await?)
    }

    pub async fn get_user_count(&self) -> u64 {
        self.try_get_user_count()
            .await
            .map_err(|err| warn!("get_user_count: {err:#}"))
            .unwrap_or_default()
    }
}
