use crate::collect;
use crate::db::Store;
use crate::structures::models::{ForwardMode, UserChannel};
use chrono::Utc;
use futures_util::StreamExt;
use log::warn;
use mongodb::bson::{doc, to_bson};

impl Store {
    /// Registers a source channel for one user. The (user_id, channel_id)
    /// pair is kept unique via the compound pre-check; a duplicate add
    /// returns false without mutating.
    pub async fn try_add_user_source_channel(
        &self,
        user_id: i64,
        channel_id: &str,
        title: &str,
        forward_mode: ForwardMode,
    ) -> crate::Result<bool> {
        let user_id = user_id.to_string();
        let exists = self
            .user_channels
            .find_one(doc! {"user_id": &user_id, "channel_id": channel_id}, None)
            .await?;
        if exists.is_some() {
            return Ok(false);
        }

        self.user_channels
            .insert_one(
                UserChannel {
                    id: None,
                    user_id,
                    channel_id: channel_id.to_string(),
                    title: title.to_string(),
                    forward_mode,
                    added_date: Utc::now(),
                },
                None,
            )
            .await?;
        Ok(true)
    }

    pub async fn add_user_source_channel(
        &self,
        user_id: i64,
        channel_id: &str,
        title: &str,
        forward_mode: ForwardMode,
    ) -> bool {
        self.try_add_user_source_channel(user_id, channel_id, title, forward_mode)
            .await
            .map_err(|err| warn!("add_user_source_channel: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_remove_user_source_channel(
        &self,
        user_id: i64,
        channel_id: &str,
    ) -> crate::Result<bool> {
        let result = self
            .user_channels
            .delete_one(
                doc! {"user_id": user_id.to_string(), "channel_id": channel_id},
                None,
            )
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn remove_user_source_channel(&self, user_id: i64, channel_id: &str) -> bool {
        self.try_remove_user_source_channel(user_id, channel_id)
            .await
            .map_err(|err| warn!("remove_user_source_channel: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_get_user_channels(&self, user_id: i64) -> crate::Result<Vec<UserChannel>> {
        Ok(collect!(
            self.user_channels
                .find(doc! {"user_id": user_id.to_string()}, None)
                .await?
        ))
    }

    pub async fn get_user_channels(&self, user_id: i64) -> Vec<UserChannel> {
        self.try_get_user_channels(user_id)
            .await
            .map_err(|err| warn!("get_user_channels: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_set_user_forward_mode(
        &self,
        user_id: i64,
        channel_id: &str,
        mode: ForwardMode,
    ) -> crate::Result<()> {
        self.user_channels
            .update_one(
                doc! {"user_id": user_id.to_string(), "channel_id": channel_id},
                doc! {"$set": {"forward_mode": to_bson(&mode)?}},
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn set_user_forward_mode(
        &self,
        user_id: i64,
        channel_id: &str,
        mode: ForwardMode,
    ) -> bool {
        self.try_set_user_forward_mode(user_id, channel_id, mode)
            .await
            .map_err(|err| warn!("set_user_forward_mode: {err:#}"))
            .is_ok()
    }

    pub async fn try_get_user_channel_count(&self, user_id: i64) -> crate::Result<u64> {
        Ok(self
            .user_channels
            .count_documents(doc! {"user_id": user_id.to_string()}, None)
            .await?)
    }

    pub async fn get_user_channel_count(&self, user_id: i64) -> u64 {
        self.try_get_user_channel_count(user_id)
            .await
            .map_err(|err| warn!("get_user_channel_count: {err:#}"))
            .unwrap_or_default()
    }
}
