use crate::collect;
use crate::db::Store;
use crate::structures::models::{Channel, ForwardMode};
use chrono::Utc;
use futures_util::StreamExt;
use log::warn;
use mongodb::bson::{doc, to_bson};

impl Store {
    /// Registers a global source channel. Returns false without mutating when
    /// the channel id is already present.
    pub async fn try_add_source_channel(
        &self,
        channel_id: &str,
        title: &str,
        forward_mode: ForwardMode,
    ) -> crate::Result<bool> {
        let exists = self
            .channels
            .find_one(doc! {"channel_id": channel_id}, None)
            .await?;
        if exists.is_some() {
            return Ok(false);
        }

        self.channels
            .insert_one(
                Channel {
                    id: None,
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

    pub async fn add_source_channel(
        &self,
        channel_id: &str,
        title: &str,
        forward_mode: ForwardMode,
    ) -> bool {
        self.try_add_source_channel(channel_id, title, forward_mode)
            .await
            .map_err(|err| warn!("add_source_channel: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_remove_source_channel(&self, channel_id: &str) -> crate::Result<bool> {
        let result = self
            .channels
            .delete_one(doc! {"channel_id": channel_id}, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn remove_source_channel(&self, channel_id: &str) -> bool {
        self.try_remove_source_channel(channel_id)
            .await
            .map_err(|err| warn!("remove_source_channel: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_get_all_channels(&self) -> crate::Result<Vec<Channel>> {
        Ok(collect!(self.channels.find(doc! {}, None).await?))
    }

    pub async fn get_all_channels(&self) -> Vec<Channel> {
        self.try_get_all_channels()
            .await
            .map_err(|err| warn!("get_all_channels: {err:#}"))
            .unwrap_or_default()
    }

    /// reports success even when no channel matched, matching the write's
    /// fire-and-forget shape
    pub async fn try_set_forward_mode(
        &self,
        channel_id: &str,
        mode: ForwardMode,
    ) -> crate::Result<()> {
        self.channels
            .update_one(
                doc! {"channel_id": channel_id},
                doc! {"$set": {"forward_mode": to_bson(&mode)?}},
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn set_forward_mode(&self, channel_id: &str, mode: ForwardMode) -> bool {
        self.try_set_forward_mode(channel_id, mode)
            .await
            .map_err(|err| warn!("set_forward_mode: {err:#}"))
            .is_ok()
    }

    pub async fn try_get_channel_count(&self) -> crate::Result<u64> {
        Ok(self.channels.count_documents(doc! {}, None).await?)
    }

    pub async fn get_channel_count(&self) -> u64 {
        self.try_get_channel_count()
            .await
            .map_err(|err| warn!("get_channel_count: {err:#}"))
            .unwrap_or_default()
    }
}
