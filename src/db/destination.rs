use crate::db::Store;
use crate::structures::models::{Destination, UserDestination};
use chrono::Utc;
use log::warn;
use mongodb::bson::doc;

impl Store {
    /// Replaces the global destination: delete everything, then insert one.
    /// The two round trips are not atomic; a crash between them leaves zero
    /// destinations until the next set.
    pub async fn try_set_destination(&self, channel_id: &str, title: &str) -> crate::Result<()> {
        self.destination.delete_many(doc!(), None).await?;
        self.destination
            .insert_one(
                Destination {
                    id: None,
                    channel_id: channel_id.to_string(),
                    title: title.to_string(),
                    set_date: Utc::now(),
                },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn set_destination(&self, channel_id: &str, title: &str) -> bool {
        self.try_set_destination(channel_id, title)
            .await
            .map_err(|err| warn!("set_destination: {err:#}"))
            .is_ok()
    }

    pub async fn try_get_destination(&self) -> crate::Result<Option<Destination>> {
        Ok(self.destination.find_one(doc! {}, None).await?)
    }

    pub async fn get_destination(&self) -> Option<Destination> {
        self.try_get_destination()
            .await
            .map_err(|err| warn!("get_destination: {err:#}"))
            .unwrap_or_default()
    }

    /// Same replace-all pattern as [`Store::try_set_destination`], scoped to
    /// one user's documents.
    pub async fn try_set_user_destination(
        &self,
        user_id: i64,
        channel_id: &str,
        title: &str,
    ) -> crate::Result<()> {
        let user_id = user_id.to_string();
        self.user_destinations
            .delete_many(doc! {"user_id": &user_id}, None)
            .await?;
        self.user_destinations
            .insert_one(
                UserDestination {
                    id: None,
                    user_id,
                    channel_id: channel_id.to_string(),
                    title: title.to_string(),
                    set_date: Utc::now(),
                },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn set_user_destination(&self, user_id: i64, channel_id: &str, title: &str) -> bool {
        self.try_set_user_destination(user_id, channel_id, title)
            .await
            .map_err(|err| warn!("set_user_destination: {err:#}"))
            .is_ok()
    }

    pub async fn try_get_user_destination(
        &self,
        user_id: i64,
    ) -> crate::Result<Option<UserDestination>> {
        Ok(self
            .user_destinations
            .find_one(doc! {"user_id": user_id.to_string()}, None)
            .await?)
    }

    pub async fn get_user_destination(&self, user_id: i64) -> Option<UserDestination> {
        self.try_get_user_destination(user_id)
            .await
            .map_err(|err| warn!("get_user_destination: {err:#}"))
            .unwrap_or_default()
    }
}
