use crate::collect;
use crate::db::Store;
use crate::structures::models::BannedUser;
use chrono::Utc;
use futures_util::StreamExt;
use log::warn;
use mongodb::bson::doc;

impl Store {
    /// banned-by-existence: a matching record means banned
    pub async fn try_is_user_banned(&self, user_id: i64) -> crate::Result<bool> {
        Ok(self
            .banned_users
            .find_one(doc! {"user_id": user_id.to_string()}, None)
            .await?
            .is_some())
    }

    pub async fn is_user_banned(&self, user_id: i64) -> bool {
        self.try_is_user_banned(user_id)
            .await
            .map_err(|err| warn!("is_user_banned: {err:#}"))
            .unwrap_or_default()
    }

    /// Inserts unconditionally: banning an already-banned id stacks a second
    /// record. Kept that way, callers gate on [`Store::is_user_banned`].
    pub async fn try_ban_user(
        &self,
        user_id: i64,
        username: &str,
        reason: Option<&str>,
    ) -> crate::Result<()> {
        self.banned_users
            .insert_one(
                BannedUser {
                    id: None,
                    user_id: user_id.to_string(),
                    username: username.to_string(),
                    reason: reason.unwrap_or("No reason").to_string(),
                    banned_date: Utc::now(),
                },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn ban_user(&self, user_id: i64, username: &str, reason: Option<&str>) -> bool {
        self.try_ban_user(user_id, username, reason)
            .await
            .map_err(|err| warn!("ban_user: {err:#}"))
            .is_ok()
    }

    /// true only when a ban record was actually removed
    pub async fn try_unban_user(&self, user_id: i64) -> crate::Result<bool> {
        let result = self
            .banned_users
            .delete_one(doc! {"user_id": user_id.to_string()}, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn unban_user(&self, user_id: i64) -> bool {
        self.try_unban_user(user_id)
            .await
            .map_err(|err| warn!("unban_user: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_get_banned_users(&self) -> crate::Result<Vec<BannedUser>> {
        Ok(collect!(self.banned_users.find(doc! {}, None).await?))
    }

    pub async fn get_banned_users(&self) -> Vec<BannedUser> {
        self.try_get_banned_users()
            .await
            .map_err(|err| warn!("get_banned_users: {err:#}"))
            .unwrap_or_default()
    }

    pub async fn try_get_ban_info(&self, user_id: i64) -> crate::Result<Option<BannedUser>> {
        Ok(self
            .banned_users
            .find_one(doc! {"user_id": user_id.to_string()}, None)
            .await?)
    }

    /// None means not banned or unreachable store, callers cannot tell apart
    pub async fn get_ban_info(&self, user_id: i64) -> Option<BannedUser> {
        self.try_get_ban_info(user_id)
            .await
            .map_err(|err| warn!("get_ban_info: {err:#}"))
            .unwrap_or_default()
    }
}
