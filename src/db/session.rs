use crate::db::Store;
use crate::structures::models::UserSession;
use log::warn;
use mongodb::bson::{doc, DateTime};
use mongodb::options::UpdateOptions;

impl Store {
    /// Login or re-login: overwrites the session blob and phone, refreshes
    /// `updated_date`, keeps the original `created_date`.
    pub async fn try_save_user_session(
        &self,
        user_id: i64,
        session_string: &str,
        phone: &str,
    ) -> crate::Result<()> {
        self.user_sessions
            .update_one(
                doc! {"user_id": user_id.to_string()},
                doc! {
                    "$set": {
                        "session_string": session_string,
                        "phone": phone,
                        "updated_date": DateTime::now(),
                    },
                    "$setOnInsert": {
                        "created_date": DateTime::now(),
                    },
                },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;
        Ok(())
    }

    pub async fn save_user_session(&self, user_id: i64, session_string: &str, phone: &str) -> bool {
        self.try_save_user_session(user_id, session_string, phone)
            .await
            .map_err(|err| warn!("save_user_session: {err:#}"))
            .is_ok()
    }

    pub async fn try_get_user_session(&self, user_id: i64) -> crate::Result<Option<UserSession>> {
        Ok(self
            .user_sessions
            .find_one(doc! {"user_id": user_id.to_string()}, None)
            .await?)
    }

    pub async fn get_user_session(&self, user_id: i64) -> Option<UserSession> {
        self.try_get_user_session(user_id)
            .await
            .map_err(|err| warn!("get_user_session: {err:#}"))
            .unwrap_or_default()
    }

    /// logout, true only when a session was actually removed
    pub async fn try_delete_user_session(&self, user_id: i64) -> crate::Result<bool> {
        let result = self
            .user_sessions
            .delete_one(doc! {"user_id": user_id.to_string()}, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_user_session(&self, user_id: i64) -> bool {
        self.try_delete_user_session(user_id)
            .await
            .map_err(|err| warn!("delete_user_session: {err:#}"))
            .unwrap_or_default()
    }
}
