use crate::db::Store;
use crate::structures::models::StatsReport;
use anyhow::anyhow;
use log::warn;
use mongodb::bson::doc;

impl Store {
    pub async fn try_increment_forwards(&self) -> crate::Result<()> {
        self.stats
            .update_one(doc! {}, doc! {"$inc": {"total_forwards": 1_i64}}, None)
            .await?;
        Ok(())
    }

    /// Fire-and-forget telemetry: bumps the forward counter and only logs
    /// when the write is lost.
    pub async fn increment_forwards(&self) {
        if let Err(err) = self.try_increment_forwards().await {
            warn!("increment_forwards: {err:#}");
        }
    }

    /// Assembles the counter document plus three live counts. Four separate
    /// reads, not a snapshot: concurrent writers can skew the numbers against
    /// each other.
    pub async fn try_get_stats(&self) -> crate::Result<StatsReport> {
        let stats = self
            .stats
            .find_one(doc! {}, None)
            .await?
            .ok_or_else(|| anyhow!("stats document missing"))?;

        Ok(StatsReport {
            total_forwards: stats.total_forwards,
            total_users: self.try_get_user_count().await?,
            total_channels: self.try_get_channel_count().await?,
            banned_users: self.banned_users.count_documents(doc! {}, None).await?,
            start_date: stats.start_date,
        })
    }

    /// On failure hands back the zeroed block stamped with the current time.
    pub async fn get_stats(&self) -> StatsReport {
        self.try_get_stats()
            .await
            .map_err(|err| warn!("get_stats: {err:#}"))
            .unwrap_or_default()
    }
}
