//! Campaign link and video stats queries, plus the `PersistenceSink` impl.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;

use super::db::{unix_timestamp, SqliteStore};
use super::types::{LinkId, VideoStat};
use super::PersistenceSink;
use crate::provider::VideoId;

fn row_to_stat(row: &sqlx::sqlite::SqliteRow) -> Result<VideoStat> {
    let view_count: i64 = row.get("view_count");
    Ok(VideoStat {
        video_id: row.get("video_id"),
        view_count: u64::try_from(view_count).context("negative view_count in video_stats")?,
        updated_at: row.get("updated_at"),
    })
}

impl SqliteStore {
    /// Add an active link from `campaign_id` to `video_id`.
    pub async fn track_link(&self, campaign_id: &str, video_id: &str) -> Result<LinkId> {
        let row_id = sqlx::query(
            r#"
            INSERT INTO campaign_links (campaign_id, video_id, active, created_at)
            VALUES (?1, ?2, 1, ?3)
            "#,
        )
        .bind(campaign_id)
        .bind(video_id)
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        Ok(row_id)
    }

    /// Activate or deactivate every link for `video_id`. Returns links changed.
    pub async fn set_video_active(&self, video_id: &str, active: bool) -> Result<u64> {
        let r = sqlx::query(
            r#"
            UPDATE campaign_links
            SET active = ?1
            WHERE video_id = ?2
            "#,
        )
        .bind(active)
        .bind(video_id)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }

    pub async fn get_stat(&self, video_id: &str) -> Result<Option<VideoStat>> {
        let row = sqlx::query(
            r#"
            SELECT video_id, view_count, updated_at
            FROM video_stats
            WHERE video_id = ?1
            "#,
        )
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_stat).transpose()
    }

    /// All stored stats, ordered by video id.
    pub async fn list_stats(&self) -> Result<Vec<VideoStat>> {
        let rows = sqlx::query(
            r#"
            SELECT video_id, view_count, updated_at
            FROM video_stats
            ORDER BY video_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_stat).collect()
    }
}

#[async_trait]
impl PersistenceSink for SqliteStore {
    async fn find_active_ids(&self) -> Result<Vec<VideoId>> {
        // First-linked order keeps chunk plans stable between runs.
        let rows = sqlx::query(
            r#"
            SELECT video_id, MIN(id) AS first_id
            FROM campaign_links
            WHERE active = 1
            GROUP BY video_id
            ORDER BY first_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(|r| r.get::<String, _>("video_id")).collect())
    }

    async fn upsert(&self, id: &str, view_count: u64) -> Result<VideoStat> {
        let now = unix_timestamp();
        let count = i64::try_from(view_count)
            .with_context(|| format!("view count {view_count} for {id} out of range"))?;
        sqlx::query(
            r#"
            INSERT INTO video_stats (video_id, view_count, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(video_id) DO UPDATE
            SET view_count = excluded.view_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(count)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(VideoStat {
            video_id: id.to_string(),
            view_count,
            updated_at: now,
        })
    }

    async fn delete_unused(&self) -> Result<u64> {
        let r = sqlx::query(
            r#"
            DELETE FROM video_stats
            WHERE video_id NOT IN (
                SELECT video_id FROM campaign_links WHERE active = 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }
}
