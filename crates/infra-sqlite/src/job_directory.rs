// SQLite JobDirectory Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use phresh_core::domain::{Job, JobId, UserId};
use phresh_core::error::{AppError, Result};
use phresh_core::port::{JobDirectory, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

pub struct SqliteJobDirectory {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteJobDirectory {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl JobDirectory for SqliteJobDirectory {
    async fn register(&self, owner_id: UserId, name: &str) -> Result<Job> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Job name must not be empty".to_string()));
        }

        let row: JobRow = sqlx::query_as(
            r#"
            INSERT INTO jobs (owner_id, name, created_at)
            VALUES (?, ?, ?)
            RETURNING id, owner_id, name, created_at
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(self.time_provider.now_millis())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let job = row.into_job();
        info!(job_id = job.id, owner_id, "Job registered");
        Ok(job)
    }

    async fn find_by_id(&self, job_id: JobId) -> Result<Option<Job>> {
        let row: Option<JobRow> =
            sqlx::query_as("SELECT id, owner_id, name, created_at FROM jobs WHERE id = ?")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(JobRow::into_job))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    owner_id: i64,
    name: String,
    created_at: i64,
}

impl JobRow {
    fn into_job(self) -> Job {
        Job {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}
