// SQLite EvaluationRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use phresh_core::domain::{Evaluation, EvaluationAggregate, JobId, UserId};
use phresh_core::error::Result;
use phresh_core::port::EvaluationRepository;
use sqlx::SqlitePool;

const EVALUATION_COLUMNS: &str = "job_id, cleaner_id, no_show, headline, comment, \
     professionalism, completeness, efficiency, overall_rating, created_at, updated_at";

pub struct SqliteEvaluationRepository {
    pool: SqlitePool,
}

impl SqliteEvaluationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvaluationRepository for SqliteEvaluationRepository {
    async fn find(&self, job_id: JobId, cleaner_id: UserId) -> Result<Option<Evaluation>> {
        let row: Option<EvaluationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM evaluations WHERE job_id = ? AND cleaner_id = ?",
            EVALUATION_COLUMNS
        ))
        .bind(job_id)
        .bind(cleaner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(EvaluationRow::into_evaluation))
    }

    async fn list_for_cleaner(&self, cleaner_id: UserId) -> Result<Vec<Evaluation>> {
        let rows: Vec<EvaluationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM evaluations WHERE cleaner_id = ? ORDER BY created_at, job_id",
            EVALUATION_COLUMNS
        ))
        .bind(cleaner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EvaluationRow::into_evaluation).collect())
    }

    async fn aggregate_for_cleaner(&self, cleaner_id: UserId) -> Result<EvaluationAggregate> {
        // AVG/MIN/MAX skip NULLs and yield NULL over zero rows
        let row: AggregateRow = sqlx::query_as(
            r#"
            SELECT
                COALESCE(AVG(professionalism), 0.0) AS avg_professionalism,
                COALESCE(AVG(completeness), 0.0) AS avg_completeness,
                COALESCE(AVG(efficiency), 0.0) AS avg_efficiency,
                COALESCE(AVG(overall_rating), 0.0) AS avg_overall_rating,
                COALESCE(MAX(overall_rating), 0) AS max_overall_rating,
                COALESCE(MIN(overall_rating), 0) AS min_overall_rating,
                COALESCE(SUM(CASE WHEN overall_rating = 1 THEN 1 ELSE 0 END), 0) AS one_stars,
                COALESCE(SUM(CASE WHEN overall_rating = 2 THEN 1 ELSE 0 END), 0) AS two_stars,
                COALESCE(SUM(CASE WHEN overall_rating = 3 THEN 1 ELSE 0 END), 0) AS three_stars,
                COALESCE(SUM(CASE WHEN overall_rating = 4 THEN 1 ELSE 0 END), 0) AS four_stars,
                COALESCE(SUM(CASE WHEN overall_rating = 5 THEN 1 ELSE 0 END), 0) AS five_stars,
                COUNT(*) AS total_evaluations,
                COALESCE(SUM(no_show), 0) AS total_no_show
            FROM evaluations
            WHERE cleaner_id = ?
            "#,
        )
        .bind(cleaner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_aggregate())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EvaluationRow {
    job_id: i64,
    cleaner_id: i64,
    no_show: bool,
    headline: Option<String>,
    comment: Option<String>,
    professionalism: Option<i32>,
    completeness: Option<i32>,
    efficiency: Option<i32>,
    overall_rating: i32,
    created_at: i64,
    updated_at: i64,
}

impl EvaluationRow {
    fn into_evaluation(self) -> Evaluation {
        Evaluation {
            job_id: self.job_id,
            cleaner_id: self.cleaner_id,
            no_show: self.no_show,
            headline: self.headline,
            comment: self.comment,
            professionalism: self.professionalism,
            completeness: self.completeness,
            efficiency: self.efficiency,
            overall_rating: self.overall_rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AggregateRow {
    avg_professionalism: f64,
    avg_completeness: f64,
    avg_efficiency: f64,
    avg_overall_rating: f64,
    max_overall_rating: i64,
    min_overall_rating: i64,
    one_stars: i64,
    two_stars: i64,
    three_stars: i64,
    four_stars: i64,
    five_stars: i64,
    total_evaluations: i64,
    total_no_show: i64,
}

impl AggregateRow {
    fn into_aggregate(self) -> EvaluationAggregate {
        EvaluationAggregate {
            avg_professionalism: self.avg_professionalism,
            avg_completeness: self.avg_completeness,
            avg_efficiency: self.avg_efficiency,
            avg_overall_rating: self.avg_overall_rating,
            // Ratings are CHECK-constrained to 0..=5
            max_overall_rating: self.max_overall_rating as i32,
            min_overall_rating: self.min_overall_rating as i32,
            one_stars: self.one_stars,
            two_stars: self.two_stars,
            three_stars: self.three_stars,
            four_stars: self.four_stars,
            five_stars: self.five_stars,
            total_evaluations: self.total_evaluations,
            total_no_show: self.total_no_show,
        }
    }
}
