// Evaluation Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::job::{JobId, UserId};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 5;
pub const MAX_HEADLINE_LEN: usize = 200;
pub const MAX_COMMENT_LEN: usize = 5000;

/// Evaluation payload submitted by a job owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCreate {
    #[serde(default)]
    pub no_show: bool,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub professionalism: Option<i32>,
    #[serde(default)]
    pub completeness: Option<i32>,
    #[serde(default)]
    pub efficiency: Option<i32>,
    pub overall_rating: i32,
}

impl EvaluationCreate {
    /// Check ratings and text bounds before anything touches the store
    pub fn validate(&self) -> Result<()> {
        check_rating("overall_rating", self.overall_rating)?;
        for (field, value) in [
            ("professionalism", self.professionalism),
            ("completeness", self.completeness),
            ("efficiency", self.efficiency),
        ] {
            if let Some(value) = value {
                check_rating(field, value)?;
            }
        }

        check_text("headline", self.headline.as_deref(), MAX_HEADLINE_LEN)?;
        check_text("comment", self.comment.as_deref(), MAX_COMMENT_LEN)?;
        Ok(())
    }
}

fn check_rating(field: &str, value: i32) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(DomainError::ValidationError(format!(
            "{} must be between {} and {}, got {}",
            field, MIN_RATING, MAX_RATING, value
        )));
    }
    Ok(())
}

fn check_text(field: &str, value: Option<&str>, max_len: usize) -> Result<()> {
    if let Some(text) = value {
        let len = text.chars().count();
        if len > max_len {
            return Err(DomainError::ValidationError(format!(
                "{} too long: {} chars (max {})",
                field, len, max_len
            )));
        }
    }
    Ok(())
}

/// An owner's rating of a cleaner for one job, identified by (job_id, cleaner_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub job_id: JobId,
    pub cleaner_id: UserId,
    pub no_show: bool,
    pub headline: Option<String>,
    pub comment: Option<String>,
    pub professionalism: Option<i32>,
    pub completeness: Option<i32>,
    pub efficiency: Option<i32>,
    pub overall_rating: i32,
    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

impl Evaluation {
    pub fn new(job_id: JobId, cleaner_id: UserId, payload: EvaluationCreate, now_millis: i64) -> Self {
        Self {
            job_id,
            cleaner_id,
            no_show: payload.no_show,
            headline: payload.headline,
            comment: payload.comment,
            professionalism: payload.professionalism,
            completeness: payload.completeness,
            efficiency: payload.efficiency,
            overall_rating: payload.overall_rating,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }
}

/// Rating statistics over every evaluation of one cleaner
///
/// A cleaner with no evaluations gets the all-zero default. Averages of the
/// optional ratings only consider evaluations that supplied that rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationAggregate {
    pub avg_professionalism: f64,
    pub avg_completeness: f64,
    pub avg_efficiency: f64,
    pub avg_overall_rating: f64,
    pub max_overall_rating: i32,
    pub min_overall_rating: i32,
    pub one_stars: i64,
    pub two_stars: i64,
    pub three_stars: i64,
    pub four_stars: i64,
    pub five_stars: i64,
    pub total_evaluations: i64,
    pub total_no_show: i64,
}
