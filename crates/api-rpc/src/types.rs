//! RPC Request/Response Types
//!
//! Actor ids are taken from the request as trusted input; authentication
//! happens in front of this API.

use phresh_core::domain::{
    Evaluation, EvaluationCreate, Job, JobId, Offer, OfferStatus, UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// jobs.register.v1 - Register a job and its owner
#[derive(Debug, Deserialize)]
pub struct RegisterJobRequest {
    pub owner_id: UserId,
    pub name: String,
}

/// offers.create.v1 - Submit an offer as `actor_id`
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub actor_id: UserId,
    pub job_id: JobId,
}

/// offers.list.v1 - All offers of a job (owner only)
#[derive(Debug, Deserialize)]
pub struct ListOffersRequest {
    pub actor_id: UserId,
    pub job_id: JobId,
    #[serde(default)]
    pub populate: bool,
}

/// offers.get.v1 - One offer (owner or its candidate)
#[derive(Debug, Deserialize)]
pub struct GetOfferRequest {
    pub actor_id: UserId,
    pub job_id: JobId,
    pub candidate_id: UserId,
    #[serde(default)]
    pub populate: bool,
}

/// offers.accept.v1 - Owner accepts a candidate's offer
#[derive(Debug, Deserialize)]
pub struct AcceptOfferRequest {
    pub actor_id: UserId,
    pub job_id: JobId,
    pub candidate_id: UserId,
}

/// offers.cancel.v1 / offers.rescind.v1 - Candidate acts on their own offer
#[derive(Debug, Deserialize)]
pub struct OwnOfferRequest {
    pub actor_id: UserId,
    pub job_id: JobId,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub owner_id: UserId,
    pub name: String,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            owner_id: job.owner_id,
            name: job.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferResponse {
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub status: OfferStatus,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobSummary>,
}

impl OfferResponse {
    /// Embed the job summary when `populate` was requested
    pub fn new(offer: Offer, job: Option<&Job>) -> Self {
        Self {
            job_id: offer.job_id,
            candidate_id: offer.candidate_id,
            status: offer.status,
            created_at: offer.created_at,
            updated_at: offer.updated_at,
            job: job.map(JobSummary::from),
        }
    }
}

impl From<Offer> for OfferResponse {
    fn from(offer: Offer) -> Self {
        Self::new(offer, None)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RescindResponse {
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub rescinded: bool,
}

/// evaluations.create.v1 - Owner evaluates the accepted cleaner
#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    pub actor_id: UserId,
    pub job_id: JobId,
    pub cleaner_id: UserId,
    pub evaluation: EvaluationCreate,
}

/// evaluations.get.v1
#[derive(Debug, Deserialize)]
pub struct GetEvaluationRequest {
    pub job_id: JobId,
    pub cleaner_id: UserId,
}

/// evaluations.list.v1 / evaluations.stats.v1
#[derive(Debug, Deserialize)]
pub struct CleanerRequest {
    pub cleaner_id: UserId,
}

pub type EvaluationResponse = Evaluation;

/// admin.stats.v1 - Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Offer count per lowercase status name
    pub offers: BTreeMap<String, i64>,
    pub total_offers: i64,
    pub total_evaluations: i64,
    pub uptime_seconds: i64,
}
