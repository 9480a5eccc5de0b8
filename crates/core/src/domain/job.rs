// Job Domain Model
//
// Jobs are owned by an external collaborator. The marketplace core only
// needs to know who owns a job to decide who may act on its offers.

use serde::{Deserialize, Serialize};

/// Job identifier
pub type JobId = i64;

/// User identifier (job owners and candidates share one id space)
pub type UserId = i64;

/// A cleaning job as seen by the marketplace core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner_id: UserId,
    pub name: String,
    pub created_at: i64, // epoch ms
}

impl Job {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}
