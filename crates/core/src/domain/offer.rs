// Offer Domain Model
//
// State machine:
//   PENDING  -> ACCEPTED | REJECTED | (deleted by rescind)
//   ACCEPTED -> CANCELLED | COMPLETED
//   REJECTED -> PENDING  (only when the accepted sibling is cancelled)
//   CANCELLED, COMPLETED are terminal

use crate::domain::error::{DomainError, Result};
use crate::domain::job::{JobId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

impl OfferStatus {
    pub const ALL: [OfferStatus; 5] = [
        OfferStatus::Pending,
        OfferStatus::Accepted,
        OfferStatus::Rejected,
        OfferStatus::Cancelled,
        OfferStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Cancelled => "cancelled",
            OfferStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Cancelled | OfferStatus::Completed)
    }

    /// Whether `self -> next` is an edge of the offer state machine
    pub fn can_transition_to(&self, next: OfferStatus) -> bool {
        use OfferStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Rejected)
                | (Accepted, Cancelled)
                | (Accepted, Completed)
                | (Rejected, Pending)
        )
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(OfferStatus::Pending),
            "accepted" => Ok(OfferStatus::Accepted),
            "rejected" => Ok(OfferStatus::Rejected),
            "cancelled" => Ok(OfferStatus::Cancelled),
            "completed" => Ok(OfferStatus::Completed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// One candidate's bid on one job, identified by (job_id, candidate_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub status: OfferStatus,
    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

impl Offer {
    /// Create a new pending offer
    ///
    /// Timestamps are injected rather than read from the clock so that
    /// callers (and tests) control them through a `TimeProvider`.
    pub fn new(job_id: JobId, candidate_id: UserId, now_millis: i64) -> Self {
        Self {
            job_id,
            candidate_id,
            status: OfferStatus::Pending,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    pub fn key(&self) -> (JobId, UserId) {
        (self.job_id, self.candidate_id)
    }

    /// Move along one edge of the state machine
    pub fn transition(&mut self, next: OfferStatus, now_millis: i64) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = now_millis;
        Ok(())
    }

    pub fn accept(&mut self, now_millis: i64) -> Result<()> {
        self.transition(OfferStatus::Accepted, now_millis)
    }

    pub fn reject(&mut self, now_millis: i64) -> Result<()> {
        self.transition(OfferStatus::Rejected, now_millis)
    }

    pub fn cancel(&mut self, now_millis: i64) -> Result<()> {
        self.transition(OfferStatus::Cancelled, now_millis)
    }

    pub fn reopen(&mut self, now_millis: i64) -> Result<()> {
        self.transition(OfferStatus::Pending, now_millis)
    }

    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        self.transition(OfferStatus::Completed, now_millis)
    }

    /// Rescinding deletes the offer, so it is only a check here
    pub fn ensure_rescindable(&self) -> Result<()> {
        if self.status != OfferStatus::Pending {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "rescinded".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_offer_is_pending() {
        let offer = Offer::new(1, 2, 1000);
        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(offer.created_at, 1000);
        assert_eq!(offer.updated_at, 1000);
    }

    #[test]
    fn test_accept_then_complete() {
        let mut offer = Offer::new(1, 2, 1000);
        offer.accept(2000).unwrap();
        assert_eq!(offer.status, OfferStatus::Accepted);
        assert_eq!(offer.updated_at, 2000);

        offer.complete(3000).unwrap();
        assert_eq!(offer.status, OfferStatus::Completed);
        assert!(offer.status.is_terminal());
    }

    #[test]
    fn test_rejected_offer_can_only_reopen() {
        let mut offer = Offer::new(1, 2, 1000);
        offer.reject(2000).unwrap();

        assert!(offer.accept(3000).is_err());
        assert!(offer.cancel(3000).is_err());
        assert!(offer.complete(3000).is_err());

        offer.reopen(4000).unwrap();
        assert_eq!(offer.status, OfferStatus::Pending);
    }

    #[test]
    fn test_pending_offer_cannot_be_cancelled_or_completed() {
        let mut offer = Offer::new(1, 2, 1000);
        let err = offer.cancel(2000).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStateTransition {
                from: "pending".to_string(),
                to: "cancelled".to_string(),
            }
        );
        assert!(offer.complete(2000).is_err());
        assert_eq!(offer.updated_at, 1000, "failed transition must not touch the offer");
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [OfferStatus::Cancelled, OfferStatus::Completed] {
            for next in OfferStatus::ALL {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn test_rescind_only_while_pending() {
        let mut offer = Offer::new(1, 2, 1000);
        assert!(offer.ensure_rescindable().is_ok());

        offer.accept(2000).unwrap();
        assert!(offer.ensure_rescindable().is_err());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "ACCEPTED".parse::<OfferStatus>().unwrap_err();
        assert_eq!(err, DomainError::UnknownStatus("ACCEPTED".to_string()));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OfferStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
