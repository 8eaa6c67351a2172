// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invitation token records.
//!
//! A token is the capability granting one worker (or any worker, for
//! open postings) the right to attempt acceptance of one booking. The
//! opaque value is minted by the engine; this module only models the
//! record and its local expiry/consumption checks.

use crate::types::{AssignmentId, BookingId, WorkerId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single-purpose invitation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationToken {
    /// The opaque, unguessable token value handed to the worker.
    pub value: String,
    /// The booking this token grants access to.
    pub booking_id: BookingId,
    /// The worker the token is bound to. `None` means any worker may redeem it.
    pub worker_id: Option<WorkerId>,
    /// The assignment created alongside this token.
    pub assignment_id: AssignmentId,
    /// When the token was minted.
    pub issued_at: OffsetDateTime,
    /// When the token stops being redeemable.
    pub expires_at: OffsetDateTime,
    /// Whether the token has been consumed by a successful acceptance.
    ///
    /// Once set this never clears, even if the assignment is later cancelled.
    pub consumed: bool,
}

impl InvitationToken {
    /// Creates a new unconsumed token.
    #[must_use]
    pub const fn new(
        value: String,
        booking_id: BookingId,
        worker_id: Option<WorkerId>,
        assignment_id: AssignmentId,
        issued_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Self {
        Self {
            value,
            booking_id,
            worker_id,
            assignment_id,
            issued_at,
            expires_at,
            consumed: false,
        }
    }

    /// Returns true if the token's validity window has elapsed.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the token is bound to a specific worker.
    #[must_use]
    pub const fn is_worker_bound(&self) -> bool {
        self.worker_id.is_some()
    }

    /// Checks whether the given worker may redeem this token.
    ///
    /// Open tokens may be redeemed by any worker.
    #[must_use]
    pub fn permits(&self, worker: &WorkerId) -> bool {
        match &self.worker_id {
            Some(bound) => bound == worker,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn token_for(worker: Option<&str>) -> InvitationToken {
        let now = OffsetDateTime::UNIX_EPOCH;
        InvitationToken::new(
            String::from("tok-abc123"),
            BookingId::new("b-1"),
            worker.map(WorkerId::new),
            AssignmentId::new("a-1"),
            now,
            now + Duration::hours(24),
        )
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let token = token_for(None);
        let just_before = token.expires_at - Duration::seconds(1);
        assert!(!token.is_expired(just_before));
        assert!(token.is_expired(token.expires_at));
    }

    #[test]
    fn test_bound_token_permits_only_bound_worker() {
        let token = token_for(Some("w-7"));
        assert!(token.permits(&WorkerId::new("w-7")));
        assert!(!token.permits(&WorkerId::new("w-8")));
    }

    #[test]
    fn test_open_token_permits_any_worker() {
        let token = token_for(None);
        assert!(token.permits(&WorkerId::new("w-7")));
        assert!(token.permits(&WorkerId::new("w-8")));
    }
}
