// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-booking capacity ledger.
//!
//! A [`BookingSlot`] is the unit of mutual exclusion: one booking, its
//! assignments, and the accepted count derived from them. The engine
//! only ever mutates a slot while holding that slot's lock, so the
//! counts read here are exact, never snapshots.

use crate::error::CoreError;
use crewcall_domain::{Assignment, AssignmentId, AssignmentStatus, Booking, WorkerId};
use time::OffsetDateTime;

/// One booking plus every assignment ever issued against it.
#[derive(Debug)]
pub(crate) struct BookingSlot {
    /// The booking record.
    pub(crate) booking: Booking,
    /// All assignments for this booking, in issue order.
    pub(crate) assignments: Vec<Assignment>,
}

impl BookingSlot {
    pub(crate) const fn new(booking: Booking) -> Self {
        Self {
            booking,
            assignments: Vec::new(),
        }
    }

    /// Count of assignments currently accepted.
    pub(crate) fn accepted_count(&self) -> u32 {
        let count = self
            .assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Accepted)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Whether another assignment may still be accepted.
    pub(crate) fn has_capacity(&self) -> bool {
        self.accepted_count() < self.booking.workers_needed
    }

    /// Fails loudly if the ledger ever over-allocated.
    ///
    /// Under per-booking exclusion this cannot fire; if it does, the
    /// fault is fatal and must not be silently corrected.
    pub(crate) fn check_invariant(&self) -> Result<u32, CoreError> {
        let accepted = self.accepted_count();
        if accepted > self.booking.workers_needed {
            return Err(CoreError::InvariantViolation {
                booking_id: self.booking.id.clone(),
                accepted,
                needed: self.booking.workers_needed,
            });
        }
        Ok(accepted)
    }

    /// Finds the index of an assignment by id.
    pub(crate) fn assignment_index(&self, id: &AssignmentId) -> Option<usize> {
        self.assignments.iter().position(|a| &a.id == id)
    }

    /// Finds the worker's active (pending or accepted) assignment, if any.
    ///
    /// At most one exists per worker; re-issuing supersedes rather than
    /// duplicates.
    pub(crate) fn active_assignment_index_for(&self, worker: &WorkerId) -> Option<usize> {
        self.assignments
            .iter()
            .position(|a| a.is_active() && a.is_for_worker(worker))
    }

    /// Finds the worker's accepted assignment, if any.
    ///
    /// Acceptance checks this before allocating so a worker holding
    /// tokens from several invitations never takes a second slot.
    pub(crate) fn accepted_assignment_index_for(&self, worker: &WorkerId) -> Option<usize> {
        self.assignments
            .iter()
            .position(|a| a.status == AssignmentStatus::Accepted && a.is_for_worker(worker))
    }

    /// A compact capacity snapshot for audit events.
    pub(crate) fn snapshot(&self) -> String {
        format!(
            "status={},accepted={},pending={},needed={}",
            self.booking.status,
            self.accepted_count(),
            self.assignments
                .iter()
                .filter(|a| a.status == AssignmentStatus::Pending)
                .count(),
            self.booking.workers_needed
        )
    }

    /// Expires every remaining pending assignment.
    ///
    /// Called once capacity is reached so no worker later believes they
    /// still hold a live invitation. Returns the expired ids.
    pub(crate) fn cascade_expire(&mut self, now: OffsetDateTime) -> Vec<AssignmentId> {
        let mut expired = Vec::new();
        for assignment in &mut self.assignments {
            if assignment.status == AssignmentStatus::Pending {
                assignment.status = AssignmentStatus::Expired;
                assignment.resolved_at = Some(now);
                expired.push(assignment.id.clone());
            }
        }
        expired
    }
}
