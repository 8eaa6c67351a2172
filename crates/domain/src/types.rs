// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment_status::AssignmentStatus;
use crate::booking_status::BookingStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Opaque identifier for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId {
    value: String,
}

impl BookingId {
    /// Creates a new `BookingId`.
    ///
    /// The value is trimmed; identity comparison is exact after trimming.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Opaque identifier for a worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId {
    value: String,
}

impl WorkerId {
    /// Creates a new `WorkerId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Opaque identifier for an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId {
    value: String,
}

impl AssignmentId {
    /// Creates a new `AssignmentId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Input data for admitting an externally created booking.
///
/// Identity, status, and timestamps are assigned by the engine on
/// admission; the draft carries only business-supplied fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// The kind of work requested (e.g., "waiter", "electrician").
    pub service_type: String,
    /// Where the work takes place.
    pub location: String,
    /// How many workers the booking requires. Positive; immutable once confirmed.
    pub workers_needed: u32,
    /// Duration of the job in days, when known.
    pub number_of_days: Option<u32>,
    /// Per worker-day price proposed by the business; the undifferentiated fallback.
    pub negotiated_price: Option<f64>,
    /// Admin-set total pool for the whole booking, split across all workers.
    pub payment_amount: Option<f64>,
    /// Admin-set total per worker for the whole job; authoritative over the pool.
    pub amount_per_worker: Option<f64>,
}

/// A staffing requirement posted by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// The booking identity.
    pub id: BookingId,
    /// The kind of work requested.
    pub service_type: String,
    /// Where the work takes place.
    pub location: String,
    /// How many workers the booking requires.
    pub workers_needed: u32,
    /// Duration of the job in days, when known.
    pub number_of_days: Option<u32>,
    /// Per worker-day price proposed by the business.
    pub negotiated_price: Option<f64>,
    /// Admin-set total pool for the whole booking.
    pub payment_amount: Option<f64>,
    /// Admin-set total per worker for the whole job.
    pub amount_per_worker: Option<f64>,
    /// Admin-set flat totals agreed with individual workers.
    ///
    /// An entry here is authoritative over the pool for that worker.
    pub flat_overrides: HashMap<WorkerId, f64>,
    /// The current lifecycle status.
    pub status: BookingStatus,
    /// When the booking was admitted.
    pub created_at: OffsetDateTime,
}

impl Booking {
    /// Builds a booking from a validated draft.
    ///
    /// The caller is responsible for having validated the draft via
    /// [`crate::validate_booking_draft`] first.
    #[must_use]
    pub fn from_draft(id: BookingId, draft: BookingDraft, now: OffsetDateTime) -> Self {
        Self {
            id,
            service_type: draft.service_type,
            location: draft.location,
            workers_needed: draft.workers_needed,
            number_of_days: draft.number_of_days,
            negotiated_price: draft.negotiated_price,
            payment_amount: draft.payment_amount,
            amount_per_worker: draft.amount_per_worker,
            flat_overrides: HashMap::new(),
            status: BookingStatus::Pending,
            created_at: now,
        }
    }
}

/// The relationship between one worker and one booking.
///
/// `worker_id` is `None` for an open invitation until a worker redeems
/// it, at which point the worker is bound permanently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The assignment identity.
    pub id: AssignmentId,
    /// The booking this assignment belongs to.
    pub booking_id: BookingId,
    /// The bound worker, if any.
    pub worker_id: Option<WorkerId>,
    /// The current lifecycle status.
    pub status: AssignmentStatus,
    /// The opaque value of the invitation token bound to this assignment.
    pub token_ref: String,
    /// When the assignment was created.
    pub created_at: OffsetDateTime,
    /// When the assignment reached a terminal status, if it has.
    pub resolved_at: Option<OffsetDateTime>,
}

impl Assignment {
    /// Creates a new pending assignment.
    #[must_use]
    pub const fn new(
        id: AssignmentId,
        booking_id: BookingId,
        worker_id: Option<WorkerId>,
        token_ref: String,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            booking_id,
            worker_id,
            status: AssignmentStatus::Pending,
            token_ref,
            created_at,
            resolved_at: None,
        }
    }

    /// Returns true if this assignment counts toward the one-active-per-worker rule.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if this assignment belongs to the given worker.
    #[must_use]
    pub fn is_for_worker(&self, worker: &WorkerId) -> bool {
        self.worker_id.as_ref() == Some(worker)
    }
}
