// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Result types returned by the engine's operations.
//!
//! Transitions are atomic: they either succeed completely, returning
//! one of these results together with the audit event that records
//! them, or fail without side effects.

use crewcall_audit::AuditEvent;
use crewcall_domain::{
    Assignment, AssignmentId, Booking, BookingId, BookingStatus, EarningsQuote, InvitationToken,
    WorkerId,
};
use time::OffsetDateTime;

/// The result of admitting an externally created booking.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredBooking {
    /// The admitted booking.
    pub booking: Booking,
    /// The audit event recording the admission.
    pub audit_event: AuditEvent,
}

/// The result of issuing an invitation.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedInvitation {
    /// The pending assignment created for the invitation.
    pub assignment: Assignment,
    /// The minted token, including its opaque value.
    pub token: InvitationToken,
    /// The prior pending assignment this issue superseded, if any.
    pub superseded: Option<AssignmentId>,
    /// The audit event recording the issue.
    pub audit_event: AuditEvent,
}

/// The identity bound into a validated token.
///
/// Validation is read-only; it never consumes the token, so a worker
/// can re-view invitation details without burning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    /// The booking the token grants access to.
    pub booking_id: BookingId,
    /// The bound worker, if the token is worker-bound.
    pub worker_id: Option<WorkerId>,
    /// The assignment the token is bound to.
    pub assignment_id: AssignmentId,
    /// When the token stops being redeemable.
    pub expires_at: OffsetDateTime,
}

/// A read-only invitation view: booking summary plus computed quote.
#[derive(Debug, Clone, PartialEq)]
pub struct InvitationDetails {
    /// The booking the invitation is for.
    pub booking: Booking,
    /// The bound worker, if any.
    pub worker_id: Option<WorkerId>,
    /// The assignment the token is bound to.
    pub assignment_id: AssignmentId,
    /// When the token stops being redeemable.
    pub expires_at: OffsetDateTime,
    /// The computed earnings quote, when any pricing field is set.
    pub quote: Option<EarningsQuote>,
}

/// The result of a successful redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct Acceptance {
    /// The accepted assignment.
    pub assignment: Assignment,
    /// The booking status after the acceptance.
    pub booking_status: BookingStatus,
    /// The computed earnings quote for the accepting worker.
    pub quote: Option<EarningsQuote>,
    /// True when this call was an idempotent replay of an acceptance
    /// that had already happened, rather than a new transition.
    pub already_accepted: bool,
    /// Sibling assignments cascade-expired because this acceptance
    /// filled the booking.
    pub expired_siblings: Vec<AssignmentId>,
    /// The audit event recording the transition. `None` only for an
    /// idempotent replay, which changes no state.
    pub audit_event: Option<AuditEvent>,
}

/// The result of an explicit withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    /// The cancelled assignment.
    pub assignment: Assignment,
    /// The booking status after the withdrawal.
    pub booking_status: BookingStatus,
    /// The audit event recording the withdrawal.
    pub audit_event: AuditEvent,
}
