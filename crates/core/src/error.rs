// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall_domain::{AssignmentId, AssignmentStatus, BookingId, BookingStatus, DomainError};
use time::OffsetDateTime;

/// Errors produced by the acceptance engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The booking does not exist.
    BookingNotFound(BookingId),
    /// The booking's lifecycle state does not permit the operation.
    InvalidBookingState {
        /// The booking.
        booking_id: BookingId,
        /// The booking's current status.
        status: BookingStatus,
        /// Why the operation was rejected.
        reason: String,
    },
    /// The worker already holds an accepted assignment on this booking.
    AlreadyAccepted {
        /// The booking.
        booking_id: BookingId,
        /// The accepted assignment.
        assignment_id: AssignmentId,
    },
    /// The assignment does not exist.
    AssignmentNotFound(AssignmentId),
    /// The token value is unknown.
    TokenNotFound,
    /// The token's validity window has elapsed.
    TokenExpired {
        /// When the token expired.
        expired_at: OffsetDateTime,
    },
    /// The token was already consumed by a successful acceptance.
    TokenAlreadyUsed,
    /// The redeeming worker does not match the token's binding.
    Forbidden {
        /// Why redemption was refused.
        reason: String,
    },
    /// The booking filled before this assignment could be accepted.
    CapacityExceeded {
        /// The booking that is full.
        booking_id: BookingId,
    },
    /// The assignment has already been resolved by someone else.
    AssignmentNotPending {
        /// The assignment.
        assignment_id: AssignmentId,
        /// Its current status.
        status: AssignmentStatus,
    },
    /// The per-booking guarded section could not be entered in time.
    ///
    /// Safe to retry shortly; the engine never blocks callers
    /// indefinitely on a contended booking.
    Busy {
        /// The contended booking.
        booking_id: BookingId,
    },
    /// The accepted count exceeds the required count.
    ///
    /// This is structurally impossible under the per-booking exclusion
    /// and indicates a fatal internal-consistency fault. It is never
    /// silently corrected.
    InvariantViolation {
        /// The booking whose ledger is inconsistent.
        booking_id: BookingId,
        /// The observed accepted count.
        accepted: u32,
        /// The configured capacity.
        needed: u32,
    },
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// An unexpected internal error occurred.
    Internal(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookingNotFound(id) => write!(f, "Booking '{id}' not found"),
            Self::InvalidBookingState {
                booking_id,
                status,
                reason,
            } => {
                write!(
                    f,
                    "Booking '{booking_id}' is '{status}' and cannot be operated on: {reason}"
                )
            }
            Self::AlreadyAccepted {
                booking_id,
                assignment_id,
            } => {
                write!(
                    f,
                    "Worker already holds accepted assignment '{assignment_id}' on booking '{booking_id}'"
                )
            }
            Self::AssignmentNotFound(id) => write!(f, "Assignment '{id}' not found"),
            Self::TokenNotFound => write!(f, "Invitation token not found"),
            Self::TokenExpired { expired_at } => {
                write!(f, "Invitation token expired at {expired_at}")
            }
            Self::TokenAlreadyUsed => write!(f, "Invitation token has already been used"),
            Self::Forbidden { reason } => write!(f, "Redemption forbidden: {reason}"),
            Self::CapacityExceeded { booking_id } => {
                write!(f, "Booking '{booking_id}' has no remaining slots")
            }
            Self::AssignmentNotPending {
                assignment_id,
                status,
            } => {
                write!(
                    f,
                    "Assignment '{assignment_id}' is already resolved as '{status}'"
                )
            }
            Self::Busy { booking_id } => {
                write!(
                    f,
                    "Booking '{booking_id}' is busy; retry the request shortly"
                )
            }
            Self::InvariantViolation {
                booking_id,
                accepted,
                needed,
            } => {
                write!(
                    f,
                    "FATAL: booking '{booking_id}' has {accepted} accepted assignments but only {needed} are allowed"
                )
            }
            Self::DomainViolation(err) => write!(f, "Domain rule violation: {err}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
