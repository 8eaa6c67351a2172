// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking status tracking and transition logic.
//!
//! Only the `Pending -> Assigned` transition is driven by this core
//! (triggered by the first accepted assignment). Confirmed, Completed,
//! and Cancelled arrive from the external business workflow; the
//! lifecycle rules here still enforce their terminality.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Booking lifecycle states for a staffing requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created by a business submission; no accepted worker yet
    Pending,
    /// At least one assignment has been accepted
    Assigned,
    /// Confirmed by the external business workflow
    Confirmed,
    /// Work finished
    Completed,
    /// Withdrawn by the business or an admin
    Cancelled,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if the booking may still have invitations issued against it.
    ///
    /// Capacity is checked separately by the ledger; this only answers
    /// whether the lifecycle state admits new invitations at all.
    #[must_use]
    pub const fn accepts_invitations(&self) -> bool {
        matches!(self, Self::Pending | Self::Assigned)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(new_status, Self::Assigned | Self::Cancelled),
            Self::Assigned => matches!(new_status, Self::Confirmed | Self::Cancelled),
            Self::Confirmed => matches!(new_status, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by booking lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        let statuses = vec![
            BookingStatus::Pending,
            BookingStatus::Assigned,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ];

        for status in statuses {
            let s = status.as_str();
            match BookingStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = BookingStatus::parse_str("open");
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Assigned.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_invitation_eligibility() {
        assert!(BookingStatus::Pending.accepts_invitations());
        assert!(BookingStatus::Assigned.accepts_invitations());
        assert!(!BookingStatus::Confirmed.accepts_invitations());
        assert!(!BookingStatus::Completed.accepts_invitations());
        assert!(!BookingStatus::Cancelled.accepts_invitations());
    }

    #[test]
    fn test_pending_to_assigned_is_valid() {
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Assigned)
                .is_ok()
        );
    }

    #[test]
    fn test_pending_cannot_skip_to_confirmed() {
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Confirmed)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(
                terminal
                    .validate_transition(BookingStatus::Assigned)
                    .is_err()
            );
            assert!(
                terminal
                    .validate_transition(BookingStatus::Pending)
                    .is_err()
            );
        }
    }
}
