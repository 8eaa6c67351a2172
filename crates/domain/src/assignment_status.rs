// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment status tracking and transition logic.
//!
//! An assignment tracks one worker's invitation-to-acceptance progress
//! for one booking. Acceptance is irreversible with one exception: an
//! accepted worker may explicitly withdraw, which frees the slot.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Assignment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Invitation issued, awaiting the worker's decision
    Pending,
    /// Worker accepted; occupies one capacity slot
    Accepted,
    /// Token validity elapsed, or the booking filled before redemption
    Expired,
    /// Explicitly withdrawn or superseded by a re-issued invitation
    Cancelled,
}

impl AssignmentStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidAssignmentStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal for the acceptance flow.
    ///
    /// Accepted is terminal for acceptance purposes: it may only leave
    /// via explicit withdrawal, never back to Pending.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Expired | Self::Cancelled)
    }

    /// Returns true if the assignment still counts toward the one-active-per-worker rule.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Pending => matches!(
                new_status,
                Self::Accepted | Self::Expired | Self::Cancelled
            ),
            // Withdrawal after acceptance is the only exit from Accepted.
            Self::Accepted => matches!(new_status, Self::Cancelled),
            Self::Expired | Self::Cancelled => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by assignment lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
