// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Booking identifier is empty or invalid.
    InvalidBookingId(String),
    /// Worker identifier is empty or invalid.
    InvalidWorkerId(String),
    /// Service type is empty or invalid.
    InvalidServiceType(String),
    /// Location is empty or invalid.
    InvalidLocation(String),
    /// Workers-needed count must be a positive integer.
    InvalidWorkersNeeded {
        /// The invalid count value.
        count: u32,
    },
    /// Number-of-days must be a positive integer when present.
    InvalidNumberOfDays {
        /// The invalid day count.
        days: u32,
    },
    /// A pricing field must be non-negative.
    InvalidPricingField {
        /// The field that was invalid.
        field: &'static str,
        /// The invalid amount.
        amount: f64,
    },
    /// Token time-to-live must be positive.
    InvalidTokenTtl {
        /// The invalid TTL in seconds.
        seconds: i64,
    },
    /// A booking status string could not be parsed.
    InvalidBookingStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// An assignment status string could not be parsed.
    InvalidAssignmentStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBookingId(msg) => write!(f, "Invalid booking id: {msg}"),
            Self::InvalidWorkerId(msg) => write!(f, "Invalid worker id: {msg}"),
            Self::InvalidServiceType(msg) => write!(f, "Invalid service type: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidWorkersNeeded { count } => {
                write!(
                    f,
                    "Invalid workers-needed count: {count}. Must be greater than 0"
                )
            }
            Self::InvalidNumberOfDays { days } => {
                write!(
                    f,
                    "Invalid number of days: {days}. Must be greater than 0 when set"
                )
            }
            Self::InvalidPricingField { field, amount } => {
                write!(
                    f,
                    "Invalid pricing field '{field}': {amount}. Must be non-negative"
                )
            }
            Self::InvalidTokenTtl { seconds } => {
                write!(
                    f,
                    "Invalid token time-to-live: {seconds} seconds. Must be greater than 0"
                )
            }
            Self::InvalidBookingStatus { status } => {
                write!(f, "Invalid booking status: '{status}'")
            }
            Self::InvalidAssignmentStatus { status } => {
                write!(f, "Invalid assignment status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from '{from}' to '{to}': {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
