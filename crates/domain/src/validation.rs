// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation of booking input.

use crate::error::DomainError;
use crate::types::BookingDraft;

/// Validates the workers-needed count.
///
/// # Errors
///
/// Returns an error if the count is zero.
pub const fn validate_workers_needed(count: u32) -> Result<(), DomainError> {
    if count == 0 {
        return Err(DomainError::InvalidWorkersNeeded { count });
    }
    Ok(())
}

/// Validates a token time-to-live in seconds.
///
/// # Errors
///
/// Returns an error if the TTL is zero or negative.
pub const fn validate_token_ttl(seconds: i64) -> Result<(), DomainError> {
    if seconds <= 0 {
        return Err(DomainError::InvalidTokenTtl { seconds });
    }
    Ok(())
}

fn validate_pricing_field(field: &'static str, value: Option<f64>) -> Result<(), DomainError> {
    if let Some(amount) = value
        && (!amount.is_finite() || amount < 0.0)
    {
        return Err(DomainError::InvalidPricingField { field, amount });
    }
    Ok(())
}

/// Validates all fields of a booking draft before admission.
///
/// # Errors
///
/// Returns the first violated rule:
/// - service type and location must be non-empty
/// - workers-needed must be positive
/// - number-of-days must be positive when set
/// - all pricing fields must be finite and non-negative
pub fn validate_booking_draft(draft: &BookingDraft) -> Result<(), DomainError> {
    if draft.service_type.trim().is_empty() {
        return Err(DomainError::InvalidServiceType(String::from(
            "service type cannot be empty",
        )));
    }

    if draft.location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "location cannot be empty",
        )));
    }

    validate_workers_needed(draft.workers_needed)?;

    if let Some(days) = draft.number_of_days
        && days == 0
    {
        return Err(DomainError::InvalidNumberOfDays { days });
    }

    validate_pricing_field("negotiated_price", draft.negotiated_price)?;
    validate_pricing_field("payment_amount", draft.payment_amount)?;
    validate_pricing_field("amount_per_worker", draft.amount_per_worker)?;

    Ok(())
}
