// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment_status;
mod booking_status;
mod earnings;
mod error;
mod token;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use assignment_status::AssignmentStatus;
pub use booking_status::BookingStatus;
pub use earnings::{EarningsQuote, QuoteSource, quote};
pub use error::DomainError;
pub use token::InvitationToken;
pub use types::{Assignment, AssignmentId, Booking, BookingDraft, BookingId, WorkerId};
pub use validation::{validate_booking_draft, validate_token_ttl, validate_workers_needed};
