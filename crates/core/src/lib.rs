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

//! The booking assignment and acceptance engine.
//!
//! The engine owns all mutable booking state: the per-booking capacity
//! ledger, the assignment records, and the token registry. Acceptance
//! is the only externally raced operation; all capacity checks and
//! status transitions for one booking happen inside that booking's
//! guarded section, so two workers racing for the last slot yield
//! exactly one accepted and one expired outcome.

mod engine;
mod error;
mod ledger;
mod results;

#[cfg(test)]
mod tests;

pub use engine::Engine;
pub use error::CoreError;
pub use results::{
    Acceptance, InvitationDetails, IssuedInvitation, RegisteredBooking, TokenDetails, Withdrawal,
};
