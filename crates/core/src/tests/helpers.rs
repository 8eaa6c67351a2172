// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::Engine;
use crewcall_audit::{Actor, Cause};
use crewcall_domain::{BookingDraft, BookingId, WorkerId};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-01-04 09:00 UTC)
}

pub fn admin_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn worker_actor(id: &str) -> Actor {
    Actor::new(String::from(id), String::from("worker"))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("test request"))
}

pub fn pool_draft(workers_needed: u32, pool: f64, days: Option<u32>) -> BookingDraft {
    BookingDraft {
        service_type: String::from("waiter"),
        location: String::from("Indiranagar"),
        workers_needed,
        number_of_days: days,
        negotiated_price: None,
        payment_amount: Some(pool),
        amount_per_worker: None,
    }
}

pub fn unpriced_draft(workers_needed: u32) -> BookingDraft {
    BookingDraft {
        service_type: String::from("cleaner"),
        location: String::from("Whitefield"),
        workers_needed,
        number_of_days: None,
        negotiated_price: None,
        payment_amount: None,
        amount_per_worker: None,
    }
}

/// Registers a booking and returns its id.
pub fn register(engine: &Engine, draft: BookingDraft) -> BookingId {
    engine
        .register_booking(draft, admin_actor(), test_cause(), test_now())
        .unwrap()
        .booking
        .id
}

/// Issues a worker-bound invitation and returns the token value.
pub fn issue_for(engine: &Engine, booking_id: &BookingId, worker: &str) -> String {
    engine
        .issue(
            booking_id,
            Some(WorkerId::new(worker)),
            3600,
            admin_actor(),
            test_cause(),
            test_now(),
        )
        .unwrap()
        .token
        .value
}
