// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Earnings quoting for a single worker on a single booking.
//!
//! Bookings carry heterogeneous, partially-set pricing fields. This is
//! the one place the fallback priority between them is decided; every
//! consumer calls [`quote`] rather than re-deriving the arithmetic.
//!
//! Priority, first applicable wins:
//! 1. admin-set total per worker plus day count
//! 2. flat total agreed with this specific worker
//! 3. admin-set total pool split across `workers_needed`
//! 4. the business's undifferentiated negotiated price
//!
//! No field present means no quote: payment is still to be discussed.

use crate::types::{Booking, WorkerId};
use serde::{Deserialize, Serialize};

/// Which pricing field a quote was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// `amount_per_worker` with `number_of_days`
    AdminPerWorker,
    /// A flat total agreed with the specific worker
    WorkerFlat,
    /// `payment_amount` split across `workers_needed`
    AdminTotalPool,
    /// The business's negotiated price, undifferentiated
    FallbackTotal,
}

impl QuoteSource {
    /// Returns the string representation of the source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminPerWorker => "admin_per_worker",
            Self::WorkerFlat => "worker_flat",
            Self::AdminTotalPool => "admin_total_pool",
            Self::FallbackTotal => "fallback_total",
        }
    }
}

/// The computed per-day and total pay for one worker on one booking.
///
/// Amounts stay unrounded so that sums over multiple bookings do not
/// compound rounding error; rounding happens only at display via the
/// `rounded_*` accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsQuote {
    /// Pay per day, unrounded.
    pub daily_amount: f64,
    /// Pay for the whole job, unrounded.
    pub total_amount: f64,
    /// The day count the daily amount was derived over.
    pub days: u32,
    /// The pricing field the quote was derived from.
    pub source: QuoteSource,
}

impl EarningsQuote {
    /// The daily amount rounded to the nearest whole currency unit.
    #[must_use]
    pub fn rounded_daily(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.daily_amount.round() as i64
        }
    }

    /// The total amount rounded to the nearest whole currency unit.
    #[must_use]
    pub fn rounded_total(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.total_amount.round() as i64
        }
    }
}

/// Computes the earnings quote for a worker on a booking.
///
/// `worker` is the worker the quote is for; `None` (an open invitation
/// not yet bound) skips the worker-specific override rule. Returns
/// `None` when no pricing field is set at all.
#[must_use]
pub fn quote(booking: &Booking, worker: Option<&WorkerId>) -> Option<EarningsQuote> {
    // Rule 1: admin-entered per-worker total is authoritative.
    if let (Some(per_worker), Some(days)) = (booking.amount_per_worker, booking.number_of_days)
        && days > 0
    {
        return Some(EarningsQuote {
            daily_amount: per_worker / f64::from(days),
            total_amount: per_worker,
            days,
            source: QuoteSource::AdminPerWorker,
        });
    }

    // Rule 2: a flat total agreed with this specific worker.
    if let Some(worker) = worker
        && let Some(flat) = booking.flat_overrides.get(worker)
    {
        return Some(EarningsQuote {
            daily_amount: *flat,
            total_amount: *flat,
            days: 1,
            source: QuoteSource::WorkerFlat,
        });
    }

    // Rule 3: split the pool evenly across the required head count.
    if let Some(pool) = booking.payment_amount
        && booking.workers_needed > 0
    {
        let per_worker_total = pool / f64::from(booking.workers_needed);
        let days = booking.number_of_days.unwrap_or(1).max(1);
        return Some(EarningsQuote {
            daily_amount: per_worker_total / f64::from(days),
            total_amount: per_worker_total,
            days,
            source: QuoteSource::AdminTotalPool,
        });
    }

    // Rule 4: undifferentiated fallback.
    if let Some(negotiated) = booking.negotiated_price {
        return Some(EarningsQuote {
            daily_amount: negotiated,
            total_amount: negotiated,
            days: 1,
            source: QuoteSource::FallbackTotal,
        });
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BookingDraft, BookingId};
    use time::OffsetDateTime;

    fn booking_with(draft: BookingDraft) -> Booking {
        Booking::from_draft(BookingId::new("b-1"), draft, OffsetDateTime::UNIX_EPOCH)
    }

    fn base_draft() -> BookingDraft {
        BookingDraft {
            service_type: String::from("waiter"),
            location: String::from("Indiranagar"),
            workers_needed: 3,
            number_of_days: None,
            negotiated_price: None,
            payment_amount: None,
            amount_per_worker: None,
        }
    }

    #[test]
    fn test_per_worker_total_wins_over_pool() {
        let mut draft = base_draft();
        draft.amount_per_worker = Some(6000.0);
        draft.number_of_days = Some(3);
        draft.payment_amount = Some(18000.0);
        let booking = booking_with(draft);

        let q = quote(&booking, None).unwrap();
        assert_eq!(q.source, QuoteSource::AdminPerWorker);
        assert_eq!(q.rounded_daily(), 2000);
        assert_eq!(q.rounded_total(), 6000);
        assert_eq!(q.days, 3);
    }

    #[test]
    fn test_per_worker_without_days_falls_through() {
        let mut draft = base_draft();
        draft.amount_per_worker = Some(6000.0);
        draft.payment_amount = Some(18000.0);
        let booking = booking_with(draft);

        let q = quote(&booking, None).unwrap();
        assert_eq!(q.source, QuoteSource::AdminTotalPool);
    }

    #[test]
    fn test_worker_flat_override_beats_pool() {
        let mut draft = base_draft();
        draft.payment_amount = Some(18000.0);
        let mut booking = booking_with(draft);
        let worker = WorkerId::new("w-1");
        booking.flat_overrides.insert(worker.clone(), 4500.0);

        let q = quote(&booking, Some(&worker)).unwrap();
        assert_eq!(q.source, QuoteSource::WorkerFlat);
        assert_eq!(q.rounded_total(), 4500);
        assert_eq!(q.days, 1);

        // A different worker gets the pool split.
        let other = WorkerId::new("w-2");
        let q = quote(&booking, Some(&other)).unwrap();
        assert_eq!(q.source, QuoteSource::AdminTotalPool);
    }

    #[test]
    fn test_pool_fallback_splits_across_workers_and_days() {
        let mut draft = base_draft();
        draft.payment_amount = Some(18000.0);
        draft.number_of_days = Some(2);
        let booking = booking_with(draft);

        let q = quote(&booking, None).unwrap();
        assert_eq!(q.source, QuoteSource::AdminTotalPool);
        assert_eq!(q.rounded_daily(), 3000);
        assert_eq!(q.rounded_total(), 6000);
        assert_eq!(q.days, 2);
    }

    #[test]
    fn test_pool_without_days_assumes_single_day() {
        let mut draft = base_draft();
        draft.payment_amount = Some(9000.0);
        let booking = booking_with(draft);

        let q = quote(&booking, None).unwrap();
        assert_eq!(q.days, 1);
        assert_eq!(q.rounded_daily(), 3000);
        assert_eq!(q.rounded_total(), 3000);
    }

    #[test]
    fn test_negotiated_price_is_last_resort() {
        let mut draft = base_draft();
        draft.negotiated_price = Some(800.0);
        let booking = booking_with(draft);

        let q = quote(&booking, None).unwrap();
        assert_eq!(q.source, QuoteSource::FallbackTotal);
        assert_eq!(q.rounded_total(), 800);
        assert_eq!(q.days, 1);
    }

    #[test]
    fn test_no_pricing_fields_means_no_quote() {
        let booking = booking_with(base_draft());
        assert!(quote(&booking, None).is_none());
    }

    #[test]
    fn test_rounding_happens_at_display_only() {
        let mut draft = base_draft();
        draft.payment_amount = Some(10000.0);
        draft.number_of_days = Some(3);
        let booking = booking_with(draft);

        let q = quote(&booking, None).unwrap();
        // Unrounded internals, rounded display values.
        assert!((q.total_amount - 10000.0 / 3.0).abs() < 1e-9);
        assert_eq!(q.rounded_total(), 3333);
        assert_eq!(q.rounded_daily(), 1111);
    }
}
