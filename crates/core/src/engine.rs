// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The acceptance engine and its guarded state.
//!
//! Locking rules:
//! - each booking has its own slot lock; operations on different
//!   bookings never contend
//! - the token registry lock is only taken either alone or while a
//!   slot lock is already held, never the other way around
//! - slot locks are acquired with a bounded wait; exhaustion surfaces
//!   [`CoreError::Busy`] rather than a hang

use crate::error::CoreError;
use crate::ledger::BookingSlot;
use crate::results::{
    Acceptance, InvitationDetails, IssuedInvitation, RegisteredBooking, TokenDetails, Withdrawal,
};
use crewcall_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use crewcall_domain::{
    Assignment, AssignmentId, AssignmentStatus, Booking, BookingDraft, BookingId, BookingStatus,
    InvitationToken, WorkerId, quote, validate_booking_draft, validate_token_ttl,
};
use rand::RngExt;
use rand::distr::Alphanumeric;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// Poll interval while waiting for a contended slot lock.
const LOCK_POLL: Duration = Duration::from_micros(500);

/// Default bound on waiting for a contended slot lock.
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(250);

struct BookingCell {
    slot: Mutex<BookingSlot>,
}

/// The booking assignment and acceptance engine.
///
/// All mutable state lives here: the booking registry, the assignment
/// records inside each slot, and the token registry. The accepted
/// count is never ambient global state; it is derived inside a slot's
/// guarded section and acted on there.
pub struct Engine {
    bookings: RwLock<HashMap<BookingId, Arc<BookingCell>>>,
    assignment_index: RwLock<HashMap<AssignmentId, BookingId>>,
    tokens: Mutex<HashMap<String, InvitationToken>>,
    booking_seq: AtomicU64,
    assignment_seq: AtomicU64,
    lock_timeout: Duration,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("lock_timeout", &self.lock_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an empty engine with the default lock timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Creates an empty engine with an explicit lock timeout.
    #[must_use]
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
            assignment_index: RwLock::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            booking_seq: AtomicU64::new(1),
            assignment_seq: AtomicU64::new(1),
            lock_timeout,
        }
    }

    /// Admits an externally created booking into the engine.
    ///
    /// The booking starts `Pending` with no assignments.
    ///
    /// # Errors
    ///
    /// Returns `DomainViolation` if the draft fails field validation.
    pub fn register_booking(
        &self,
        draft: BookingDraft,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<RegisteredBooking, CoreError> {
        validate_booking_draft(&draft)?;

        let id = BookingId::new(&format!(
            "bkg-{:06}",
            self.booking_seq.fetch_add(1, Ordering::Relaxed)
        ));
        let booking = Booking::from_draft(id.clone(), draft, now);

        let cell = Arc::new(BookingCell {
            slot: Mutex::new(BookingSlot::new(booking.clone())),
        });

        let mut bookings = self
            .bookings
            .write()
            .map_err(|_| Self::poisoned("booking registry"))?;
        bookings.insert(id.clone(), cell);
        drop(bookings);

        let action = Action::new(
            String::from("RegisterBooking"),
            Some(format!(
                "Admitted booking for {} workers ({})",
                booking.workers_needed, booking.service_type
            )),
        );
        let audit_event = AuditEvent::new(
            actor,
            cause,
            action,
            StateSnapshot::new(String::from("absent")),
            StateSnapshot::new(format!(
                "status={},accepted=0,pending=0,needed={}",
                booking.status, booking.workers_needed
            )),
            id,
        );

        Ok(RegisteredBooking {
            booking,
            audit_event,
        })
    }

    /// Records an admin-agreed flat total for one worker on one booking.
    ///
    /// The override feeds the earnings calculator's worker-flat rule.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound`, `Busy`, or `DomainViolation` for a
    /// negative or non-finite amount.
    pub fn set_flat_override(
        &self,
        booking_id: &BookingId,
        worker_id: WorkerId,
        amount: f64,
        actor: Actor,
        cause: Cause,
    ) -> Result<AuditEvent, CoreError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::DomainViolation(
                crewcall_domain::DomainError::InvalidPricingField {
                    field: "flat_override",
                    amount,
                },
            ));
        }

        let cell = self.cell(booking_id)?;
        let mut slot = self.lock_slot(booking_id, &cell)?;
        let before = slot.snapshot();
        slot.booking.flat_overrides.insert(worker_id.clone(), amount);
        let after = slot.snapshot();
        drop(slot);

        let action = Action::new(
            String::from("SetFlatOverride"),
            Some(format!("Flat total {amount} agreed with worker '{worker_id}'")),
        );
        Ok(AuditEvent::new(
            actor,
            cause,
            action,
            StateSnapshot::new(before),
            StateSnapshot::new(after),
            booking_id.clone(),
        ))
    }

    /// Issues an invitation token for a booking.
    ///
    /// Creates a pending assignment and a token bound to it. When the
    /// worker already holds a pending assignment on the booking, that
    /// assignment is superseded: cancelled, its token left to die, and
    /// a fresh assignment issued in its place. Open invitations pass
    /// `None` for the worker and bind at redemption.
    ///
    /// # Errors
    ///
    /// - `InvalidBookingState` if the lifecycle state refuses
    ///   invitations or every slot is already accepted
    /// - `AlreadyAccepted` if the worker has an accepted assignment
    /// - `DomainViolation` for a non-positive TTL
    /// - `BookingNotFound`, `Busy`
    pub fn issue(
        &self,
        booking_id: &BookingId,
        worker_id: Option<WorkerId>,
        ttl_seconds: i64,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<IssuedInvitation, CoreError> {
        validate_token_ttl(ttl_seconds)?;

        let cell = self.cell(booking_id)?;
        let mut slot = self.lock_slot(booking_id, &cell)?;
        let before = slot.snapshot();

        if !slot.booking.status.accepts_invitations() {
            return Err(CoreError::InvalidBookingState {
                booking_id: booking_id.clone(),
                status: slot.booking.status,
                reason: String::from("lifecycle state does not accept new invitations"),
            });
        }
        if !slot.has_capacity() {
            return Err(CoreError::InvalidBookingState {
                booking_id: booking_id.clone(),
                status: slot.booking.status,
                reason: String::from("all required slots are already accepted"),
            });
        }

        // Supersede, never duplicate: one active assignment per worker.
        let mut superseded = None;
        if let Some(worker) = &worker_id
            && let Some(idx) = slot.active_assignment_index_for(worker)
        {
            let existing = &mut slot.assignments[idx];
            if existing.status == AssignmentStatus::Accepted {
                return Err(CoreError::AlreadyAccepted {
                    booking_id: booking_id.clone(),
                    assignment_id: existing.id.clone(),
                });
            }
            existing.status = AssignmentStatus::Cancelled;
            existing.resolved_at = Some(now);
            superseded = Some(existing.id.clone());
        }

        let assignment_id = AssignmentId::new(&format!(
            "asg-{:06}",
            self.assignment_seq.fetch_add(1, Ordering::Relaxed)
        ));
        let token_value = mint_token_value();
        let token = InvitationToken::new(
            token_value.clone(),
            booking_id.clone(),
            worker_id.clone(),
            assignment_id.clone(),
            now,
            now + time::Duration::seconds(ttl_seconds),
        );
        let assignment = Assignment::new(
            assignment_id.clone(),
            booking_id.clone(),
            worker_id.clone(),
            token_value.clone(),
            now,
        );

        slot.assignments.push(assignment.clone());
        let after = slot.snapshot();
        drop(slot);

        self.assignment_index
            .write()
            .map_err(|_| Self::poisoned("assignment index"))?
            .insert(assignment_id.clone(), booking_id.clone());
        self.lock_tokens()?.insert(token_value, token.clone());

        let target = worker_id.map_or_else(
            || String::from("any worker"),
            |w| format!("worker '{w}'"),
        );
        let action = Action::new(
            String::from("IssueInvitation"),
            Some(format!(
                "Issued assignment '{assignment_id}' to {target}, valid {ttl_seconds}s"
            )),
        );
        let audit_event = AuditEvent::new(
            actor,
            cause,
            action,
            StateSnapshot::new(before),
            StateSnapshot::new(after),
            booking_id.clone(),
        );

        Ok(IssuedInvitation {
            assignment,
            token,
            superseded,
            audit_event,
        })
    }

    /// Validates a token without consuming it.
    ///
    /// # Errors
    ///
    /// `TokenNotFound`, `TokenAlreadyUsed`, or `TokenExpired`.
    pub fn validate_token(
        &self,
        token_value: &str,
        now: OffsetDateTime,
    ) -> Result<TokenDetails, CoreError> {
        let tokens = self.lock_tokens()?;
        let token = tokens.get(token_value).ok_or(CoreError::TokenNotFound)?;
        Self::check_token(token, now)?;
        Ok(TokenDetails {
            booking_id: token.booking_id.clone(),
            worker_id: token.worker_id.clone(),
            assignment_id: token.assignment_id.clone(),
            expires_at: token.expires_at,
        })
    }

    /// Returns the invitation view a worker sees before deciding:
    /// booking summary plus computed quote. Read-only; the token is
    /// not consumed, so the view can be fetched repeatedly.
    ///
    /// # Errors
    ///
    /// Token errors as in [`Self::validate_token`], plus
    /// `BookingNotFound` and `Busy`.
    pub fn invitation_details(
        &self,
        token_value: &str,
        now: OffsetDateTime,
    ) -> Result<InvitationDetails, CoreError> {
        let details = self.validate_token(token_value, now)?;
        let cell = self.cell(&details.booking_id)?;
        let slot = self.lock_slot(&details.booking_id, &cell)?;
        let booking = slot.booking.clone();
        drop(slot);

        let quote = quote(&booking, details.worker_id.as_ref());
        Ok(InvitationDetails {
            booking,
            worker_id: details.worker_id,
            assignment_id: details.assignment_id,
            expires_at: details.expires_at,
            quote,
        })
    }

    /// Redeems a token: the acceptance orchestrator.
    ///
    /// Validates the token, checks the worker binding, then enters the
    /// booking's guarded section to re-check capacity, accept the
    /// assignment, consume the token, advance the booking status, and
    /// cascade-expire siblings when the last slot fills. The earnings
    /// quote is computed for the confirmation view on the way out.
    ///
    /// Redeeming one's own already-accepted assignment is a success,
    /// replayed idempotently without consuming anything further.
    ///
    /// # Errors
    ///
    /// - `TokenNotFound` / `TokenExpired` / `TokenAlreadyUsed`
    /// - `Forbidden` when the worker does not match the binding
    /// - `CapacityExceeded` when the booking filled first (the
    ///   assignment is forced to expired)
    /// - `AssignmentNotPending` when the assignment was resolved some
    ///   other way
    /// - `Busy` when the guarded section stayed contended past the
    ///   engine's lock timeout
    /// - `InvariantViolation` if the ledger is ever found over-allocated
    #[allow(clippy::too_many_lines)]
    pub fn redeem(
        &self,
        token_value: &str,
        worker_id: &WorkerId,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Acceptance, CoreError> {
        // Phase 1: read the token with no slot lock held. The binding
        // check applies only to a live token; consumed and expired
        // tokens resolve under the slot lock below.
        let booking_id = {
            let tokens = self.lock_tokens()?;
            let token = tokens.get(token_value).ok_or(CoreError::TokenNotFound)?;
            if !token.consumed && !token.is_expired(now) && !token.permits(worker_id) {
                return Err(CoreError::Forbidden {
                    reason: String::from("token is bound to a different worker"),
                });
            }
            token.booking_id.clone()
        };

        // Phase 2: the guarded section for this booking.
        let cell = self.cell(&booking_id)?;
        let mut slot = self.lock_slot(&booking_id, &cell)?;
        let before = slot.snapshot();

        // Re-read the token under the slot lock; consumption only ever
        // happens here, so this read is authoritative.
        let mut tokens = self.lock_tokens()?;
        let token = tokens
            .get_mut(token_value)
            .ok_or(CoreError::TokenNotFound)?;

        if token.consumed {
            let assignment_id = token.assignment_id.clone();
            let replay = Self::replay_own_acceptance(&slot, &assignment_id, worker_id);
            drop(tokens);
            return replay;
        }
        if token.is_expired(now) {
            let expired_at = token.expires_at;
            let stale_id = token.assignment_id.clone();
            drop(tokens);
            // The validity window elapsed; retire the assignment with it.
            if let Some(stale) = slot.assignment_index(&stale_id)
                && slot.assignments[stale].status == AssignmentStatus::Pending
            {
                slot.assignments[stale].status = AssignmentStatus::Expired;
                slot.assignments[stale].resolved_at = Some(now);
            }
            return Err(CoreError::TokenExpired { expired_at });
        }

        let assignment_id = token.assignment_id.clone();

        // The worker may have accepted this booking through another
        // token already; replay that instead of double-allocating.
        if let Some(prior) = slot.accepted_assignment_index_for(worker_id) {
            let prior_id = slot.assignments[prior].id.clone();
            let replay = Self::replay_own_acceptance(&slot, &prior_id, worker_id);
            drop(tokens);
            return replay;
        }

        let idx = slot
            .assignment_index(&assignment_id)
            .ok_or_else(|| Self::missing_assignment(&assignment_id))?;

        match slot.assignments[idx].status {
            AssignmentStatus::Pending => {}
            AssignmentStatus::Expired => {
                // Filled before redemption; the slot is gone.
                drop(tokens);
                return if slot.has_capacity() {
                    Err(CoreError::AssignmentNotPending {
                        assignment_id,
                        status: AssignmentStatus::Expired,
                    })
                } else {
                    Err(CoreError::CapacityExceeded { booking_id })
                };
            }
            status @ (AssignmentStatus::Accepted | AssignmentStatus::Cancelled) => {
                drop(tokens);
                return Err(CoreError::AssignmentNotPending {
                    assignment_id,
                    status,
                });
            }
        }

        // The capacity gate, evaluated and acted upon atomically with
        // the transition below.
        let accepted = slot.check_invariant()?;
        if accepted >= slot.booking.workers_needed {
            drop(tokens);
            slot.assignments[idx].status = AssignmentStatus::Expired;
            slot.assignments[idx].resolved_at = Some(now);
            return Err(CoreError::CapacityExceeded { booking_id });
        }

        // Accept: assignment, token, booking, cascade. One atomic unit
        // under the slot lock.
        slot.assignments[idx]
            .status
            .validate_transition(AssignmentStatus::Accepted)?;
        slot.assignments[idx].status = AssignmentStatus::Accepted;
        slot.assignments[idx].resolved_at = Some(now);
        if slot.assignments[idx].worker_id.is_none() {
            slot.assignments[idx].worker_id = Some(worker_id.clone());
        }
        token.consumed = true;
        drop(tokens);

        // Binding an open token can leave the worker's direct
        // invitation dangling as a second active assignment; supersede
        // it the same way issue does.
        for sibling in &mut slot.assignments {
            if sibling.id != assignment_id
                && sibling.status == AssignmentStatus::Pending
                && sibling.is_for_worker(worker_id)
            {
                sibling.status = AssignmentStatus::Cancelled;
                sibling.resolved_at = Some(now);
            }
        }

        let mut expired_siblings = Vec::new();
        if !slot.has_capacity() {
            expired_siblings = slot.cascade_expire(now);
        }
        if slot.booking.status == BookingStatus::Pending {
            slot.booking
                .status
                .validate_transition(BookingStatus::Assigned)?;
            slot.booking.status = BookingStatus::Assigned;
        }

        let assignment = slot.assignments[idx].clone();
        let booking_status = slot.booking.status;
        let quote = quote(&slot.booking, Some(worker_id));
        let after = slot.snapshot();
        drop(slot);

        let action = Action::new(
            String::from("AcceptAssignment"),
            Some(format!(
                "Worker '{worker_id}' accepted assignment '{assignment_id}'; cascade-expired {}",
                expired_siblings.len()
            )),
        );
        let audit_event = AuditEvent::new(
            actor,
            cause,
            action,
            StateSnapshot::new(before),
            StateSnapshot::new(after),
            booking_id,
        );

        Ok(Acceptance {
            assignment,
            booking_status,
            quote,
            already_accepted: false,
            expired_siblings,
            audit_event: Some(audit_event),
        })
    }

    /// Explicitly withdraws an assignment.
    ///
    /// A pending withdrawal retires the invitation; an accepted
    /// withdrawal frees the slot. Either way the token stays dead.
    ///
    /// # Errors
    ///
    /// `AssignmentNotFound` if the assignment is unknown, `Busy`, or
    /// `AssignmentNotPending` when already expired or cancelled.
    pub fn withdraw(
        &self,
        assignment_id: &AssignmentId,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Withdrawal, CoreError> {
        let booking_id = self
            .assignment_index
            .read()
            .map_err(|_| Self::poisoned("assignment index"))?
            .get(assignment_id)
            .cloned()
            .ok_or_else(|| CoreError::AssignmentNotFound(assignment_id.clone()))?;

        let cell = self.cell(&booking_id)?;
        let mut slot = self.lock_slot(&booking_id, &cell)?;
        let before = slot.snapshot();

        let idx = slot
            .assignment_index(assignment_id)
            .ok_or_else(|| Self::missing_assignment(assignment_id))?;
        let status = slot.assignments[idx].status;
        status.validate_transition(AssignmentStatus::Cancelled).map_err(|_| {
            CoreError::AssignmentNotPending {
                assignment_id: assignment_id.clone(),
                status,
            }
        })?;
        slot.assignments[idx].status = AssignmentStatus::Cancelled;
        slot.assignments[idx].resolved_at = Some(now);

        let assignment = slot.assignments[idx].clone();
        let booking_status = slot.booking.status;
        let after = slot.snapshot();
        drop(slot);

        let action = Action::new(
            String::from("WithdrawAssignment"),
            Some(format!("Assignment '{assignment_id}' withdrawn from '{status}'")),
        );
        let audit_event = AuditEvent::new(
            actor,
            cause,
            action,
            StateSnapshot::new(before),
            StateSnapshot::new(after),
            booking_id,
        );

        Ok(Withdrawal {
            assignment,
            booking_status,
            audit_event,
        })
    }

    /// Count of assignments currently accepted for the booking.
    ///
    /// # Errors
    ///
    /// `BookingNotFound` or `Busy`.
    pub fn accepted_count(&self, booking_id: &BookingId) -> Result<u32, CoreError> {
        let cell = self.cell(booking_id)?;
        let slot = self.lock_slot(booking_id, &cell)?;
        Ok(slot.accepted_count())
    }

    /// Whether the booking can still accept another assignment.
    ///
    /// # Errors
    ///
    /// `BookingNotFound` or `Busy`.
    pub fn has_capacity(&self, booking_id: &BookingId) -> Result<bool, CoreError> {
        let cell = self.cell(booking_id)?;
        let slot = self.lock_slot(booking_id, &cell)?;
        Ok(slot.has_capacity())
    }

    /// A point-in-time snapshot of the booking record.
    ///
    /// # Errors
    ///
    /// `BookingNotFound` or `Busy`.
    pub fn booking(&self, booking_id: &BookingId) -> Result<Booking, CoreError> {
        let cell = self.cell(booking_id)?;
        let slot = self.lock_slot(booking_id, &cell)?;
        Ok(slot.booking.clone())
    }

    /// A point-in-time snapshot of every assignment on the booking.
    ///
    /// # Errors
    ///
    /// `BookingNotFound` or `Busy`.
    pub fn assignments(&self, booking_id: &BookingId) -> Result<Vec<Assignment>, CoreError> {
        let cell = self.cell(booking_id)?;
        let slot = self.lock_slot(booking_id, &cell)?;
        Ok(slot.assignments.clone())
    }

    fn cell(&self, booking_id: &BookingId) -> Result<Arc<BookingCell>, CoreError> {
        self.bookings
            .read()
            .map_err(|_| Self::poisoned("booking registry"))?
            .get(booking_id)
            .cloned()
            .ok_or_else(|| CoreError::BookingNotFound(booking_id.clone()))
    }

    /// Enters a booking's guarded section with a bounded wait.
    fn lock_slot<'a>(
        &self,
        booking_id: &BookingId,
        cell: &'a BookingCell,
    ) -> Result<MutexGuard<'a, BookingSlot>, CoreError> {
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match cell.slot.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(CoreError::Busy {
                            booking_id: booking_id.clone(),
                        });
                    }
                    std::thread::sleep(LOCK_POLL);
                }
                Err(TryLockError::Poisoned(_)) => {
                    return Err(Self::poisoned("booking slot"));
                }
            }
        }
    }

    fn lock_tokens(&self) -> Result<MutexGuard<'_, HashMap<String, InvitationToken>>, CoreError> {
        self.tokens
            .lock()
            .map_err(|_| Self::poisoned("token registry"))
    }

    fn check_token(token: &InvitationToken, now: OffsetDateTime) -> Result<(), CoreError> {
        if token.consumed {
            return Err(CoreError::TokenAlreadyUsed);
        }
        if token.is_expired(now) {
            return Err(CoreError::TokenExpired {
                expired_at: token.expires_at,
            });
        }
        Ok(())
    }

    /// Builds the idempotent replay of an acceptance this worker
    /// already holds, or the failure when the acceptance belongs to
    /// someone else.
    fn replay_own_acceptance(
        slot: &BookingSlot,
        assignment_id: &AssignmentId,
        worker_id: &WorkerId,
    ) -> Result<Acceptance, CoreError> {
        let idx = slot
            .assignment_index(assignment_id)
            .ok_or_else(|| Self::missing_assignment(assignment_id))?;
        let assignment = &slot.assignments[idx];

        if assignment.status == AssignmentStatus::Accepted && assignment.is_for_worker(worker_id) {
            return Ok(Acceptance {
                assignment: assignment.clone(),
                booking_status: slot.booking.status,
                quote: quote(&slot.booking, Some(worker_id)),
                already_accepted: true,
                expired_siblings: Vec::new(),
                audit_event: None,
            });
        }

        if assignment.status == AssignmentStatus::Accepted {
            // Consumed by a different caller.
            return Err(CoreError::AssignmentNotPending {
                assignment_id: assignment_id.clone(),
                status: assignment.status,
            });
        }

        // Consumed, but the assignment has since left Accepted (for
        // example an independent cancellation). Single use is final.
        Err(CoreError::TokenAlreadyUsed)
    }

    fn missing_assignment(assignment_id: &AssignmentId) -> CoreError {
        CoreError::Internal(format!(
            "assignment '{assignment_id}' is indexed but not present in its booking slot"
        ))
    }

    fn poisoned(what: &str) -> CoreError {
        CoreError::Internal(format!("{what} lock poisoned"))
    }
}

/// Mints an opaque, unguessable token value.
fn mint_token_value() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    format!("tok_{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crewcall_domain::BookingDraft;

    fn draft() -> BookingDraft {
        BookingDraft {
            service_type: String::from("waiter"),
            location: String::from("Indiranagar"),
            workers_needed: 1,
            number_of_days: None,
            negotiated_price: None,
            payment_amount: None,
            amount_per_worker: None,
        }
    }

    fn actor() -> Actor {
        Actor::new(String::from("admin-1"), String::from("admin"))
    }

    fn cause() -> Cause {
        Cause::new(String::from("req-1"), String::from("test"))
    }

    #[test]
    fn test_mint_token_value_shape() {
        let value = mint_token_value();
        assert!(value.starts_with("tok_"));
        assert_eq!(value.len(), 36);
        assert!(value[4..].chars().all(char::is_alphanumeric));
    }

    #[test]
    fn test_held_slot_lock_surfaces_busy_within_timeout() {
        let engine = Engine::with_lock_timeout(Duration::from_millis(10));
        let now = OffsetDateTime::UNIX_EPOCH;
        let booking_id = engine
            .register_booking(draft(), actor(), cause(), now)
            .unwrap()
            .booking
            .id;
        let token = engine
            .issue(&booking_id, None, 3600, actor(), cause(), now)
            .unwrap()
            .token
            .value;

        let cell = engine.cell(&booking_id).unwrap();
        let guard = cell.slot.lock().unwrap();

        let started = Instant::now();
        let result = engine.redeem(
            &token,
            &WorkerId::new("w-1"),
            actor(),
            cause(),
            now,
        );
        drop(guard);

        assert!(matches!(result, Err(CoreError::Busy { .. })));
        // Bounded wait: well under a second even with scheduler noise.
        assert!(started.elapsed() < Duration::from_secs(1));

        // The booking recovers once the lock is released.
        assert!(
            engine
                .redeem(&token, &WorkerId::new("w-1"), actor(), cause(), now)
                .is_ok()
        );
    }
}
