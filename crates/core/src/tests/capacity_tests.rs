// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Concurrency tests for the capacity invariant.
//!
//! These race real threads against one booking. Exactly
//! `workers_needed` redemptions may win; everyone else must be told
//! the slot is gone, and the accepted count must never overshoot.

use crate::{CoreError, Engine};
use crewcall_domain::{AssignmentStatus, WorkerId};
use std::sync::Arc;
use std::sync::Barrier;

use super::helpers::{issue_for, pool_draft, register, test_cause, test_now, worker_actor};

fn race_redeems(workers_needed: u32, contenders: u32) -> (Engine, crewcall_domain::BookingId, u32, u32) {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(workers_needed, 8000.0, None));

    let tokens: Vec<String> = (0..contenders)
        .map(|i| issue_for(&engine, &booking_id, &format!("w-{i}")))
        .collect();

    let engine = Arc::new(engine);
    let barrier = Arc::new(Barrier::new(contenders as usize));
    let mut handles = Vec::new();

    for (i, token) in tokens.into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            let worker = WorkerId::new(&format!("w-{i}"));
            barrier.wait();
            engine.redeem(
                &token,
                &worker,
                worker_actor(worker.value()),
                test_cause(),
                test_now(),
            )
        }));
    }

    let mut wins = 0;
    let mut capacity_losses = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(acceptance) => {
                assert!(!acceptance.already_accepted);
                wins += 1;
            }
            Err(CoreError::CapacityExceeded { .. }) => capacity_losses += 1,
            Err(other) => panic!("unexpected redeem outcome: {other}"),
        }
    }

    let engine = Arc::try_unwrap(engine).map_err(|_| "engine still shared").unwrap();
    (engine, booking_id, wins, capacity_losses)
}

#[test]
fn test_exactly_workers_needed_redeems_win() {
    let (engine, booking_id, wins, losses) = race_redeems(3, 8);

    assert_eq!(wins, 3);
    assert_eq!(losses, 5);
    assert_eq!(engine.accepted_count(&booking_id).unwrap(), 3);
}

#[test]
fn test_two_workers_racing_for_last_slot() {
    // The canonical hazard: the final slot, two contenders. One
    // accepted, one expired, never two and never zero.
    for _ in 0..20 {
        let (engine, booking_id, wins, losses) = race_redeems(1, 2);

        assert_eq!(wins, 1);
        assert_eq!(losses, 1);
        assert_eq!(engine.accepted_count(&booking_id).unwrap(), 1);

        let assignments = engine.assignments(&booking_id).unwrap();
        let accepted = assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Accepted)
            .count();
        let expired = assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Expired)
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(expired, 1);
    }
}

#[test]
fn test_accepted_count_never_exceeds_needed_under_heavy_contention() {
    let (engine, booking_id, wins, _losses) = race_redeems(5, 24);

    assert_eq!(wins, 5);
    let assignments = engine.assignments(&booking_id).unwrap();
    let accepted = assignments
        .iter()
        .filter(|a| a.status == AssignmentStatus::Accepted)
        .count();
    assert_eq!(accepted, 5);
    assert!(!engine.has_capacity(&booking_id).unwrap());
    assert!(
        assignments
            .iter()
            .all(|a| a.status != AssignmentStatus::Pending)
    );
}

#[test]
fn test_different_bookings_do_not_contend() {
    let engine = Arc::new(Engine::new());
    let mut handles = Vec::new();

    for b in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || {
            let booking_id = register(&engine, pool_draft(2, 8000.0, None));
            for i in 0..2 {
                let token = issue_for(&engine, &booking_id, &format!("w-{b}-{i}"));
                let worker = WorkerId::new(&format!("w-{b}-{i}"));
                engine
                    .redeem(
                        &token,
                        &worker,
                        worker_actor(worker.value()),
                        test_cause(),
                        test_now(),
                    )
                    .unwrap();
            }
            engine.accepted_count(&booking_id).unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}

