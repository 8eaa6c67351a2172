// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for token validation, expiry, and single use.

use crate::{CoreError, Engine};
use crewcall_domain::WorkerId;
use time::Duration;

use super::helpers::{admin_actor, issue_for, pool_draft, register, test_cause, test_now};

#[test]
fn test_validate_unknown_token() {
    let engine = Engine::new();
    let result = engine.validate_token("tok_doesnotexist", test_now());
    assert!(matches!(result, Err(CoreError::TokenNotFound)));
}

#[test]
fn test_validate_returns_bound_identities() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    let details = engine.validate_token(&token, test_now()).unwrap();
    assert_eq!(details.booking_id, booking_id);
    assert_eq!(details.worker_id, Some(WorkerId::new("w-1")));
}

#[test]
fn test_validate_does_not_consume() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    // A worker re-viewing details must not burn the token.
    for _ in 0..3 {
        assert!(engine.validate_token(&token, test_now()).is_ok());
        assert!(engine.invitation_details(&token, test_now()).is_ok());
    }
    assert!(
        engine
            .redeem(&token, &WorkerId::new("w-1"), admin_actor(), test_cause(), test_now())
            .is_ok()
    );
}

#[test]
fn test_validate_rejects_expired_token() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    let later = test_now() + Duration::seconds(3601);
    let result = engine.validate_token(&token, later);
    assert!(matches!(result, Err(CoreError::TokenExpired { .. })));
}

#[test]
fn test_redeem_rejects_expired_token() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    let later = test_now() + Duration::hours(2);
    let result = engine.redeem(
        &token,
        &WorkerId::new("w-1"),
        admin_actor(),
        test_cause(),
        later,
    );
    assert!(matches!(result, Err(CoreError::TokenExpired { .. })));

    // The validity window elapsed, so the assignment expired with it.
    let assignments = engine.assignments(&booking_id).unwrap();
    assert_eq!(
        assignments[0].status,
        crewcall_domain::AssignmentStatus::Expired
    );
    assert!(assignments[0].resolved_at.is_some());

    // The worker can still be invited afresh afterwards.
    assert!(
        engine
            .issue(
                &booking_id,
                Some(WorkerId::new("w-1")),
                3600,
                admin_actor(),
                test_cause(),
                later,
            )
            .is_ok()
    );
}

#[test]
fn test_expired_token_reports_expiry_over_binding_mismatch() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    // Expiry is observed before the worker binding is judged.
    let later = test_now() + Duration::hours(2);
    let result = engine.redeem(
        &token,
        &WorkerId::new("w-2"),
        admin_actor(),
        test_cause(),
        later,
    );
    assert!(matches!(result, Err(CoreError::TokenExpired { .. })));
}

#[test]
fn test_consumed_token_reports_already_used_to_validate() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");
    engine
        .redeem(&token, &WorkerId::new("w-1"), admin_actor(), test_cause(), test_now())
        .unwrap();

    let result = engine.validate_token(&token, test_now());
    assert!(matches!(result, Err(CoreError::TokenAlreadyUsed)));
}

#[test]
fn test_single_use_survives_independent_cancellation() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    let acceptance = engine
        .redeem(&token, &WorkerId::new("w-1"), admin_actor(), test_cause(), test_now())
        .unwrap();

    // The worker withdraws after accepting; the slot frees up.
    engine
        .withdraw(
            &acceptance.assignment.id,
            super::helpers::worker_actor("w-1"),
            test_cause(),
            test_now(),
        )
        .unwrap();
    assert_eq!(engine.accepted_count(&booking_id).unwrap(), 0);

    // The identical token can never be redeemed again.
    let result = engine.redeem(
        &token,
        &WorkerId::new("w-1"),
        admin_actor(),
        test_cause(),
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::TokenAlreadyUsed)));
}

#[test]
fn test_worker_binding_is_enforced() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let token = issue_for(&engine, &booking_id, "w-1");

    let result = engine.redeem(
        &token,
        &WorkerId::new("w-2"),
        admin_actor(),
        test_cause(),
        test_now(),
    );
    assert!(matches!(result, Err(CoreError::Forbidden { .. })));

    // The bound worker still succeeds afterwards.
    assert!(
        engine
            .redeem(&token, &WorkerId::new("w-1"), admin_actor(), test_cause(), test_now())
            .is_ok()
    );
}

#[test]
fn test_open_token_binds_at_redemption() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(2, 8000.0, None));
    let issued = engine
        .issue(&booking_id, None, 3600, admin_actor(), test_cause(), test_now())
        .unwrap();

    let acceptance = engine
        .redeem(
            &issued.token.value,
            &WorkerId::new("w-9"),
            admin_actor(),
            test_cause(),
            test_now(),
        )
        .unwrap();

    assert_eq!(acceptance.assignment.worker_id, Some(WorkerId::new("w-9")));
}

#[test]
fn test_token_values_are_distinct() {
    let engine = Engine::new();
    let booking_id = register(&engine, pool_draft(5, 20000.0, None));

    let mut values = std::collections::HashSet::new();
    for i in 0..5 {
        let token = issue_for(&engine, &booking_id, &format!("w-{i}"));
        assert!(values.insert(token));
    }
}
