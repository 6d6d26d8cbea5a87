//! Service-level tests against a real (in-memory) database, no HTTP.

mod common;
mod support;

use std::sync::Arc;

use futures_util::future::join_all;
use racing_backend::domain::rules::{RaceMode, INITIAL_CONDITION};
use racing_backend::errors::domain::{ConflictKind, DomainError};
use racing_backend::errors::ErrorCode;
use racing_backend::repos::participants::{self, RollWrite};
use racing_backend::entities::venue_rounds;
use racing_backend::repos::{round_results, rounds, venues as venue_repo};
use racing_backend::services::dice::{RngDice, ScriptedDice};
use racing_backend::services::participants::{apply_roll, join};
use racing_backend::services::rounds::{
    maybe_snapshot_round, ranking_for, start_new_race, SnapshotOutcome,
};
use racing_backend::services::users::register;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use support::{build_test_state, test_security, DEFAULT_VENUE_ID};

async fn user(conn: &DatabaseConnection, name: &str) -> i64 {
    register(conn, &test_security(), name, "pw")
        .await
        .expect("register")
        .user
        .id
}

/// Rolls `user_id` with constant 1s in super mode until out of condition.
async fn exhaust(conn: &DatabaseConnection, user_id: i64) {
    let dice = ScriptedDice::constant(1);
    for _ in 0..INITIAL_CONDITION {
        apply_roll(conn, DEFAULT_VENUE_ID, user_id, "super", &dice)
            .await
            .expect("roll");
    }
}

#[tokio::test]
async fn join_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");
    let alice = user(conn, "alice").await;

    let first = join(conn, DEFAULT_VENUE_ID, alice).await?;
    assert_eq!(first.position, 0);
    assert_eq!(first.condition, INITIAL_CONDITION);
    assert_eq!(first.mode, RaceMode::Normal);
    assert!(first.finished_at.is_none());

    apply_roll(conn, DEFAULT_VENUE_ID, alice, "normal", &ScriptedDice::constant(2)).await?;
    let second = join(conn, DEFAULT_VENUE_ID, alice).await?;

    assert_eq!(second.id, first.id);
    assert_eq!(second.position, 2);
    assert_eq!(second.roll_count, 1);
    assert_eq!(participants::list_named(conn, DEFAULT_VENUE_ID).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn finished_at_is_stamped_once() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");
    let alice = user(conn, "alice").await;
    join(conn, DEFAULT_VENUE_ID, alice).await?;

    let dice = ScriptedDice::constant(1);
    for _ in 0..INITIAL_CONDITION - 1 {
        let report = apply_roll(conn, DEFAULT_VENUE_ID, alice, "super", &dice).await?;
        assert!(report.participant.finished_at.is_none());
    }
    let report = apply_roll(conn, DEFAULT_VENUE_ID, alice, "super", &dice).await?;
    assert!(report.outcome.game_over);
    assert!(report.participant.finished_at.is_some());
    assert_eq!(report.participant.roll_count, INITIAL_CONDITION);

    let err = apply_roll(conn, DEFAULT_VENUE_ID, alice, "normal", &dice)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameOver);
    Ok(())
}

#[tokio::test]
async fn stale_roll_write_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");
    let alice = user(conn, "alice").await;
    let current = join(conn, DEFAULT_VENUE_ID, alice).await?;

    let write = || RollWrite {
        position: 1,
        condition: INITIAL_CONDITION,
        mode: RaceMode::Normal,
        won: false,
        game_over: false,
        finished_at: None,
    };

    let updated = participants::record_roll(conn, &current, write()).await?;
    assert_eq!(updated.roll_count, 1);

    // Same snapshot of the row again: somebody else already rolled.
    let err = participants::record_roll(conn, &current, write())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::OptimisticLock, _)));
    Ok(())
}

#[tokio::test]
async fn snapshot_waits_for_every_participant() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");

    assert_eq!(
        maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await?,
        SnapshotOutcome::NoParticipants
    );

    let alice = user(conn, "alice").await;
    let bob = user(conn, "bob").await;
    join(conn, DEFAULT_VENUE_ID, alice).await?;
    join(conn, DEFAULT_VENUE_ID, bob).await?;

    exhaust(conn, alice).await;
    assert_eq!(
        maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await?,
        SnapshotOutcome::InProgress
    );
    assert!(!round_results::snapshot_exists(conn, DEFAULT_VENUE_ID, 1).await?);

    exhaust(conn, bob).await;
    assert_eq!(
        maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await?,
        SnapshotOutcome::Written {
            round_number: 1,
            rows: 2
        }
    );
    assert_eq!(
        maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await?,
        SnapshotOutcome::AlreadySnapshotted
    );

    let ranking = ranking_for(conn, DEFAULT_VENUE_ID, 1).await?;
    assert_eq!(ranking.len(), 2);
    assert!(ranking.iter().all(|e| e.game_over && !e.won && e.roll_count == 6));
    assert!(ranking.iter().all(|e| e.duration_seconds >= 0.0));
    Ok(())
}

#[tokio::test]
async fn concurrent_snapshots_write_exactly_once() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");

    let mut ids = Vec::new();
    for name in ["alice", "bob", "carol"] {
        let id = user(conn, name).await;
        join(conn, DEFAULT_VENUE_ID, id).await?;
        exhaust(conn, id).await;
        ids.push(id);
    }

    let outcomes = join_all((0..8).map(|_| maybe_snapshot_round(conn, DEFAULT_VENUE_ID))).await;

    let written = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(SnapshotOutcome::Written { .. })))
        .count();
    assert_eq!(written, 1, "outcomes: {outcomes:?}");
    assert!(outcomes.iter().all(|o| matches!(
        o,
        Ok(SnapshotOutcome::Written { .. }) | Ok(SnapshotOutcome::AlreadySnapshotted)
    )));

    let stored = round_results::list_results(conn, DEFAULT_VENUE_ID, 1).await?;
    assert_eq!(stored.len(), ids.len());
    Ok(())
}

#[tokio::test]
async fn start_new_race_resets_everyone() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");
    let alice = user(conn, "alice").await;
    let bob = user(conn, "bob").await;
    join(conn, DEFAULT_VENUE_ID, alice).await?;
    join(conn, DEFAULT_VENUE_ID, bob).await?;

    exhaust(conn, alice).await;
    exhaust(conn, bob).await;

    // Everyone finished but nobody ran the completion check yet.
    let err = start_new_race(conn, DEFAULT_VENUE_ID, alice).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RankingMissing);

    maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await?;
    let round = start_new_race(conn, DEFAULT_VENUE_ID, bob).await?;
    assert_eq!(round, 2);

    let venue = venue_repo::require_venue(conn, DEFAULT_VENUE_ID).await?;
    assert_eq!(venue.current_round, 2);
    for p in participants::list_named(conn, DEFAULT_VENUE_ID).await? {
        let p = p.participant;
        assert_eq!(p.position, 0);
        assert_eq!(p.condition, INITIAL_CONDITION);
        assert_eq!(p.mode, RaceMode::Normal);
        assert!(!p.won && !p.game_over);
        assert_eq!(p.roll_count, 0);
        assert!(p.finished_at.is_none());
    }

    // Round 2 has just started.
    let err = start_new_race(conn, DEFAULT_VENUE_ID, alice).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoundIncomplete);
    Ok(())
}

#[tokio::test]
async fn stale_round_advance_is_a_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");

    let advanced = venue_repo::advance_round(conn, DEFAULT_VENUE_ID, 1).await?;
    assert_eq!(advanced.current_round, 2);

    let err = venue_repo::advance_round(conn, DEFAULT_VENUE_ID, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::OptimisticLock, _)));
    Ok(())
}

#[tokio::test]
async fn claimed_round_is_not_snapshotted_twice() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");
    let alice = user(conn, "alice").await;
    join(conn, DEFAULT_VENUE_ID, alice).await?;
    exhaust(conn, alice).await;

    // Another writer holds the claim for round 1 but has not inserted yet.
    assert!(rounds::claim_snapshot(conn, DEFAULT_VENUE_ID, 1).await?);
    assert!(!rounds::claim_snapshot(conn, DEFAULT_VENUE_ID, 1).await?);

    assert_eq!(
        maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await?,
        SnapshotOutcome::AlreadySnapshotted
    );
    assert!(round_results::list_results(conn, DEFAULT_VENUE_ID, 1).await?.is_empty());

    let round = rounds::find_round(conn, DEFAULT_VENUE_ID, 1)
        .await?
        .expect("round 1 exists");
    assert!(round.snapshotted_at.is_some());
    Ok(())
}

#[tokio::test]
async fn missing_round_row_is_data_corruption() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(RngDice)).await?;
    let conn = state.db().expect("db configured");
    let alice = user(conn, "alice").await;
    join(conn, DEFAULT_VENUE_ID, alice).await?;
    exhaust(conn, alice).await;

    venue_rounds::Entity::delete_many()
        .filter(venue_rounds::Column::VenueId.eq(DEFAULT_VENUE_ID))
        .exec(conn)
        .await?;

    let err = maybe_snapshot_round(conn, DEFAULT_VENUE_ID).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DataCorruption);
    assert!(round_results::list_results(conn, DEFAULT_VENUE_ID, 1).await?.is_empty());
    Ok(())
}
