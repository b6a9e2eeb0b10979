//! Racing callers against one shared store
//!
//! The engine takes no locks; these tests pin down what is still guaranteed:
//! every racing write is a whole record, and progress re-derives the state.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use handover_ceremony::ConfirmStep;
use handover_core::effects::StorageEffects;
use handover_core::keys::STATE_KEY;
use handover_core::CeremonyState;
use serde_json::json;
use support::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_confirmations_of_one_step_leave_one_whole_record() {
    let h = harness();

    let admin = {
        let service = h.service.clone();
        tokio::spawn(async move { service.complete_step(ConfirmStep::new(2, ADMIN)).await })
    };
    let responsible = {
        let service = h.service.clone();
        tokio::spawn(async move {
            service
                .complete_step(ConfirmStep::new(2, STUDENT_LIFE))
                .await
        })
    };

    let admin = admin.await.unwrap().unwrap();
    let responsible = responsible.await.unwrap().unwrap();

    let progress = h.service.get_progress().await.unwrap();
    let stored = &progress.steps[1].completion;
    // Last writer wins, but the record is never a mix of both writes
    let winner = if stored.completed_by.as_deref() == Some(ADMIN) {
        &admin
    } else {
        &responsible
    };
    assert_eq!(stored.completed_by.as_deref(), Some(winner.completed_by.as_str()));
    assert_eq!(stored.completed_at, Some(winner.completed_at));
    assert_eq!(progress.state, CeremonyState::derive(1, 4));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_confirmations_of_every_step_converge() {
    let h = harness();

    let handles: Vec<_> = RESPONSIBLE
        .iter()
        .enumerate()
        .map(|(index, code)| {
            let service = h.service.clone();
            let request = ConfirmStep::new(index as i64 + 1, *code);
            tokio::spawn(async move { service.complete_step(request).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let progress = h.service.get_progress().await.unwrap();
    assert!(progress.state.is_complete);
    assert_eq!(progress.state.current_step, 4);
}

#[tokio::test]
async fn stale_cached_state_is_ignored_by_progress() {
    let h = harness();
    h.service
        .complete_step(ConfirmStep::new(1, ADVISOR))
        .await
        .unwrap();

    // Simulate the lagging aggregate a lost race can leave behind
    h.storage
        .set(STATE_KEY, json!({"currentStep": 1, "isComplete": false}))
        .await
        .unwrap();
    assert_eq!(h.service.cached_state().await.unwrap(), CeremonyState::initial());

    let progress = h.service.get_progress().await.unwrap();
    assert_eq!(progress.state.current_step, 2);

    // The next confirmation rewrites the cache from the records
    let receipt = h
        .service
        .complete_step(ConfirmStep::new(2, STUDENT_LIFE))
        .await
        .unwrap();
    assert_eq!(receipt.ceremony_state, CeremonyState::derive(2, 4));
    assert_eq!(h.service.cached_state().await.unwrap(), receipt.ceremony_state);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_of_distinct_codes_all_land() {
    let h = harness();
    let handles: Vec<_> = RESPONSIBLE
        .iter()
        .chain(RESPONSIBLE.iter())
        .map(|code| {
            let service = h.service.clone();
            let code = code.to_string();
            tokio::spawn(async move { service.register(&code).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let joined = h.service.list_participants().await.unwrap();
    assert_eq!(joined.len(), 4);
    assert!(h.service.roster_status().await.unwrap().ready);
}
