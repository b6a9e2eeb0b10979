//! Property tests for ceremony state derivation and step id validation

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use handover_core::{
    CeremonyCatalog, CeremonyError, CeremonyProgress, CeremonyState, StepCompletion, StepId,
    TOTAL_STEPS,
};
use proptest::prelude::*;

fn completions_from_mask(mask: [bool; TOTAL_STEPS]) -> Vec<StepCompletion> {
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
    mask.iter()
        .map(|done| {
            if *done {
                StepCompletion::confirmed("ADMIN2026", at, None)
            } else {
                StepCompletion::pending()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn state_matches_formula_for_any_completion_pattern(mask in any::<[bool; TOTAL_STEPS]>()) {
        let completions = completions_from_mask(mask);
        let completed = mask.iter().filter(|d| **d).count();

        let state = CeremonyState::from_completions(&completions);
        prop_assert_eq!(usize::from(state.current_step), (completed + 1).min(TOTAL_STEPS));
        prop_assert_eq!(state.is_complete, mask.iter().all(|d| *d));
    }

    #[test]
    fn merged_progress_agrees_with_records(mask in any::<[bool; TOTAL_STEPS]>()) {
        let catalog = CeremonyCatalog::builtin();
        let progress = CeremonyProgress::merge(catalog.steps(), completions_from_mask(mask));

        prop_assert_eq!(progress.steps.len(), TOTAL_STEPS);
        for (view, done) in progress.steps.iter().zip(mask) {
            prop_assert_eq!(view.is_completed(), done);
        }
        prop_assert_eq!(progress.state.is_complete, progress.steps.iter().all(|s| s.is_completed()));
    }

    #[test]
    fn out_of_range_step_ids_are_rejected(raw in prop_oneof![i64::MIN..1i64, 5i64..i64::MAX]) {
        let result = StepId::new(raw, TOTAL_STEPS);
        let rejected = matches!(result, Err(CeremonyError::InvalidStep { .. }));
        prop_assert!(rejected, "step {} was accepted", raw);
    }
}

#[test]
fn missing_records_merge_as_pending() {
    let catalog = CeremonyCatalog::builtin();
    let progress = CeremonyProgress::merge(catalog.steps(), Vec::new());
    assert!(progress.steps.iter().all(|s| !s.is_completed()));
    assert_eq!(progress.state, CeremonyState::initial());
}

#[test]
fn unknown_credentials_do_not_resolve() {
    let catalog = CeremonyCatalog::builtin();
    assert_matches!(
        catalog.resolve("MASTER26"),
        Err(CeremonyError::InvalidCredential { .. })
    );
}
