// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use featdeck_app::{
    Document, EditorCommand, EditorState, HISTORY_LIMIT, Mutation, Selection, UndoHistory,
};
use featdeck_testkit::{FeatureFaker, replay, sample_document};

#[test]
fn replaying_a_script_is_deterministic() -> Result<()> {
    let start = sample_document();
    let script = FeatureFaker::new(42).script(&start, 60);
    assert_eq!(script, FeatureFaker::new(42).script(&start, 60));

    let first = replay(&start, &script)?;
    let second = replay(&start, &script)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn undo_is_an_inverse_for_every_mutation() -> Result<()> {
    let mut faker = FeatureFaker::new(3);
    let mut state = EditorState::new(sample_document());

    for _ in 0..80 {
        let Some(mutation) = faker.script(&state.document, 1).pop() else {
            continue;
        };
        let before = state.document.clone();
        state.apply_mutation(mutation.clone())?;
        assert!(state.selection.is_valid(&state.document));

        state.dispatch(EditorCommand::Undo);
        assert_eq!(state.document, before);
        assert!(state.selection.is_valid(&state.document));

        state.apply_mutation(mutation)?;
    }
    Ok(())
}

#[test]
fn history_after_overflow_returns_to_first_mutation() -> Result<()> {
    let mut faker = FeatureFaker::new(11);
    let start = Document::seed();
    let script = faker.script(&start, HISTORY_LIMIT + 1);
    let after_first = replay(&start, &script[..1])?;

    let mut state = EditorState::new(start);
    for mutation in script {
        state.apply_mutation(mutation)?;
    }
    assert_eq!(state.history.len(), HISTORY_LIMIT);

    for _ in 0..HISTORY_LIMIT {
        state.dispatch(EditorCommand::Undo);
    }
    assert!(state.history.is_empty());
    assert_eq!(state.document, after_first);
    Ok(())
}

#[test]
fn selection_stays_valid_through_random_mutations() -> Result<()> {
    let mut faker = FeatureFaker::new(99);
    let mut state = EditorState::new(faker.document(3, 2));

    for _ in 0..200 {
        let group = faker.int_n(state.document.group_count());
        state.selection = Selection::entering(&state.document, group);
        let Some(mutation) = faker.script(&state.document, 1).pop() else {
            continue;
        };
        state.apply_mutation(mutation)?;
        assert!(
            state.selection.is_valid(&state.document),
            "selection {:?} invalid",
            state.selection
        );
    }
    Ok(())
}

#[test]
fn rejected_mutation_leaves_history_and_dirty_alone() {
    let mut state = EditorState::default();
    let result = state.apply_mutation(Mutation::DeleteGroup { group: 0 });
    assert!(result.is_err());
    assert!(state.history.is_empty());
    assert!(!state.dirty);
    assert_eq!(state.history, UndoHistory::default());
}
