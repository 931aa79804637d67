//! Milestone extraction: one forward pass recording the first event that
//! satisfies each canonical key state.

use std::collections::BTreeMap;

use cadence_core::{EventKind, KeyState, Role, TimelineEvent};

/// States an event satisfies. An event can satisfy more than one: an
/// approval by an AI reviewer is both `Approved` and, if earliest, the
/// `FirstAutomatedReview`.
fn satisfied_states(event: &TimelineEvent) -> Vec<KeyState> {
    let mut states = Vec::new();
    match event.kind {
        EventKind::Created => states.push(KeyState::Created),
        EventKind::CommitPushed => states.push(KeyState::FirstCommit),
        EventKind::Approved => states.push(KeyState::Approved),
        EventKind::Merged => states.push(KeyState::Merged),
        EventKind::HumanReview => {
            if event.actor.role == Role::HumanReviewer {
                states.push(KeyState::FirstHumanReview);
            }
        }
        EventKind::AutomatedReview
        | EventKind::CommentPosted
        | EventKind::PipelineQueued
        | EventKind::PipelineFinished => {}
    }
    if event.actor.role == Role::AiReviewer {
        states.push(KeyState::FirstAutomatedReview);
    }
    states
}

/// Extract the first event satisfying each key state. Later matches never
/// overwrite earlier ones; absent states are simply missing from the map.
pub fn extract_key_states(events: &[TimelineEvent]) -> BTreeMap<KeyState, TimelineEvent> {
    let mut found: BTreeMap<KeyState, TimelineEvent> = BTreeMap::new();
    for event in events {
        for state in satisfied_states(event) {
            found.entry(state).or_insert_with(|| event.clone());
        }
    }
    found
}
