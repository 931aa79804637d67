//! Timeline assembly: merge a change's raw event sources into one ordered,
//! actor-attributed sequence.

use std::collections::HashMap;

use cadence_classify::{classify, ClassifierConfig, CommentSignals};
use cadence_core::duration::{interval_seconds, parse_instant, CLOCK_SKEW_TOLERANCE_SECS};
use cadence_core::record::ChangeRecord;
use cadence_core::{Actor, AnalysisError, EventKind, Role, TimelineEvent};
use time::OffsetDateTime;

/// Everything sampled from one commenter, aggregated before any of their
/// comments is classified. The content-pattern layer needs the full sample.
struct CommenterSample {
    texts: Vec<String>,
    first_ts: OffsetDateTime,
    total_chars: usize,
}

fn resolve_actor(
    actors: &mut HashMap<String, Actor>,
    samples: &HashMap<String, CommenterSample>,
    config: &ClassifierConfig,
    change: &ChangeRecord,
    created: OffsetDateTime,
    handle: &str,
) -> Actor {
    if let Some(actor) = actors.get(handle) {
        return actor.clone();
    }
    // Authorship always wins over automation signals.
    let actor = if handle == change.author {
        let display = change.author_name.as_deref().unwrap_or(handle);
        Actor::new(handle, display, Role::Author)
    } else {
        let role = match samples.get(handle) {
            Some(sample) => {
                let signals = CommentSignals {
                    texts: &sample.texts,
                    average_length: sample.total_chars / sample.texts.len().max(1),
                    first_comment: Some(sample.first_ts),
                    change_created: Some(created),
                };
                classify(config, handle, Some(&signals))
            }
            None => classify(config, handle, None),
        };
        Actor::new(handle, handle, role)
    };
    actors.insert(handle.to_string(), actor.clone());
    actor
}

/// Build the ordered timeline for one change.
///
/// Sources are merged by ascending instant; ties break by fixed source
/// priority (creation, commit, comment, approval, pipeline, merge) for
/// determinism. Fails if the change lacks a creation instant or any
/// timestamp is unparsable.
pub fn build_timeline(
    change: &ChangeRecord,
    config: &ClassifierConfig,
) -> Result<Vec<TimelineEvent>, AnalysisError> {
    if change.created_at.trim().is_empty() {
        return Err(AnalysisError::MissingCreation {
            change: change.id.clone(),
        });
    }
    let created = parse_instant("created_at", &change.created_at)?;

    // Parse comment instants and aggregate per-commenter samples first.
    let mut comment_instants = Vec::with_capacity(change.comments.len());
    let mut samples: HashMap<String, CommenterSample> = HashMap::new();
    for (i, comment) in change.comments.iter().enumerate() {
        let ts = parse_instant(&format!("comments[{i}].ts"), &comment.ts)?;
        comment_instants.push(ts);
        samples
            .entry(comment.handle.clone())
            .and_modify(|s| {
                s.texts.push(comment.body.clone());
                s.total_chars += comment.body.chars().count();
                if ts < s.first_ts {
                    s.first_ts = ts;
                }
            })
            .or_insert_with(|| CommenterSample {
                texts: vec![comment.body.clone()],
                first_ts: ts,
                total_chars: comment.body.chars().count(),
            });
    }

    let mut actors: HashMap<String, Actor> = HashMap::new();
    let mut raw: Vec<(OffsetDateTime, EventKind, Actor)> = Vec::new();

    let author = resolve_actor(&mut actors, &samples, config, change, created, &change.author);
    raw.push((created, EventKind::Created, author));

    for (i, commit) in change.commits.iter().enumerate() {
        let ts = parse_instant(&format!("commits[{i}].ts"), &commit.ts)?;
        let actor = resolve_actor(&mut actors, &samples, config, change, created, &commit.author);
        raw.push((ts, EventKind::CommitPushed, actor));
    }

    for (i, comment) in change.comments.iter().enumerate() {
        let actor = resolve_actor(&mut actors, &samples, config, change, created, &comment.handle);
        let kind = match actor.role {
            Role::AiReviewer => EventKind::AutomatedReview,
            Role::HumanReviewer => EventKind::HumanReview,
            Role::Author | Role::SystemCi => EventKind::CommentPosted,
        };
        raw.push((comment_instants[i], kind, actor));
    }

    for (i, approval) in change.approvals.iter().enumerate() {
        let ts = parse_instant(&format!("approvals[{i}].ts"), &approval.ts)?;
        let actor = resolve_actor(&mut actors, &samples, config, change, created, &approval.handle);
        raw.push((ts, EventKind::Approved, actor));
    }

    for (i, pipeline) in change.pipelines.iter().enumerate() {
        let ts = parse_instant(&format!("pipelines[{i}].ts"), &pipeline.ts)?;
        let handle = pipeline.name.as_deref().unwrap_or("pipeline");
        let actor = actors
            .entry(handle.to_string())
            .or_insert_with(|| Actor::new(handle, handle, Role::SystemCi))
            .clone();
        let kind = if pipeline.status.is_terminal() {
            EventKind::PipelineFinished
        } else {
            EventKind::PipelineQueued
        };
        raw.push((ts, kind, actor));
    }

    if let Some(merged_at) = &change.merged_at {
        let ts = parse_instant("merged_at", merged_at)?;
        let handle = change.merged_by.as_deref().unwrap_or(&change.author);
        let actor = resolve_actor(&mut actors, &samples, config, change, created, handle);
        raw.push((ts, EventKind::Merged, actor));
    }

    raw.sort_by_key(|(ts, kind, _)| (*ts, kind.source_priority()));

    let mut events: Vec<TimelineEvent> = raw
        .into_iter()
        .enumerate()
        .map(|(seq, (ts, kind, actor))| TimelineEvent {
            seq: seq as u64,
            ts,
            actor,
            kind,
            gap_to_next: None,
        })
        .collect();

    for i in 0..events.len().saturating_sub(1) {
        let gap = interval_seconds(events[i].ts, events[i + 1].ts, CLOCK_SKEW_TOLERANCE_SECS)?;
        events[i].gap_to_next = Some(gap);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::record::{ApprovalRecord, CommentRecord, CommitRecord, PipelineRecord, PipelineStatus};

    fn change() -> ChangeRecord {
        ChangeRecord {
            id: "42".into(),
            title: "Add retry to uploader".into(),
            author: "alice".into(),
            author_name: Some("Alice".into()),
            created_at: "2026-03-01T09:00:00Z".into(),
            merged_at: Some("2026-03-01T15:00:00Z".into()),
            merged_by: Some("carol".into()),
            commits: vec![CommitRecord {
                ts: "2026-03-01T09:30:00Z".into(),
                author: "alice".into(),
            }],
            comments: vec![
                CommentRecord {
                    ts: "2026-03-01T09:35:00Z".into(),
                    handle: "review-bot".into(),
                    body: "## Walkthrough\nAdds a retry loop.".into(),
                },
                CommentRecord {
                    ts: "2026-03-01T11:00:00Z".into(),
                    handle: "carol".into(),
                    body: "Looks reasonable, one nit.".into(),
                },
                CommentRecord {
                    ts: "2026-03-01T11:30:00Z".into(),
                    handle: "alice".into(),
                    body: "Nit fixed.".into(),
                },
            ],
            approvals: vec![ApprovalRecord {
                ts: "2026-03-01T13:00:00Z".into(),
                handle: "carol".into(),
            }],
            pipelines: vec![PipelineRecord {
                ts: "2026-03-01T09:31:00Z".into(),
                status: PipelineStatus::Success,
                name: None,
            }],
        }
    }

    #[test]
    fn merges_sources_in_instant_order() {
        let events = build_timeline(&change(), &ClassifierConfig::new()).unwrap();
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Created,
                EventKind::CommitPushed,
                EventKind::PipelineFinished,
                EventKind::AutomatedReview,
                EventKind::HumanReview,
                EventKind::CommentPosted,
                EventKind::Approved,
                EventKind::Merged,
            ]
        );
    }

    #[test]
    fn sequence_numbers_strictly_increase() {
        let events = build_timeline(&change(), &ClassifierConfig::new()).unwrap();
        for pair in events.windows(2) {
            assert!(pair[0].seq < pair[1].seq);
            assert!(pair[0].ts <= pair[1].ts);
        }
    }

    #[test]
    fn gaps_cover_all_but_last() {
        let events = build_timeline(&change(), &ClassifierConfig::new()).unwrap();
        let (last, rest) = events.split_last().unwrap();
        for event in rest {
            assert!(event.gap_to_next.unwrap() >= 0);
        }
        assert!(last.gap_to_next.is_none());
        // created 09:00 -> commit 09:30
        assert_eq!(events[0].gap_to_next, Some(1800));
    }

    #[test]
    fn author_comment_stays_author() {
        let events = build_timeline(&change(), &ClassifierConfig::new()).unwrap();
        let own = events
            .iter()
            .find(|e| e.kind == EventKind::CommentPosted)
            .unwrap();
        assert_eq!(own.actor.handle, "alice");
        assert_eq!(own.actor.role, Role::Author);
        assert!(!own.actor.automated);
    }

    #[test]
    fn reviewer_roles_classified() {
        let events = build_timeline(&change(), &ClassifierConfig::new()).unwrap();
        let bot = events
            .iter()
            .find(|e| e.actor.handle == "review-bot")
            .unwrap();
        assert_eq!(bot.actor.role, Role::AiReviewer);
        assert_eq!(bot.kind, EventKind::AutomatedReview);
        let carol = events
            .iter()
            .find(|e| e.kind == EventKind::HumanReview)
            .unwrap();
        assert_eq!(carol.actor.role, Role::HumanReviewer);
    }

    #[test]
    fn pipeline_actor_is_system_ci() {
        let events = build_timeline(&change(), &ClassifierConfig::new()).unwrap();
        let run = events
            .iter()
            .find(|e| e.kind == EventKind::PipelineFinished)
            .unwrap();
        assert_eq!(run.actor.role, Role::SystemCi);
        assert!(run.actor.automated);
    }

    #[test]
    fn tie_breaks_by_source_priority() {
        let mut record = change();
        // Commit stamped at the exact creation instant must sort after creation.
        record.commits[0].ts = record.created_at.clone();
        let events = build_timeline(&record, &ClassifierConfig::new()).unwrap();
        assert_eq!(events[0].kind, EventKind::Created);
        assert_eq!(events[1].kind, EventKind::CommitPushed);
        assert_eq!(events[0].gap_to_next, Some(0));
    }

    #[test]
    fn missing_creation_fails() {
        let mut record = change();
        record.created_at = "".into();
        let err = build_timeline(&record, &ClassifierConfig::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCreation { .. }));
    }

    #[test]
    fn unparsable_instant_fails_with_field() {
        let mut record = change();
        record.comments[1].ts = "yesterday".into();
        let err = build_timeline(&record, &ClassifierConfig::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("comments[1].ts"));
        assert!(msg.contains("yesterday"));
    }

    #[test]
    fn commenter_classified_once_across_sample() {
        // Two short comments plus one generated-looking one: 2/3 generated
        // would be needed to flip, so the aggregate sample keeps the
        // participant human even though one comment looks generated.
        let mut record = change();
        record.comments = vec![
            CommentRecord {
                ts: "2026-03-01T10:00:00Z".into(),
                handle: "dave".into(),
                body: "**File:** src/up.rs\nlooks odd".into(),
            },
            CommentRecord {
                ts: "2026-03-01T10:05:00Z".into(),
                handle: "dave".into(),
                body: "short".into(),
            },
        ];
        let events = build_timeline(&record, &ClassifierConfig::new()).unwrap();
        for event in events.iter().filter(|e| e.actor.handle == "dave") {
            assert_eq!(event.actor.role, Role::HumanReviewer);
        }
    }
}
