use std::collections::BTreeMap;

use cadence_classify::ClassifierConfig;
use cadence_core::record::ChangeRecord;
use cadence_core::{KeyState, Phase, TimelineEvent};
use cadence_timeline::{build_timeline, extract_key_states, segment_phases, total_lifecycle_seconds};
use serde::Serialize;
use time::OffsetDateTime;

/// Full analysis of one change: timeline, milestones, and phases.
#[derive(Debug, Serialize)]
pub struct ChangeAnalysis {
    pub id: String,
    pub title: String,
    pub events: Vec<TimelineEvent>,
    pub key_states: BTreeMap<KeyState, TimelineEvent>,
    pub total_secs: i64,
    pub phases: Vec<Phase>,
}

/// Run the full pipeline over one change record. `now` bounds the open
/// tail of an unmerged change.
pub fn analyze_change(
    record: &ChangeRecord,
    config: &ClassifierConfig,
    now: OffsetDateTime,
) -> anyhow::Result<ChangeAnalysis> {
    let events = build_timeline(record, config)?;
    let key_states = extract_key_states(&events);
    let total_secs = total_lifecycle_seconds(&events, now)?;
    let phases = segment_phases(&events, total_secs, now)?;
    Ok(ChangeAnalysis {
        id: record.id.clone(),
        title: record.title.clone(),
        events,
        key_states,
        total_secs,
        phases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::duration::parse_instant;
    use cadence_core::record::{CommentRecord, CommitRecord};
    use cadence_core::PhaseEnd;

    fn record() -> ChangeRecord {
        ChangeRecord {
            id: "9".into(),
            title: "Tighten validation".into(),
            author: "alice".into(),
            author_name: None,
            created_at: "2026-03-01T09:00:00Z".into(),
            merged_at: Some("2026-03-01T17:00:00Z".into()),
            merged_by: None,
            commits: vec![CommitRecord {
                ts: "2026-03-01T10:00:00Z".into(),
                author: "alice".into(),
            }],
            comments: vec![CommentRecord {
                ts: "2026-03-01T12:00:00Z".into(),
                handle: "carol".into(),
                body: "One question inline.".into(),
            }],
            approvals: vec![],
            pipelines: vec![],
        }
    }

    #[test]
    fn pipeline_produces_consistent_analysis() {
        let now = parse_instant("now", "2026-03-02T09:00:00Z").unwrap();
        let analysis = analyze_change(&record(), &ClassifierConfig::new(), now).unwrap();
        assert_eq!(analysis.total_secs, 8 * 3600);
        assert_eq!(analysis.events.len(), 4);
        assert_eq!(analysis.key_states.len(), 4);
        let sum: i64 = analysis.phases.iter().map(|p| p.seconds).sum();
        assert_eq!(sum, analysis.total_secs);
        assert_eq!(
            analysis.phases.last().unwrap().to,
            PhaseEnd::State(KeyState::Merged)
        );
    }

    #[test]
    fn creation_only_change_has_no_breakdown_when_now_matches() {
        let mut record = record();
        record.merged_at = None;
        record.commits.clear();
        record.comments.clear();
        let now = parse_instant("now", "2026-03-01T09:00:00Z").unwrap();
        let analysis = analyze_change(&record, &ClassifierConfig::new(), now).unwrap();
        assert_eq!(analysis.total_secs, 0);
        assert!(analysis.phases.is_empty());
    }
}
