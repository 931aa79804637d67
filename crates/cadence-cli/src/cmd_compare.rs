use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use cadence_classify::ClassifierConfig;
use cadence_filter::{apply, ChangeSummary, FilterOutcome, FilterPhase, PhaseFilter};
use serde::Serialize;
use time::OffsetDateTime;

use crate::analyze::analyze_change;
use crate::loader;

#[derive(Serialize)]
struct CompareReport {
    changes: Vec<ChangeSummary>,
    skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterOutcome>,
}

pub fn execute(
    files: &[PathBuf],
    json: bool,
    config: &ClassifierConfig,
    filter: &PhaseFilter,
) -> anyhow::Result<()> {
    let (records, mut skipped) = loader::load_changes(files);
    let now = OffsetDateTime::now_utc();

    let mut summaries = Vec::new();
    for record in &records {
        match analyze_change(record, config, now) {
            Ok(analysis) => {
                summaries.push(ChangeSummary::from_phases(&analysis.id, &analysis.phases));
            }
            Err(err) => {
                tracing::warn!("skipping change {}: {err:#}", record.id);
                skipped += 1;
            }
        }
    }

    let outcome = if filter.is_empty() {
        None
    } else {
        Some(apply(&summaries, filter)?)
    };

    if json {
        let report = CompareReport {
            changes: summaries,
            skipped,
            filter: outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Matched phases per passing change, for highlighting.
    let matched: BTreeMap<&str, BTreeSet<FilterPhase>> = outcome
        .as_ref()
        .map(|o| {
            o.passed
                .iter()
                .map(|m| (m.id.as_str(), m.matched_phases.iter().copied().collect()))
                .collect()
        })
        .unwrap_or_default();

    println!(
        "{:<12} {:>16} {:>16} {:>16} {:>16}",
        "change", "dev", "wait", "review", "merge"
    );
    for summary in &summaries {
        let mut row = format!("{:<12}", summary.id);
        for phase in FilterPhase::ALL {
            let cell = match summary.phases.get(&phase) {
                Some(value) => {
                    let mark = if matched
                        .get(summary.id.as_str())
                        .is_some_and(|set| set.contains(&phase))
                    {
                        "*"
                    } else {
                        ""
                    };
                    format!("{:.1}% ({:.1}d){mark}", value.percent, value.days)
                }
                None => "-".to_string(),
            };
            row.push_str(&format!(" {cell:>16}"));
        }
        println!("{row}");
    }

    if skipped > 0 {
        println!("\nskipped: {skipped}");
    }

    if let Some(outcome) = &outcome {
        println!("\nchanges considered: {}", outcome.stats.total);
        println!("passed all bounds: {}", outcome.stats.passed);
        if !outcome.stats.excluded_by.is_empty() {
            println!("excluded by:");
            for (bound, count) in &outcome.stats.excluded_by {
                println!("  {bound}: {count}");
            }
        }
    }
    Ok(())
}
