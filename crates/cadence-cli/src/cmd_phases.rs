use std::path::Path;

use cadence_classify::ClassifierConfig;
use cadence_core::duration::{format_duration, format_instant};
use time::OffsetDateTime;

use crate::analyze::analyze_change;
use crate::loader;

pub fn execute(file: &Path, json: bool, config: &ClassifierConfig) -> anyhow::Result<()> {
    let record = loader::load_change(file)?;
    let analysis = analyze_change(&record, config, OffsetDateTime::now_utc())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{} \"{}\" by {}", analysis.id, analysis.title, record.author);
    println!(
        "total lifecycle: {}",
        format_duration(analysis.total_secs)?
    );

    println!("\nmilestones:");
    for (state, event) in &analysis.key_states {
        println!(
            "  {:<24} {}  ({})",
            state.to_string(),
            format_instant(event.ts),
            event.actor.handle
        );
    }

    if analysis.phases.is_empty() {
        println!("\nno phase breakdown available");
        return Ok(());
    }

    println!("\nphases:");
    for phase in &analysis.phases {
        println!(
            "  {:<44} {:>10}  {:>5.1}%",
            phase.label(),
            format_duration(phase.seconds)?,
            phase.percent,
        );
    }
    Ok(())
}
