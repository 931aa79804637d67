use std::path::Path;

use cadence_classify::ClassifierConfig;
use cadence_core::duration::{format_duration, format_instant};
use cadence_timeline::build_timeline;

use crate::loader;

pub fn execute(file: &Path, json: bool, config: &ClassifierConfig) -> anyhow::Result<()> {
    let record = loader::load_change(file)?;
    let events = build_timeline(&record, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    println!("{} \"{}\" by {}", record.id, record.title, record.author);
    println!("{:>4}  {:<20}  {:<24}  {:<18}  {}", "#", "instant", "actor", "kind", "gap");
    for event in &events {
        let gap = match event.gap_to_next {
            Some(secs) => format_duration(secs)?,
            None => "-".to_string(),
        };
        println!(
            "{:>4}  {:<20}  {:<24}  {:<18}  {}",
            event.seq,
            format_instant(event.ts),
            format!("{} ({})", event.actor.handle, event.actor.role),
            event.kind.to_string(),
            gap,
        );
    }
    Ok(())
}
