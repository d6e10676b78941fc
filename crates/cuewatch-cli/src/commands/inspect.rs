use std::path::PathBuf;

use clap::Args;
use cuewatch_core::{format_timestamp, read_payload, Config, TemporalEventResolver};

#[derive(Args)]
pub struct InspectArgs {
    /// Analysis payload (JSON list of moments)
    pub payload: PathBuf,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InspectArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_payload(&args.payload)?;
    let mut resolver = TemporalEventResolver::new(config.resolver.clone());
    let report = resolver.load_payload(&payload)?;

    if args.json {
        let dropped: Vec<_> = report
            .dropped
            .iter()
            .map(|d| {
                serde_json::json!({
                    "index": d.index,
                    "identity": d.identity,
                    "reason": d.error.to_string(),
                })
            })
            .collect();
        let out = serde_json::json!({
            "accepted": report.accepted,
            "filtered": report.filtered,
            "dropped": dropped,
            "events": resolver.events(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Accepted: {}  Filtered: {}  Dropped: {}",
        report.accepted,
        report.filtered,
        report.dropped.len()
    );
    for w in resolver.events() {
        println!(
            "  {:>3}  {}-{} (shown until {})  {:<7} {}",
            w.order,
            format_timestamp(w.start_time),
            format_timestamp(w.end_time),
            format_timestamp(w.effective_end),
            w.category,
            w.identity
        );
    }
    for d in &report.dropped {
        println!(
            "  dropped #{} {}: {}",
            d.index,
            d.identity.as_deref().unwrap_or("-"),
            d.error
        );
    }
    Ok(())
}
