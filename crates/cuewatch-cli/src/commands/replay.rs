use std::path::PathBuf;

use clap::Args;
use cuewatch_core::{
    format_timestamp, read_payload, AutoExpiry, Config, TemporalEventResolver, Transition,
    TransitionRecord,
};
use tracing::info;

#[derive(Args)]
pub struct ReplayArgs {
    /// Analysis payload (JSON list of moments)
    pub payload: PathBuf,
    /// First playback position, in seconds
    #[arg(long, default_value = "0")]
    pub from: f64,
    /// Last playback position (default: one second past the last window)
    #[arg(long)]
    pub to: Option<f64>,
    /// Sampling interval, in seconds
    #[arg(long, default_value = "0.25")]
    pub step: f64,
    /// Explicit comma-separated sample times; overrides --from/--to/--step
    #[arg(long, value_delimiter = ',')]
    pub at: Option<Vec<f64>>,
    /// Do not hide events after the configured display duration
    #[arg(long)]
    pub no_expire: bool,
    /// Human-readable lines instead of JSON records
    #[arg(long)]
    pub text: bool,
}

/// Playback positions to feed, either explicit or sampled lazily on a fixed grid.
fn sample_times(
    args: &ReplayArgs,
    resolver: &TemporalEventResolver,
) -> Result<Box<dyn Iterator<Item = f64>>, Box<dyn std::error::Error>> {
    if let Some(ref at) = args.at {
        return Ok(Box::new(at.clone().into_iter()));
    }
    if !(args.step.is_finite() && args.step > 0.0) {
        return Err(format!("--step must be positive, got {}", args.step).into());
    }
    if !args.from.is_finite() {
        return Err(format!("--from must be finite, got {}", args.from).into());
    }
    let to = match args.to {
        Some(to) if !to.is_finite() => {
            return Err(format!("--to must be finite, got {to}").into());
        }
        Some(to) => to,
        None => resolver
            .events()
            .iter()
            .map(|e| e.effective_end + 1.0)
            .fold(args.from, f64::max),
    };

    let (from, step) = (args.from, args.step);
    Ok(Box::new(
        (0u64..)
            .map(move |i| from + i as f64 * step)
            .take_while(move |&t| t <= to),
    ))
}

fn print_record(record: &TransitionRecord, text: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !text {
        println!("{}", serde_json::to_string(record)?);
        return Ok(());
    }
    let stamp = format_timestamp(record.playback_time);
    let suffix = if record.forced { " (expired)" } else { "" };
    match &record.transition {
        Transition::Activated { event, replaced } => {
            if let Some(old) = replaced {
                println!("[{stamp}] hide {}", old.identity);
            }
            let label = event.label.as_deref().unwrap_or("");
            println!("[{stamp}] show {} ({}) {label}", event.identity, event.category);
        }
        Transition::Deactivated { event } => println!("[{stamp}] hide {}{suffix}", event.identity),
        Transition::Unchanged => {}
    }
    Ok(())
}

pub fn run(args: ReplayArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_payload(&args.payload)?;
    let mut resolver = TemporalEventResolver::new(config.resolver.clone());
    let report = resolver.load_payload(&payload)?;
    info!(
        accepted = report.accepted,
        dropped = report.dropped.len(),
        "payload loaded"
    );

    let expire = config.display.auto_expire && !args.no_expire;
    let mut expiry = AutoExpiry::new(config.display.display_duration_secs);

    for t in sample_times(&args, &resolver)? {
        let transition = resolver.tick(t);
        expiry.observe(&transition, t);
        if !transition.is_unchanged() {
            print_record(&TransitionRecord::new(t, transition, false), args.text)?;
        }

        if expire && expiry.is_due(t) {
            let hidden = resolver.deactivate();
            expiry.observe(&hidden, t);
            if !hidden.is_unchanged() {
                print_record(&TransitionRecord::new(t, hidden, true), args.text)?;
            }
        }
    }
    Ok(())
}
