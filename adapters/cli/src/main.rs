#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays Bomb Request scenarios against a simulated server.

mod scenario;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};

use self::scenario::Scenario;

/// Replays a scenario and prints what every player saw in chat.
#[derive(Debug, Parser)]
#[command(name = "bomb-request", version, about)]
struct Args {
    /// TOML scenario to replay; the built-in demo runs when omitted.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,
    /// Seed for the selection dice, overriding the scenario.
    #[arg(long)]
    seed: Option<u64>,
    /// Delay between round start and selection in milliseconds, overriding the scenario.
    #[arg(long = "delay-ms", value_name = "MILLIS")]
    delay_ms: Option<u64>,
}

/// Entry point for the Bomb Request command-line interface.
fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut scenario = match &args.scenario {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario {}", path.display()))?;
            Scenario::from_toml(&text)
                .with_context(|| format!("failed to load scenario {}", path.display()))?
        }
        None => Scenario::demo().context("built-in demo scenario is invalid")?,
    };

    if let Some(seed) = args.seed {
        scenario.plugin.seed = Some(seed);
    }
    if let Some(delay_ms) = args.delay_ms {
        scenario.plugin.round_start_delay_ms = delay_ms;
    }

    let transcript = scenario.run().context("scenario replay failed")?;
    println!("{transcript}");
    Ok(())
}
