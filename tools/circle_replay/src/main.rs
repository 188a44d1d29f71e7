mod logging;
mod replay;
mod trace;

use std::{path::PathBuf, process};

use anyhow::{bail, Context, Result};
use circle_gesture::{CircleGestureConfig, CircleGestureRecognizer, GestureRecognizer};
use clap::Parser;

use replay::{replay, transition_states};
use trace::{parse_expected_states, parse_trace, phase_label};

#[derive(Debug, Parser)]
#[command(name = "circle_replay")]
#[command(about = "Replay a recorded touch trace through the circle gesture recognizer")]
struct Cli {
    /// CSV trace with `circle_trace,ms,phase,x,y` records.
    trace: PathBuf,
    /// TOML file with recognizer tunables; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// File listing the expected state transitions, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    #[arg(long = "expect-progress")]
    expect_progress: Option<f32>,
    #[arg(long, default_value_t = 0.02)]
    tolerance: f32,
    #[arg(long = "log-json")]
    log_json: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.log_json).and_then(|()| run(&cli)) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CircleGestureConfig::from_toml_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CircleGestureConfig::default(),
    };
    let samples = parse_trace(&cli.trace)?;
    tracing::info!(
        samples = samples.len(),
        trace = %cli.trace.display(),
        "replaying trace"
    );

    let mut recognizer = CircleGestureRecognizer::with_config(config)?;
    let rows = replay(&mut recognizer, &samples);

    println!("update,ms,phase,state,progress");
    for row in &rows {
        println!(
            "update,{},{},{},{:.4}",
            row.sample.t_ms,
            phase_label(row.sample.phase),
            row.update.state.label(),
            row.update.progress
        );
    }
    println!(
        "summary,state={},progress={:.4},failure={}",
        recognizer.state().label(),
        recognizer.progress(),
        recognizer.failure().map_or("none", |reason| reason.label())
    );

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_states(expect_path)?;
        let actual = transition_states(&rows);
        if actual != expected {
            let join = |states: &[circle_gesture::RecognizerState]| {
                states
                    .iter()
                    .map(|state| state.label())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            eprintln!("expected states: {}", join(&expected));
            eprintln!("actual states:   {}", join(&actual));
            bail!("state sequence mismatch");
        }
    }

    if let Some(expected) = cli.expect_progress {
        let actual = recognizer.progress();
        if (actual - expected).abs() > cli.tolerance {
            bail!(
                "final progress {actual:.4} differs from expected {expected:.4} by more than {}",
                cli.tolerance
            );
        }
    }

    Ok(())
}
