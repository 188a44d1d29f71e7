use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};
use circle_gesture::{RecognizerState, TouchPhase, TouchSample};

const TRACE_TAG: &str = "circle_trace";
const TRACE_HEADER: &str = "circle_trace,ms,phase,x,y";

pub fn parse_trace(path: &Path) -> Result<Vec<TouchSample>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != TRACE_TAG {
            continue;
        }
        if parts.len() < 5 {
            bail!(
                "{}:{line_no} invalid trace line, expected 5 columns",
                path.display()
            );
        }

        let location = || format!("{}:{line_no}", path.display());
        let t_ms = parts[1]
            .parse::<u64>()
            .with_context(|| format!("{} invalid ms '{}'", location(), parts[1]))?;
        let phase = parse_phase(parts[2])
            .ok_or_else(|| anyhow!("{} invalid phase '{}'", location(), parts[2]))?;
        let x = parts[3]
            .parse::<f32>()
            .with_context(|| format!("{} invalid x '{}'", location(), parts[3]))?;
        let y = parts[4]
            .parse::<f32>()
            .with_context(|| format!("{} invalid y '{}'", location(), parts[4]))?;

        out.push(TouchSample::new(phase, t_ms, x, y));
    }

    Ok(out)
}

pub fn parse_expected_states(path: &Path) -> Result<Vec<RecognizerState>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut states = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let state = RecognizerState::from_label(token).ok_or_else(|| {
            anyhow!(
                "{}:{line_no} invalid expected state: {token}",
                path.display()
            )
        })?;
        states.push(state);
    }

    Ok(states)
}

pub fn phase_label(phase: TouchPhase) -> &'static str {
    match phase {
        TouchPhase::Begin => "begin",
        TouchPhase::Move => "move",
        TouchPhase::End => "end",
        TouchPhase::Cancel => "cancel",
    }
}

fn parse_phase(raw: &str) -> Option<TouchPhase> {
    match raw.to_ascii_lowercase().as_str() {
        "begin" | "began" => Some(TouchPhase::Begin),
        "move" | "moved" => Some(TouchPhase::Move),
        "end" | "ended" => Some(TouchPhase::End),
        "cancel" | "cancelled" => Some(TouchPhase::Cancel),
        _ => None,
    }
}
