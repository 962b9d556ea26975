mod search;
mod shell;

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dataset::Dataset;
use dataset::fixtures::hot_clusters;
use scene::{Dashboard, EngineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::shell::{Flow, Shell};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless hotspot dashboard: globe/map view engine with picking and search")]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Simulated frame interval in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// JSON array of cluster records (defaults to the built-in hotspots)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = engine_config_from_env();

    let dataset = match &args.dataset {
        Some(path) => {
            let payload = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Dataset::from_json_str(&payload).with_context(|| format!("loading {}", path.display()))?
        }
        None => Dataset::new(hot_clusters(chrono::Utc::now()))?,
    };
    let stats = dataset.stats();
    info!(
        clusters = stats.cluster_count,
        events = stats.total_events,
        critical = stats.critical_count,
        "dataset loaded"
    );

    let mut shell = Shell::new(Dashboard::new(dataset, config), args.frame_ms, args.pretty);
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let lines: Box<dyn Iterator<Item = io::Result<String>>> = match &args.script {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Box::new(text.lines().map(|l| Ok(l.to_string())).collect::<Vec<_>>().into_iter())
        }
        None => Box::new(io::stdin().lock().lines()),
    };

    for (n, line) in lines.enumerate() {
        let line = line?;
        let mut out = Vec::new();
        let flow = shell
            .execute(&line, &mut out)
            .with_context(|| format!("line {}: {}", n + 1, line.trim()))?;
        for l in out {
            writeln!(stdout, "{l}")?;
        }
        if flow == Flow::Quit {
            break;
        }
    }

    info!(frame = shell.dashboard().frame().index, "session ended");
    Ok(())
}

fn engine_config_from_env() -> EngineConfig {
    let defaults = EngineConfig::default();
    EngineConfig {
        globe_zoom_threshold: env_var_f64("HOTSPOT_GLOBE_ZOOM_THRESHOLD", defaults.globe_zoom_threshold),
        fly_to_duration_ms: env_var_f64("HOTSPOT_FLY_TO_DURATION_MS", defaults.fly_to_duration_ms),
        summary_latency_ms: env_var_f64("HOTSPOT_SUMMARY_LATENCY_MS", defaults.summary_latency_ms),
        ..defaults
    }
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
