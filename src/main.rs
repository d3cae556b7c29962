//! GymBuddy CLI
//!
//! Usage:
//!   gymbuddy --signals 0.0,0.12,0.13,0.04,0.0   # One-shot evaluation
//!   gymbuddy --interactive                       # Read samples/frames from stdin
//!   gymbuddy --serve                             # HTTP + WebSocket API
//!   gymbuddy --history                           # Show stored sessions
//!   gymbuddy --signals 0.2,0.0 --json            # JSON output

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::warn;

use gymbuddy::config::Config;
use gymbuddy::core::{run_server, Coach, CollectingSink, SessionStore};
use gymbuddy::types::{FrameInput, Sample, SessionRecord, SignalStrategyKind, Thresholds};
use gymbuddy::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "gymbuddy",
    version = VERSION,
    about = "GymBuddy - count squat reps from pose signals",
    long_about = "GymBuddy counts squat reps from a stream of pose-derived signals.\n\n\
                  A rep is a DOWN → UP round trip through a hysteresis band:\n\
                  the signal must cross down_enter to reach DOWN and cross back\n\
                  past up_enter to count.\n\n\
                  Input lines (interactive mode):\n  \
                  0.12           scalar sample\n  \
                  -              missing sample\n  \
                  {...} / [...]  JSON pose frame (keypoint map or MediaPipe list)\n\n\
                  Strategies:\n  \
                  vertical-displacement  hip.y - knee.y (default 0.10 / 0.05)\n  \
                  knee-angle             hip/knee/ankle degrees (default 110 / 160)"
)]
struct Args {
    /// Comma-separated samples to evaluate (single mode)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    signals: Option<Vec<String>>,

    /// Interactive mode - read samples or frames from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Print stored session history and exit
    #[arg(long)]
    history: bool,

    /// TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Signal strategy (vertical-displacement | knee-angle)
    #[arg(long)]
    strategy: Option<SignalStrategyKind>,

    /// Override down_enter threshold
    #[arg(long, allow_hyphen_values = true)]
    down: Option<f64>,

    /// Override up_enter threshold
    #[arg(long, allow_hyphen_values = true)]
    up: Option<f64>,

    /// Server address (overrides config)
    #[arg(long)]
    addr: Option<String>,

    /// Session history file (overrides config)
    #[arg(long)]
    history_file: Option<String>,

    /// Don't store the session summary (single and interactive modes)
    #[arg(long)]
    no_save: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    gymbuddy::logging::init(&args.log_level, !args.no_color)
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialise logging")?;

    let config = build_config(&args)?;

    if args.serve {
        run_serve(config).await
    } else if args.history {
        run_history(&config, &args)
    } else if let Some(ref signals) = args.signals {
        run_single(signals, &config, &args)
    } else {
        // Default to interactive if no mode specified
        run_interactive(&config, &args)
    }
}

/// Config file (if any) with CLI overrides applied
fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path))?,
        None => Config::default(),
    };

    if let Some(strategy) = args.strategy {
        if strategy != config.strategy {
            // file thresholds belong to the file's strategy
            config.thresholds = None;
        }
        config.strategy = strategy;
    }
    if args.down.is_some() || args.up.is_some() {
        let base = config.effective_thresholds();
        config.thresholds = Some(Thresholds {
            down_enter: args.down.unwrap_or(base.down_enter),
            up_enter: args.up.unwrap_or(base.up_enter),
        });
    }
    if let Some(addr) = &args.addr {
        config.server.addr = addr.clone();
    }
    if let Some(path) = &args.history_file {
        config.history.path = path.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn new_coach(config: &Config) -> Result<Coach<CollectingSink>> {
    Coach::new(
        config.strategy,
        Some(config.effective_thresholds()),
        config.posture_limits(),
        CollectingSink::new(),
    )
    .context("invalid thresholds")
}

/// One parsed input line
enum Input {
    Sample(Sample),
    Frame(FrameInput),
}

fn parse_line(line: &str) -> Result<Input> {
    let line = line.trim();
    if line == "-" || line.eq_ignore_ascii_case("none") || line.eq_ignore_ascii_case("null") {
        return Ok(Input::Sample(Sample::missing()));
    }
    if line.starts_with('{') || line.starts_with('[') {
        let frame = serde_json::from_str(line).context("invalid JSON frame")?;
        return Ok(Input::Frame(frame));
    }
    match line.parse::<f64>() {
        Ok(v) => Ok(Input::Sample(Sample::new(v))),
        Err(_) => bail!("not a number, '-' or JSON frame: '{}'", line),
    }
}

/// Feed one input, print the result
fn feed(coach: &mut Coach<CollectingSink>, input: Input, config: &Config, args: &Args) -> Result<()> {
    match input {
        Input::Sample(sample) => {
            let output = coach.observe_signal(sample);
            if args.json {
                println!("{}", serde_json::to_string(&output)?);
            } else if args.no_color {
                println!("{}", output.to_parseable_string());
            } else {
                println!("{}", output.to_terminal_string());
            }
        }
        Input::Frame(frame) => {
            let output = coach.process(&frame.into_frame(config.min_visibility));
            if args.json {
                println!("{}", serde_json::to_string(&output)?);
            } else if args.no_color {
                println!("{}", output.to_parseable_string());
            } else {
                println!("{}", output.to_terminal_string());
            }
        }
    }

    let cues = coach.sink_mut().drain();
    if !args.json {
        for cue in cues {
            let phrase = cue.phrase();
            if !phrase.is_empty() {
                println!("  🔊 {}", phrase.bold());
            }
        }
    }
    Ok(())
}

/// Evaluate a fixed list of samples
fn run_single(signals: &[String], config: &Config, args: &Args) -> Result<()> {
    let mut coach = new_coach(config)?;
    for raw in signals {
        let input = parse_line(raw)?;
        feed(&mut coach, input, config, args)?;
    }
    let record = coach.finish();
    print_summary(&record, args);
    save_record(record, config, args)
}

/// Read samples or frames from stdin until EOF or 'quit'
fn run_interactive(config: &Config, args: &Args) -> Result<()> {
    let mut coach = new_coach(config)?;
    let thresholds = coach.counter().thresholds();

    if !args.json {
        print_header(args.no_color);
        println!(
            "Strategy: {} | down_enter={} | up_enter={}",
            config.strategy, thresholds.down_enter, thresholds.up_enter
        );
        println!("Enter a sample, '-' for none, or a JSON frame. Type 'quit' to exit.");
        println!();
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if !args.json {
            let phase = coach.counter().phase();
            let prompt = format!("[{} | reps={}] > ", phase, coach.reps());
            print!("{}", prompt.color(phase.color()));
            stdout.flush()?;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(input) => feed(&mut coach, input, config, args)?,
            Err(e) => eprintln!("{} {:#}", "⚠".yellow(), e),
        }
    }

    let record = coach.finish();
    print_summary(&record, args);
    save_record(record, config, args)
}

/// Append the finished session to the history file unless --no-save
fn save_record(record: SessionRecord, config: &Config, args: &Args) -> Result<()> {
    if args.no_save {
        return Ok(());
    }
    let mut store = SessionStore::load(&config.history.path)?;
    store.append(record)?;
    if !args.json {
        println!("Saved to {}", store.path().display());
    }
    Ok(())
}

/// Print stored sessions
fn run_history(config: &Config, args: &Args) -> Result<()> {
    let store = SessionStore::load(&config.history.path)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(store.records())?);
        return Ok(());
    }
    if store.records().is_empty() {
        println!("No sessions stored in {}", store.path().display());
        return Ok(());
    }
    println!("{:<20} {:>6} {:>9} {:>8}  {}", "date", "reps", "duration", "reps/min", "strategy");
    for record in store.records() {
        println!(
            "{:<20} {:>6} {:>8.1}s {:>8.1}  {}",
            record.started_at.format("%Y-%m-%d %H:%M:%S"),
            record.reps,
            record.duration_secs,
            record.reps_per_minute(),
            record.strategy
        );
    }
    println!("Total reps: {}", store.total_reps());
    Ok(())
}

fn print_header(no_color: bool) {
    let title = format!("GymBuddy v{} - squat counter", VERSION);
    if no_color {
        println!("========================================");
        println!("  {}", title);
        println!("========================================");
    } else {
        println!("{}", "════════════════════════════════════════".bold());
        println!("  {}", title.bold());
        println!("{}", "════════════════════════════════════════".bold());
    }
    println!();
}

fn print_summary(record: &SessionRecord, args: &Args) {
    if args.json {
        match serde_json::to_string(record) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(error = %e, "failed to serialize summary"),
        }
        return;
    }
    println!();
    println!(
        "Session ended. Reps: {} | Duration: {:.1}s | Missing samples: {}/{} | Posture warnings: {}",
        record.reps,
        record.duration_secs,
        record.frames_missing,
        record.frames_observed,
        record.posture_warnings
    );
}

/// Run HTTP API server
async fn run_serve(config: Config) -> Result<()> {
    println!();
    println!("GymBuddy API Server v{}", VERSION);
    println!();
    run_server(config)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))
}
