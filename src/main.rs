//! posekeys CLI
//!
//! Usage:
//!   pose_source | posekeys                      # Frames from stdin
//!   posekeys --input session.ndjson             # Replay a recorded session
//!   posekeys --input - --serve                  # Also serve status on :3000
//!   posekeys --input frames.ndjson --json       # JSON output
//!
//! Control lines may be mixed into the input:
//!   !disable jump / !enable jump / !status / quit

use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use posekeys::core::{
    run_server, run_session, AppState, BindingTable, DryRunExecutor, EngineSettings,
    GestureController, LineFeed, SessionEnd, SessionHooks,
};
use posekeys::types::{DispatchOutcome, FrameOutput, GestureId};
use posekeys::{COOLDOWN_MS, HEAD_TILT_THRESHOLD_DEG, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "posekeys",
    version = VERSION,
    about = "posekeys - Turn body gestures into keyboard and mouse actions",
    long_about = "posekeys reads body-pose keypoints (one JSON frame per line)\n\
                  and turns gestures into debounced key presses, mouse clicks\n\
                  and cursor nudges.\n\n\
                  Gestures:\n  \
                  left_arm_bend / right_arm_bend  - elbow bent below 60°, wrist low\n  \
                  tilt_left / tilt_right          - head tilted past the threshold\n  \
                  jump / left_knee_raise          - knee above hip\n  \
                  knee_clap                       - knees together (repeats)\n  \
                  arm_raised / arm_lowered        - wrist above / below shoulder\n\n\
                  Actions are printed (dry run); no OS input is injected."
)]
struct Args {
    /// NDJSON frame file, or "-" for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Gesture → action bindings
    #[arg(long, default_value = "keybindings.json")]
    keybindings: PathBuf,

    /// Gesture → enabled toggles
    #[arg(long, default_value = "toggles.json")]
    toggles: PathBuf,

    /// Minimum time between repeated triggers of one gesture
    #[arg(long, default_value_t = COOLDOWN_MS)]
    cooldown_ms: u64,

    /// Head tilt threshold in degrees
    #[arg(long, default_value_t = HEAD_TILT_THRESHOLD_DEG)]
    tilt_threshold: f64,

    /// Ear-line angle of an upright head, in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    tilt_neutral: f64,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Print every frame with its signal breakdown
    #[arg(short, long)]
    verbose: bool,

    /// Serve status over HTTP/WebSocket for overlays
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "posekeys=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    // Configuration errors are fatal before the loop starts
    let controller = match build_controller(&args) {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "configuration rejected");
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    info!("posekeys v{} starting", VERSION);

    let state = AppState::new();
    if args.serve {
        let server_state = state.clone();
        let addr = args.addr.clone();
        tokio::spawn(async move {
            if let Err(e) = run_server(&addr, server_state).await {
                error!(error = %e, "status server stopped");
            }
        });
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, stopping");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    let publish = args.serve.then(|| state.clone());
    let result = tokio::task::spawn_blocking(move || run_frames(&args, controller, publish, stop)).await;

    match result {
        Ok(Ok(frames)) => {
            info!(frames, "exiting");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!(error = %e, "frame loop failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "frame loop panicked");
            ExitCode::FAILURE
        }
    }
}

fn build_controller(args: &Args) -> posekeys::Result<GestureController> {
    let settings = EngineSettings {
        cooldown: Duration::from_millis(args.cooldown_ms),
        head_tilt_threshold_deg: args.tilt_threshold,
        tilt_neutral_deg: args.tilt_neutral,
        ..EngineSettings::default()
    };
    settings.validate()?;

    let bindings = BindingTable::load(&args.keybindings, &args.toggles)?;
    for (gesture, binding) in bindings.iter() {
        info!(
            gesture = %gesture,
            action = %binding.action,
            enabled = binding.enabled,
            "binding"
        );
    }
    Ok(GestureController::new(settings, bindings))
}

/// Console front end of a session
struct CliHooks<'a> {
    args: &'a Args,
    status: Option<Arc<AppState>>,
}

impl SessionHooks<DryRunExecutor> for CliHooks<'_> {
    fn on_frame(&mut self, output: &FrameOutput, controller: &GestureController, executor: &mut DryRunExecutor) {
        print_frame(output, controller, self.args);
        executor.drain();
        if let Some(state) = &self.status {
            state.publish_blocking(controller.status(executor.cursor()));
        }
    }

    fn on_command(&mut self, command: &str, controller: &mut GestureController, executor: &mut DryRunExecutor) {
        run_command(command, controller, executor, self.args);
    }
}

/// Frame loop: single-threaded, one iteration per input line
fn run_frames(
    args: &Args,
    mut controller: GestureController,
    status: Option<Arc<AppState>>,
    stop: Arc<AtomicBool>,
) -> posekeys::Result<u64> {
    let feed = if args.input == "-" {
        LineFeed::spawn(BufReader::new(io::stdin()))?
    } else {
        LineFeed::spawn(BufReader::new(File::open(&args.input)?))?
    };

    let mut executor = DryRunExecutor::new(controller.settings().nudge_pixels);
    let mut hooks = CliHooks { args, status: status.clone() };
    let summary = run_session(&mut controller, &mut executor, &feed, &stop, &mut hooks);

    print_outcomes("shutdown", &summary.released, args);
    if let Some(state) = &status {
        state.publish_blocking(controller.status(executor.cursor()));
    }

    match summary.end {
        SessionEnd::Failed(e) => Err(e),
        _ => Ok(summary.frames),
    }
}

/// `enable <gesture>`, `disable <gesture>`, `status`
fn run_command(
    command: &str,
    controller: &mut GestureController,
    executor: &mut DryRunExecutor,
    args: &Args,
) {
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(verb @ ("enable" | "disable")), Some(name)) => match GestureId::from_name(name) {
            Some(gesture) => {
                let released = controller.set_enabled(gesture, verb == "enable", executor);
                print_outcomes(verb, &released.into_iter().collect::<Vec<_>>(), args);
            }
            None => warn!(name, "unknown gesture in command"),
        },
        (Some("status"), None) => {
            let status = controller.status(executor.cursor());
            match serde_json::to_string(&status) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!(error = %e, "status not serializable"),
            }
        }
        _ => warn!(command, "unknown command"),
    }
}

fn print_frame(output: &FrameOutput, controller: &GestureController, args: &Args) {
    if args.json {
        match serde_json::to_string(output) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(error = %e, "frame not serializable"),
        }
        return;
    }

    if !args.verbose && output.outcomes.is_empty() {
        return;
    }

    if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }

    if args.verbose {
        print_signal_breakdown(controller);
    }
}

fn print_signal_breakdown(controller: &GestureController) {
    let signals = controller.last_signals();
    let fmt_angle = |a: Option<f64>| a.map_or("--".to_string(), |v| format!("{:.1}°", v));
    let line = format!(
        "  elbows L={} R={} | tilt angle={}",
        fmt_angle(signals.elbow_angles[0]),
        fmt_angle(signals.elbow_angles[1]),
        fmt_angle(signals.tilt_angle),
    );
    println!("{}", line.bright_black());
}

fn print_outcomes(label: &str, outcomes: &[DispatchOutcome], args: &Args) {
    for outcome in outcomes {
        if args.json {
            match serde_json::to_string(outcome) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!(error = %e, "outcome not serializable"),
            }
        } else {
            let line = format!(
                "[{}] {} {} ({})",
                label,
                outcome.gesture,
                outcome.phase,
                outcome.reason.code()
            );
            println!("{}", line.yellow());
        }
    }
}
