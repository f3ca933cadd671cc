use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use armctl_core::motion::MotionBackend;
use armctl_core::recording::RecordingRepository;
use armctl_core::session::ConnectedSession;
use armctl_core::{Interpreter, Reply};
use armctl_infrastructure::dto::ConfigRoot;
use armctl_infrastructure::{ArmctlPaths, ConfigService, TomlRecordingRepository};
use armctl_interaction::{GplBackend, ServoCalibration, SimulatedBackend, TrackingServo};

mod helper;

use helper::{CliHelper, help_text};

const LOG_ENV: &str = "ARMCTL_LOG";

#[derive(Parser, Debug)]
#[command(name = "armctl")]
#[command(about = "Interactive command interpreter for a robotic arm and gripper", long_about = None)]
struct Cli {
    /// Motion backend to drive
    #[arg(long, value_enum, default_value_t = BackendKind::Gpl)]
    backend: BackendKind,

    /// Controller host (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Controller port (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Configuration file [default: ~/.config/armctl/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Folder recordings are saved to and loaded from
    #[arg(long, value_name = "DIR")]
    recordings: Option<PathBuf>,

    /// Connect without powering up and homing the arm
    #[arg(long)]
    no_enable: bool,

    /// Run the commands in FILE instead of reading from the terminal
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// The arm controller over TCP
    Gpl,
    /// An in-process simulator
    Sim,
}

type Session = Interpreter<Box<dyn MotionBackend>, TomlRecordingRepository>;

/// Console output filtered by `ARMCTL_LOG` (default `warn`), plus a daily log
/// file at `info` when the logs directory is available.
fn init_logging() -> Option<WorkerGuard> {
    let console_filter = EnvFilter::builder()
        .with_env_var(LOG_ENV)
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (file, guard) = match ArmctlPaths::logs_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "armctl.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::INFO);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

fn load_config(cli: &Cli) -> Result<ConfigRoot> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new()?,
    };
    let mut config = service
        .load()
        .with_context(|| format!("failed to load {}", service.path().display()))?;

    if let Some(host) = &cli.host {
        config.controller.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.controller.port = port;
    }
    if cli.no_enable {
        config.controller.enable_on_connect = false;
    }
    if let Some(folder) = &cli.recordings {
        config.recordings.folder = Some(folder.clone());
    }
    Ok(config)
}

fn open_session(cli: &Cli, config: &ConfigRoot) -> Result<Session> {
    let calibration = ServoCalibration::from(&config.gripper);
    let backend: Box<dyn MotionBackend> = match cli.backend {
        BackendKind::Gpl => Box::new(GplBackend::with_servo(
            config.controller.clone(),
            TrackingServo::open(config.gripper.servo_id, calibration),
            calibration,
        )),
        BackendKind::Sim => Box::new(SimulatedBackend::new(calibration)),
    };

    let session = ConnectedSession::open(backend, config.controller.enable_on_connect)
        .with_context(|| {
            format!(
                "failed to open a {:?} session at {}:{}",
                cli.backend, config.controller.host, config.controller.port
            )
        })?;

    let folder = match &config.recordings.folder {
        Some(folder) => folder.clone(),
        None => ArmctlPaths::recordings_dir()?,
    };
    let repository = TomlRecordingRepository::new(folder);

    let interpreter = Interpreter::new(session, repository, config.motion.clone())
        .context("failed to read the initial arm state")?;
    Ok(interpreter)
}

fn print_replies(line: &str, replies: &[Reply]) {
    for reply in replies {
        // Echo what a repeat resolved to.
        if replies.len() > 1 || reply.input != line.trim() {
            println!("{}", format!("> {}", reply.input).green());
        }
        let output = reply.output();
        for text in output.lines() {
            if reply.is_error() {
                println!("{}", text.red());
            } else {
                println!("{}", text.bright_blue());
            }
        }
    }
}

fn run_script(interpreter: &mut Session, path: &Path) -> Result<()> {
    let script = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    info!(script = %path.display(), "running script");

    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        println!("{}", format!("> {}", trimmed).green());
        let replies = interpreter.execute_line(trimmed);
        print_replies(trimmed, &replies);
        if interpreter.is_finished() {
            return Ok(());
        }
    }
    Ok(())
}

fn run_repl(interpreter: &mut Session) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== armctl ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Recordings in {}. Type 'help' for commands, 'exit' to quit.",
            interpreter.repository().folder().display()
        )
        .bright_black()
    );
    println!();

    loop {
        match rl.readline("arm> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if trimmed.eq_ignore_ascii_case("help") {
                    println!("{}", help_text().bright_black());
                    continue;
                }

                let replies = interpreter.execute_line(trimmed);
                print_replies(trimmed, &replies);
                if interpreter.is_finished() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "(use 'exit' or Ctrl-D to quit)".bright_black());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    let config = load_config(&cli)?;
    let mut interpreter = open_session(&cli, &config)?;

    let result = match &cli.script {
        Some(path) => run_script(&mut interpreter, path),
        None => run_repl(&mut interpreter),
    };

    // EOF, end of script or a read error: finish like `exit` so an active
    // recording is saved and the arm is powered down.
    if !interpreter.is_finished() {
        for reply in interpreter.execute_line("exit") {
            if let Err(err) = &reply.outcome {
                warn!("shutdown: {}", err);
            }
        }
    }
    println!("{}", "Goodbye!".bright_green());
    result
}
