// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Terminal front-end for a single Tasmota output.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tasmota_panel::{
    DeviceConfig, EventLog, Panel, PanelEvent, PowerAction, Result, Settings, StatusView,
    Translations,
};

/// Watch and switch one output of a Tasmota device.
///
/// Reads `on`, `off`, `toggle` and `quit` from standard input.
#[derive(Parser, Debug)]
#[command(name = "tasmota-panel", version, about)]
struct Cli {
    /// Configuration file; created with defaults if missing
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Language file
    #[arg(long, default_value = "lang.json")]
    lang: PathBuf,

    /// Directory for event log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let (settings, mut config_error) = Settings::load_or_default(&cli.config);

    let config = match DeviceConfig::from_settings(&settings) {
        Ok(config) => config,
        Err(e) => {
            config_error = Some(e);
            DeviceConfig::from_settings(&Settings::default())?
        }
    };

    let log = open_log(&config, &cli.log_dir);
    if let Some(e) = &config_error {
        log.record(format!("Using default config. Error: {e}"));
    }

    let (lang, lang_error) = Translations::load_or_default(&cli.lang, &settings.language);
    if let Some(e) = lang_error {
        log.record(format!("Language file error, using English. Error: {e}"));
    }
    if let Some(e) = &config_error {
        eprintln!("{}: {e}", lang.config_error);
    }

    println!("{}", lang.window_title);
    println!(
        "{} {} | {} {}",
        lang.device,
        config.host(),
        lang.output,
        config.output().value()
    );

    let panel = Panel::start(config, log.clone())?;
    let result = interact(&panel, &lang).await;

    panel.shutdown().await;
    log.close();
    result
}

fn open_log(config: &DeviceConfig, dir: &Path) -> EventLog {
    if !config.logging() {
        return EventLog::disabled();
    }
    match EventLog::create_in(dir) {
        Ok((log, _)) => log,
        Err(e) => {
            eprintln!("Failed to create log file in {}: {e}", dir.display());
            EventLog::disabled()
        }
    }
}

async fn interact(panel: &Panel, lang: &Translations) -> Result<()> {
    let mut snapshots = panel.watch();
    let mut events = panel.subscribe();
    let mut input = spawn_stdin_reader();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{}", StatusView::new(&snapshots.borrow_and_update(), lang));

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", StatusView::new(&snapshots.borrow_and_update(), lang));
            }
            event = events.recv() => match event {
                Ok(PanelEvent::CommandFailed { action, reason }) => {
                    eprintln!("{}: {action} ({reason})", lang.command_failed);
                }
                Ok(PanelEvent::ConnectionChanged { connected }) => {
                    tracing::debug!(connected, "Connection changed");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Display fell behind on panel events");
                }
                Err(RecvError::Closed) => break,
            },
            line = input.recv() => {
                let Some(line) = line else { break };
                if !handle_line(panel, lang, line.trim()) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_line(panel: &Panel, lang: &Translations, line: &str) -> bool {
    match line {
        "" => {}
        "quit" | "q" | "exit" => return false,
        _ => match line.parse::<PowerAction>() {
            Ok(action) if action.is_switching() => {
                if let Err(e) = panel.dispatch(action) {
                    eprintln!("{}: {e}", lang.command_failed);
                }
            }
            _ => eprintln!("Unknown input '{line}'. Use on, off, toggle or quit."),
        },
    }
    true
}

/// Reads stdin on a plain thread so a blocked read never holds up the
/// runtime or shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
