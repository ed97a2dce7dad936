//! CLI entry point for kataribe
//!
//! Plays episodes in the terminal, lints them, and lists episode directories.

use anyhow::{Context, bail};
use kataribe::cli::{check, play};
use kataribe::config::PlaybackConfig;
use kataribe::infrastructure::{EpisodeRepository, FileSystemEpisodeRepository};
use kataribe::logging::{LogConfig, StderrLogger};
use kataribe::stage::AssetManifest;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut log_config = LogConfig::default();
    if args.iter().any(|arg| arg == "--debug") {
        log_config.enabled = true;
    }
    if let Err(err) = StderrLogger::install(&log_config) {
        eprintln!("Warning: logger unavailable: {err}");
    }

    match run(&args).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

async fn run(args: &[String]) -> anyhow::Result<i32> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(1);
    };

    match command.as_str() {
        "play" => {
            let path = positional(args, "episode file")?;
            let source = read_source(&path).await?;
            let options = play::PlayOptions {
                debug: args.iter().any(|arg| arg == "--debug"),
                start: flag_value(args, "--start"),
                manifest: load_manifest(args).await?,
                config: load_config(args).await?,
            };
            let summary = play::run_play(&source, options)?;
            log::info!(
                "[Player] {} lines presented, finished={}",
                summary.lines_presented,
                summary.finished
            );
            Ok(0)
        }
        "check" => {
            let path = positional(args, "episode file")?;
            let source = read_source(&path).await?;
            let result = check::run_check(&source, load_manifest(args).await?)?;
            check::print_report(&result, &mut std::io::stdout().lock())?;
            Ok(if result.has_errors() { 1 } else { 0 })
        }
        "list" => {
            let path = positional(args, "episode directory")?;
            let repository = FileSystemEpisodeRepository::new(path);
            for episode_id in repository.list_episodes().await? {
                println!("{episode_id}");
            }
            Ok(0)
        }
        "--help" | "-h" => {
            print_usage();
            Ok(0)
        }
        other => {
            eprintln!("Error: Unknown command '{other}'");
            eprintln!();
            print_usage();
            Ok(1)
        }
    }
}

fn print_usage() {
    println!("kataribe - Visual Novel Dialogue Player");
    println!();
    println!("USAGE:");
    println!("    kataribe play <episode.json> [--debug] [--start <node>] [--manifest <file>] [--config <file>]");
    println!("    kataribe check <episode.json> [--manifest <file>]");
    println!("    kataribe list <directory>");
    println!();
    println!("COMMANDS:");
    println!("    play     Play an episode in the terminal (Enter: next, q: quit)");
    println!("    check    Lint an episode; exits non-zero on errors");
    println!("    list     List episode ids stored in a directory");
    println!("    --help, -h  Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --debug           Show debug information and enable logging");
    println!("    --start <node>    Begin at a node instead of the first line");
    println!("    --manifest <file> Asset manifest (JSON) to use instead of generated assets");
    println!("    --config <file>   Playback configuration (JSON)");
    println!();
    println!("ENVIRONMENT:");
    println!("    KATARIBE_DEBUG    Enable logging; may name a level such as 'trace'");
}

/// First argument after the command that is neither a flag nor a flag value
fn positional(args: &[String], what: &str) -> anyhow::Result<PathBuf> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--debug" => {}
            "--start" | "--manifest" | "--config" => {
                rest.next();
            }
            _ => return Ok(PathBuf::from(arg)),
        }
    }
    bail!("Missing {what}")
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .cloned()
}

async fn read_source(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file '{}'", path.display()))
}

async fn load_manifest(args: &[String]) -> anyhow::Result<Option<AssetManifest>> {
    let Some(path) = flag_value(args, "--manifest") else {
        return Ok(None);
    };
    let source = read_source(Path::new(&path)).await?;
    let manifest = AssetManifest::from_json(&source)
        .with_context(|| format!("Invalid asset manifest '{path}'"))?;
    Ok(Some(manifest))
}

async fn load_config(args: &[String]) -> anyhow::Result<PlaybackConfig> {
    let Some(path) = flag_value(args, "--config") else {
        return Ok(PlaybackConfig::default());
    };
    let source = read_source(Path::new(&path)).await?;
    PlaybackConfig::from_json(&source).with_context(|| format!("Invalid configuration '{path}'"))
}
