//! # Rich-Text Host
//!
//! Main entry point for the headless rich-text editor.

use clap::Parser;
use richtextd::{HostRuntime, HostRuntimeConfig};
use std::fs;
use std::path::PathBuf;
use std::process;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "richtextd", version, about = "Rich-text editor with markdown-like shortcuts")]
struct Args {
    /// Input script to run
    #[arg(long, short = 's')]
    script: Option<PathBuf>,

    /// Store file (defaults to the `storage.path` setting)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Settings overrides file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plain text output, no ANSI escapes
    #[arg(long)]
    plain: bool,

    /// Save after the script finishes
    #[arg(long)]
    save_on_exit: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let script = match &args.script {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                eprintln!("Failed to read script file {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => None,
    };

    let config = HostRuntimeConfig {
        script,
        store_path: args.store,
        config_path: args.config,
        plain: args.plain,
        save_on_exit: args.save_on_exit,
    };

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    match runtime.run() {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            process::exit(1);
        }
    }
}
