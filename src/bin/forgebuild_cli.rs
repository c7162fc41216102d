//! ForgeBuild CLI - plan inspection for the step executor
//!
//! Commands: plan
//! Outputs JSON to stdout, logs to stderr
//! Returns 1 on read/parse failure, 2 on validation failure

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use forgebuild_core::{load_build_from_file, EnvVar, EnvVars, LoadConfig, ENGINE_VERSION};

#[derive(Parser)]
#[command(name = "forgebuild-cli")]
#[command(about = "ForgeBuild CLI - Build Manifest Loader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a build file and print the resulting plan
    Plan {
        /// Path to the build file
        #[arg(short, long, default_value = "build.yml")]
        file: PathBuf,

        /// Drop cleanup blocks (no squash, no privileged mode)
        #[arg(long)]
        no_squash: bool,

        /// KEY=VALUE used for _env(KEY) instead of the process environment
        #[arg(short, long = "env")]
        env: Vec<EnvVar>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { file, no_squash, env } => {
            let config = LoadConfig::new(file)
                .with_no_squash(no_squash)
                .with_env_vars(env.into_iter().collect::<EnvVars>());

            let manifest = match load_build_from_file(&config) {
                Ok(m) => m,
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    return if e.is_validation() {
                        ExitCode::from(2)
                    } else {
                        ExitCode::FAILURE
                    };
                }
            };

            let output = serde_json::json!({
                "success": true,
                "engine_version": ENGINE_VERSION,
                "loaded_at": Utc::now(),
                "fingerprint": manifest.fingerprint(),
                "manifest": manifest,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to render plan: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
