//! AIRS workflow tool.
//!
//! The flow-centric companion to `airs`: lists the workflow manifest,
//! routes request attributes through the strategy list, and loads workflow
//! exports by reference. Shares the routing engine with `airs`: the two
//! tools are different surfaces over the same resolution logic.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::RegexBuilder;
use serde::Serialize;
use tracing::Level;

use airs_core::engine::Engine;
use airs_core::{init_tracing, RouteQuery};

#[derive(Parser)]
#[command(name = "airsflow")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AIRS workflow tool: manifest catalog, routing, flow loading", long_about = None)]
struct Cli {
    /// Workspace root containing the artifact tree
    #[arg(long, global = true, default_value = ".", env = "AIRS_ROOT")]
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the workflow manifest
    Catalog {
        /// Keep only workflows of this family
        #[arg(long)]
        family: Option<String>,

        /// Case-insensitive regular expression over intent, title, description
        #[arg(long)]
        grep: Option<String>,
    },

    /// Route intent/tags/subject/action-key to a flow reference
    Resolve {
        #[arg(long)]
        intent: Option<String>,

        /// Thread tags; a strategy matches on any intersection
        #[arg(long, num_args = 0..)]
        tags: Vec<String>,

        /// Subject line matched against strategy patterns
        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        action_key: Option<String>,
    },

    /// Load a workflow export by `brick:export` reference
    Load {
        #[arg(long)]
        flow: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{}", serde_json::json!({ "error": err.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let engine = Engine::new(&cli.root);

    match cli.command {
        Commands::Catalog { family, grep } => {
            let pattern = grep
                .map(|g| RegexBuilder::new(&g).case_insensitive(true).build())
                .transpose()
                .context("invalid --grep pattern")?;
            let entries = engine.workflow_catalog(family.as_deref(), pattern.as_ref())?;
            print_json(&entries)
        }
        Commands::Resolve {
            intent,
            tags,
            subject,
            action_key,
        } => {
            let outcome = engine.route(&RouteQuery {
                intent,
                tags,
                subject,
                action_key,
            })?;
            if outcome.flow_ref.is_none() {
                // Unresolved routing is a diagnostic for this tool, with the
                // same classification string consumers branch on.
                anyhow::bail!(
                    "no_route_matched: no strategy or manifest entry matched the given intent/tags/subject/action-key"
                );
            }
            print_json(&outcome)
        }
        Commands::Load { flow } => {
            let loaded = engine.load_flow(&flow)?;
            print_json(&serde_json::json!({
                "flow": loaded.id,
                "export": loaded.export,
                "file": loaded.file,
                "steps": loaded.steps,
            }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
