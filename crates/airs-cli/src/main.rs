//! AIRS routing tool.
//!
//! Resolves free-text terms and symbolic intents against the artifact tree
//! and serves the HTTP front-end.
//!
//! ## Commands
//!
//! - `ping`: liveness check echoing the effective workspace root
//! - `catalog`: aggregate and filter the cross-artifact catalog
//! - `lookup`: resolve a free-text term to an intent id
//! - `resolve`: intent/term → flow reference, roles, candidate agents
//! - `serve`: start the HTTP GET front-end
//!
//! Results are pretty-printed JSON on stdout; failures print
//! `{"error": "<kind>: <detail>"}` and exit non-zero with the same
//! classification strings the HTTP surface uses.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;

use airs_core::engine::{Engine, ResolveRequest};
use airs_core::{init_tracing, CatalogQuery};

#[derive(Parser)]
#[command(name = "airs")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AIRS routing tool: catalog, lookup, resolve, serve", long_about = None)]
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
    /// Liveness check echoing the effective workspace root
    Ping,

    /// Aggregate and filter the cross-artifact catalog
    Catalog {
        /// Keep only items of this facet (term|flow|doc|agent|capability)
        #[arg(long)]
        facet: Option<String>,

        /// Case-insensitive literal filter over the catalog fields
        #[arg(long)]
        grep: Option<String>,

        /// With `--facet agent`: restrict to this client's bindings
        #[arg(long)]
        client: Option<String>,
    },

    /// Resolve a free-text term to an intent id
    Lookup {
        /// Term, alias, or tag to look up
        #[arg(long)]
        term: String,
    },

    /// Resolve an intent (or term) to a flow, roles, and candidate agents
    Resolve {
        /// Symbolic intent id; takes precedence over --term
        #[arg(long)]
        intent: Option<String>,

        /// Free-text term, resolved to an intent first
        #[arg(long)]
        term: Option<String>,

        /// Client to bind candidate agents for
        #[arg(long)]
        client: Option<String>,
    },

    /// Start the HTTP GET front-end
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8087)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Same JSON error contract as the HTTP surface.
            println!("{}", serde_json::json!({ "error": err.to_string() }));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let engine = Engine::new(&cli.root);

    match cli.command {
        Commands::Ping => print_json(&engine.ping()),
        Commands::Catalog {
            facet,
            grep,
            client,
        } => print_json(&engine.catalog(&CatalogQuery {
            facet,
            grep,
            client,
        })),
        Commands::Lookup { term } => print_json(&engine.lookup(&term)),
        Commands::Resolve {
            intent,
            term,
            client,
        } => print_json(&engine.resolve(&ResolveRequest {
            intent,
            term,
            client,
        })?),
        Commands::Serve { port } => {
            airs_server::serve(cli.root, port).await?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
