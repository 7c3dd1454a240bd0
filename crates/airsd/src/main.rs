//! AIRS resolution daemon.
//!
//! Long-running variant of `airs serve`: binds the HTTP GET front-end over
//! one workspace root until ctrl-c. The root is fixed at startup; restart
//! the daemon to point it at a different tree.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use airs_core::init_tracing;

#[derive(Parser)]
#[command(name = "airsd")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AIRS HTTP resolution daemon", long_about = None)]
struct Args {
    /// Workspace root containing the artifact tree
    #[arg(long, default_value = ".", env = "AIRS_ROOT")]
    root: PathBuf,

    /// Port to listen on
    #[arg(long, default_value_t = 8087)]
    port: u16,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(args.json, level);

    tracing::info!(root = %args.root.display(), port = args.port, "airsd starting");
    airs_server::serve(args.root, args.port).await?;
    Ok(())
}
