//! Sonido CLI - Command-line interface for the sonido node graph.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sonido")]
#[command(author, version, about = "Sonido node-graph DSP CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a small demo graph and run it for N audio blocks
    Demo(commands::demo::DemoArgs),

    /// Save/load a topology through the JSON serializer
    Graph(commands::graph::GraphArgs),

    /// List and manage audio devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    tracing::debug!(command = ?std::mem::discriminant(&cli.command), "dispatching command");

    match cli.command {
        Commands::Demo(args) => commands::demo::run(args),
        Commands::Graph(args) => commands::graph::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
