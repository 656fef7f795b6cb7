//! Save/load a topology through the JSON serializer.

use clap::{Args, Subcommand};
use sonido_config::topology;
use sonido_registry::{NodeRole, Schema, TYPE_LOWPASS, TYPE_SINE2};
use std::path::PathBuf;

#[derive(Args)]
pub struct GraphArgs {
    #[command(subcommand)]
    command: GraphCommand,
}

#[derive(Subcommand)]
enum GraphCommand {
    /// Build the demo graph and save it as topology JSON
    Save {
        /// Destination file
        path: PathBuf,
    },
    /// Load a topology JSON file into a fresh schema and print its shape
    Load {
        /// Source file
        path: PathBuf,
    },
}

fn demo_schema() -> Schema {
    let mut schema = Schema::new(0, 1);
    let sine = schema.new_node(TYPE_SINE2, "Sine", NodeRole::Default);
    let lowpass = schema.new_node(TYPE_LOWPASS, "Lowpass", NodeRole::Default);
    let output = schema.group().output_node_id();
    schema.connect(sine, 0, lowpass, 2);
    schema.connect(lowpass, 0, output, 0);
    schema
}

pub fn run(args: GraphArgs) -> anyhow::Result<()> {
    match args.command {
        GraphCommand::Save { path } => {
            let schema = demo_schema();
            let archive = schema.get_archive_data();
            topology::save_to_path(&archive, &path)?;
            println!("saved {} node(s), {} link(s) to {}", archive.nodes.len(), archive.links.len(), path.display());
        }
        GraphCommand::Load { path } => {
            let archive = topology::load_from_path(&path)?;
            let mut schema = Schema::new(0, 1);
            schema.load_archive_data(&archive);
            let loaded = schema.get_archive_data();
            println!("loaded {} node(s), {} link(s) from {}", loaded.nodes.len(), loaded.links.len(), path.display());
        }
    }
    Ok(())
}
