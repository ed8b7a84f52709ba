//! `show` subcommand: print the resolved configuration.

use crate::loader;
use crate::schema;
use crate::store::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ShowArgs {
    /// User-level override file
    #[arg(long)]
    pub user: Option<PathBuf>,

    /// Workspace-level override file (wins over --user)
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Directory to search for an override file when neither --user nor
    /// --workspace is given
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Print the typed engine view instead of the raw document
    #[arg(long)]
    pub engine_view: bool,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let mut layers = Vec::new();
    if let Some(path) = &args.user {
        layers.push(loader::load_file(path)?);
    }
    if let Some(path) = &args.workspace {
        layers.push(loader::load_file(path)?);
    }
    if layers.is_empty() {
        let discovered = loader::load_overrides(&args.dir, None)?;
        if !discovered.is_empty() {
            layers.push(discovered);
        }
    }

    let layer_refs: Vec<&_> = layers.iter().collect();
    let (config, _) = Config::resolve_layers(schema::defaults(), &layer_refs);

    let output = if args.engine_view {
        serde_json::to_string_pretty(&config.settings())?
    } else {
        serde_json::to_string_pretty(config.document())?
    };
    println!("{output}");
    Ok(())
}
