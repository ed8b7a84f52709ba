//! `check` subcommand: lint an override file against the schema.

use crate::loader;
use crate::schema;
use crate::store::Config;
use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Settings file to validate (.json, .toml, .yaml)
    pub file: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let overrides = loader::load_file(&args.file)?;
    let (_, report) = Config::resolve(schema::defaults(), Some(&overrides));

    for issue in &report.issues {
        println!("{} {}", style("error:").red().bold(), issue);
    }
    for key in &report.unknown_keys {
        println!(
            "{} unknown key `{}` will be passed through to the engine",
            style("note:").yellow(),
            key
        );
    }

    if report.is_clean() {
        println!(
            "{} {} ({} keys)",
            style("ok:").green().bold(),
            args.file.display(),
            overrides.len()
        );
        Ok(())
    } else {
        anyhow::bail!(
            "{} invalid value(s) in {}; listed keys fall back to their defaults",
            report.issues.len(),
            args.file.display()
        )
    }
}
