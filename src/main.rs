//! abbr-settings: inspect and lint settings for the markup abbreviation expander

use anyhow::Result;

fn main() -> Result<()> {
    abbr_settings::cli::run()
}
