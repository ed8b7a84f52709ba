//! `schema` subcommand: print the recognized option set.

use crate::schema::OPTIONS;
use anyhow::Result;
use console::style;

pub fn run() -> Result<()> {
    let name_width = OPTIONS.iter().map(|o| o.name.len()).max().unwrap_or(0);

    for def in OPTIONS {
        let mut constraints = Vec::new();
        if let Some(min) = def.min {
            constraints.push(format!("min {min}"));
        }
        if let Some(max) = def.max {
            constraints.push(format!("max {max}"));
        }
        if let Some(choices) = def.choices {
            constraints.push(format!("one of {}", choices.join("|")));
        }
        let constraints = if constraints.is_empty() {
            String::new()
        } else {
            format!(" [{}]", constraints.join(", "))
        };

        println!(
            "{}  {}{}",
            style(format!("{:<name_width$}", def.name)).bold(),
            def.kind,
            constraints
        );
        println!("{:<name_width$}  {}", "", def.description);
        println!("{:<name_width$}  default: {}", "", (def.default)());
    }
    Ok(())
}
