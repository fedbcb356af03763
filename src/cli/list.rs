use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use regex::RegexBuilder;
use roadmap::Workspace;
use tracing::instrument;

use super::{terminal, KindArg};

/// Command arguments for `rdm list`.
#[derive(Debug, Parser)]
#[command(about = "List entities of one kind with optional filters")]
pub struct List {
    /// The kind of entity to list
    kind: KindArg,

    /// Only show entities whose name matches this regex (case-insensitive)
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Output format (default: table)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One table row: id, name, then kind-specific columns.
struct Row {
    id: String,
    name: String,
    extra: Vec<String>,
}

impl List {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;

        let matcher = self
            .filter
            .as_deref()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("invalid filter regex '{pattern}'"))
            })
            .transpose()?;

        let matches = |name: &str| matcher.as_ref().is_none_or(|regex| regex.is_match(name));

        let (headers, rows, json) = match self.kind {
            KindArg::Product => {
                let entities: Vec<_> = workspace
                    .products()
                    .iter()
                    .filter(|product| matches(&product.name))
                    .collect();
                let rows: Vec<Row> = entities
                    .iter()
                    .map(|product| Row {
                        id: product.id.to_string(),
                        name: product.name.clone(),
                        extra: vec![
                            product.interfaces.len().to_string(),
                            if product.saved { "yes" } else { "no" }.to_string(),
                        ],
                    })
                    .collect();
                (
                    vec!["ID", "NAME", "INTERFACES", "SAVED"],
                    rows,
                    serde_json::to_value(&entities)?,
                )
            }
            KindArg::Interface => {
                let entities: Vec<_> = workspace
                    .interfaces()
                    .iter()
                    .filter(|interface| matches(&interface.name))
                    .collect();
                let rows: Vec<Row> = entities
                    .iter()
                    .map(|interface| Row {
                        id: interface.id.to_string(),
                        name: interface.name.clone(),
                        extra: vec![interface.features.len().to_string()],
                    })
                    .collect();
                (
                    vec!["ID", "NAME", "FEATURES"],
                    rows,
                    serde_json::to_value(&entities)?,
                )
            }
            KindArg::Feature => {
                let entities: Vec<_> = workspace
                    .features()
                    .iter()
                    .filter(|feature| matches(&feature.name))
                    .collect();
                let rows: Vec<Row> = entities
                    .iter()
                    .map(|feature| Row {
                        id: feature.id.to_string(),
                        name: feature.name.clone(),
                        extra: vec![
                            feature.priority.to_string(),
                            feature.releases.len().to_string(),
                        ],
                    })
                    .collect();
                (
                    vec!["ID", "NAME", "PRIORITY", "RELEASES"],
                    rows,
                    serde_json::to_value(&entities)?,
                )
            }
            KindArg::Release => {
                let entities: Vec<_> = workspace
                    .releases()
                    .iter()
                    .filter(|release| matches(&release.name))
                    .collect();
                let rows: Vec<Row> = entities
                    .iter()
                    .map(|release| Row {
                        id: release.id.to_string(),
                        name: release.name.clone(),
                        extra: vec![
                            release.release_date.to_string(),
                            release.priority.to_string(),
                        ],
                    })
                    .collect();
                (
                    vec!["ID", "NAME", "DATE", "PRIORITY"],
                    rows,
                    serde_json::to_value(&entities)?,
                )
            }
        };

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json)?),
            OutputFormat::Table => self.output_table(&headers, &rows),
        }

        Ok(())
    }

    fn output_table(&self, headers: &[&str], rows: &[Row]) {
        use super::terminal::Colorize;

        if rows.is_empty() {
            if !self.quiet {
                println!("No matches.");
            }
            return;
        }

        // Clamp the name column so wide names don't wrap on narrow terminals.
        let name_width = terminal::terminal_width()
            .map_or(40, |width| usize::from(width).saturating_sub(60).clamp(20, 60));

        if !self.quiet {
            let mut header = format!("{:<38} {:<name_width$}", headers[0], headers[1]);
            for column in &headers[2..] {
                header.push_str(&format!(" {column:<10}"));
            }
            println!("{header}");
            println!("{}", "─".repeat(header.chars().count()).dim());
        }

        for row in rows {
            let name = truncate(&row.name, name_width);
            let mut line = format!("{:<38} {name:<name_width$}", row.id);
            for column in &row.extra {
                line.push_str(&format!(" {column:<10}"));
            }
            println!("{line}");
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
