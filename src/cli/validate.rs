use std::path::PathBuf;

use clap::Parser;
use roadmap::{DanglingReference, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Validate workspace referential integrity")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Validate {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let dangling = workspace.dangling_references();

        match self.output {
            OutputFormat::Json => Self::output_json(&dangling)?,
            OutputFormat::Summary => println!("issues={}", dangling.len()),
            OutputFormat::Table => {
                if !self.quiet {
                    Self::output_table(&workspace, &dangling);
                }
            }
        }

        // Exit with code 2 to flag issues (for CI).
        if !dangling.is_empty() {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_json(dangling: &[DanglingReference]) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "status": if dangling.is_empty() { "healthy" } else { "issues_found" },
            "dangling_references": dangling,
            "summary": {
                "total_issues": dangling.len(),
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(workspace: &Workspace, dangling: &[DanglingReference]) {
        if dangling.is_empty() {
            println!("{}", "✅ No dangling references detected.".success());
            return;
        }

        println!(
            "{}",
            format!("⚠️  {} dangling references found:", dangling.len()).warning()
        );
        println!();
        for (i, reference) in dangling.iter().enumerate() {
            let parent_name = parent_name(workspace, reference).unwrap_or("(unknown)");
            println!(
                "{}. {} '{}' ({}) references missing id {}",
                i + 1,
                reference.boundary,
                parent_name,
                reference.parent,
                reference.missing,
            );
        }
        println!();
        println!("{}", "Run 'rdm sync' to prune them".dim());
    }
}

/// Resolves the display name of the parent on the pruned side of a boundary.
fn parent_name<'a>(workspace: &'a Workspace, reference: &DanglingReference) -> Option<&'a str> {
    use roadmap::Boundary;

    match reference.boundary {
        Boundary::ProductInterface => workspace
            .product(&reference.parent)
            .map(|product| product.name.as_str()),
        Boundary::InterfaceFeature => workspace
            .interface(&reference.parent)
            .map(|interface| interface.name.as_str()),
        Boundary::FeatureRelease => workspace
            .feature(&reference.parent)
            .map(|feature| feature.name.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{OutputFormat, Validate};

    #[test]
    fn validate_run_succeeds_on_healthy_workspace() {
        let tmp = tempdir().unwrap();

        let validate = Validate {
            output: OutputFormat::Table,
            quiet: true,
        };
        validate
            .run(tmp.path().to_path_buf())
            .expect("validate should succeed with no issues");
    }
}
