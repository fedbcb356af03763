use std::path::PathBuf;

use clap::Parser;
use roadmap::{storage::EntityKind, EntityId, Workspace};
use tracing::instrument;

use super::{parse_id, terminal::Colorize, KindArg};

/// Command arguments for `rdm show`.
#[derive(Debug, Parser)]
#[command(about = "Show detailed information about an entity")]
pub struct Show {
    /// The kind of entity to show
    kind: KindArg,

    /// The id of the entity to show
    #[clap(value_parser = parse_id)]
    id: EntityId,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Show {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let kind = EntityKind::from(self.kind);

        match self.output {
            OutputFormat::Json => Self::output_json(&workspace, kind, &self.id),
            OutputFormat::Table => Self::output_table(&workspace, kind, &self.id),
        }
    }

    fn output_json(workspace: &Workspace, kind: EntityKind, id: &EntityId) -> anyhow::Result<()> {
        let value = match kind {
            EntityKind::Product => workspace.product(id).map(serde_json::to_value),
            EntityKind::Interface => workspace.interface(id).map(serde_json::to_value),
            EntityKind::Feature => workspace.feature(id).map(serde_json::to_value),
            EntityKind::Release => workspace.release(id).map(serde_json::to_value),
        }
        .ok_or_else(|| anyhow::anyhow!("{kind} {id} not found"))??;

        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }

    fn output_table(workspace: &Workspace, kind: EntityKind, id: &EntityId) -> anyhow::Result<()> {
        match kind {
            EntityKind::Product => {
                let product = workspace
                    .product(id)
                    .ok_or_else(|| anyhow::anyhow!("product {id} not found"))?;

                print_header("Product", &product.name, id, &product.description);
                if product.saved {
                    let stamp = product
                        .saved_at
                        .map_or_else(String::new, |at| format!(" at {at}"));
                    println!("Saved:       yes{stamp}");
                } else {
                    println!("Saved:       no");
                }
                print_children(
                    "Interfaces",
                    &product.interfaces,
                    |child| workspace.interface(child).map(|i| i.name.as_str()),
                );
            }
            EntityKind::Interface => {
                let interface = workspace
                    .interface(id)
                    .ok_or_else(|| anyhow::anyhow!("interface {id} not found"))?;

                print_header("Interface", &interface.name, id, &interface.description);
                print_children("Features", &interface.features, |child| {
                    workspace.feature(child).map(|f| f.name.as_str())
                });
            }
            EntityKind::Feature => {
                let feature = workspace
                    .feature(id)
                    .ok_or_else(|| anyhow::anyhow!("feature {id} not found"))?;

                print_header("Feature", &feature.name, id, &feature.description);
                println!("Priority:    {}", feature.priority);
                println!(
                    "Interface:   {} ({})",
                    feature.interface_id,
                    workspace
                        .interface(&feature.interface_id)
                        .map_or("missing", |i| i.name.as_str())
                );
                if !feature.requirements.is_empty() {
                    println!("Requirements:");
                    for requirement in &feature.requirements {
                        println!("  • {requirement}");
                    }
                }
                print_children("Releases", &feature.releases, |child| {
                    workspace.release(child).map(|r| r.name.as_str())
                });
            }
            EntityKind::Release => {
                let release = workspace
                    .release(id)
                    .ok_or_else(|| anyhow::anyhow!("release {id} not found"))?;

                print_header("Release", &release.name, id, &release.description);
                println!("Date:        {}", release.release_date);
                println!("Priority:    {}", release.priority);
                println!(
                    "Feature:     {} ({})",
                    release.feature_id,
                    workspace
                        .feature(&release.feature_id)
                        .map_or("missing", |f| f.name.as_str())
                );
            }
        }

        Ok(())
    }
}

fn print_header(kind: &str, name: &str, id: &EntityId, description: &str) {
    println!("{kind}: {name}");
    println!("{}", format!("Id:          {id}").dim());
    if !description.is_empty() {
        println!("Description: {description}");
    }
}

/// Prints a child reference list, resolving names and flagging missing ids.
fn print_children<'a>(
    label: &str,
    children: &[EntityId],
    resolve: impl Fn(&EntityId) -> Option<&'a str>,
) {
    if children.is_empty() {
        println!("{label}:   (none)");
        return;
    }

    println!("{label}:");
    for child in children {
        match resolve(child) {
            Some(name) => println!("  • {name} ({child})"),
            None => println!("  • {}", format!("{child} (missing)").warning()),
        }
    }
}
