use std::path::{Path, PathBuf};

mod list;
mod show;
mod status;
mod sync;
mod terminal;
mod validate;

use clap::ArgAction;
use list::List;
use roadmap::{storage::EntityKind, EntityId, Priority, Workspace};
use show::Show;
use status::Status;
use sync::Sync;
use tracing::instrument;
use validate::Validate;

/// Parse an entity id from a string.
///
/// Ids are opaque, so this cannot fail; the function exists to give clap a
/// uniform value-parser boundary.
fn parse_id(s: &str) -> Result<EntityId, std::convert::Infallible> {
    Ok(EntityId::from(s))
}

/// Parse a priority from a string, normalizing to lowercase.
fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse an ISO 8601 date (YYYY-MM-DD).
fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    s.parse()
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// The entity kind addressed by a command.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    /// A product.
    Product,
    /// An interface.
    Interface,
    /// A feature.
    Feature,
    /// A release.
    Release,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Product => Self::Product,
            KindArg::Interface => Self::Interface,
            KindArg::Feature => Self::Feature,
            KindArg::Release => Self::Release,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the roadmap workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show workspace status (default)
    Status(Status),

    /// Initialize a new roadmap workspace
    Init,

    /// Create a new entity
    Add(Add),

    /// Delete an entity
    ///
    /// Deleting removes only the entity itself. References held by parent
    /// entities are pruned by the reconciliation pass that follows (or by a
    /// later 'sync' when auto_reconcile is off).
    Delete(Delete),

    /// Prune dangling references across all collections
    Sync(Sync),

    /// Validate workspace referential integrity
    Validate(Validate),

    /// List entities of one kind with optional filters
    List(List),

    /// Show detailed information about an entity
    Show(Show),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Add(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Sync(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Config(command) => command.run(&root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        // Create .roadmap directory
        let meta_dir = root.join(".roadmap");
        if meta_dir.exists() {
            anyhow::bail!("Workspace already initialized (found existing .roadmap directory)");
        }

        fs::create_dir_all(&meta_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create .roadmap directory: {e}"))?;

        // Create config.toml with defaults
        let config_path = meta_dir.join("config.toml");
        let config = roadmap::Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        // Create empty collection files
        for file in [
            "products.json",
            "interfaces.json",
            "features.json",
            "releases.json",
        ] {
            fs::write(root.join(file), "[]\n")
                .map_err(|e| anyhow::anyhow!("Failed to create {file}: {e}"))?;
        }

        println!("Initialized roadmap workspace in {}", root.display());
        println!("  Created: .roadmap/config.toml");
        println!("  Created: products.json, interfaces.json, features.json, releases.json");
        println!();
        println!("Next steps:");
        println!("  rdm add product \"Your First Product\"");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    #[command(subcommand)]
    command: AddCommand,
}

#[derive(Debug, clap::Parser)]
enum AddCommand {
    /// Create a new product
    Product {
        /// Display name of the product
        name: String,

        /// Free-form description
        #[clap(long, short, default_value = "")]
        description: String,
    },

    /// Create a new interface under a product
    Interface {
        /// Id of the owning product
        #[clap(value_parser = parse_id)]
        product: EntityId,

        /// Display name of the interface
        name: String,

        /// Free-form description
        #[clap(long, short, default_value = "")]
        description: String,
    },

    /// Create a new feature under an interface
    Feature {
        /// Id of the owning interface
        #[clap(value_parser = parse_id)]
        interface: EntityId,

        /// Display name of the feature
        name: String,

        /// Free-form description
        #[clap(long, short, default_value = "")]
        description: String,

        /// Priority (high, medium, low); defaults to the configured value
        #[clap(long, short, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Create a new release under a feature
    Release {
        /// Id of the owning feature
        #[clap(value_parser = parse_id)]
        feature: EntityId,

        /// Display name of the release
        name: String,

        /// Planned release date (YYYY-MM-DD)
        #[clap(long, value_parser = parse_date)]
        date: chrono::NaiveDate,

        /// Free-form description
        #[clap(long, short, default_value = "")]
        description: String,

        /// Priority (high, medium, low); defaults to the configured value
        #[clap(long, short, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
}

impl Add {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;

        let (kind, id) = match self.command {
            AddCommand::Product { name, description } => {
                let id = workspace.add_product(name, description).id.clone();
                (EntityKind::Product, id)
            }
            AddCommand::Interface {
                product,
                name,
                description,
            } => {
                let id = workspace
                    .add_interface(&product, name, description)?
                    .id
                    .clone();
                (EntityKind::Interface, id)
            }
            AddCommand::Feature {
                interface,
                name,
                description,
                priority,
            } => {
                let id = workspace
                    .add_feature(&interface, name, description, priority)?
                    .id
                    .clone();
                (EntityKind::Feature, id)
            }
            AddCommand::Release {
                feature,
                name,
                date,
                description,
                priority,
            } => {
                let id = workspace
                    .add_release(&feature, name, description, date, priority)?
                    .id
                    .clone();
                (EntityKind::Release, id)
            }
        };

        workspace.flush()?;

        println!("Added {kind} {id}");
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The kind of entity to delete
    kind: KindArg,

    /// The id of the entity to delete
    #[clap(value_parser = parse_id)]
    id: EntityId,

    /// Show what would be deleted without deleting
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut workspace = Workspace::open(root)?;
        let kind = EntityKind::from(self.kind);

        let name = entity_name(&workspace, kind, &self.id)
            .ok_or_else(|| anyhow::anyhow!("{kind} {} not found", self.id))?
            .to_string();

        if self.dry_run {
            println!("{}", format!("Would delete {kind} {} ({name})", self.id).dim());
            return Ok(());
        }

        if !self.yes {
            println!("Will delete {kind} {} ({name})", self.id);
            eprint!("\nProceed? (y/N) ");
            use std::io::{self, BufRead};
            let stdin = io::stdin();
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            if !line.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        let report = workspace.delete(kind, &self.id)?;
        workspace.flush()?;

        println!("{}", format!("✅ Deleted {kind} {}", self.id).success());

        match report {
            Some(report) if report.any_changed => {
                println!("{}", "Pruned dangling references left by the deletion".dim());
            }
            Some(_) => {}
            None => println!(
                "{}",
                "auto_reconcile is off; run 'rdm sync' to prune dangling references".dim()
            ),
        }

        Ok(())
    }
}

/// Looks up the display name of an entity of the given kind.
fn entity_name<'a>(workspace: &'a Workspace, kind: EntityKind, id: &EntityId) -> Option<&'a str> {
    match kind {
        EntityKind::Product => workspace.product(id).map(|p| p.name.as_str()),
        EntityKind::Interface => workspace.interface(id).map(|i| i.name.as_str()),
        EntityKind::Feature => workspace.feature(id).map(|f| f.name.as_str()),
        EntityKind::Release => workspace.release(id).map(|r| r.name.as_str()),
    }
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_dir = root.join(".roadmap");
        let config_path = config_dir.join("config.toml");

        match self.command {
            ConfigCommand::Show => {
                let config = if config_path.exists() {
                    roadmap::Config::load(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                } else {
                    roadmap::Config::default()
                };

                println!("Configuration:");
                println!("  auto_reconcile: {}", config.auto_reconcile);
                println!("  pretty_json: {}", config.pretty_json);
                println!("  default_priority: {}", config.default_priority);
            }
            ConfigCommand::Set { key, value } => {
                let mut config = if config_path.exists() {
                    roadmap::Config::load(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                } else {
                    roadmap::Config::default()
                };

                match key.as_str() {
                    "auto_reconcile" => {
                        config.auto_reconcile = value
                            .parse::<bool>()
                            .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
                    }
                    "pretty_json" => {
                        config.pretty_json = value
                            .parse::<bool>()
                            .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
                    }
                    "default_priority" => {
                        config.default_priority =
                            value.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
                    }
                    _ => {
                        return Err(anyhow::anyhow!(
                            "Unknown configuration key: '{key}'\nSupported keys: auto_reconcile, \
                             pretty_json, default_priority",
                        ));
                    }
                }

                std::fs::create_dir_all(&config_dir)?;
                config
                    .save(&config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;

                println!("Set {key} = {value}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roadmap::Workspace;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn init_run_creates_config_and_collections() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Init::run(&root).expect("init should succeed");

        assert!(root.join(".roadmap/config.toml").exists());
        for file in [
            "products.json",
            "interfaces.json",
            "features.json",
            "releases.json",
        ] {
            assert!(root.join(file).exists(), "missing {file}");
        }
    }

    #[test]
    fn init_run_refuses_existing_workspace() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Init::run(&root).unwrap();
        assert!(Init::run(&root).is_err());
    }

    #[test]
    fn add_run_creates_linked_hierarchy() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let add = Add {
            command: AddCommand::Product {
                name: "Billing".to_string(),
                description: "Invoicing".to_string(),
            },
        };
        add.run(root.clone()).expect("add product should succeed");

        let workspace = Workspace::open(root.clone()).unwrap();
        let product_id = workspace.products()[0].id.clone();

        let add = Add {
            command: AddCommand::Interface {
                product: product_id.clone(),
                name: "Mobile app".to_string(),
                description: String::new(),
            },
        };
        add.run(root.clone()).expect("add interface should succeed");

        let workspace = Workspace::open(root).unwrap();
        let interface = &workspace.interfaces()[0];
        assert_eq!(
            workspace.product(&product_id).unwrap().interfaces,
            [interface.id.clone()]
        );
    }

    #[test]
    fn add_interface_to_unknown_product_fails() {
        let tmp = tempdir().unwrap();

        let add = Add {
            command: AddCommand::Interface {
                product: EntityId::from("missing"),
                name: "API".to_string(),
                description: String::new(),
            },
        };

        assert!(add.run(tmp.path().to_path_buf()).is_err());
    }

    #[test]
    fn delete_run_prunes_references_by_default() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let mut workspace = Workspace::open(root.clone()).unwrap();
        let product_id = workspace.add_product("Billing", "").id.clone();
        let interface_id = workspace
            .add_interface(&product_id, "API", "")
            .unwrap()
            .id
            .clone();
        workspace.flush().unwrap();

        let delete = Delete {
            kind: KindArg::Interface,
            id: interface_id,
            dry_run: false,
            yes: true,
        };
        delete.run(root.clone()).expect("delete should succeed");

        let workspace = Workspace::open(root).unwrap();
        assert!(workspace.interfaces().is_empty());
        assert!(workspace.product(&product_id).unwrap().interfaces.is_empty());
    }

    #[test]
    fn delete_dry_run_leaves_workspace_untouched() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let mut workspace = Workspace::open(root.clone()).unwrap();
        let product_id = workspace.add_product("Billing", "").id.clone();
        workspace.flush().unwrap();

        let delete = Delete {
            kind: KindArg::Product,
            id: product_id.clone(),
            dry_run: true,
            yes: true,
        };
        delete.run(root.clone()).expect("dry run should succeed");

        let workspace = Workspace::open(root).unwrap();
        assert!(workspace.product(&product_id).is_some());
    }

    #[test]
    fn delete_unknown_entity_fails() {
        let tmp = tempdir().unwrap();

        let delete = Delete {
            kind: KindArg::Feature,
            id: EntityId::from("missing"),
            dry_run: false,
            yes: true,
        };

        assert!(delete.run(tmp.path().to_path_buf()).is_err());
    }
}
