use std::path::PathBuf;

use clap::Parser;
use roadmap::Workspace;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Prune dangling references across all collections")]
pub struct Sync {
    /// Check for dangling references without making changes (exits with code
    /// 2 if any are found)
    #[arg(long)]
    check: bool,

    /// Show what would be pruned without making changes
    #[arg(long)]
    dry_run: bool,

    /// Suppress output
    #[arg(long, short)]
    quiet: bool,
}

impl Sync {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;
        let dangling = workspace.dangling_references();

        if self.check {
            if dangling.is_empty() {
                if !self.quiet {
                    println!("{}", "✅ No dangling references detected.".success());
                }
                return Ok(());
            }

            if !self.quiet {
                println!(
                    "{}",
                    format!("⚠️  {} dangling references", dangling.len()).warning()
                );
                for reference in &dangling {
                    println!(
                        "  • {} holds {} ({})",
                        reference.parent, reference.missing, reference.boundary
                    );
                }
            }
            std::process::exit(2);
        }

        if dangling.is_empty() {
            if !self.quiet {
                println!("{}", "✅ All references are valid.".success());
            }
            return Ok(());
        }

        if self.dry_run {
            if !self.quiet {
                println!("Would prune {} references:", dangling.len());
                for reference in &dangling {
                    println!(
                        "  • {} holds {} ({})",
                        reference.parent, reference.missing, reference.boundary
                    );
                }
            }
            return Ok(());
        }

        let report = workspace.reconcile();
        workspace.flush()?;

        if !self.quiet {
            println!(
                "{}",
                format!("✅ Pruned {} dangling references", dangling.len()).success()
            );
            let mut collections = Vec::new();
            if report.products_changed {
                collections.push("products");
            }
            if report.interfaces_changed {
                collections.push("interfaces");
            }
            if report.features_changed {
                collections.push("features");
            }
            println!("{}", format!("Updated: {}", collections.join(", ")).dim());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roadmap::{storage::EntityKind, Config, Workspace};
    use tempfile::tempdir;

    use super::Sync;

    fn disable_auto_reconcile(root: &std::path::Path) {
        let config_dir = root.join(".roadmap");
        std::fs::create_dir_all(&config_dir).unwrap();
        let config = Config {
            auto_reconcile: false,
            ..Config::default()
        };
        config.save(&config_dir.join("config.toml")).unwrap();
    }

    #[test]
    fn sync_run_succeeds_when_nothing_to_prune() {
        let tmp = tempdir().unwrap();

        let sync = Sync {
            check: false,
            dry_run: false,
            quiet: true,
        };
        sync.run(tmp.path().to_path_buf())
            .expect("sync should succeed on an empty workspace");
    }

    #[test]
    fn sync_run_prunes_dangling_references() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        disable_auto_reconcile(&root);

        let mut workspace = Workspace::open(root.clone()).unwrap();
        let product_id = workspace.add_product("Billing", "").id.clone();
        let interface_id = workspace
            .add_interface(&product_id, "API", "")
            .unwrap()
            .id
            .clone();
        workspace
            .delete(EntityKind::Interface, &interface_id)
            .unwrap();
        workspace.flush().unwrap();

        let sync = Sync {
            check: false,
            dry_run: false,
            quiet: true,
        };
        sync.run(root.clone()).expect("sync should succeed");

        let workspace = Workspace::open(root).unwrap();
        assert!(workspace.product(&product_id).unwrap().interfaces.is_empty());
        assert!(workspace.dangling_references().is_empty());
    }

    #[test]
    fn sync_dry_run_leaves_references_in_place() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        disable_auto_reconcile(&root);

        let mut workspace = Workspace::open(root.clone()).unwrap();
        let product_id = workspace.add_product("Billing", "").id.clone();
        let interface_id = workspace
            .add_interface(&product_id, "API", "")
            .unwrap()
            .id
            .clone();
        workspace
            .delete(EntityKind::Interface, &interface_id)
            .unwrap();
        workspace.flush().unwrap();

        let sync = Sync {
            check: false,
            dry_run: true,
            quiet: true,
        };
        sync.run(root.clone()).expect("dry run should succeed");

        let workspace = Workspace::open(root).unwrap();
        assert_eq!(workspace.dangling_references().len(), 1);
    }
}
