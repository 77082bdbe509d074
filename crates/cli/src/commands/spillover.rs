use std::path::PathBuf;

use compplan_model::NetworkNode;

use crate::config::DisplayOptions;

use super::utils::{read_json, write_json};

/// Spill the children of the root of a tree beyond the maximum width over to
/// the first free positions of its downline.
#[derive(Debug, clap::Args)]
pub struct Spillover {
    /// Path to the JSON tree.
    tree: PathBuf,
    /// Maximum number of children per node.
    #[arg(long, short = 'w', default_value_t = 2)]
    max_width: usize,
    /// Limit the tree to the given number of levels below the root.
    #[arg(long, short = 'd')]
    max_depth: Option<usize>,
    /// Recompute the `hasActiveDownline` flags after placing.
    #[arg(long)]
    refresh: bool,
    /// Write the resulting tree to the given path.
    #[arg(long, value_name = "PATH", conflicts_with = "in_place")]
    out: Option<PathBuf>,
    /// Overwrite the input tree with the result.
    #[arg(long)]
    in_place: bool,
}

impl super::Command for Spillover {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let engine = ctx.engine()?;
        let output = ctx.config().output();

        let mut tree: NetworkNode = read_json(&self.tree).await?;
        let report = match self.max_depth {
            Some(max_depth) => engine.apply_matrix_spillover(&mut tree, self.max_width, max_depth)?,
            None => engine.apply_spillover(&mut tree, self.max_width)?,
        };
        if self.refresh {
            tree.refresh_active_downline();
        }

        for node in report.unplaced() {
            tracing::warn!(node = %node.id, "no free position left");
        }

        let target = if self.in_place {
            Some(&self.tree)
        } else {
            self.out.as_ref()
        };
        if let Some(path) = target {
            write_json(path, &tree).await?;
            tracing::info!(path = %path.display(), "tree written");
        }

        let placed = report.placements().iter().map(|placement| {
            serde_json::json!({
                "node": placement.node,
                "parent": placement.parent,
            })
        });
        let unplaced = report.unplaced().iter().map(|node| {
            serde_json::json!({
                "node": node.id,
                "parent": null,
            })
        });
        let options = DisplayOptions::table_projection([("node", "Node"), ("parent", "Parent")]);
        println!("{}", output.display_many(placed.chain(unplaced), options)?);
        Ok(())
    }
}
