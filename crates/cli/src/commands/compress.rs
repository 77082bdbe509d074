use std::path::PathBuf;

use compplan_model::UplineMember;

use crate::config::DisplayOptions;

use super::utils::read_json;

/// Remove the inactive members of an upline that have no active downline.
#[derive(Debug, clap::Args)]
pub struct Compress {
    /// Path to a JSON array of upline members, nearest first.
    upline: PathBuf,
}

impl super::Command for Compress {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let engine = ctx.engine()?;
        let output = ctx.config().output();

        let upline: Vec<UplineMember> = read_json(&self.upline).await?;
        let retained = engine.compress_levels(&upline);
        tracing::debug!(
            total = upline.len(),
            retained = retained.len(),
            "compressed upline"
        );

        let items = (1..).zip(retained).map(|(level, member)| {
            serde_json::json!({
                "level": level,
                "member": member,
            })
        });
        let options = DisplayOptions::table_projection([
            ("level", "Level"),
            ("member.id", "Member"),
            ("member.isActive", "Active"),
            ("member.hasActiveDownline", "Active Downline"),
        ]);
        println!("{}", output.display_many(items, options)?);
        Ok(())
    }
}
