use compplan_model::Volume;

use crate::config::DisplayOptions;

/// Determine the highest rank a member qualifies for.
#[derive(Debug, clap::Args)]
pub struct Rank {
    /// Personal volume.
    #[arg(long, default_value = "0")]
    personal_pv: Volume,
    /// Group volume.
    #[arg(long, default_value = "0")]
    group_pv: Volume,
    /// Number of direct referrals.
    #[arg(long, default_value_t = 0)]
    direct_referrals: u32,
}

impl super::Command for Rank {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let engine = ctx.engine()?;
        let output = ctx.config().output();

        let rank = engine.determine_rank(&self.personal_pv, &self.group_pv, self.direct_referrals);
        let item = serde_json::json!({
            "rank": rank,
            "ordinal": engine.config().rank_ordinal(rank),
            "personal_pv": self.personal_pv,
            "group_pv": self.group_pv,
            "direct_referrals": self.direct_referrals,
        });

        println!("{}", output.display_one(item, DisplayOptions::default())?);
        Ok(())
    }
}
