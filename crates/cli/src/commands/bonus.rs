use compplan_model::Money;

use crate::config::DisplayOptions;

/// Bonus commands.
#[derive(Debug, clap::Args)]
pub struct Bonus {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Matching bonus on a downline's commission.
    Matching {
        /// Commission earned by the downline.
        commission: Money,
    },
    /// Leadership bonus on a group volume.
    Leadership {
        /// Group volume, as a monetary amount.
        volume: Money,
    },
}

impl super::Command for Bonus {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let engine = ctx.engine()?;
        let output = ctx.config().output();

        let item = match &self.command {
            Command::Matching { commission } => serde_json::json!({
                "bonus": "matching",
                "base": commission,
                "rate": engine.config().matching_bonus_rate(),
                "amount": engine.matching_bonus(*commission)?,
            }),
            Command::Leadership { volume } => serde_json::json!({
                "bonus": "leadership",
                "base": volume,
                "rate": engine.config().leadership_bonus_rate(),
                "amount": engine.leadership_bonus(*volume)?,
            }),
        };

        println!("{}", output.display_one(item, DisplayOptions::default())?);
        Ok(())
    }
}
