use std::path::PathBuf;

use compplan_model::{Money, UplineMember};

use crate::config::{DisplayOptions, OutputFormat};

use super::utils::read_json;

/// Compute every payout generated by an order.
#[derive(Debug, clap::Args)]
pub struct Payout {
    /// Order amount.
    amount: Money,
    /// Path to a JSON array of the buyer's upline, the direct sponsor first.
    #[arg(long)]
    upline: PathBuf,
}

impl super::Command for Payout {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let engine = ctx.engine()?;
        let output = ctx.config().output();

        let upline: Vec<UplineMember> = read_json(&self.upline).await?;
        let report = engine.order_commissions(self.amount, &upline)?;

        match output {
            OutputFormat::Json => {
                println!("{}", output.display_one(&report, DisplayOptions::default())?);
            }
            OutputFormat::Table => {
                let options = DisplayOptions::table_projection([
                    ("member", "Member"),
                    ("kind", "Kind"),
                    ("level", "Level"),
                    ("amount", "Amount"),
                ]);
                println!("{}", output.display_many(report.payouts(), options)?);
                println!("Total: {}", report.total());
            }
        }
        Ok(())
    }
}
