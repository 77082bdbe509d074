use compplan_model::{Money, PayoutKind};

use crate::config::DisplayOptions;

/// Compute the commissions generated by an order amount.
#[derive(Debug, clap::Args)]
pub struct Commission {
    /// Order amount.
    amount: Money,
    /// Only show the commission of the given upline level.
    ///
    /// Shows the direct commission and every configured level by default.
    #[arg(long, short)]
    level: Option<usize>,
}

impl super::Command for Commission {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let engine = ctx.engine()?;
        let output = ctx.config().output();

        let items = match self.level {
            Some(level) => {
                let amount = engine.level_commission(self.amount, level)?;
                if level == 0 || level > engine.config().max_level() {
                    tracing::warn!(%level, "level is not paid by the plan");
                }
                vec![serde_json::json!({
                    "kind": PayoutKind::Level,
                    "level": level,
                    "amount": amount,
                })]
            }
            None => {
                let direct = engine.direct_commission(self.amount)?;
                let mut items = vec![serde_json::json!({
                    "kind": PayoutKind::Direct,
                    "level": null,
                    "amount": direct,
                })];
                for level in 1..=engine.config().max_level() {
                    let amount = engine.level_commission(self.amount, level)?;
                    items.push(serde_json::json!({
                        "kind": PayoutKind::Level,
                        "level": level,
                        "amount": amount,
                    }));
                }
                items
            }
        };

        let options =
            DisplayOptions::table_projection([("kind", "Kind"), ("level", "Level"), ("amount", "Amount")]);
        println!("{}", output.display_many(items, options)?);
        Ok(())
    }
}
