mod output;

use compplan_model::{CompensationConfig, CompensationEngine, RankDefinition};
use rust_decimal::Decimal;

pub use output::{DisplayOptions, OutputFormat};

/// Configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Output format.
    #[serde(default)]
    output: OutputFormat,
    /// Compensation plan.
    plan: CompensationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            plan: default_plan(),
        }
    }
}

impl Config {
    /// Get output format.
    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Set output format.
    pub fn set_output(&mut self, output: OutputFormat) {
        self.output = output;
    }

    /// Get compensation plan.
    pub fn plan(&self) -> &CompensationConfig {
        &self.plan
    }

    /// Creates an engine for the configured plan.
    pub fn engine(&self) -> eyre::Result<CompensationEngine> {
        Ok(CompensationEngine::new(self.plan.clone())?)
    }
}

/// A binary plan paying two levels.
fn default_plan() -> CompensationConfig {
    CompensationConfig::builder()
        .direct_commission_rate(Decimal::new(20, 2))
        .level_commission_rates(vec![Decimal::new(10, 2), Decimal::new(7, 2)])
        .matching_bonus_rate(Decimal::new(10, 2))
        .leadership_bonus_rate(Decimal::new(5, 2))
        .ranks(vec![
            RankDefinition::new("bronze", Decimal::new(100, 0), Decimal::new(1_000, 0), 2),
            RankDefinition::new("silver", Decimal::new(200, 0), Decimal::new(5_000, 0), 4),
            RankDefinition::new("gold", Decimal::new(500, 0), Decimal::new(20_000, 0), 8),
        ])
        .build()
}
