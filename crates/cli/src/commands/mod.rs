use std::path::Path;

use bonus::Bonus;
use commission::Commission;
use compplan_model::CompensationEngine;
use compress::Compress;
use enum_dispatch::enum_dispatch;
use init_config::InitConfig;
use payout::Payout;
use rank::Rank;
use spillover::Spillover;

use crate::config::Config;

mod bonus;
mod commission;
mod compress;
mod init_config;
mod payout;
mod rank;
mod spillover;
mod utils;

/// Commands.
#[enum_dispatch]
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Initialize config file.
    InitConfig(InitConfig),
    /// Direct and level commissions on an order.
    Commission(Commission),
    /// Bonuses.
    Bonus(Bonus),
    /// Determine the rank of a member.
    Rank(Rank),
    /// Compress an upline.
    Compress(Compress),
    /// Spill a node's overflowing children over to its downline.
    Spillover(Spillover),
    /// Every payout generated by an order.
    Payout(Payout),
}

#[enum_dispatch(Commands)]
pub(crate) trait Command {
    async fn execute(&self, ctx: Context<'_>) -> eyre::Result<()>;
}

/// Execution context of a command.
pub(crate) struct Context<'a> {
    config_path: &'a Path,
    config: &'a Config,
}

impl<'a> Context<'a> {
    pub(super) fn new(config_path: &'a Path, config: &'a Config) -> Self {
        Self {
            config_path,
            config,
        }
    }

    pub(crate) fn config_path(&self) -> &Path {
        self.config_path
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    /// Creates an engine for the configured plan, failing if the plan is invalid.
    pub(crate) fn engine(&self) -> eyre::Result<CompensationEngine> {
        self.config.engine()
    }
}
