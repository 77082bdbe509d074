#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![warn(clippy::arithmetic_side_effects)]

//! A Rust implementation of an MLM compensation plan model.

/// Amounts.
pub mod amount;

/// Compensation plan config.
pub mod config;

/// Compensation engine.
pub mod engine;

/// Error type.
pub mod error;

/// Network trees and compression.
pub mod network;

/// Payout reports.
pub mod payout;

/// Rank evaluation.
pub mod rank;

pub use amount::{Money, Volume};
pub use config::{CompensationConfig, RankDefinition};
pub use engine::CompensationEngine;
pub use error::Error;
pub use network::{Activity, NetworkNode, Placement, SpilloverReport, UplineMember};
pub use payout::{OrderCommissionReport, Payout, PayoutKind};
pub use rank::STARTER_RANK;

/// Alias for result.
pub type Result<T> = std::result::Result<T, Error>;
