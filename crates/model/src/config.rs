use std::collections::HashSet;

use rust_decimal::Decimal;
use typed_builder::TypedBuilder;

use crate::{amount::Volume, rank::STARTER_RANK};

/// Requirements of a rank.
///
/// A member qualifies for the rank when all three thresholds are met.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankDefinition {
    #[builder(setter(into))]
    name: String,
    #[builder(default, setter(into))]
    #[cfg_attr(feature = "serde", serde(default))]
    personal_pv: Volume,
    #[builder(default, setter(into))]
    #[cfg_attr(feature = "serde", serde(default))]
    group_pv: Volume,
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    direct_referrals: u32,
}

impl RankDefinition {
    /// Create a new [`RankDefinition`].
    pub fn new(
        name: impl Into<String>,
        personal_pv: impl Into<Volume>,
        group_pv: impl Into<Volume>,
        direct_referrals: u32,
    ) -> Self {
        Self {
            name: name.into(),
            personal_pv: personal_pv.into(),
            group_pv: group_pv.into(),
            direct_referrals,
        }
    }

    /// Get rank name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get required personal PV.
    pub fn personal_pv(&self) -> &Volume {
        &self.personal_pv
    }

    /// Get required group PV.
    pub fn group_pv(&self) -> &Volume {
        &self.group_pv
    }

    /// Get required number of direct referrals.
    pub fn direct_referrals(&self) -> u32 {
        self.direct_referrals
    }

    /// Returns whether the given figures meet every threshold of this rank.
    pub fn is_met_by(&self, personal_pv: &Volume, group_pv: &Volume, direct_referrals: u32) -> bool {
        *personal_pv >= self.personal_pv
            && *group_pv >= self.group_pv
            && direct_referrals >= self.direct_referrals
    }

    /// Returns whether every threshold of `self` is less than or equal to those of `other`.
    pub fn is_no_harder_than(&self, other: &Self) -> bool {
        self.personal_pv <= other.personal_pv
            && self.group_pv <= other.group_pv
            && self.direct_referrals <= other.direct_referrals
    }
}

/// Compensation Plan Configuration.
///
/// Rates are fractions in `[0, 1]`; a rate of zero disables the corresponding payout.
/// Ranks must be listed from the easiest to the hardest, they are never re-sorted.
///
/// The configuration is validated when a [`CompensationEngine`](crate::CompensationEngine)
/// is created from it.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompensationConfig {
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    direct_commission_rate: Decimal,
    #[builder(default, setter(into))]
    #[cfg_attr(feature = "serde", serde(default))]
    level_commission_rates: Vec<Decimal>,
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    matching_bonus_rate: Decimal,
    #[builder(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    leadership_bonus_rate: Decimal,
    #[builder(setter(into))]
    ranks: Vec<RankDefinition>,
}

impl CompensationConfig {
    /// Get direct commission rate.
    pub fn direct_commission_rate(&self) -> &Decimal {
        &self.direct_commission_rate
    }

    /// Get level commission rates, index `0` is level `1`.
    pub fn level_commission_rates(&self) -> &[Decimal] {
        &self.level_commission_rates
    }

    /// Get the commission rate of the given 1-based level.
    ///
    /// Returns `None` for level `0` and for levels deeper than configured.
    pub fn level_commission_rate(&self, level: usize) -> Option<&Decimal> {
        self.level_commission_rates.get(level.checked_sub(1)?)
    }

    /// Get the deepest level paying a commission.
    pub fn max_level(&self) -> usize {
        self.level_commission_rates.len()
    }

    /// Get matching bonus rate.
    pub fn matching_bonus_rate(&self) -> &Decimal {
        &self.matching_bonus_rate
    }

    /// Get leadership bonus rate.
    pub fn leadership_bonus_rate(&self) -> &Decimal {
        &self.leadership_bonus_rate
    }

    /// Get ranks, from the easiest to the hardest.
    pub fn ranks(&self) -> &[RankDefinition] {
        &self.ranks
    }

    /// Get the position of the rank with the given name.
    ///
    /// [`STARTER_RANK`] is `0`, the `i`-th configured rank is `i + 1`.
    pub fn rank_ordinal(&self, name: &str) -> Option<usize> {
        if name == STARTER_RANK {
            return Some(0);
        }
        self.ranks
            .iter()
            .position(|rank| rank.name == name)
            .and_then(|index| index.checked_add(1))
    }

    /// Returns whether every rank is no harder than the one after it.
    pub fn is_rank_order_ascending(&self) -> bool {
        self.ranks
            .windows(2)
            .all(|pair| pair[0].is_no_harder_than(&pair[1]))
    }

    /// Validate the config.
    pub fn validate(&self) -> crate::Result<()> {
        validate_rate(
            &self.direct_commission_rate,
            "direct commission rate must be in [0, 1]",
        )?;
        for rate in &self.level_commission_rates {
            validate_rate(rate, "level commission rates must be in [0, 1]")?;
        }
        validate_rate(
            &self.matching_bonus_rate,
            "matching bonus rate must be in [0, 1]",
        )?;
        validate_rate(
            &self.leadership_bonus_rate,
            "leadership bonus rate must be in [0, 1]",
        )?;

        if self.ranks.is_empty() {
            return Err(crate::Error::Configuration("at least one rank is required"));
        }
        let mut names = HashSet::with_capacity(self.ranks.len());
        for rank in &self.ranks {
            if rank.name.is_empty() {
                return Err(crate::Error::Configuration("rank name must not be empty"));
            }
            if rank.name == STARTER_RANK {
                return Err(crate::Error::Configuration(
                    "`starter` is reserved for members without a rank",
                ));
            }
            if rank.personal_pv.is_negative() || rank.group_pv.is_negative() {
                return Err(crate::Error::Configuration(
                    "rank thresholds must be non-negative",
                ));
            }
            if !names.insert(rank.name.as_str()) {
                tracing::error!(rank = %rank.name, "duplicated rank");
                return Err(crate::Error::Configuration("rank names must be unique"));
            }
        }

        if !self.is_rank_order_ascending() {
            tracing::warn!(
                ranks = ?self.ranks.iter().map(RankDefinition::name).collect::<Vec<_>>(),
                "ranks are not listed in ascending order of difficulty, rank evaluation may not be monotonic"
            );
        }

        Ok(())
    }
}

fn validate_rate(rate: &Decimal, msg: &'static str) -> crate::Result<()> {
    if *rate < Decimal::ZERO || *rate > Decimal::ONE {
        return Err(crate::Error::Configuration(msg));
    }
    Ok(())
}
