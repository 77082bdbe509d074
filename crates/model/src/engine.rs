use crate::{
    amount::{Money, Volume},
    config::CompensationConfig,
    network::{self, Activity, NetworkNode, SpilloverReport, UplineMember},
    payout::{OrderCommissionReport, Payout, PayoutKind},
    rank,
};

/// Compensation Engine.
///
/// Holds nothing but a validated [`CompensationConfig`], so it can be shared freely
/// between callers. Every monetary result is rounded half away from zero to two
/// decimal places, see [`Money::round`].
#[derive(Debug, Clone)]
pub struct CompensationEngine {
    config: CompensationConfig,
}

impl CompensationEngine {
    /// Create a new engine from a config.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the config is invalid.
    pub fn new(config: CompensationConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the config.
    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// Get the commission paid to the direct sponsor of an order.
    pub fn direct_commission(&self, order_amount: Money) -> crate::Result<Money> {
        order_amount
            .ensure_non_negative("order amount must be non-negative")?
            .apply_rate(self.config.direct_commission_rate())
    }

    /// Get the commission paid to the upline at the given 1-based `level`.
    ///
    /// Returns zero for level `0` and for levels deeper than configured.
    pub fn level_commission(&self, order_amount: Money, level: usize) -> crate::Result<Money> {
        let order_amount = order_amount.ensure_non_negative("order amount must be non-negative")?;
        match self.config.level_commission_rate(level) {
            Some(rate) => order_amount.apply_rate(rate),
            None => Ok(Money::ZERO.round()),
        }
    }

    /// Get the matching bonus on a downline's commission.
    pub fn matching_bonus(&self, downline_commission: Money) -> crate::Result<Money> {
        downline_commission
            .ensure_non_negative("downline commission must be non-negative")?
            .apply_rate(self.config.matching_bonus_rate())
    }

    /// Get the leadership bonus on the sales volume of a whole group.
    pub fn leadership_bonus(&self, group_volume: Money) -> crate::Result<Money> {
        group_volume
            .ensure_non_negative("group volume must be non-negative")?
            .apply_rate(self.config.leadership_bonus_rate())
    }

    /// Determine the highest rank the figures qualify for.
    ///
    /// Returns [`STARTER_RANK`](crate::STARTER_RANK) if no configured rank is met.
    pub fn determine_rank(
        &self,
        personal_pv: &Volume,
        group_pv: &Volume,
        direct_referrals: u32,
    ) -> &str {
        rank::determine_rank(
            self.config.ranks(),
            personal_pv,
            group_pv,
            direct_referrals,
        )
    }

    /// Keep only the levels that are active or have an active downline.
    pub fn compress_levels<L>(&self, levels: &[L]) -> Vec<L>
    where
        L: Activity + Clone,
    {
        network::compress_levels(levels)
    }

    /// Spill the children of `node` beyond `max_width` over to the first free
    /// positions in breadth-first order.
    ///
    /// The tree is mutated in place.
    pub fn apply_spillover(
        &self,
        node: &mut NetworkNode,
        max_width: usize,
    ) -> crate::Result<SpilloverReport> {
        network::apply_spillover(node, max_width, None)
    }

    /// Same as [`apply_spillover`](Self::apply_spillover), for a matrix limited to
    /// `max_depth` levels below `node`.
    pub fn apply_matrix_spillover(
        &self,
        node: &mut NetworkNode,
        max_width: usize,
        max_depth: usize,
    ) -> crate::Result<SpilloverReport> {
        network::apply_spillover(node, max_width, Some(max_depth))
    }

    /// Compute every commission generated by an order.
    ///
    /// `upline[0]` is the direct sponsor of the buyer and receives the direct commission.
    /// The rest of the upline is compressed, the `k`-th retained member receiving the
    /// level `k` commission. The first retained member also receives the matching
    /// bonus on the direct commission.
    ///
    /// A zero rate disables its payout kind: no payout is reported for it.
    pub fn order_commissions(
        &self,
        order_amount: Money,
        upline: &[UplineMember],
    ) -> crate::Result<OrderCommissionReport> {
        let order_amount = order_amount.ensure_non_negative("order amount must be non-negative")?;
        let Some((sponsor, rest)) = upline.split_first() else {
            return OrderCommissionReport::new(order_amount, Vec::new());
        };

        let mut payouts = Vec::new();
        let direct = self.direct_commission(order_amount)?;
        if !self.config.direct_commission_rate().is_zero() {
            payouts.push(Payout::new(&sponsor.id, PayoutKind::Direct, direct));
        }

        let retained = self.compress_levels(rest);
        for (level, member) in (1..).zip(retained.iter().take(self.config.max_level())) {
            let disabled = self
                .config
                .level_commission_rate(level)
                .map_or(true, |rate| rate.is_zero());
            if disabled {
                continue;
            }
            let amount = self.level_commission(order_amount, level)?;
            payouts.push(Payout::level(&member.id, level, amount));
        }

        if let Some(member) = retained.first() {
            if !self.config.matching_bonus_rate().is_zero() {
                let matching = self.matching_bonus(direct)?;
                payouts.push(Payout::new(&member.id, PayoutKind::Matching, matching));
            }
        }

        tracing::debug!(
            %order_amount,
            sponsor = %sponsor.id,
            compressed = rest.len().saturating_sub(retained.len()),
            payouts = payouts.len(),
            "computed order commissions"
        );
        OrderCommissionReport::new(order_amount, payouts)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{config::RankDefinition, STARTER_RANK};

    fn engine() -> crate::Result<CompensationEngine> {
        CompensationEngine::new(
            CompensationConfig::builder()
                .direct_commission_rate(dec!(0.20))
                .level_commission_rates(vec![dec!(0.10), dec!(0.07)])
                .matching_bonus_rate(dec!(0.10))
                .leadership_bonus_rate(dec!(0.03))
                .ranks(vec![
                    RankDefinition::new("bronze", dec!(100), dec!(500), 1),
                    RankDefinition::new("silver", dec!(200), dec!(2000), 3),
                ])
                .build(),
        )
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CompensationConfig::builder()
            .matching_bonus_rate(dec!(-0.1))
            .ranks(vec![RankDefinition::new("bronze", dec!(1), dec!(1), 1)])
            .build();
        assert!(matches!(
            CompensationEngine::new(config),
            Err(crate::Error::Configuration(_))
        ));
    }

    #[test]
    fn test_direct_commission() -> crate::Result<()> {
        let engine = engine()?;
        assert_eq!(
            engine.direct_commission(Money(dec!(1000.00)))?,
            Money(dec!(200.00))
        );
        assert_eq!(
            engine.direct_commission(Money(dec!(0.025)))?,
            Money(dec!(0.01))
        );
        assert_eq!(engine.direct_commission(Money::ZERO)?, Money::ZERO);
        assert!(matches!(
            engine.direct_commission(Money(dec!(-1))),
            Err(crate::Error::InvalidAmount(_))
        ));
        Ok(())
    }

    #[test]
    fn test_level_commission_bounds() -> crate::Result<()> {
        let engine = engine()?;
        let amount = Money(dec!(500));
        assert_eq!(engine.level_commission(amount, 0)?, Money::ZERO);
        assert_eq!(engine.level_commission(amount, 1)?, Money(dec!(50.00)));
        assert_eq!(engine.level_commission(amount, 2)?, Money(dec!(35.00)));
        assert_eq!(engine.level_commission(amount, 3)?, Money::ZERO);
        assert_eq!(engine.level_commission(amount, usize::MAX)?, Money::ZERO);
        assert_eq!(engine.level_commission(amount, 3)?.to_string(), "0.00");
        assert!(matches!(
            engine.level_commission(Money(dec!(-500)), 9),
            Err(crate::Error::InvalidAmount(_))
        ));
        Ok(())
    }

    #[test]
    fn test_bonuses() -> crate::Result<()> {
        let engine = engine()?;
        assert_eq!(engine.matching_bonus(Money(dec!(50)))?, Money(dec!(5.00)));
        assert_eq!(
            engine.leadership_bonus(Money(dec!(12345.67)))?,
            Money(dec!(370.37))
        );
        assert!(matches!(
            engine.leadership_bonus(Money(dec!(-0.01))),
            Err(crate::Error::InvalidAmount(_))
        ));
        Ok(())
    }

    #[test]
    fn test_zero_rate_disables_bonus() -> crate::Result<()> {
        let engine = CompensationEngine::new(
            CompensationConfig::builder()
                .direct_commission_rate(dec!(0.2))
                .ranks(vec![RankDefinition::new("bronze", dec!(1), dec!(1), 1)])
                .build(),
        )?;
        assert_eq!(engine.matching_bonus(Money(dec!(80)))?, Money::ZERO);
        assert_eq!(engine.leadership_bonus(Money(dec!(80)))?, Money::ZERO);
        assert_eq!(engine.level_commission(Money(dec!(80)), 1)?, Money::ZERO);
        Ok(())
    }

    #[test]
    fn test_determine_rank() -> crate::Result<()> {
        let engine = engine()?;
        let rank = engine.determine_rank(&Volume::ZERO, &Volume::ZERO, 0);
        assert_eq!(rank, STARTER_RANK);
        let rank = engine.determine_rank(&Volume(dec!(150)), &Volume(dec!(600)), 1);
        assert_eq!(rank, "bronze");
        let rank = engine.determine_rank(&Volume(dec!(200)), &Volume(dec!(2000)), 3);
        assert_eq!(rank, "silver");
        Ok(())
    }

    #[test]
    fn test_order_commissions() -> crate::Result<()> {
        let engine = engine()?;
        let upline = vec![
            UplineMember::new("sponsor", false, false),
            UplineMember::new("dormant", false, false),
            UplineMember::new("u1", true, true),
            UplineMember::new("u2", false, true),
            UplineMember::new("u3", true, true),
        ];
        let report = engine.order_commissions(Money(dec!(500)), &upline)?;
        let payouts = report
            .payouts()
            .iter()
            .map(|p| (p.member.as_str(), p.kind, p.level, p.amount.0))
            .collect::<Vec<_>>();
        assert_eq!(
            payouts,
            [
                ("sponsor", PayoutKind::Direct, None, dec!(100.00)),
                ("u1", PayoutKind::Level, Some(1), dec!(50.00)),
                ("u2", PayoutKind::Level, Some(2), dec!(35.00)),
                ("u1", PayoutKind::Matching, None, dec!(10.00)),
            ]
        );
        assert_eq!(*report.total(), Money(dec!(195.00)));
        assert_eq!(report.payouts_of(PayoutKind::Level).count(), 2);
        Ok(())
    }

    #[test]
    fn test_order_commissions_edge_cases() -> crate::Result<()> {
        let engine = engine()?;
        let report = engine.order_commissions(Money(dec!(500)), &[])?;
        assert!(report.payouts().is_empty());
        assert_eq!(report.total().to_string(), "0.00");

        let report =
            engine.order_commissions(Money(dec!(10)), &[UplineMember::new("s", true, true)])?;
        assert_eq!(report.payouts().len(), 1);
        assert_eq!(report.total().0, dec!(2));

        assert!(matches!(
            engine.order_commissions(Money(Decimal::NEGATIVE_ONE), &[]),
            Err(crate::Error::InvalidAmount(_))
        ));
        Ok(())
    }

    #[test]
    fn test_order_commissions_skip_disabled_kinds() -> crate::Result<()> {
        let engine = CompensationEngine::new(
            CompensationConfig::builder()
                .direct_commission_rate(dec!(0.2))
                .level_commission_rates(vec![Decimal::ZERO, dec!(0.05)])
                .ranks(vec![RankDefinition::new("bronze", dec!(1), dec!(1), 1)])
                .build(),
        )?;
        let upline = [
            UplineMember::new("sponsor", true, false),
            UplineMember::new("u1", true, true),
            UplineMember::new("u2", true, true),
        ];
        let report = engine.order_commissions(Money(dec!(80)), &upline)?;
        let payouts = report
            .payouts()
            .iter()
            .map(|p| (p.member.as_str(), p.kind, p.level, p.amount.0))
            .collect::<Vec<_>>();
        assert_eq!(
            payouts,
            [
                ("sponsor", PayoutKind::Direct, None, dec!(16.00)),
                ("u2", PayoutKind::Level, Some(2), dec!(4.00)),
            ]
        );
        assert_eq!(report.payouts_of(PayoutKind::Matching).count(), 0);
        assert_eq!(*report.total(), Money(dec!(20.00)));
        Ok(())
    }
}
