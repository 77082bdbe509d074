use crate::amount::Money;

/// The kind of payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumIter, strum::EnumString, strum::Display)
)]
#[cfg_attr(feature = "strum", strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum PayoutKind {
    /// Direct commission paid to the sponsor.
    Direct,
    /// Level commission.
    Level,
    /// Matching bonus on a downline's commission.
    Matching,
}

/// A payout to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payout {
    /// Receiving member.
    pub member: String,
    /// Kind.
    pub kind: PayoutKind,
    /// Upline level, for level commissions.
    pub level: Option<usize>,
    /// Amount.
    pub amount: Money,
}

impl Payout {
    pub(crate) fn new(member: &str, kind: PayoutKind, amount: Money) -> Self {
        Self {
            member: member.to_string(),
            kind,
            level: None,
            amount,
        }
    }

    pub(crate) fn level(member: &str, level: usize, amount: Money) -> Self {
        Self {
            level: Some(level),
            ..Self::new(member, PayoutKind::Level, amount)
        }
    }
}

/// Report of the commissions generated by an order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct OrderCommissionReport {
    order_amount: Money,
    payouts: Vec<Payout>,
    total: Money,
}

impl OrderCommissionReport {
    pub(crate) fn new(order_amount: Money, payouts: Vec<Payout>) -> crate::Result<Self> {
        let total = payouts
            .iter()
            .try_fold(Money::ZERO, |total, payout| total.checked_add(&payout.amount))
            .ok_or(crate::Error::Overflow)?
            .checked_round()?;
        Ok(Self {
            order_amount,
            payouts,
            total,
        })
    }

    /// Get order amount.
    pub fn order_amount(&self) -> &Money {
        &self.order_amount
    }

    /// Get payouts, in upline order.
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    /// Get the payouts of the given kind.
    pub fn payouts_of(&self, kind: PayoutKind) -> impl Iterator<Item = &Payout> {
        self.payouts.iter().filter(move |payout| payout.kind == kind)
    }

    /// Get the total amount paid out.
    pub fn total(&self) -> &Money {
        &self.total
    }
}
