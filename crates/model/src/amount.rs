use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by a [`Money`] returned from the engine.
pub const MONEY_DECIMALS: u32 = 2;

/// Rounding strategy applied to money at the boundary of each calculation.
pub const MONEY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Maximum number of decimal places a [`Decimal`] can carry.
pub const MAX_SCALE: u32 = 28;

/// Monetary amount in the base currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Money(pub Decimal);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = <Decimal as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for Money {
    type Error = crate::Error;

    fn try_from(value: f64) -> crate::Result<Self> {
        Decimal::try_from(value)
            .map(Self)
            .map_err(|_| crate::Error::InvalidAmount("not a finite number"))
    }
}

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from an amount of minor units (cents).
    pub fn from_minor_units(units: i64) -> Self {
        Self(Decimal::new(units, MONEY_DECIMALS))
    }

    /// Returns whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns whether the amount is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Round half away from zero to [`MONEY_DECIMALS`] places.
    ///
    /// The result has exactly [`MONEY_DECIMALS`] digits after the point, unless the
    /// integer part leaves no room for them in the mantissa. Use
    /// [`checked_round`](Self::checked_round) to reject such amounts.
    pub fn round(self) -> Self {
        let mut value = self.0.round_dp_with_strategy(MONEY_DECIMALS, MONEY_ROUNDING);
        value.rescale(MONEY_DECIMALS);
        Self(value)
    }

    /// Round like [`round`](Self::round), failing if the result cannot carry exactly
    /// [`MONEY_DECIMALS`] places.
    pub fn checked_round(self) -> crate::Result<Self> {
        let rounded = self.round();
        if rounded.0.scale() == MONEY_DECIMALS {
            Ok(rounded)
        } else {
            Err(crate::Error::Overflow)
        }
    }

    /// Multiply by a rate and round the exact product once.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`](crate::Error::InvalidAmount) if the exact product
    /// needs more than [`MAX_SCALE`] decimal places, and [`Error::Overflow`](crate::Error::Overflow)
    /// if it does not fit in a [`Decimal`].
    pub fn apply_rate(&self, rate: &Decimal) -> crate::Result<Self> {
        let amount = self.0.normalize();
        let rate = rate.normalize();
        let scale = amount.scale().saturating_add(rate.scale());
        if scale > MAX_SCALE {
            return Err(crate::Error::InvalidAmount(
                "amount is too precise to apply the rate exactly",
            ));
        }
        let value = amount.checked_mul(rate).ok_or(crate::Error::Overflow)?;
        // The product is only truncated when its mantissa overflows.
        if !value.is_zero() && value.scale() != scale {
            return Err(crate::Error::Overflow);
        }
        Self(value).checked_round()
    }

    /// Checked addition.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub(crate) fn ensure_non_negative(self, context: &'static str) -> crate::Result<Self> {
        if self.is_negative() {
            Err(crate::Error::InvalidAmount(context))
        } else {
            Ok(self)
        }
    }
}

/// Point value (PV), a normalized sales-volume unit.
///
/// Volumes are never rounded by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Volume(pub Decimal);

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Volume {
    type Err = <Decimal as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Volume {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u64> for Volume {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl TryFrom<f64> for Volume {
    type Error = crate::Error;

    fn try_from(value: f64) -> crate::Result<Self> {
        Decimal::try_from(value)
            .map(Self)
            .map_err(|_| crate::Error::InvalidAmount("not a finite number"))
    }
}

impl Volume {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns whether the volume is zero.
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns whether the volume is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}
