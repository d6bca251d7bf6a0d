//! Pricing helpers
//!
//! Minor-unit arithmetic shared by the session's subtotal and membership
//! discount calculations.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to price calculations.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A line or basket amount overflowed minor-unit arithmetic.
    #[error("amount overflowed minor-unit arithmetic")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate a percentage of an amount in minor units, rounded half away
/// from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the calculation overflows
/// or cannot be safely represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

/// Subtract a percentage from a price.
///
/// # Errors
///
/// Returns a [`PricingError`] if the percentage cannot be applied or the
/// subtraction fails.
pub fn apply_discount(
    price: Money<'static, Currency>,
    percent: &Percentage,
) -> Result<Money<'static, Currency>, PricingError> {
    let off = percent_of_minor(percent, price.to_minor_units())?;

    Ok(price.sub(Money::from_minor(off, price.currency()))?)
}

/// Price × quantity in minor units, overflow-checked.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the multiplication overflows.
pub fn line_total(
    price: Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}
