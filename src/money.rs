//! Money Validation Module
//!
//! All client-supplied amounts enter the ledger through [`validate_amount`].
//!
//! ## Representation
//! - Balances and amounts are exact `rust_decimal::Decimal` values
//! - The store column type is `NUMERIC(20, 2)`, so at most [`MONEY_SCALE`]
//!   fractional digits are accepted; anything finer is rejected, never rounded
//! - The same column holds at most 18 integer digits; amounts and balances
//!   stay below [`AMOUNT_LIMIT`]
//!
//! ## Usage
//! ```rust
//! use funds_ledger::money::validate_amount;
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let amount = validate_amount(Decimal::from_str("40.50").unwrap()).unwrap();
//! assert_eq!(amount.to_string(), "40.50");
//! assert!(validate_amount(Decimal::ZERO).is_err());
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits carried by every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Exclusive upper bound (10^18) for amounts and balances.
pub const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000_000;

/// Money validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount too large: must be below {limit}")]
    AmountTooLarge { limit: i64 },
}

/// Validate a client-supplied amount.
///
/// Returns the amount at exactly [`MONEY_SCALE`] fractional digits.
///
/// # Errors
/// * `InvalidAmount` - zero or negative
/// * `PrecisionOverflow` - more than [`MONEY_SCALE`] significant fractional digits
/// * `AmountTooLarge` - at or above [`AMOUNT_LIMIT`]
pub fn validate_amount(amount: Decimal) -> Result<Decimal, MoneyError> {
    if amount <= Decimal::ZERO {
        return Err(MoneyError::InvalidAmount);
    }
    if !within_limit(amount) {
        return Err(MoneyError::AmountTooLarge {
            limit: AMOUNT_LIMIT,
        });
    }

    let normalized = amount.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: MONEY_SCALE,
        });
    }

    let mut scaled = normalized;
    scaled.rescale(MONEY_SCALE);
    Ok(scaled)
}

/// True if `value` fits the stored column
pub fn within_limit(value: Decimal) -> bool {
    value < Decimal::from(AMOUNT_LIMIT)
}

/// Zero balance at the stored scale
pub fn zero() -> Decimal {
    Decimal::new(0, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_accepts_positive_amounts() {
        assert_eq!(validate_amount(dec("40")), Ok(dec("40")));
        assert_eq!(validate_amount(dec("0.01")), Ok(dec("0.01")));
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        assert_eq!(validate_amount(dec("10.500")), Ok(dec("10.5")));
    }

    #[test]
    fn test_result_carries_stored_scale() {
        assert_eq!(validate_amount(dec("7")).unwrap().to_string(), "7.00");
        assert_eq!(validate_amount(dec("10.500")).unwrap().to_string(), "10.50");
        assert_eq!(zero().to_string(), "0.00");
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(validate_amount(Decimal::ZERO), Err(MoneyError::InvalidAmount));
        assert_eq!(validate_amount(dec("-5")), Err(MoneyError::InvalidAmount));
    }

    #[test]
    fn test_rejects_amounts_the_column_cannot_hold() {
        let too_large = MoneyError::AmountTooLarge {
            limit: AMOUNT_LIMIT,
        };
        assert_eq!(validate_amount(Decimal::MAX), Err(too_large.clone()));
        assert_eq!(
            validate_amount(dec("10000000000000000000")),
            Err(too_large.clone())
        );
        assert_eq!(
            validate_amount(Decimal::from(AMOUNT_LIMIT)),
            Err(too_large)
        );

        let largest = dec("999999999999999999.99");
        assert_eq!(validate_amount(largest), Ok(largest));
    }

    #[test]
    fn test_rejects_sub_cent_precision() {
        assert_eq!(
            validate_amount(dec("1.005")),
            Err(MoneyError::PrecisionOverflow {
                provided: 3,
                max: MONEY_SCALE
            })
        );
    }
}
