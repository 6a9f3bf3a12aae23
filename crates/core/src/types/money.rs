//! Money arithmetic for cart totals and receipt snapshots.
//!
//! All amounts are `rust_decimal::Decimal` - floats never touch money in
//! this codebase. Prices are stored in the currency's standard unit
//! (naira, dollars), not in minor units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Nigerian naira - the store's settlement currency.
    #[default]
    NGN,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// The ISO 4217 code, as sent on the wire.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NGN" => Ok(Self::NGN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

/// Compute the total for one line: unit price times quantity.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Compute an order total from `(unit_price, quantity)` pairs.
#[must_use]
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    lines
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_total() {
        let price = Decimal::from_str("5.50").unwrap();
        assert_eq!(line_total(price, 3), Decimal::from_str("16.50").unwrap());
    }

    #[test]
    fn test_order_total() {
        let lines = [
            (Decimal::from_str("10.00").unwrap(), 2),
            (Decimal::from_str("5.50").unwrap(), 3),
        ];
        assert_eq!(order_total(lines), Decimal::from_str("36.50").unwrap());
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total([]), Decimal::ZERO);
    }

    #[test]
    fn test_currency_code_roundtrip() {
        for currency in [Currency::NGN, Currency::USD, Currency::EUR, Currency::GBP] {
            assert_eq!(Currency::from_str(currency.code()).unwrap(), currency);
        }
    }

    #[test]
    fn test_currency_from_str_invalid() {
        assert!(Currency::from_str("ZZZ").is_err());
    }

    #[test]
    fn test_currency_default_is_ngn() {
        assert_eq!(Currency::default(), Currency::NGN);
    }
}
