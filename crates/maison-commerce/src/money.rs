//! Money type for representing monetary values.
//!
//! Uses an integer count of the currency's smallest unit so that line totals
//! and bag totals are exact. Catalog prices arrive as decimal strings and are
//! parsed without going through floating point.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    CNY,
    INR,
    MXN,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::MXN => "MXN",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF",
            Currency::CNY => "\u{00a5}",
            Currency::INR => "\u{20b9}",
            Currency::MXN => "MX$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "CHF" => Some(Currency::CHF),
            "CNY" => Some(Currency::CNY),
            "INR" => Some(Currency::INR),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }

    fn minor_units_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a catalog price such as `("45.00", "USD")`.
    ///
    /// Accepts an unsigned decimal. Fractional digits beyond the currency's
    /// decimal places are allowed only when they are zeros ("1200.0" in JPY).
    ///
    /// ```
    /// use maison_commerce::money::{Currency, Money};
    /// let price = Money::parse("45.5", "USD").unwrap();
    /// assert_eq!(price, Money::new(4550, Currency::USD));
    /// ```
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, CommerceError> {
        let currency = Currency::from_code(currency_code)
            .ok_or_else(|| CommerceError::UnsupportedCurrency(currency_code.to_string()))?;
        let invalid = || CommerceError::InvalidAmount(amount.to_string());

        let trimmed = amount.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        let places = currency.decimal_places() as usize;
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }
        if trimmed.contains('.') && fraction.is_empty() {
            return Err(invalid());
        }
        // Trailing zeros beyond the currency's precision carry no value.
        let fraction = if fraction.len() > places {
            let (kept, excess) = fraction.split_at(places);
            if !excess.bytes().all(|b| b == b'0') {
                return Err(invalid());
            }
            kept
        } else {
            fraction
        };

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let padded = format!("{:0<width$}", fraction, width = places);
        let fraction: i64 = if padded.is_empty() {
            0
        } else {
            padded.parse().map_err(|_| invalid())?
        };

        let amount_cents = whole
            .checked_mul(currency.minor_units_per_major())
            .and_then(|v| v.checked_add(fraction))
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(amount_cents, currency))
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format with the trailing currency code (e.g., "$49.99 USD").
    pub fn display_with_code(&self) -> String {
        format!("{} {}", self.display(), self.currency.code())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        let units = self.currency.minor_units_per_major().unsigned_abs();
        let abs = self.amount_cents.unsigned_abs();
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        if places == 0 {
            format!("{}{}", sign, abs)
        } else {
            format!("{}{}.{:0places$}", sign, abs / units, abs % units)
        }
    }

    /// Try to add another Money value, returning None if currencies don't match
    /// or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|sum| Money::new(sum, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|product| Money::new(product, self.currency))
    }

    /// Sum an iterator of Money values, returning None on currency mismatch or
    /// overflow.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.amount_cents, 4999);
        assert_eq!(m.currency, Currency::USD);
    }

    #[test]
    fn test_parse_catalog_amounts() {
        assert_eq!(Money::parse("45.00", "USD").unwrap().amount_cents, 4500);
        assert_eq!(Money::parse("45", "USD").unwrap().amount_cents, 4500);
        assert_eq!(Money::parse("0.5", "eur").unwrap().amount_cents, 50);
        assert_eq!(Money::parse("1200", "JPY").unwrap().amount_cents, 1200);
    }

    #[test]
    fn test_parse_rejects_malformed_amounts() {
        for bad in ["", "abc", "-1.00", "1.999", "1.", ".5", "1,00", "1.2.3"] {
            assert!(
                matches!(Money::parse(bad, "USD"), Err(CommerceError::InvalidAmount(_))),
                "expected {bad:?} to be rejected"
            );
        }
        assert!(Money::parse("10.5", "JPY").is_err());
    }

    #[test]
    fn test_parse_accepts_zero_excess_precision() {
        assert_eq!(Money::parse("1200.0", "JPY").unwrap(), Money::new(1200, Currency::JPY));
        assert_eq!(Money::parse("45.000", "USD").unwrap(), Money::new(4500, Currency::USD));
        assert_eq!(Money::parse("45.1000", "USD").unwrap().amount_cents, 4510);
        assert!(matches!(
            Money::parse("45.001", "USD"),
            Err(CommerceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_unknown_currency() {
        let result = Money::parse("10.00", "XYZ");
        assert!(matches!(result, Err(CommerceError::UnsupportedCurrency(code)) if code == "XYZ"));
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.display(), "$49.99");
        assert_eq!(m.display_with_code(), "$49.99 USD");

        let m = Money::new(100, Currency::JPY);
        assert_eq!(m.display(), "\u{00a5}100");

        let m = Money::new(5, Currency::GBP);
        assert_eq!(m.display_amount(), "0.05");
    }

    #[test]
    fn test_try_add() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(500, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1500);

        let eur = Money::new(1000, Currency::EUR);
        assert!(a.try_add(&eur).is_none());
    }

    #[test]
    fn test_try_multiply_overflow() {
        let m = Money::new(1000, Currency::USD);
        assert_eq!(m.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).try_multiply(2).is_none());
    }

    #[test]
    fn test_try_sum() {
        let items = [Money::new(100, Currency::USD), Money::new(250, Currency::USD)];
        let total = Money::try_sum(items.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount_cents, 350);

        let mixed = [Money::new(100, Currency::USD), Money::new(250, Currency::EUR)];
        assert!(Money::try_sum(mixed.iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
