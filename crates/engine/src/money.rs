use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde_json::Value;

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer minor units** (hundredths).
///
/// Use this type for all monetary values (transaction amounts, budgets,
/// totals) to avoid floating-point drift while summing. Stored amounts are
/// non-negative; the sign only appears in derived values such as a balance.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(1_234_567_00);
/// assert_eq!(amount.format(Currency::Idr), "Rp 1.234.567");
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest amount a single transaction or budget may carry.
    pub const MAX_AMOUNT: Money = Money::from_major(1_000_000_000_000);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates a new amount from whole major units.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(100))
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Value in major units, for ratios and chart scales.
    #[must_use]
    pub fn as_major_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parses a user-entered amount, which must not be negative.
    pub fn parse_amount(input: &str) -> Result<Money, EngineError> {
        let money: Money = input.parse()?;
        if money.is_negative() {
            return Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }
        Ok(money)
    }

    /// Coerces a stored `numeric` value into an amount.
    ///
    /// Numbers and numeric strings are accepted; anything else (null,
    /// non-numeric text, booleans, objects) counts as zero.
    #[must_use]
    pub fn from_stored(value: &Value) -> Money {
        match value {
            Value::Number(number) => number
                .as_i64()
                .map(Money::from_major)
                .or_else(|| number.as_f64().and_then(Money::from_major_f64))
                .unwrap_or(Money::ZERO),
            Value::String(text) => text
                .parse::<Money>()
                .ok()
                .or_else(|| {
                    text.trim()
                        .parse::<f64>()
                        .ok()
                        .and_then(Money::from_major_f64)
                })
                .unwrap_or(Money::ZERO),
            _ => Money::ZERO,
        }
    }

    /// Representation sent to a `numeric` column.
    #[must_use]
    pub fn to_stored(self) -> Value {
        if self.0 % 100 == 0 {
            return Value::from(self.0 / 100);
        }
        serde_json::Number::from_f64(self.as_major_f64())
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(self.to_plain_string()))
    }

    /// Plain decimal without grouping: `1000`, `12.50`, `-3.05`.
    #[must_use]
    pub fn to_plain_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let minor = abs % 100;
        if minor == 0 {
            format!("{sign}{major}")
        } else {
            format!("{sign}{major}.{minor:02}")
        }
    }

    /// Locale currency format with zero fraction digits.
    ///
    /// Minor units are rounded half away from zero.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let abs = self.0.unsigned_abs();
        let major = abs / 100 + u64::from(abs % 100 >= 50);
        let grouped = group_digits(major, currency.group_separator());
        let body = currency.decorate(&grouped);
        if self.0 < 0 && major > 0 {
            format!("-{body}")
        } else {
            body
        }
    }

    fn from_major_f64(major: f64) -> Option<Money> {
        // `as` saturates on out-of-range floats.
        major
            .is_finite()
            .then(|| Money((major * 100.0).round() as i64))
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::InvalidAmount(
                            "too many decimals".to_string(),
                        ));
                    }
                }
            }
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn format_uses_locale_grouping_without_decimals() {
        assert_eq!(Money::ZERO.format(Currency::Idr), "Rp 0");
        assert_eq!(Money::from_major(1_000).format(Currency::Idr), "Rp 1.000");
        assert_eq!(
            Money::from_major(1_234_567).format(Currency::Idr),
            "Rp 1.234.567"
        );
        assert_eq!(Money::new(-150_000).format(Currency::Idr), "-Rp 1.500");
        assert_eq!(Money::new(123_450).format(Currency::Usd), "$1,235");
        assert_eq!(Money::new(99_900).format(Currency::Eur), "999 €");
    }

    #[test]
    fn format_rounds_half_away_from_zero() {
        assert_eq!(Money::new(149).format(Currency::Idr), "Rp 1");
        assert_eq!(Money::new(150).format(Currency::Idr), "Rp 2");
        assert_eq!(Money::new(-49).format(Currency::Idr), "Rp 0");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn parse_amount_rejects_negative_input() {
        assert_eq!(
            Money::parse_amount("-5"),
            Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string()
            ))
        );
        assert_eq!(Money::parse_amount("0").unwrap(), Money::ZERO);
    }

    #[test]
    fn stored_values_coerce_to_numbers() {
        assert_eq!(Money::from_stored(&json!(1000)), Money::from_major(1000));
        assert_eq!(Money::from_stored(&json!(12.5)), Money::new(1250));
        assert_eq!(Money::from_stored(&json!("125000.00")), Money::from_major(125_000));
        assert_eq!(Money::from_stored(&json!("1e3")), Money::from_major(1000));
        assert_eq!(Money::from_stored(&json!("abc")), Money::ZERO);
        assert_eq!(Money::from_stored(&json!(null)), Money::ZERO);
        assert_eq!(Money::from_stored(&json!(true)), Money::ZERO);
    }

    #[test]
    fn arithmetic_saturates_instead_of_overflowing() {
        let huge = Money::new(i64::MAX - 1);
        assert_eq!(huge + huge, Money::new(i64::MAX));
        assert_eq!(-huge - huge, Money::new(i64::MIN));
        assert_eq!(-Money::new(i64::MIN), Money::new(i64::MAX));
        let total: Money = [huge, huge, huge].into_iter().sum();
        assert_eq!(total, Money::new(i64::MAX));
    }

    #[test]
    fn stored_representation_keeps_integers_integral() {
        assert_eq!(Money::from_major(300).to_stored(), json!(300));
        assert_eq!(Money::new(1250).to_stored(), json!(12.5));
        assert_eq!(Money::new(1205).to_plain_string(), "12.05");
        assert_eq!(Money::new(-300).to_plain_string(), "-3");
    }
}
