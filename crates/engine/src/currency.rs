use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Display currency for monetary values.
///
/// Pennywise is mono-currency: amounts are never converted, the currency
/// only decides how [`Money`](crate::Money) is rendered. Every currency is
/// displayed with zero fraction digits, following the locale it is
/// associated with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indonesian rupiah, `id-ID` format: `Rp 1.234.567`.
    #[default]
    Idr,
    /// Euro, `it-IT` format: `1.234 €`.
    Eur,
    /// US dollar, `en-US` format: `$1,234`.
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Idr => "Rp",
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }

    /// Digit group separator of the currency's locale.
    #[must_use]
    pub const fn group_separator(self) -> char {
        match self {
            Currency::Idr | Currency::Eur => '.',
            Currency::Usd => ',',
        }
    }

    /// Wraps an already grouped number with the symbol.
    pub(crate) fn decorate(self, grouped: &str) -> String {
        match self {
            Currency::Idr => format!("Rp {grouped}"),
            Currency::Eur => format!("{grouped} €"),
            Currency::Usd => format!("${grouped}"),
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IDR" => Ok(Currency::Idr),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::InvalidAmount(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
