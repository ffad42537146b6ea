//! Peso amounts and their presentation.
//!
//! Amounts are carried as [`Decimal`] at full precision through every
//! calculation. Rounding to cents happens only here, when an amount is turned
//! into text for display or sharing.
//!
//! Formatting is fixed to Mexican pesos and does not consult any process
//! locale, so the same amount always renders the same way:
//!
//! ```
//! use cotizapro_core::Price;
//! use rust_decimal::Decimal;
//!
//! let price = Price::mxn(Decimal::new(29_000, 2));
//! assert_eq!(price.to_string(), "$290.00 MXN");
//! assert_eq!(price.display_amount(), "$290.00");
//! ```

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (pesos, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Mexican pesos.
    #[must_use]
    pub const fn mxn(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::MXN)
    }

    /// Amount rounded to cents, e.g. `$1234.50`.
    #[must_use]
    pub fn display_amount(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), round_cents(self.amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_amount(), self.currency_code.code())
    }
}

/// ISO 4217 currency codes.
///
/// Quotes are single-currency; pesos are the only supported code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    MXN,
}

impl CurrencyCode {
    /// Symbol printed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::MXN => "$",
        }
    }

    /// Three-letter code printed after the amount.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MXN => "MXN",
        }
    }
}

/// Round an amount to two decimal places, halves away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
