//! Currency codes and prices.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyCodeError {
    /// The input string is empty.
    #[error("currency code cannot be empty")]
    Empty,
    /// The input is not exactly three characters long.
    #[error("currency code must be exactly 3 letters, got {len}")]
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },
    /// The input contains something other than uppercase ASCII letters.
    #[error("currency code must contain only uppercase letters A-Z")]
    InvalidCharacter,
}

/// An ISO 4217 currency code such as `USD` or `EUR`.
///
/// Shopify reports currency codes as strings; any three-letter uppercase
/// code is accepted so new currencies need no code change.
///
/// ## Examples
///
/// ```
/// use vitrina_core::CurrencyCode;
///
/// assert!(CurrencyCode::parse("EUR").is_ok());
/// assert!(CurrencyCode::parse("eur").is_err());
/// assert!(CurrencyCode::parse("EURO").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// US dollar, the fallback currency for carts without a tax amount.
    pub const USD: Self = Self(*b"USD");

    /// Parse a `CurrencyCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not three characters long,
    /// or contains anything but uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CurrencyCodeError> {
        if s.is_empty() {
            return Err(CurrencyCodeError::Empty);
        }

        let bytes: [u8; 3] = s
            .as_bytes()
            .try_into()
            .map_err(|_| CurrencyCodeError::InvalidLength { len: s.len() })?;

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(CurrencyCodeError::InvalidCharacter);
        }

        Ok(Self(bytes))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase bytes are ever stored.
        core::str::from_utf8(&self.0).unwrap_or("XXX")
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::USD
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_owned()
    }
}

/// A monetary amount with its currency.
///
/// Amounts serialize as decimal strings (`"19.99"`), matching the Storefront
/// API `MoneyV2` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
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

    /// A zero amount rendered with one decimal place (`"0.0"`).
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::from_parts(0, 0, 0, false, 1), currency_code)
    }
}
