//! Money type for representing catalog prices.
//!
//! Amounts are non-negative integers in the currency's smallest display
//! unit: whole rupiah for IDR, cents for two-decimal currencies.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Longest currency code kept for [`Currency::Other`].
pub const MAX_CODE_LEN: usize = 8;

/// Currencies. Codes without formatting rules land in [`Currency::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    IDR,
    USD,
    EUR,
    GBP,
    JPY,
    SGD,
    AUD,
    /// Any other code, formatted with two decimals and the code as symbol.
    Other(CurrencyCode),
}

/// An uppercase ASCII alphanumeric currency code stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CurrencyCode {
    bytes: [u8; MAX_CODE_LEN],
    len: u8,
}

impl CurrencyCode {
    /// Normalize `code` to uppercase. `None` when empty, too long or not
    /// ASCII alphanumeric.
    pub fn new(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty()
            || code.len() > MAX_CODE_LEN
            || !code.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return None;
        }

        let mut bytes = [0u8; MAX_CODE_LEN];
        for (slot, b) in bytes.iter_mut().zip(code.bytes()) {
            *slot = b.to_ascii_uppercase();
        }
        Some(Self {
            bytes,
            len: code.len() as u8,
        })
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever stored.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl Currency {
    /// Get the currency code (e.g., "IDR").
    pub fn code(&self) -> &str {
        match self {
            Currency::IDR => "IDR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::SGD => "SGD",
            Currency::AUD => "AUD",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Get the currency symbol (e.g., "Rp").
    pub fn symbol(&self) -> &str {
        match self {
            Currency::IDR => "Rp",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::SGD => "S$",
            Currency::AUD => "A$",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::IDR | Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Thousands and decimal separators used when formatting.
    fn separators(&self) -> (char, char) {
        match self {
            Currency::IDR | Currency::EUR => ('.', ','),
            _ => (',', '.'),
        }
    }

    /// Parse a currency code string. Unknown but well-formed codes become
    /// [`Currency::Other`].
    pub fn from_code(code: &str) -> Option<Self> {
        let code = CurrencyCode::new(code)?;
        let known = match code.as_str() {
            "IDR" => Currency::IDR,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "JPY" => Currency::JPY,
            "SGD" => Currency::SGD,
            "AUD" => Currency::AUD,
            _ => Currency::Other(code),
        };
        Some(known)
    }

    /// Whether formatting rules exist for this currency.
    pub fn is_known(&self) -> bool {
        !matches!(self, Currency::Other(_))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid currency code `{code}`")))
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest display unit of the currency.
    pub amount: u64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: u64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_u64.pow(self.currency.decimal_places());
        self.amount as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "Rp 14.999.000" or "$49.99").
    pub fn display(&self) -> String {
        let separator = if self.currency.symbol().chars().count() > 1 { " " } else { "" };
        format!("{}{}{}", self.currency.symbol(), separator, self.display_amount())
    }

    /// Format the amount with grouping but without the symbol.
    pub fn display_amount(&self) -> String {
        let (thousands, decimal) = self.currency.separators();
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let whole = group_digits(self.amount / divisor, thousands);

        if places == 0 {
            whole
        } else {
            let fraction = self.amount % divisor;
            format!("{}{}{:0width$}", whole, decimal, fraction, width = places as usize)
        }
    }

    /// Percentage saved relative to a higher reference price.
    ///
    /// Returns `None` unless `reference` is strictly greater than `self`.
    pub fn discount_percentage(&self, reference: &Money) -> Option<f64> {
        if reference.currency != self.currency || reference.amount <= self.amount {
            return None;
        }
        let savings = reference.amount - self.amount;
        Some(savings as f64 / reference.amount as f64 * 100.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
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
