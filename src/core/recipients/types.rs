//! Recipient types and their validation

use crate::core::tokens::{TokenSpec, TokenSymbol};
use crate::utils::error::{PaymentError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is valid"));

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("amount pattern is valid"));

/// Chain address: `0x` followed by 40 hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if ADDRESS_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(PaymentError::InvalidAddress(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form, used for duplicate detection
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// `0x1234...5678` form for logs and summaries
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw, unvalidated recipient fields as typed by a user or read from a row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRow {
    pub address: String,
    pub amount: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl RecipientRow {
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A validated payment recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    address: Address,
    amount: Decimal,
    token: TokenSymbol,
    name: Option<String>,
}

impl Recipient {
    /// Validate raw fields against the batch token
    pub fn from_row(row: &RecipientRow, token: &TokenSpec) -> Result<Self> {
        let address = Address::parse(&row.address)?;
        let amount = parse_amount(&row.amount, token)?;
        let name = row
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            address,
            amount,
            token: token.symbol.clone(),
            name,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn token(&self) -> &TokenSymbol {
        &self.token
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Parse a strictly positive decimal amount within the token's precision
pub fn parse_amount(raw: &str, token: &TokenSpec) -> Result<Decimal> {
    let raw = raw.trim();
    if !AMOUNT_RE.is_match(raw) {
        return Err(PaymentError::InvalidAmount(format!(
            "'{}' is not a decimal number",
            raw
        )));
    }

    let amount = Decimal::from_str(raw)
        .map_err(|e| PaymentError::InvalidAmount(format!("'{}': {}", raw, e)))?;

    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount(format!(
            "'{}' must be greater than zero",
            raw
        )));
    }

    let amount = amount.normalize();
    if amount.scale() > token.decimals {
        return Err(PaymentError::InvalidAmount(format!(
            "'{}' has more than {} decimal places for {}",
            raw, token.decimals, token.symbol
        )));
    }

    Ok(amount)
}
