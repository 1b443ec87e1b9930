//! Batch aggregation
//!
//! [`BatchSummary::aggregate`] is the pure aggregation step: it takes an ordered
//! list of recipients and produces a summary whose totals are always derived
//! from the recipients themselves. Amounts are `Decimal`, so summation is exact
//! and independent of order.

use crate::config::DuplicatePolicy;
use crate::core::recipients::{Address, Recipient};
use crate::core::tokens::TokenSymbol;
use crate::utils::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered recipients of one batch, all paid in the same token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    token: TokenSymbol,
    recipients: Vec<Recipient>,
}

impl BatchSummary {
    /// Aggregate recipients into a summary.
    ///
    /// Fails if a recipient is denominated in another token or if the total
    /// would overflow.
    pub fn aggregate(token: TokenSymbol, recipients: Vec<Recipient>) -> Result<Self> {
        let mut total = Decimal::ZERO;
        for recipient in &recipients {
            if recipient.token() != &token {
                return Err(PaymentError::TokenMismatch {
                    expected: token.to_string(),
                    found: recipient.token().to_string(),
                });
            }
            total = total
                .checked_add(recipient.amount())
                .ok_or(PaymentError::AmountOverflow)?;
        }

        Ok(Self { token, recipients })
    }

    /// Aggregate and then apply the duplicate-address policy
    pub fn aggregate_with_policy(
        token: TokenSymbol,
        recipients: Vec<Recipient>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let summary = Self::aggregate(token, recipients)?;
        if policy == DuplicatePolicy::Reject {
            if let Some(duplicate) = summary.duplicate_addresses().into_iter().next() {
                return Err(PaymentError::DuplicateRecipient(duplicate.to_string()));
            }
        }
        Ok(summary)
    }

    pub fn token(&self) -> &TokenSymbol {
        &self.token
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// Exact sum of all recipient amounts, recomputed on every call
    pub fn total_amount(&self) -> Decimal {
        self.recipients.iter().map(Recipient::amount).sum()
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Addresses that appear more than once, in order of first repetition
    pub fn duplicate_addresses(&self) -> Vec<Address> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for recipient in &self.recipients {
            let count = seen.entry(recipient.address().canonical()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(recipient.address().clone());
            }
        }
        duplicates
    }

    pub(crate) fn into_recipients(self) -> Vec<Recipient> {
        self.recipients
    }
}
