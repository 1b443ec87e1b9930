//! Recipient parser
//!
//! Turns tabular text (`address,amount,name` with a header row) or manually
//! entered rows into validated [`Recipient`] values. Both ingestion paths go
//! through [`Recipient::from_row`], so they share one set of rules.

use super::types::{Recipient, RecipientRow};
use crate::config::ImportMode;
use crate::core::tokens::TokenSpec;
use crate::utils::error::{PaymentError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of a tabular import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedRecipients {
    /// Valid recipients in input order
    pub recipients: Vec<Recipient>,
    /// 1-based data-row indices skipped for a missing address or amount
    pub skipped_rows: Vec<usize>,
}

/// Parser bound to the batch token and an import mode
#[derive(Debug, Clone)]
pub struct RecipientParser<'a> {
    token: &'a TokenSpec,
    mode: ImportMode,
}

impl<'a> RecipientParser<'a> {
    pub fn new(token: &'a TokenSpec, mode: ImportMode) -> Self {
        Self { token, mode }
    }

    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    /// Parse tabular text. The first line is always the header.
    pub fn parse_table(&self, text: &str) -> Result<ParsedRecipients> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut parsed = ParsedRecipients::default();
        let mut data_rows = 0usize;

        for record in reader.records() {
            let record = record?;
            // A whitespace-only line trims to a single empty field
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            data_rows += 1;
            let row = data_rows;

            let address = record.get(0).unwrap_or_default();
            let amount = record.get(1).unwrap_or_default();

            if address.is_empty() || amount.is_empty() {
                let missing = if address.is_empty() { "address" } else { "amount" };
                match self.mode {
                    ImportMode::Lenient => {
                        warn!(row, missing, "Skipping incomplete recipient row");
                        parsed.skipped_rows.push(row);
                        continue;
                    }
                    ImportMode::Strict => {
                        return Err(PaymentError::MalformedRow {
                            row,
                            reason: format!("missing {}", missing),
                        });
                    }
                }
            }

            if self.mode == ImportMode::Strict && record.len() > 3 {
                return Err(PaymentError::MalformedRow {
                    row,
                    reason: format!("expected at most 3 columns, found {}", record.len()),
                });
            }

            let entry = RecipientRow {
                address: address.to_string(),
                amount: amount.to_string(),
                name: record.get(2).map(str::to_string),
            };
            let recipient =
                Recipient::from_row(&entry, self.token).map_err(|e| PaymentError::MalformedRow {
                    row,
                    reason: e.to_string(),
                })?;
            parsed.recipients.push(recipient);
        }

        if data_rows == 0 {
            return Err(PaymentError::EmptyInput);
        }

        debug!(
            parsed = parsed.recipients.len(),
            skipped = parsed.skipped_rows.len(),
            "Parsed recipient table"
        );
        Ok(parsed)
    }

    /// Validate a single manually entered row
    pub fn parse_entry(&self, row: &RecipientRow) -> Result<Recipient> {
        Recipient::from_row(row, self.token)
    }

    /// Validate a programmatic list of manual rows; every row must be valid
    pub fn parse_rows(&self, rows: &[RecipientRow]) -> Result<Vec<Recipient>> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                self.parse_entry(row).map_err(|e| PaymentError::MalformedRow {
                    row: i + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
