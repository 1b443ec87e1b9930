//! Recipient ingestion
//!
//! Parsing and validation of payment recipients from tabular text or manual entry.

mod parser;
mod types;


pub use parser::{ParsedRecipients, RecipientParser};
pub use types::{Address, Recipient, RecipientRow, parse_amount};
