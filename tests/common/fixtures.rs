//! Test fixtures and data factories
//!
//! All factories create real objects, not mocks.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use treasury_batch::{Address, Config, TokenSymbol, TreasuryAccount};

pub const ALICE: &str = "0x742d35Cc6634C0532925a3b8D4C9db1234567890";
pub const BOB: &str = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
pub const CAROL: &str = "0x1111111111111111111111111111111111111111";

/// Builds recipient tables in the `address,amount,name` import format
pub struct TableFactory {
    rows: Vec<String>,
}

impl TableFactory {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// The two-row table used by the acceptance scenarios (total 300)
    pub fn alice_and_bob() -> String {
        Self::new()
            .row(ALICE, "100", "Alice")
            .row(BOB, "200", "Bob")
            .build()
    }

    /// `count` distinct recipients paid `amount` each
    pub fn uniform(count: usize, amount: &str) -> String {
        (0..count)
            .fold(Self::new(), |table, i| {
                table.row(&format!("0x{:040x}", i + 1), amount, &format!("Payee {}", i))
            })
            .build()
    }

    pub fn row(mut self, address: &str, amount: &str, name: &str) -> Self {
        self.rows.push(format!("{},{},{}", address, amount, name));
        self
    }

    /// Append a raw line verbatim
    pub fn raw(mut self, line: &str) -> Self {
        self.rows.push(line.to_string());
        self
    }

    pub fn build(self) -> String {
        let mut text = String::from("recipient_address,amount,recipient_name\n");
        for row in self.rows {
            text.push_str(&row);
            text.push('\n');
        }
        text
    }
}

impl Default for TableFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Treasury with 3 signers holding `usdc` USDC
pub fn treasury(usdc: i64, threshold: u32) -> TreasuryAccount {
    let mut balances = BTreeMap::new();
    balances.insert(TokenSymbol::new("USDC"), Decimal::from(usdc));
    TreasuryAccount::new(
        Address::parse("0x1234567890123456789012345678901234567890").unwrap(),
        balances,
        3,
        threshold,
        "Ethereum",
    )
    .unwrap()
}

/// Default configuration with a short stage timeout
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.batch.pipeline.stage_timeout_secs = 5;
    config.batch.simulation.stage_delay_ms = 0;
    config
}
