//! Recipient import and aggregation tests

#[cfg(test)]
mod tests {
    use crate::common::{ALICE, BOB, CAROL, TableFactory};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use treasury_batch::config::{DuplicatePolicy, ImportMode, default_tokens};
    use treasury_batch::core::{RecipientParser, TokenRegistry};
    use treasury_batch::{BatchSummary, PaymentError, RecipientRow};

    fn registry() -> TokenRegistry {
        TokenRegistry::from_config(&default_tokens()).unwrap()
    }

    // ==================== Parsing ====================

    #[test]
    fn test_n_rows_give_n_recipients_in_order() {
        let registry = registry();
        let usdc = registry.resolve("USDC").unwrap();
        let table = TableFactory::uniform(25, "1.5");

        let parsed = RecipientParser::new(usdc, ImportMode::Strict)
            .parse_table(&table)
            .unwrap();

        assert_eq!(parsed.recipients.len(), 25);
        assert!(parsed.skipped_rows.is_empty());
        for (i, recipient) in parsed.recipients.iter().enumerate() {
            assert_eq!(recipient.address().as_str(), format!("0x{:040x}", i + 1));
            assert_eq!(recipient.name(), Some(format!("Payee {}", i).as_str()));
        }
    }

    #[test]
    fn test_fields_are_trimmed_and_names_optional() {
        let registry = registry();
        let usdc = registry.resolve("usdc").unwrap();
        let table = TableFactory::new()
            .raw(&format!("  {} ,  12.25 ,  Alice  ", ALICE))
            .raw(&format!("{},3", BOB))
            .build();

        let parsed = RecipientParser::new(usdc, ImportMode::Lenient)
            .parse_table(&table)
            .unwrap();

        assert_eq!(parsed.recipients[0].address().as_str(), ALICE);
        assert_eq!(parsed.recipients[0].amount(), Decimal::new(1225, 2));
        assert_eq!(parsed.recipients[0].name(), Some("Alice"));
        assert_eq!(parsed.recipients[1].name(), None);
    }

    #[test]
    fn test_invalid_values_fail_in_both_modes() {
        let registry = registry();
        let usdc = registry.resolve("USDC").unwrap();

        for mode in [ImportMode::Lenient, ImportMode::Strict] {
            let parser = RecipientParser::new(usdc, mode);

            let bad_amount = TableFactory::new().row(ALICE, "-5", "Alice").build();
            assert!(matches!(
                parser.parse_table(&bad_amount),
                Err(PaymentError::MalformedRow { row: 1, .. })
            ));

            let bad_address = TableFactory::new()
                .row(ALICE, "5", "Alice")
                .row("0x1234", "5", "Short")
                .build();
            assert!(matches!(
                parser.parse_table(&bad_address),
                Err(PaymentError::MalformedRow { row: 2, .. })
            ));

            let zero = TableFactory::new().row(ALICE, "0", "Alice").build();
            assert!(parser.parse_table(&zero).is_err());
        }
    }

    #[test]
    fn test_token_precision_is_enforced() {
        let registry = registry();
        let usdc = registry.resolve("USDC").unwrap();
        let dai = registry.resolve("DAI").unwrap();
        let table = TableFactory::new()
            .row(ALICE, "0.000000000000000001", "Dust")
            .build();

        assert!(
            RecipientParser::new(usdc, ImportMode::Lenient)
                .parse_table(&table)
                .is_err()
        );
        let parsed = RecipientParser::new(dai, ImportMode::Lenient)
            .parse_table(&table)
            .unwrap();
        assert_eq!(
            parsed.recipients[0].amount(),
            Decimal::from_str("0.000000000000000001").unwrap()
        );
    }

    #[test]
    fn test_manual_rows_share_validation() {
        let registry = registry();
        let usdc = registry.resolve("USDC").unwrap();
        let parser = RecipientParser::new(usdc, ImportMode::Lenient);

        let recipient = parser
            .parse_entry(&RecipientRow::new(CAROL, "7").with_name("Carol"))
            .unwrap();
        assert_eq!(recipient.token().as_str(), "USDC");

        assert!(matches!(
            parser.parse_entry(&RecipientRow::new(CAROL, "abc")),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    // ==================== Aggregation ====================

    #[test]
    fn test_total_is_exact_and_order_independent() {
        let registry = registry();
        let usdc = registry.resolve("USDC").unwrap();
        let amounts = ["0.1", "0.2", "0.3", "1000000.000001", "42"];
        let table = amounts
            .iter()
            .enumerate()
            .fold(TableFactory::new(), |t, (i, amount)| {
                t.row(&format!("0x{:040x}", i + 1), amount, "")
            })
            .build();

        let parser = RecipientParser::new(usdc, ImportMode::Strict);
        let recipients = parser.parse_table(&table).unwrap().recipients;
        let expected = Decimal::from_str("1000042.600001").unwrap();

        let forward = BatchSummary::aggregate(usdc.symbol.clone(), recipients.clone()).unwrap();
        let mut reversed_input = recipients.clone();
        reversed_input.reverse();
        let reversed = BatchSummary::aggregate(usdc.symbol.clone(), reversed_input).unwrap();
        let again = BatchSummary::aggregate(usdc.symbol.clone(), recipients).unwrap();

        assert_eq!(forward.total_amount(), expected);
        assert_eq!(reversed.total_amount(), expected);
        assert_eq!(again, forward);
    }

    #[test]
    fn test_duplicates_allowed_by_default_and_rejectable() {
        let registry = registry();
        let usdc = registry.resolve("USDC").unwrap();
        let table = TableFactory::new()
            .row(ALICE, "1", "Alice")
            .row(&ALICE.to_uppercase().replacen("0X", "0x", 1), "2", "Alice again")
            .build();
        let recipients = RecipientParser::new(usdc, ImportMode::Strict)
            .parse_table(&table)
            .unwrap()
            .recipients;

        let allowed = BatchSummary::aggregate_with_policy(
            usdc.symbol.clone(),
            recipients.clone(),
            DuplicatePolicy::Allow,
        )
        .unwrap();
        assert_eq!(allowed.recipient_count(), 2);
        assert_eq!(allowed.total_amount(), Decimal::from(3));
        assert_eq!(allowed.duplicate_addresses().len(), 1);

        assert!(matches!(
            BatchSummary::aggregate_with_policy(
                usdc.symbol.clone(),
                recipients,
                DuplicatePolicy::Reject
            ),
            Err(PaymentError::DuplicateRecipient(_))
        ));
    }
}
