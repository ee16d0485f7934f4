//! Per-counterparty totals derived from a built ledger.

use std::collections::HashMap;

use tracing::warn;

use crate::models::{CounterpartySummary, Direction, LedgerEntry};
use crate::utils::helper::{address_key, same_address};

/// Group the ledger by the address on the other side of each entry.
///
/// Counterparties are keyed case-insensitively but keep the spelling they were
/// first seen with. They are sorted by transaction count, busiest first;
/// equal counts keep first-seen order.
pub fn aggregate(ledger: &[LedgerEntry], subject: &str) -> Vec<CounterpartySummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<CounterpartySummary> = Vec::new();

    for entry in ledger {
        let tx = &entry.transaction;
        let counterparty = if same_address(&tx.from, subject) { &tx.to } else { &tx.from };
        let slot = *index.entry(address_key(counterparty)).or_insert_with(|| {
            summaries.push(CounterpartySummary::new(counterparty.trim()));
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];
        summary.total_transactions += 1;

        let flow = summary.assets.entry(entry.asset_symbol().to_string()).or_default();
        let total = match entry.direction {
            Direction::Out => &mut flow.sent,
            Direction::In => &mut flow.received,
        };
        match total.checked_add(tx.amount) {
            Some(next) => *total = next,
            None => warn!(
                "{} total with {} overflows, leaving out {:?}",
                tx.asset_symbol, summary.address, tx.hash
            ),
        }
    }

    for summary in &mut summaries {
        summary.assets.retain(|_, flow| !flow.is_zero());
    }
    summaries.sort_by(|a, b| b.total_transactions.cmp(&a.total_transactions));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::builder;
    use crate::models::{AssetCategory, Network, NormalizedTransaction};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SUBJECT: &str = "0xaa";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(ts: i64, from: &str, to: &str, symbol: &str, amount: &str) -> NormalizedTransaction {
        NormalizedTransaction {
            hash: Some(format!("h{}", ts)),
            block_height: None,
            timestamp: ts,
            from: from.into(),
            to: to.into(),
            raw_amount: "0".into(),
            amount: dec(amount),
            decimals: 6,
            asset_symbol: symbol.into(),
            category: AssetCategory::Token,
            network: Network::Tron,
            gas_price: None,
            gas_used: None,
        }
    }

    fn ledger() -> Vec<LedgerEntry> {
        builder::build(
            vec![
                tx(1, "TBob", "0xaa", "USDT", "5"),
                tx(2, "0xaa", "tbob", "USDT", "2"),
                tx(3, "TCarol", "0xaa", "TRX", "1"),
                tx(4, "0xAA", "TBOB", "TRX", "0.5"),
                tx(5, "TDave", "0xaa", "USDT", "0"),
            ],
            SUBJECT,
        )
    }

    #[test]
    fn groups_case_insensitively_and_sorts_by_count() {
        let summary = aggregate(&ledger(), SUBJECT);
        let order: Vec<(&str, usize)> = summary
            .iter()
            .map(|s| (s.address.as_str(), s.total_transactions))
            .collect();
        assert_eq!(order, vec![("TBob", 3), ("TCarol", 1), ("TDave", 1)]);
    }

    #[test]
    fn accumulates_sent_and_received_per_asset() {
        let summary = aggregate(&ledger(), SUBJECT);
        let bob = &summary[0];
        assert_eq!(bob.flow("USDT").received, dec("5"));
        assert_eq!(bob.flow("USDT").sent, dec("2"));
        assert_eq!(bob.net("USDT"), dec("3"));
        assert_eq!(bob.flow("TRX").sent, dec("0.5"));
        assert_eq!(bob.net("TRX"), dec("-0.5"));
    }

    #[test]
    fn zero_flows_are_omitted_but_counted() {
        let summary = aggregate(&ledger(), SUBJECT);
        let dave = summary.iter().find(|s| s.address == "TDave").unwrap();
        assert_eq!(dave.total_transactions, 1);
        assert!(dave.assets.is_empty());
    }

    #[test]
    fn totals_match_ledger_sums() {
        let ledger = ledger();
        for summary in aggregate(&ledger, SUBJECT) {
            for (symbol, flow) in &summary.assets {
                let sum = |dir: Direction| -> Decimal {
                    ledger
                        .iter()
                        .filter(|e| e.direction == dir && e.asset_symbol() == symbol)
                        .filter(|e| address_key(e.counterparty()) == address_key(&summary.address))
                        .map(|e| e.transaction.amount)
                        .sum()
                };
                assert_eq!(flow.sent, sum(Direction::Out));
                assert_eq!(flow.received, sum(Direction::In));
            }
        }
    }

    #[test]
    fn empty_ledger_has_no_counterparties() {
        assert!(aggregate(&[], SUBJECT).is_empty());
    }

    #[test]
    fn keeps_first_seen_spelling_of_base58_addresses() {
        let exchange = "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE";
        let ledger = builder::build(
            vec![
                tx(1, exchange, "0xaa", "USDT", "10"),
                tx(2, "0xaa", &exchange.to_lowercase(), "USDT", "4"),
            ],
            SUBJECT,
        );
        let summary = aggregate(&ledger, SUBJECT);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].address, exchange);
        assert_eq!(summary[0].total_transactions, 2);
    }

    #[test]
    fn overflowing_totals_do_not_panic() {
        let big = "50000000000000000000000000000";
        let ledger = builder::build(
            vec![
                tx(1, "TBob", "0xaa", "BIG", big),
                tx(2, "0xaa", "TBob", "BIG", big),
                tx(3, "TBob", "0xaa", "BIG", big),
            ],
            SUBJECT,
        );
        assert_eq!(ledger.len(), 3);
        let summary = aggregate(&ledger, SUBJECT);
        assert_eq!(summary[0].total_transactions, 3);
        assert_eq!(summary[0].flow("BIG").received, dec(big));
        assert_eq!(summary[0].flow("BIG").sent, dec(big));
    }
}
