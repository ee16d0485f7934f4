//! Chronological ledger with per-asset running balances.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::models::{Direction, LedgerEntry, NormalizedTransaction};
use crate::utils::helper::{format_timestamp, same_address};

/// Order records by time and annotate each with its asset's balance after it.
///
/// Records must involve `subject` as sender or receiver; anything else is
/// treated as incoming. Equal timestamps keep their input order.
pub fn build(records: Vec<NormalizedTransaction>, subject: &str) -> Vec<LedgerEntry> {
    build_counted(records, subject).0
}

/// [`build`], also returning how many records were left out because applying
/// them would overflow their asset's balance
pub fn build_counted(records: Vec<NormalizedTransaction>, subject: &str) -> (Vec<LedgerEntry>, usize) {
    let mut sorted = records;
    sorted.sort_by_key(|tx| tx.timestamp);

    let (entries, balances, overflowed) = sorted.into_iter().fold(
        (Vec::new(), HashMap::<String, Decimal>::new(), 0usize),
        |(mut entries, mut balances, mut overflowed), tx| {
            if !same_address(&tx.from, subject) && !same_address(&tx.to, subject) {
                debug!("Record {:?} does not involve {}", tx.hash, subject);
            }

            let direction = Direction::relative_to(&tx.from, subject);
            let balance = balances.entry(tx.asset_symbol.clone()).or_insert(Decimal::ZERO);
            match balance.checked_add(direction.apply(tx.amount)) {
                Some(next) => {
                    *balance = next;
                    entries.push(LedgerEntry {
                        human_time: format_timestamp(tx.timestamp),
                        running_balance: next,
                        direction,
                        transaction: tx,
                    });
                }
                None => {
                    let err = LedgerError::invalid_amount(
                        tx.raw_amount.as_str(),
                        format!("{} balance overflow at {:?}", tx.asset_symbol, tx.hash),
                    );
                    warn!("Skipping record: {}", err);
                    overflowed += 1;
                }
            }
            (entries, balances, overflowed)
        },
    );

    debug!("Built ledger of {} entries across {} assets", entries.len(), balances.len());
    (entries, overflowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetCategory, Network};
    use std::str::FromStr;

    const SUBJECT: &str = "0xAA";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(hash: &str, ts: i64, from: &str, to: &str, symbol: &str, amount: &str) -> NormalizedTransaction {
        NormalizedTransaction {
            hash: Some(hash.into()),
            block_height: None,
            timestamp: ts,
            from: from.into(),
            to: to.into(),
            raw_amount: "0".into(),
            amount: dec(amount),
            decimals: 6,
            asset_symbol: symbol.into(),
            category: if symbol == "ETH" { AssetCategory::Native } else { AssetCategory::Token },
            network: Network::Ethereum,
            gas_price: None,
            gas_used: None,
        }
    }

    #[test]
    fn single_outgoing_native_transfer() {
        let ledger = build(vec![tx("a", 1000, "0xaa", "0xbb", "ETH", "1")], SUBJECT);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].direction, Direction::Out);
        assert_eq!(ledger[0].transaction.amount, dec("1"));
        assert_eq!(ledger[0].running_balance, dec("-1"));
        assert_eq!(ledger[0].human_time, "1970-01-01 00:16:40 UTC");
    }

    #[test]
    fn balances_are_tracked_per_asset() {
        let ledger = build(
            vec![
                tx("1", 10, "0xcc", "0xaa", "USDT", "5"),
                tx("2", 20, "0xcc", "0xaa", "ETH", "2"),
                tx("3", 30, "0xcc", "0xaa", "USDT", "5"),
                tx("4", 40, "0xAA", "0xdd", "USDT", "3"),
            ],
            SUBJECT,
        );
        let balances: Vec<Decimal> = ledger.iter().map(|e| e.running_balance).collect();
        assert_eq!(balances, vec![dec("5"), dec("2"), dec("10"), dec("7")]);
    }

    #[test]
    fn sorts_by_time_keeping_ties_in_input_order() {
        let ledger = build(
            vec![
                tx("late", 300, "0xcc", "0xaa", "ETH", "1"),
                tx("tie-a", 100, "0xcc", "0xaa", "ETH", "1"),
                tx("early", 50, "0xcc", "0xaa", "ETH", "1"),
                tx("tie-b", 100, "0xaa", "0xcc", "ETH", "1"),
            ],
            SUBJECT,
        );
        let order: Vec<&str> = ledger.iter().filter_map(|e| e.transaction.hash.as_deref()).collect();
        assert_eq!(order, vec!["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn zero_amount_still_produces_an_entry() {
        let ledger = build(
            vec![
                tx("1", 1, "0xcc", "0xaa", "ETH", "3"),
                tx("2", 2, "0xcc", "0xaa", "ETH", "0"),
            ],
            SUBJECT,
        );
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[1].running_balance, dec("3"));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let records = vec![
            tx("1", 5, "0xcc", "0xaa", "USDT", "1.25"),
            tx("2", 5, "0xaa", "0xcc", "USDT", "0.25"),
            tx("3", 1, "0xcc", "0xaa", "ETH", "0.000000000000000001"),
        ];
        assert_eq!(build(records.clone(), SUBJECT), build(records, SUBJECT));
    }

    #[test]
    fn balance_equals_prefix_sum() {
        let ledger = build(
            vec![
                tx("1", 1, "0xcc", "0xaa", "USDT", "10.5"),
                tx("2", 2, "0xaa", "0xcc", "ETH", "0.1"),
                tx("3", 3, "0xaa", "0xcc", "USDT", "4.25"),
                tx("4", 4, "0xcc", "0xaa", "ETH", "0.3"),
                tx("5", 5, "0xaa", "0xdd", "USDT", "6.25"),
            ],
            SUBJECT,
        );
        for (i, entry) in ledger.iter().enumerate() {
            let prefix: Decimal = ledger[..=i]
                .iter()
                .filter(|e| e.asset_symbol() == entry.asset_symbol())
                .map(LedgerEntry::signed_amount)
                .sum();
            assert_eq!(entry.running_balance, prefix);
        }
        assert_eq!(ledger[4].running_balance, Decimal::ZERO);
    }

    #[test]
    fn direction_matches_sender() {
        let ledger = build(
            vec![
                tx("1", 1, "0xAa", "0xbb", "ETH", "1"),
                tx("2", 2, "0xbb", "0xaA", "ETH", "1"),
            ],
            SUBJECT,
        );
        for entry in &ledger {
            let is_sender = entry.transaction.from.eq_ignore_ascii_case(SUBJECT);
            assert_eq!(entry.direction == Direction::Out, is_sender);
        }
    }

    #[test]
    fn overflowing_record_is_left_out_and_counted() {
        let (ledger, overflowed) = build_counted(
            vec![
                tx("1", 1, "0xcc", "0xaa", "BIG", "50000000000000000000000000000"),
                tx("2", 2, "0xcc", "0xaa", "BIG", "50000000000000000000000000000"),
                tx("3", 3, "0xaa", "0xcc", "BIG", "1"),
            ],
            SUBJECT,
        );
        assert_eq!(overflowed, 1);
        let hashes: Vec<&str> = ledger.iter().filter_map(|e| e.transaction.hash.as_deref()).collect();
        assert_eq!(hashes, vec!["1", "3"]);
        assert_eq!(ledger[1].running_balance, dec("49999999999999999999999999999"));
    }
}
