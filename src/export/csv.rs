//! CSV export of a ledger's transactions

use std::io::Write;

use crate::error::LedgerResult;
use crate::models::Transaction;

/// Column headers, in output order
pub const CSV_HEADER: [&str; 5] = ["ID", "Kind", "Category", "Amount", "Recorded At"];

/// Write transactions as CSV, one row each, in the order given
///
/// Amounts are plain two-decimal numbers; the `csv` writer quotes any field
/// containing commas, quotes or newlines.
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for txn in transactions {
        csv_writer.write_record([
            txn.id.get().to_string(),
            txn.kind.to_string(),
            txn.category.clone(),
            txn.amount.to_decimal_string(),
            txn.recorded_at.to_rfc3339(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdAllocator, Money, TransactionKind};

    #[test]
    fn test_export_rows() {
        let mut ids = IdAllocator::new();
        let transactions = vec![
            Transaction::create(
                &mut ids,
                TransactionKind::Income,
                "Salary",
                Money::from_cents(100000),
            ),
            Transaction::create(
                &mut ids,
                TransactionKind::Expense,
                "Food, \"takeout\"",
                Money::from_cents(-1205),
            ),
        ];

        let mut out = Vec::new();
        export_transactions_csv(&transactions, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID,Kind,Category,Amount,Recorded At");
        assert!(lines[1].starts_with("1,Income,Salary,1000.00,"));
        assert!(lines[2].starts_with("2,Expense,\"Food, \"\"takeout\"\"\",-12.05,"));
    }

    #[test]
    fn test_empty_export_has_header() {
        let mut out = Vec::new();
        export_transactions_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ID,Kind,Category,Amount,Recorded At\n");
    }
}
