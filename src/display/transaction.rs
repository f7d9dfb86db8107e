//! Transaction display formatting
//!
//! Register tables and single-transaction detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::Transaction;

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Recorded")]
    recorded: String,
}

impl RegisterRow {
    fn new(txn: &Transaction, symbol: &str) -> Self {
        Self {
            id: txn.id.get(),
            kind: txn.kind.to_string(),
            category: display_category(&txn.category),
            amount: txn.amount.format_with_symbol(symbol),
            recorded: txn.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn display_category(category: &str) -> String {
    if category.is_empty() {
        "(none)".to_string()
    } else {
        category.replace(['\n', '\r'], " ")
    }
}

/// Format a list of transactions as a register, in the order given
pub fn format_transaction_register(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<RegisterRow> = transactions
        .iter()
        .map(|txn| RegisterRow::new(txn, symbol))
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));

    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!("Category:    {}\n", display_category(&txn.category)));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Recorded:    {}\n",
        txn.recorded_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
