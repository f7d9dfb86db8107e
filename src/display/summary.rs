//! Summary formatting for terminal output

use crate::models::Summary;

/// Format income, expense and net for one ledger
pub fn format_summary(title: &str, summary: &Summary, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("{}\n", "=".repeat(title.chars().count().max(20))));
    output.push_str(&format!(
        "Total income:  {:>14}\n",
        summary.total_income.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Total expense: {:>14}\n",
        summary.total_expense.format_with_symbol(symbol)
    ));
    output.push_str(&format!("{}\n", "-".repeat(29)));
    output.push_str(&format!(
        "Net:           {:>14}\n",
        summary.net.format_with_symbol(symbol)
    ));

    output
}
