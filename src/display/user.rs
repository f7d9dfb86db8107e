//! User display formatting
//!
//! Formats the user directory for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::services::UserOverview;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Txns")]
    transactions: usize,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

/// Format the user list with each user's totals
pub fn format_user_list(users: &[UserOverview], symbol: &str) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }

    let rows: Vec<UserRow> = users
        .iter()
        .map(|user| UserRow {
            id: user.id.get(),
            name: user.name.clone(),
            transactions: user.transaction_count,
            income: user.summary.total_income.format_with_symbol(symbol),
            expense: user.summary.total_expense.format_with_symbol(symbol),
            net: user.summary.net.format_with_symbol(symbol),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()));

    format!("{}\n", table)
}

/// Format a single user's header block
pub fn format_user_details(user: &UserOverview) -> String {
    let mut output = String::new();

    output.push_str(&format!("User:         {}\n", user.name));
    output.push_str(&format!("ID:           {}\n", user.id));
    output.push_str(&format!("Transactions: {}\n", user.transaction_count));

    output
}
