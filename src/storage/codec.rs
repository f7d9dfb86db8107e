//! Line-oriented codec for ledger and user directory files
//!
//! Every record is one line of JSON. JSON string escaping keeps newlines and
//! other control characters inside categories and names from ever breaking a
//! line, so a file can always be split back into its records.
//!
//! Personal ledger file:
//!
//! ```text
//! {"records":2,"last_transaction_id":2,"total_income":100000,"total_expense":40000}
//! {"id":1,"kind":"income","category":"Salary","amount":100000,"recorded_at":"..."}
//! {"id":2,"kind":"expense","category":"Rent","amount":40000,"recorded_at":"..."}
//! ```
//!
//! User directory file: a header with the user count, then per user one
//! user line followed by that user's transaction lines.
//!
//! ```text
//! {"records":1,"last_user_id":1,"last_transaction_id":1}
//! {"id":1,"name":"Alice","created_at":"...","total_income":500,"total_expense":0,"transactions":1}
//! {"id":1,"kind":"income","category":"Gift","amount":500,"recorded_at":"..."}
//! ```
//!
//! Decoding reads the declared number of records. If a record is missing or
//! malformed it stops there and hands back everything before it, marked as
//! [`Recovery::Truncated`]. Non-blank lines after the last declared record
//! are reported as [`Recovery::TrailingData`].

use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    IdAllocator, Ledger, Money, Transaction, TransactionId, User, UserDirectory, UserId,
};

#[derive(Debug, Serialize, Deserialize)]
struct LedgerHeader {
    records: usize,
    last_transaction_id: u64,
    total_income: Money,
    total_expense: Money,
}

#[derive(Debug, Serialize, Deserialize)]
struct DirectoryHeader {
    records: usize,
    last_user_id: u64,
    last_transaction_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    id: UserId,
    name: String,
    created_at: DateTime<Utc>,
    total_income: Money,
    total_expense: Money,
    transactions: usize,
}

/// Whether a decode read everything the header promised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    Complete,
    Truncated {
        expected: usize,
        recovered: usize,
        reason: String,
    },
    /// Every declared record was read but more lines followed
    TrailingData {
        /// Non-blank lines past the declared records
        extra_lines: usize,
        /// Line number of the first of them
        first_line: usize,
    },
}

impl Recovery {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// A decoded value plus how much of the input it covers
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub recovery: Recovery,
}

/// A personal ledger with the allocator that continues its numbering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedLedger {
    pub ledger: Ledger,
    pub ids: IdAllocator<TransactionId>,
}

fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> LedgerResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write a personal ledger
pub fn encode_ledger<W: Write>(
    writer: &mut W,
    ledger: &Ledger,
    last_transaction_id: u64,
) -> LedgerResult<()> {
    let header = LedgerHeader {
        records: ledger.len(),
        last_transaction_id,
        total_income: ledger.total_income(),
        total_expense: ledger.total_expense(),
    };
    write_line(writer, &header)?;
    for txn in ledger.transactions() {
        write_line(writer, txn)?;
    }
    Ok(())
}

/// Write a user directory
pub fn encode_directory<W: Write>(writer: &mut W, directory: &UserDirectory) -> LedgerResult<()> {
    let header = DirectoryHeader {
        records: directory.len(),
        last_user_id: directory.last_user_id(),
        last_transaction_id: directory.last_transaction_id(),
    };
    write_line(writer, &header)?;

    for user in directory.users() {
        let record = UserRecord {
            id: user.id,
            name: user.name.clone(),
            created_at: user.created_at,
            total_income: user.ledger.total_income(),
            total_expense: user.ledger.total_expense(),
            transactions: user.ledger.len(),
        };
        write_line(writer, &record)?;
        for txn in user.ledger.transactions() {
            write_line(writer, txn)?;
        }
    }
    Ok(())
}

/// Pulls one JSON record per non-blank line, tracking line numbers
struct RecordReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> RecordReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next_record<T: DeserializeOwned>(&mut self) -> Result<T, String> {
        loop {
            self.line_no += 1;
            let line = match self.lines.next() {
                None => return Err(format!("unexpected end of file at line {}", self.line_no)),
                Some(Err(e)) => return Err(format!("line {}: {}", self.line_no, e)),
                Some(Ok(line)) => line,
            };
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line).map_err(|e| format!("line {}: {}", self.line_no, e));
        }
    }

    /// Drain the rest of the input; `Complete` if nothing but blank lines remain
    fn finish(mut self) -> Recovery {
        let mut extra_lines = 0;
        let mut first_line = 0;
        for line in self.lines.by_ref() {
            self.line_no += 1;
            if matches!(&line, Ok(text) if text.trim().is_empty()) {
                continue;
            }
            if extra_lines == 0 {
                first_line = self.line_no;
            }
            extra_lines += 1;
            // An I/O error ends the input
            if line.is_err() {
                break;
            }
        }

        if extra_lines == 0 {
            Recovery::Complete
        } else {
            Recovery::TrailingData {
                extra_lines,
                first_line,
            }
        }
    }
}

/// Read a personal ledger
///
/// Fails only when the header itself is unreadable. Persisted totals are
/// kept as written unless the records were truncated, in which case they are
/// summed from what was recovered.
pub fn decode_ledger<R: BufRead>(reader: R) -> LedgerResult<Decoded<LoadedLedger>> {
    let mut records = RecordReader::new(reader);
    let header: LedgerHeader = records
        .next_record()
        .map_err(|e| LedgerError::Storage(format!("Invalid ledger header: {}", e)))?;

    let mut transactions = Vec::with_capacity(header.records.min(4096));
    let mut recovery = Recovery::Complete;
    for _ in 0..header.records {
        match records.next_record::<Transaction>() {
            Ok(txn) => transactions.push(txn),
            Err(reason) => {
                recovery = Recovery::Truncated {
                    expected: header.records,
                    recovered: transactions.len(),
                    reason,
                };
                break;
            }
        }
    }
    if recovery.is_complete() {
        recovery = records.finish();
    }

    let mut ledger = Ledger::from_parts(
        None,
        transactions,
        header.total_income,
        header.total_expense,
    );
    if recovery.is_truncated() {
        ledger.recompute_totals();
    }

    let mut ids = IdAllocator::resuming_after(header.last_transaction_id);
    if let Some(max) = ledger.max_transaction_id() {
        ids.observe(max);
    }

    Ok(Decoded {
        value: LoadedLedger { ledger, ids },
        recovery,
    })
}

/// Read a user directory
///
/// Fails only when the header itself is unreadable. A user whose transaction
/// lines are cut short is kept with the transactions that did parse.
pub fn decode_directory<R: BufRead>(reader: R) -> LedgerResult<Decoded<UserDirectory>> {
    let mut records = RecordReader::new(reader);
    let header: DirectoryHeader = records
        .next_record()
        .map_err(|e| LedgerError::Storage(format!("Invalid directory header: {}", e)))?;

    let mut users = Vec::with_capacity(header.records.min(4096));
    let mut recovery = Recovery::Complete;

    'users: for _ in 0..header.records {
        let record: UserRecord = match records.next_record() {
            Ok(record) => record,
            Err(reason) => {
                recovery = Recovery::Truncated {
                    expected: header.records,
                    recovered: users.len(),
                    reason,
                };
                break;
            }
        };

        let mut transactions = Vec::with_capacity(record.transactions.min(4096));
        for _ in 0..record.transactions {
            match records.next_record::<Transaction>() {
                Ok(txn) => transactions.push(txn),
                Err(reason) => {
                    let mut ledger = Ledger::from_parts(
                        Some(record.id),
                        transactions,
                        Money::zero(),
                        Money::zero(),
                    );
                    ledger.recompute_totals();
                    users.push(User {
                        id: record.id,
                        name: record.name,
                        created_at: record.created_at,
                        ledger,
                    });
                    recovery = Recovery::Truncated {
                        expected: header.records,
                        recovered: users.len(),
                        reason: format!("{} (inside user {})", reason, record.id),
                    };
                    break 'users;
                }
            }
        }

        let ledger = Ledger::from_parts(
            Some(record.id),
            transactions,
            record.total_income,
            record.total_expense,
        );
        users.push(User {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            ledger,
        });
    }
    if recovery.is_complete() {
        recovery = records.finish();
    }

    Ok(Decoded {
        value: UserDirectory::from_parts(
            users,
            header.last_user_id,
            header.last_transaction_id,
        ),
        recovery,
    })
}
