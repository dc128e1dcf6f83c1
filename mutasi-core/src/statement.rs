//! Statement record types produced by a single parse pass

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One statement line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Booking date, resolved against the tracked statement year
    pub date: NaiveDate,
    /// Cleaned free text (noise and amount tokens removed)
    pub description: String,
    pub kind: TransactionKind,
    /// Non-negative; 0.0 means "not applicable" (e.g. the opening record)
    pub amount: f64,
    /// Running balance after this line, when the source printed one
    pub balance: Option<f64>,
}

/// Credit/debit classification of a transaction.
///
/// `Unknown` is a legitimate outcome when no rule matched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TransactionKind {
    #[serde(rename = "CR")]
    Credit,
    #[serde(rename = "DB")]
    Debit,
    #[serde(rename = "OPENING")]
    Opening,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl TransactionKind {
    /// Short code as printed on the statement (`CR`, `DB`, `OPENING`, or empty)
    pub fn code(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "CR",
            TransactionKind::Debit => "DB",
            TransactionKind::Opening => "OPENING",
            TransactionKind::Unknown => "",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        kind: TransactionKind,
        amount: f64,
        balance: Option<f64>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            kind,
            amount,
            balance,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionKind::Debit
    }

    pub fn is_opening(&self) -> bool {
        self.kind == TransactionKind::Opening
    }
}

/// Account metadata from the statement header.
///
/// Empty strings mean the corresponding label was not found.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: String,
    pub account_holder: String,
    /// Human-readable period, e.g. "DESEMBER 2024"
    pub period: String,
    pub currency: String,
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

impl AccountInfo {
    pub fn account_number(&self) -> Option<&str> {
        non_empty(&self.account_number)
    }

    pub fn account_holder(&self) -> Option<&str> {
        non_empty(&self.account_holder)
    }

    pub fn period(&self) -> Option<&str> {
        non_empty(&self.period)
    }

    pub fn currency(&self) -> Option<&str> {
        non_empty(&self.currency)
    }
}

/// Footer totals exactly as printed by the issuer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub opening_balance: f64,
    pub total_credits: f64,
    pub credit_count: u32,
    pub total_debits: f64,
    pub debit_count: u32,
    pub closing_balance: f64,
}

/// Everything one parse pass produces
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    pub account: AccountInfo,
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
}

impl Statement {
    pub fn opening(&self) -> Option<&Transaction> {
        self.transactions.first().filter(|t| t.is_opening())
    }

    pub fn credits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_credit())
    }

    pub fn debits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_debit())
    }
}
