//! Footer reconciliation.
//!
//! Compares what was parsed against the issuer's own footer totals. A
//! mismatch is a data-quality signal for the reader (a row the parser missed
//! or misclassified), never a parse failure.

use mutasi_core::{Statement, format_money, to_cents};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Parsed total vs footer total for one side (credits or debits)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalCheck {
    pub parsed_total: f64,
    pub parsed_count: u32,
    pub footer_total: f64,
    pub footer_count: u32,
}

impl TotalCheck {
    pub fn matches(&self) -> bool {
        to_cents(self.parsed_total) == to_cents(self.footer_total) && self.parsed_count == self.footer_count
    }

    pub fn delta(&self) -> f64 {
        (to_cents(self.parsed_total) - to_cents(self.footer_total)) as f64 / 100.0
    }
}

/// Parsed balance vs footer balance. `parsed` is `None` when the statement
/// had no row carrying that balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub parsed: Option<f64>,
    pub footer: f64,
}

impl BalanceCheck {
    pub fn matches(&self) -> bool {
        self.parsed.is_some_and(|p| to_cents(p) == to_cents(self.footer))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub credits: TotalCheck,
    pub debits: TotalCheck,
    /// Balance on the opening row vs footer opening balance
    pub opening: BalanceCheck,
    /// Last printed running balance vs footer closing balance
    pub closing: BalanceCheck,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.credits.matches() && self.debits.matches() && self.opening.matches() && self.closing.matches()
    }

    /// Human-readable description of every mismatch
    pub fn issues(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (label, check) in [("credits", &self.credits), ("debits", &self.debits)] {
            if !check.matches() {
                out.push(format!(
                    "{label}: parsed {} in {} rows, footer {} in {} rows (delta {})",
                    format_money(check.parsed_total),
                    check.parsed_count,
                    format_money(check.footer_total),
                    check.footer_count,
                    format_money(check.delta()),
                ));
            }
        }
        for (label, check) in [("opening balance", &self.opening), ("closing balance", &self.closing)] {
            if !check.matches() {
                let parsed = check.parsed.map(format_money).unwrap_or_else(|| "none".to_string());
                out.push(format!("{label}: parsed {parsed}, footer {}", format_money(check.footer)));
            }
        }
        out
    }
}

fn side_total<'a>(txns: impl Iterator<Item = &'a mutasi_core::Transaction>) -> (f64, u32) {
    txns.fold((0.0, 0), |(sum, n), t| (sum + t.amount, n + 1))
}

/// Build the reconciliation report and log each mismatch.
pub fn reconcile(st: &Statement) -> Reconciliation {
    let (credit_sum, credit_n) = side_total(st.credits());
    let (debit_sum, debit_n) = side_total(st.debits());

    let report = Reconciliation {
        credits: TotalCheck {
            parsed_total: credit_sum,
            parsed_count: credit_n,
            footer_total: st.summary.total_credits,
            footer_count: st.summary.credit_count,
        },
        debits: TotalCheck {
            parsed_total: debit_sum,
            parsed_count: debit_n,
            footer_total: st.summary.total_debits,
            footer_count: st.summary.debit_count,
        },
        opening: BalanceCheck {
            parsed: st.opening().and_then(|t| t.balance),
            footer: st.summary.opening_balance,
        },
        closing: BalanceCheck {
            parsed: st.transactions.iter().rev().find_map(|t| t.balance),
            footer: st.summary.closing_balance,
        },
    };

    for issue in report.issues() {
        warn!(account = %st.account.account_number, "reconciliation: {issue}");
    }

    report
}
