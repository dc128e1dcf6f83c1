//! Plain-text summary block for terminal output

use std::fmt::Write;

use mutasi_core::{Statement, format_money};

use crate::reconcile::Reconciliation;

const RULE_WIDTH: usize = 70;
const MISSING: &str = "-";

fn section(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}\n{title}\n{rule}");
}

/// Render account info, footer totals and (optionally) reconciliation issues.
pub fn render_summary(st: &Statement, recon: Option<&Reconciliation>) -> String {
    let mut out = String::new();
    let a = &st.account;
    let s = &st.summary;
    // money lines carry the currency code only when the header had one
    let cur = a.currency().map(|c| format!("{c} ")).unwrap_or_default();

    section(&mut out, "ACCOUNT INFORMATION");
    let _ = writeln!(out, "  Account Number : {}", a.account_number().unwrap_or(MISSING));
    let _ = writeln!(out, "  Account Holder : {}", a.account_holder().unwrap_or(MISSING));
    let _ = writeln!(out, "  Period         : {}", a.period().unwrap_or(MISSING));
    let _ = writeln!(out, "  Currency       : {}", a.currency().unwrap_or(MISSING));

    section(&mut out, "TRANSACTION SUMMARY");
    let _ = writeln!(out, "  Total Transactions : {}", st.transactions.len());
    let _ = writeln!(out, "  Opening Balance    : {cur}{}", format_money(s.opening_balance));
    let _ = writeln!(
        out,
        "  Total Credits      : {cur}{} ({} transactions)",
        format_money(s.total_credits),
        s.credit_count
    );
    let _ = writeln!(
        out,
        "  Total Debits       : {cur}{} ({} transactions)",
        format_money(s.total_debits),
        s.debit_count
    );
    let _ = writeln!(out, "  Closing Balance    : {cur}{}", format_money(s.closing_balance));

    if let Some(recon) = recon {
        section(&mut out, "RECONCILIATION");
        let issues = recon.issues();
        if issues.is_empty() {
            let _ = writeln!(out, "  OK: parsed rows match the footer");
        }
        for issue in issues {
            let _ = writeln!(out, "  ! {issue}");
        }
    }

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}
