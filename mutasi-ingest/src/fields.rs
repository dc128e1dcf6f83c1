//! Field extraction for one assembled row.
//!
//! Input is the row's physical lines: the `DD/MM` line first, continuations
//! after it. Output is a finished `Transaction`, or `None` when the row is
//! noise (bad date, nothing left of the description).

use std::sync::LazyLock;

use mutasi_core::{Transaction, TransactionKind};
use regex::Regex;
use tracing::debug;

use crate::amounts::{extract_amounts, scan_amount_tokens, strip_spans};
use crate::calendar::{leading_day_month, resolve_date};

// Issuer echo of a reference amount: "331000.00", nothing else on the line.
static ECHO_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d{2}$").expect("valid echo regex"));

// Date back-reference plus echo: "TANGGAL :07/03 110000.00".
static TANGGAL_ECHO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^TANGGAL\s*:\d{2}/\d{2}\s+\d+\.\d{2}$").expect("valid tanggal-echo regex")
});

// QR code prefix fused to a merchant name: "00000.00TIX ID".
static ZERO_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0+\.00(.+)$").expect("valid zero-prefix regex"));

// Pump/nozzle code after the SPBU marker: "34.15151-HO", "31.117.02", "34-15129".
static SPBU_PUMP_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(KARTU DEBIT SPBU\s+)([\d.,\-]+)").expect("valid pump-code regex")
});

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}\s*").expect("valid date-prefix regex"));

static CR_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\W)CR(?:\W|$)").expect("valid CR regex"));

static DB_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\W)DB(?:\W|$)").expect("valid DB regex"));

static KIND_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:DB|CR)\b").expect("valid marker regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const SPBU_MARKER: &str = "KARTU DEBIT SPBU";

const CREDIT_PHRASES: &[&str] = &["TRANSFER DR"];
const DEBIT_PHRASES: &[&str] = &["TRANSFER KE", "TARIKAN ATM", "TRANSAKSI DEBIT", "DEBIT DOMESTIK"];
const INTERCHANGE_REFUND: &str = "KR INTERCHANGE";

/// True for continuation lines that only repeat a reference amount.
pub fn is_echo_line(line: &str) -> bool {
    ECHO_LINE.is_match(line) || TANGGAL_ECHO.is_match(line)
}

/// Drop echo lines, unwrap zero-prefixed merchant names, and join the row.
pub fn join_row(lines: &[String]) -> String {
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::with_capacity(lines.len());
    parts.push(first);
    for line in rest {
        if is_echo_line(line) {
            continue;
        }
        let kept = match ZERO_PREFIX.captures(line) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim(),
            None => line.as_str(),
        };
        if !kept.is_empty() {
            parts.push(kept);
        }
    }
    parts.join(" ")
}

/// Remove fuel-pump codes that would otherwise read as amounts.
pub fn strip_pump_code(text: &str) -> String {
    if text.contains(SPBU_MARKER) {
        SPBU_PUMP_CODE.replace_all(text, "${1}").into_owned()
    } else {
        text.to_string()
    }
}

/// Credit/debit detection for ordinary rows.
///
/// The date line is checked first so merchant names on continuation lines
/// ("MALAKA CRN") cannot produce a false credit. The whole-text scan prefers
/// DB because "CR" shows up inside merchant abbreviations far more often.
pub fn detect_kind(date_line: &str, full_text: &str) -> TransactionKind {
    let has_marker = |m: &str| date_line.contains(&format!(" {m}")) || date_line.ends_with(m);

    if has_marker("CR") || CREDIT_PHRASES.iter().any(|p| date_line.contains(p)) {
        return TransactionKind::Credit;
    }
    if has_marker("DB") || DEBIT_PHRASES.iter().any(|p| date_line.contains(p)) {
        return TransactionKind::Debit;
    }
    if full_text.contains(INTERCHANGE_REFUND) {
        return TransactionKind::Credit;
    }
    if DB_WORD.is_match(full_text) {
        return TransactionKind::Debit;
    }
    if CR_WORD.is_match(full_text) {
        return TransactionKind::Credit;
    }
    TransactionKind::Unknown
}

/// Rows with a fixed meaning, matched before generic classification
struct SpecialRow {
    kind: TransactionKind,
    description: &'static str,
}

fn special_row(full_text: &str) -> Option<SpecialRow> {
    let (kind, description) = if full_text.contains("SALDO AWAL") {
        (TransactionKind::Opening, "SALDO AWAL")
    } else if full_text.contains("BUNGA") && !full_text.contains("PAJAK") {
        (TransactionKind::Credit, "BUNGA (Interest)")
    } else if full_text.contains("PAJAK BUNGA") {
        (TransactionKind::Debit, "PAJAK BUNGA (Tax on Interest)")
    } else if full_text.contains("BIAYA ADM") {
        (TransactionKind::Debit, "BIAYA ADM (Admin Fee)")
    } else {
        return None;
    };
    Some(SpecialRow { kind, description })
}

/// Description with the date, amount tokens and standalone DB/CR removed.
///
/// Amounts are cut at the exact spans the extractor matched, so a merchant
/// name that happens to contain the same digits keeps them.
pub fn clean_description(full_text: &str) -> (String, Vec<f64>) {
    let body = DATE_PREFIX.replace(full_text, "");
    let tokens = scan_amount_tokens(&body);
    let amounts = tokens.iter().map(|t| t.value).filter(|v| *v > 0.0).collect();

    let without_amounts = strip_spans(&body, tokens.into_iter().map(|t| t.span));
    let without_markers = KIND_MARKER.replace_all(&without_amounts, "");
    let collapsed = WHITESPACE.replace_all(&without_markers, " ");

    (collapsed.trim().to_string(), amounts)
}

/// Turn one assembled row into a transaction.
pub fn extract_transaction(lines: &[String], year: i32) -> Option<Transaction> {
    let date_line = lines.first()?;

    let full_text = strip_pump_code(&join_row(lines));

    let Some((day, month)) = leading_day_month(date_line) else {
        debug!(line = %date_line, "row without leading date dropped");
        return None;
    };
    let Some(date) = resolve_date(day, month, year) else {
        debug!(line = %date_line, year, "row with impossible date dropped");
        return None;
    };

    if let Some(special) = special_row(&full_text) {
        let amounts = extract_amounts(&full_text);
        let (amount, balance) = match special.kind {
            // Opening balance goes to the balance column only, so summing
            // amounts never counts it as money movement.
            TransactionKind::Opening => (0.0, amounts.first().copied()),
            _ => (amounts.first().copied().unwrap_or(0.0), amounts.get(1).copied()),
        };
        return Some(Transaction::new(date, special.description, special.kind, amount, balance));
    }

    let kind = detect_kind(date_line, &full_text);
    let (description, amounts) = clean_description(&full_text);

    let (amount, balance) = match amounts.as_slice() {
        [] => (0.0, None),
        [only] => (*only, None),
        [.., amount, balance] => (*amount, Some(*balance)),
    };

    if description.is_empty() {
        debug!(line = %date_line, "row with empty description dropped");
        return None;
    }

    Some(Transaction::new(date, description, kind, amount, balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_opening_balance_goes_to_balance() {
        let t = extract_transaction(&row(&["01/12 SALDO AWAL 5,000,000.00"]), 2024).unwrap();
        assert_eq!(t.kind, TransactionKind::Opening);
        assert_eq!(t.amount, 0.0);
        assert_eq!(t.balance, Some(5_000_000.0));
        assert_eq!(t.description, "SALDO AWAL");
        assert_eq!(t.date, date(2024, 12, 1));
    }

    #[test]
    fn test_interest_tax_and_fee_rows() {
        let interest = extract_transaction(&row(&["31/12 BUNGA 1,250.00 5,001,250.00"]), 2024).unwrap();
        assert_eq!(interest.kind, TransactionKind::Credit);
        assert_eq!(interest.description, "BUNGA (Interest)");
        assert_eq!(interest.amount, 1250.0);
        assert_eq!(interest.balance, Some(5_001_250.0));

        let tax = extract_transaction(&row(&["31/12 PAJAK BUNGA 250.00 5,001,000.00"]), 2024).unwrap();
        assert_eq!(tax.kind, TransactionKind::Debit);
        assert_eq!(tax.description, "PAJAK BUNGA (Tax on Interest)");
        assert_eq!(tax.amount, 250.0);

        let fee = extract_transaction(&row(&["31/12 BIAYA ADM 10,000.00"]), 2024).unwrap();
        assert_eq!(fee.kind, TransactionKind::Debit);
        assert_eq!(fee.amount, 10_000.0);
        assert_eq!(fee.balance, None);
    }

    #[test]
    fn test_echo_lines_contribute_nothing() {
        let lines = row(&[
            "03/12 TRSF E-BANKING DB 0312/FTSCY/WS95031 331,000.00 4,669,000.00",
            "331000.00",
            "TANGGAL :03/12 331000.00",
            "BUDI SANTOSO",
        ]);
        let t = extract_transaction(&lines, 2024).unwrap();
        assert_eq!(t.kind, TransactionKind::Debit);
        assert_eq!(t.amount, 331_000.0);
        assert_eq!(t.balance, Some(4_669_000.0));
        assert_eq!(t.description, "TRSF E-BANKING 0312/FTSCY/WS95031 BUDI SANTOSO");
    }

    #[test]
    fn test_zero_prefix_is_unwrapped() {
        let lines = row(&["09/12 QRC014 TRANSAKSI DEBIT", "00000.00TIX ID", "55,000.00 DB"]);
        let t = extract_transaction(&lines, 2024).unwrap();
        assert_eq!(t.kind, TransactionKind::Debit);
        assert_eq!(t.amount, 55_000.0);
        assert_eq!(t.description, "QRC014 TRANSAKSI DEBIT TIX ID");
    }

    #[test]
    fn test_spbu_pump_code_is_not_an_amount() {
        let lines = row(&["15/12 KARTU DEBIT SPBU 31.117.02", "38,357.00 DB"]);
        let t = extract_transaction(&lines, 2024).unwrap();
        assert_eq!(t.kind, TransactionKind::Debit);
        assert_eq!(t.amount, 38_357.0);
        assert_eq!(t.balance, None);
        assert_eq!(t.description, "KARTU DEBIT SPBU");
    }

    #[test]
    fn test_merchant_crn_on_continuation_is_not_credit() {
        let lines = row(&["10/12 KARTU DEBIT 1012", "MALAKA CRN", "75,000.00 DB 925,000.00"]);
        assert_eq!(
            detect_kind(&lines[0], &join_row(&lines)),
            TransactionKind::Debit
        );
    }

    #[test]
    fn test_kind_rules_in_priority_order() {
        assert_eq!(detect_kind("04/12 SWITCHING CR", ""), TransactionKind::Credit);
        assert_eq!(detect_kind("04/12 TRANSFER DR 014", ""), TransactionKind::Credit);
        assert_eq!(detect_kind("04/12 TARIKAN ATM 04/12", ""), TransactionKind::Debit);
        assert_eq!(
            detect_kind("04/12 KARTU KREDIT", "04/12 KARTU KREDIT KR INTERCHANGE 10.00"),
            TransactionKind::Credit
        );
        assert_eq!(
            detect_kind("04/12 SETORAN", "04/12 SETORAN CR 10.00"),
            TransactionKind::Credit
        );
        assert_eq!(detect_kind("04/12 LAIN", "04/12 LAIN 10.00"), TransactionKind::Unknown);
    }

    #[test]
    fn test_markers_fused_into_words_survive() {
        let (desc, amounts) = clean_description("11/12 BI-FAST DB BIF TRANSFER KE QRCR01 20,000.00");
        assert_eq!(desc, "BI-FAST BIF TRANSFER KE QRCR01");
        assert_eq!(amounts, vec![20_000.0]);
    }

    #[test]
    fn test_positional_strip_keeps_matching_merchant_digits() {
        // "25,000.001" contains the amount text but is not itself a token;
        // only the real token's span is cut
        let (desc, amounts) = clean_description("12/12 REF 25,000.001 25,000.00 DB");
        assert_eq!(amounts, vec![25_000.0]);
        assert_eq!(desc, "REF 25,000.001");
    }

    #[test]
    fn test_two_or_more_amounts_take_last_two() {
        let lines = row(&["13/12 TRSF E-BANKING CR 1312/ABC 10.00 2,500,000.00 7,500,000.00"]);
        let t = extract_transaction(&lines, 2024).unwrap();
        assert_eq!(t.amount, 2_500_000.0);
        assert_eq!(t.balance, Some(7_500_000.0));
    }

    #[test]
    fn test_empty_description_dropped() {
        assert!(extract_transaction(&row(&["14/12 25,000.00 DB"]), 2024).is_none());
    }

    #[test]
    fn test_impossible_date_dropped() {
        assert!(extract_transaction(&row(&["31/02 KOPI 25,000.00 DB"]), 2024).is_none());
        // day zero and month zero are not rolled into a neighbouring date
        assert!(extract_transaction(&row(&["00/12 KOPI 25,000.00 DB"]), 2024).is_none());
        assert!(extract_transaction(&row(&["15/00 KOPI 25,000.00 DB"]), 2024).is_none());
        assert!(extract_transaction(&row(&["29/02 KOPI 25,000.00 DB"]), 2024).is_some());
    }
}
