//! Account metadata and footer totals.
//!
//! Both are plain label lookups over the whole document; a label that is not
//! found leaves the field at its default.

use std::sync::LazyLock;

use mutasi_core::{AccountInfo, Summary, parse_amount};
use regex::Regex;

static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NO\.\s*REKENING\s*:\s*(\d+)").expect("valid account regex"));

static PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PERIODE\s*:\s*([A-Z]+\s+\d+)").expect("valid period regex"));

// PDF-derived text puts the holder on the account-number line:
//   "RAIHAN RIZKI MAULANA AMSAD NO. REKENING : 5940712345"
// The name must start with a non-blank, so an indented bare label is no match.
static HOLDER_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(\S.*?)[ \t]+NO\.\s*REKENING\s*:").expect("valid holder regex")
});

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MATA\s+UANG\s*:\s*(\w+)").expect("valid currency regex"));

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

static OPENING_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SALDO AWAL\s*:\s*([\d,]+\.\d{2})").expect("valid opening regex")
});

static CREDIT_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"MUTASI CR\s*:\s*([\d,]+\.\d{2})\s+(\d+)").expect("valid credit regex")
});

static DEBIT_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"MUTASI DB\s*:\s*([\d,]+\.\d{2})\s+(\d+)").expect("valid debit regex")
});

static CLOSING_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SALDO AKHIR\s*:\s*([\d,]+\.\d{2})").expect("valid closing regex")
});

/// Line index of the holder name in the bank's own TXT export
const HOLDER_FALLBACK_LINE: usize = 2;

fn first_capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_account_info<S: AsRef<str>>(content: &str, lines: &[S]) -> AccountInfo {
    let account_holder = first_capture(&HOLDER_INLINE, content)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .or_else(|| {
            lines
                .get(HOLDER_FALLBACK_LINE)
                .map(|l| l.as_ref().trim().to_string())
        })
        .unwrap_or_default();

    AccountInfo {
        account_number: first_capture(&ACCOUNT_NUMBER, content).unwrap_or_default(),
        account_holder,
        period: first_capture(&PERIOD, content).unwrap_or_default(),
        currency: first_capture(&CURRENCY, content).unwrap_or_default(),
    }
}

/// First four-digit run in the period string ("DESEMBER 2024" -> 2024).
pub fn statement_year(period: &str) -> Option<i32> {
    YEAR.find(period).and_then(|m| m.as_str().parse().ok())
}

fn amount_capture(re: &Regex, content: &str) -> Option<(f64, Option<u32>)> {
    let caps = re.captures(content)?;
    let amount = parse_amount(caps.get(1)?.as_str())?;
    let count = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((amount, count))
}

pub fn extract_summary(content: &str) -> Summary {
    let mut summary = Summary::default();

    if let Some((amount, _)) = amount_capture(&OPENING_TOTAL, content) {
        summary.opening_balance = amount;
    }
    if let Some((amount, count)) = amount_capture(&CREDIT_TOTAL, content) {
        summary.total_credits = amount;
        summary.credit_count = count.unwrap_or(0);
    }
    if let Some((amount, count)) = amount_capture(&DEBIT_TOTAL, content) {
        summary.total_debits = amount;
        summary.debit_count = count.unwrap_or(0);
    }
    if let Some((amount, _)) = amount_capture(&CLOSING_TOTAL, content) {
        summary.closing_balance = amount;
    }

    summary
}
