//! Serialize a parsed statement for spreadsheets and other tools.
//!
//! CSV output mirrors the three tables of the statement: account info,
//! transactions and the footer summary, one file each. JSON output is the
//! whole `Statement` in one document.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mutasi_core::{Statement, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

const ACCOUNT_HEADERS: [&str; 4] = ["Account Number", "Period", "Account Holder", "Currency"];
const TRANSACTION_HEADERS: [&str; 5] = ["Date", "Description", "Type", "Amount", "Balance"];
const SUMMARY_HEADERS: [&str; 6] = [
    "Opening Balance",
    "Total Credits",
    "Credit Count",
    "Total Debits",
    "Debit Count",
    "Closing Balance",
];

fn money_cell(v: f64) -> String {
    format!("{v:.2}")
}

/// Amount and balance cells stay blank when not applicable
fn transaction_row(txn: &Transaction) -> [String; 5] {
    [
        txn.date.format("%Y-%m-%d").to_string(),
        txn.description.clone(),
        txn.kind.code().to_string(),
        if txn.amount > 0.0 { money_cell(txn.amount) } else { String::new() },
        txn.balance.filter(|b| *b > 0.0).map(money_cell).unwrap_or_default(),
    ]
}

pub fn write_account_csv<W: Write>(st: &Statement, writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(ACCOUNT_HEADERS)?;
    let a = &st.account;
    w.write_record([&a.account_number, &a.period, &a.account_holder, &a.currency])?;
    w.flush()?;
    Ok(())
}

pub fn write_transactions_csv<W: Write>(st: &Statement, writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(TRANSACTION_HEADERS)?;
    for txn in &st.transactions {
        w.write_record(transaction_row(txn))?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_summary_csv<W: Write>(st: &Statement, writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(SUMMARY_HEADERS)?;
    let s = &st.summary;
    w.write_record([
        money_cell(s.opening_balance),
        money_cell(s.total_credits),
        s.credit_count.to_string(),
        money_cell(s.total_debits),
        s.debit_count.to_string(),
        money_cell(s.closing_balance),
    ])?;
    w.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    debug!(path = %path.display(), "writing export");
    Ok(File::create(path)?)
}

/// Write `<stem>_account.csv`, `<stem>_transactions.csv` and
/// `<stem>_summary.csv` into `dir`, returning the written paths.
pub fn write_csv_bundle(st: &Statement, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let account = dir.join(format!("{stem}_account.csv"));
    let transactions = dir.join(format!("{stem}_transactions.csv"));
    let summary = dir.join(format!("{stem}_summary.csv"));

    write_account_csv(st, create(&account)?)?;
    write_transactions_csv(st, create(&transactions)?)?;
    write_summary_csv(st, create(&summary)?)?;

    Ok(vec![account, transactions, summary])
}

/// Write `<stem>.json` into `dir`.
pub fn write_json(st: &Statement, dir: &Path, stem: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.json"));
    let file = create(&path)?;
    serde_json::to_writer_pretty(file, st)?;
    Ok(path)
}

pub fn export(st: &Statement, format: ExportFormat, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    match format {
        ExportFormat::Csv => write_csv_bundle(st, dir, stem),
        ExportFormat::Json => Ok(vec![write_json(st, dir, stem)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mutasi_core::{AccountInfo, Summary, TransactionKind};

    fn sample() -> Statement {
        let d = |day| NaiveDate::from_ymd_opt(2024, 12, day).unwrap();
        Statement {
            account: AccountInfo {
                account_number: "5940712345".into(),
                account_holder: "SITI AMINAH".into(),
                period: "DESEMBER 2024".into(),
                currency: "IDR".into(),
            },
            transactions: vec![
                Transaction::new(d(1), "SALDO AWAL", TransactionKind::Opening, 0.0, Some(5_000_000.0)),
                Transaction::new(d(2), "KOPI, SUSU", TransactionKind::Debit, 20_000.0, None),
            ],
            summary: Summary {
                opening_balance: 5_000_000.0,
                total_debits: 20_000.0,
                debit_count: 1,
                closing_balance: 4_980_000.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_transactions_csv_blanks_inapplicable_cells() {
        let mut buf = Vec::new();
        write_transactions_csv(&sample(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Date,Description,Type,Amount,Balance");
        assert_eq!(lines[1], "2024-12-01,SALDO AWAL,OPENING,,5000000.00");
        assert_eq!(lines[2], "2024-12-02,\"KOPI, SUSU\",DB,20000.00,");
    }

    #[test]
    fn test_summary_csv() {
        let mut buf = Vec::new();
        write_summary_csv(&sample(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.ends_with("5000000.00,0.00,0,20000.00,1,4980000.00\n"));
    }

    #[test]
    fn test_csv_bundle_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_csv_bundle(&sample(), dir.path(), "des24").unwrap();
        assert_eq!(paths.len(), 3);
        for p in &paths {
            assert!(p.exists(), "missing {}", p.display());
        }
        let account = fs::read_to_string(&paths[0]).unwrap();
        assert!(account.contains("5940712345,DESEMBER 2024,SITI AMINAH,IDR"));
    }

    #[test]
    fn test_json_export_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&sample(), dir.path(), "des24").unwrap();
        let back: Statement = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.transactions[1].kind, TransactionKind::Debit);
        assert_eq!(back.account.currency, "IDR");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
