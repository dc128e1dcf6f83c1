//! BCA (Bank Central Asia) e-statement parser (text)
//!
//! Input is the text rendering of a BCA "REKENING TAHAPAN" statement, either
//! the bank's own TXT export or a PDF-to-text conversion. Per page:
//!   [header block]
//!   TANGGAL KETERANGAN CBG MUTASI SALDO
//!   01/12 SALDO AWAL                                   5,000,000.00
//!   02/12 TARIKAN ATM 02/12            500,000.00 DB   4,500,000.00
//!   ...
//!   Bersambung ke halaman berikut
//! and the last page ends with the SALDO AWAL / MUTASI CR / MUTASI DB /
//! SALDO AKHIR footer.

use std::path::Path;

use mutasi_core::{Statement, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assembler::{Assembler, AssemblerState};
use crate::error::{IngestError, Result};
use crate::fields::extract_transaction;
use crate::header::{extract_account_info, extract_summary, statement_year};

/// Caller-supplied inputs that are not part of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Year used when the PERIODE label carries no year
    pub fallback_year: i32,
}

impl ParseOptions {
    pub fn new(fallback_year: i32) -> Self {
        Self { fallback_year }
    }
}

/// Parse a statement already split into lines.
pub fn parse_bca_lines<S: AsRef<str>>(lines: &[S], opts: &ParseOptions) -> Statement {
    let content = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let account = extract_account_info(&content, lines);
    let year = statement_year(&account.period).unwrap_or_else(|| {
        debug!(period = %account.period, fallback = opts.fallback_year, "no year in period");
        opts.fallback_year
    });

    let mut transactions: Vec<Transaction> = Vec::new();
    let mut sink = |group: &[String], group_year: i32| {
        let Some(txn) = extract_transaction(group, group_year) else {
            return;
        };
        // At most one opening record, and only in first position. A later one
        // is a repeated header row, not money movement.
        if txn.is_opening() && !transactions.is_empty() {
            warn!(date = %txn.date, "dropping opening-balance row that is not first");
            return;
        }
        transactions.push(txn);
    };

    let mut assembler = Assembler::new(year);
    for line in lines {
        assembler.push_line(line.as_ref(), &mut sink);
    }
    assembler.finish(&mut sink);
    if assembler.state() == AssemblerState::SeekingSentinel {
        warn!("no transaction table header found");
    }

    let summary = extract_summary(&content);

    debug!(
        account = %account.account_number,
        transactions = transactions.len(),
        "parsed statement"
    );

    Statement {
        account,
        transactions,
        summary,
    }
}

/// Parse a whole statement text.
pub fn parse_bca_text(text: &str, opts: &ParseOptions) -> Statement {
    let lines: Vec<&str> = text.lines().collect();
    parse_bca_lines(&lines, opts)
}

/// Parse raw file bytes. Invalid UTF-8 is replaced rather than rejected, since
/// converter output is not always clean.
pub fn parse_bca_bytes(bytes: &[u8], opts: &ParseOptions) -> Statement {
    parse_bca_text(&String::from_utf8_lossy(bytes), opts)
}

/// Read and parse a statement text file.
pub fn parse_bca_file(path: impl AsRef<Path>, opts: &ParseOptions) -> Result<Statement> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_bca_bytes(&bytes, opts))
}
