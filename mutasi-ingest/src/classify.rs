//! Line classification for BCA statement text.
//!
//! Each page of a BCA statement looks like:
//!   [header block] -> "TANGGAL KETERANGAN CBG MUTASI SALDO" -> [rows] -> page number
//! and the last page ends with four labelled footer lines.

use std::sync::LazyLock;

use regex::Regex;

/// Column-header line that opens the transaction rows of every page
pub const SENTINEL: &str = "TANGGAL KETERANGAN CBG MUTASI SALDO";

/// Footer notice printed where a page breaks
pub const PAGE_BREAK_PHRASE: &str = "Bersambung ke halaman berikut";

/// Labels of the four footer lines at the end of the statement
pub const SUMMARY_PREFIXES: [&str; 4] = ["SALDO AWAL :", "MUTASI CR :", "MUTASI DB :", "SALDO AKHIR :"];

// Newer PDFs collapse the next page's header onto the tail of the last row.
// The blob always closes with the disclaimer bullet; the extra classes cover
// the bullet decoded byte-by-byte as Latin-1.
static INLINE_PAGE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Bersambung ke halaman berikut\b.*?[\x{2022}\x{E2}\x{80}\x{A2}]\s*$")
        .expect("valid page-break regex")
});

// "1 /", "3 / 7". A slash is required so branch codes like "0598" stay rows.
static PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*/\s*\d*$").expect("valid page-number regex"));

static TXN_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}\s").expect("valid date-prefix regex"));

// DD/MM glued to a preceding non-space, non-colon character:
//   "MCD RUKO SUDIRMAN19/01 TRSF E-BANKING CR ..."
// Inline references such as "TANGGAL :07/03" or "TGL: 18/07" do not match.
static EMBEDDED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\s:](\d{2}/\d{2}\s)").expect("valid embedded-date regex"));

/// Tag assigned to one trimmed, non-empty line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Sentinel,
    PageBreakHeader,
    PageNumber,
    SummaryFooter,
    TransactionStart,
    /// Anything else. `embedded_date_at` is the byte offset of a merged
    /// transaction-start date, if the line carries one.
    Continuation { embedded_date_at: Option<usize> },
}

/// Strip an inline page-break blob and surrounding whitespace.
///
/// Returns `None` when nothing is left.
pub fn clean_line(raw: &str) -> Option<String> {
    let stripped = INLINE_PAGE_BREAK.replace_all(raw, "");
    let line = stripped.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

pub fn is_summary_line(line: &str) -> bool {
    SUMMARY_PREFIXES.iter().any(|p| line.starts_with(p))
}

pub fn is_transaction_start(line: &str) -> bool {
    TXN_START.is_match(line)
}

/// Byte offset where a glued-on transaction date begins, if any.
pub fn find_embedded_date(line: &str) -> Option<usize> {
    EMBEDDED_DATE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.start())
}

/// Classify a cleaned line. Priority follows the enum order.
pub fn classify_line(line: &str) -> LineClass {
    if line.contains(SENTINEL) {
        LineClass::Sentinel
    } else if line.contains(PAGE_BREAK_PHRASE) {
        LineClass::PageBreakHeader
    } else if PAGE_NUMBER.is_match(line) {
        LineClass::PageNumber
    } else if is_summary_line(line) {
        LineClass::SummaryFooter
    } else if is_transaction_start(line) {
        LineClass::TransactionStart
    } else {
        LineClass::Continuation {
            embedded_date_at: find_embedded_date(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(classify_line(SENTINEL), LineClass::Sentinel);
        assert_eq!(
            classify_line("Bersambung ke halaman berikut"),
            LineClass::PageBreakHeader
        );
        assert_eq!(classify_line("2 /"), LineClass::PageNumber);
        assert_eq!(classify_line("7 / 7"), LineClass::PageNumber);
        assert_eq!(classify_line("SALDO AKHIR : 1,000.00"), LineClass::SummaryFooter);
        assert_eq!(classify_line("02/12 TARIKAN ATM 02/12"), LineClass::TransactionStart);
    }

    #[test]
    fn test_bare_number_is_not_a_page_number() {
        assert_eq!(
            classify_line("0598"),
            LineClass::Continuation { embedded_date_at: None }
        );
    }

    #[test]
    fn test_opening_row_is_not_a_footer() {
        // the opening row starts with a date; the footer label has a colon
        assert_eq!(
            classify_line("01/12 SALDO AWAL 5,000,000.00"),
            LineClass::TransactionStart
        );
    }

    #[test]
    fn test_date_needs_trailing_whitespace() {
        assert!(!is_transaction_start("01/12"));
        assert!(!is_transaction_start("1901/ATSCY/WS95051"));
        assert!(is_transaction_start("19/01 TRSF E-BANKING CR"));
    }

    #[test]
    fn test_embedded_date_detection() {
        let line = "MCD RUKO SUDIRMAN19/01 TRSF E-BANKING CR 1901/ATSCY/WS95051 3,525,000.00";
        let at = find_embedded_date(line).unwrap();
        assert_eq!(&line[..at], "MCD RUKO SUDIRMAN");
        assert!(line[at..].starts_with("19/01 TRSF"));
    }

    #[test]
    fn test_reference_dates_are_not_merges() {
        assert_eq!(find_embedded_date("TANGGAL :07/03 110000.00"), None);
        assert_eq!(find_embedded_date("TGL: 18/07 BAYAR"), None);
        assert_eq!(find_embedded_date("REF 18/07 BAYAR"), None);
    }

    #[test]
    fn test_clean_line_strips_inline_page_break() {
        let raw = "KOPI KENANGAN Bersambung ke halaman berikut REKENING TAHAPAN \
                   TANGGAL KETERANGAN CBG MUTASI SALDO \u{2022}  ";
        assert_eq!(clean_line(raw).as_deref(), Some("KOPI KENANGAN"));
        assert_eq!(clean_line("   "), None);
    }

    #[test]
    fn test_clean_line_strips_blob_with_latin1_bullet() {
        // bullet bytes E2 80 A2 decoded one char each: "â\u{80}¢"
        let raw = "20/12 SWITCHING DB 50,000.00 Bersambung ke halaman berikut \
                   REKENING TAHAPAN \u{e2}\u{80}\u{a2}";
        assert_eq!(clean_line(raw).as_deref(), Some("20/12 SWITCHING DB 50,000.00"));

        let only_last_byte = "KOPI Bersambung ke halaman berikut SALDO \u{a2}";
        assert_eq!(clean_line(only_last_byte).as_deref(), Some("KOPI"));
    }

    #[test]
    fn test_clean_line_keeps_plain_page_break_notice() {
        // without the closing bullet the notice stays and is classified instead
        let line = clean_line("  Bersambung ke halaman berikut ").unwrap();
        assert_eq!(classify_line(&line), LineClass::PageBreakHeader);
    }
}
