//! Monetary token extraction.
//!
//! BCA prints amounts as `3,525,000.00`: a digit run with optional comma
//! grouping, a dot, and exactly two decimals. Merchant and pump codes often
//! contain the same shape (`34.15147`, `31.117.02`), so a token only counts
//! when it is a whole numeric word:
//!   - the two decimals must not be followed by another digit, and
//!   - the run must not be glued to a preceding digit, `.` or `,`.
//!
//! Codes introduced by a known marker phrase (see `fields`) are stripped
//! before this runs; the boundary rules are the second line of defence.

use std::ops::Range;
use std::sync::LazyLock;

use mutasi_core::parse_amount;
use regex::Regex;

static AMOUNT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+\.\d{2}").expect("valid amount regex"));

/// One amount-shaped token accepted by the boundary rules
#[derive(Debug, Clone, PartialEq)]
pub struct AmountToken {
    /// Parsed value; may be 0.0 for tokens like `0.00`
    pub value: f64,
    /// Byte range of the token inside the scanned text
    pub span: Range<usize>,
}

fn is_numeric_byte(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.' || b == b','
}

/// Scan `text` left to right and return every accepted amount token,
/// including zero-valued ones (callers that strip text need their spans).
pub fn scan_amount_tokens(text: &str) -> Vec<AmountToken> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();

    for m in AMOUNT_SHAPE.find_iter(text) {
        let glued_left = m.start() > 0 && is_numeric_byte(bytes[m.start() - 1]);
        let glued_right = matches!(bytes.get(m.end()), Some(b) if b.is_ascii_digit());
        if glued_left || glued_right {
            continue;
        }

        let value = parse_amount(m.as_str()).unwrap_or(0.0);
        out.push(AmountToken {
            value,
            span: m.range(),
        });
    }

    out
}

/// Positive monetary values in `text`, in order of appearance.
///
/// Zero or unparsable tokens are skipped silently.
pub fn extract_amounts(text: &str) -> Vec<f64> {
    scan_amount_tokens(text)
        .into_iter()
        .map(|t| t.value)
        .filter(|v| *v > 0.0)
        .collect()
}

/// Remove the given spans from `text`. Spans must be sorted and disjoint.
pub fn strip_spans(text: &str, spans: impl IntoIterator<Item = Range<usize>>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
