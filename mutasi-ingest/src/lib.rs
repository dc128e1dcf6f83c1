//! mutasi-ingest: turns the text rendering of a bank statement into
//! transactions, account metadata and footer totals.
//!
//! Pipeline: `classify` tags lines, `assembler` groups them into rows
//! (tracking the year through `calendar`), `fields` turns each row into a
//! transaction using `amounts`, and `header` reads account info and totals.

pub mod amounts;
pub mod assembler;
pub mod calendar;
pub mod classify;
pub mod error;
pub mod fields;
pub mod header;
pub mod parsers;

pub use error::IngestError;
pub use parsers::{ParseOptions, parse_bca_bytes, parse_bca_file, parse_bca_lines, parse_bca_text};
