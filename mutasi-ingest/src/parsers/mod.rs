//! Bank-specific statement parsers

pub mod bca;

pub use bca::{ParseOptions, parse_bca_bytes, parse_bca_file, parse_bca_lines, parse_bca_text};
