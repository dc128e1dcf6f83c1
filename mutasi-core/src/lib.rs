//! mutasi-core: statement data model shared by the parser, exporters and CLI

pub mod money;
pub mod statement;

pub use money::{format_money, parse_amount, to_cents};
pub use statement::{AccountInfo, Statement, Summary, Transaction, TransactionKind};
