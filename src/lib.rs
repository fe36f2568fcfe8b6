#![deny(rust_2018_idioms)]

pub mod ledger;

pub use ledger::function::ledger_view;

pub mod request;
pub use request::function::request_view;

pub mod stock;
pub use stock::function::stock_view;

pub mod feeds;
pub mod filter;
pub mod rupiah;
pub mod style;
pub mod table;

/// Canonicalize a column name as read from a CSV header: drop the invisible
/// markers spreadsheet exports sprinkle in (byte-order-mark, non-breaking
/// space), trim, and uppercase.
pub fn normalize_column(name: &str) -> String {
    name.replace('\u{feff}', "")
        .replace('\u{a0}', "")
        .trim()
        .to_uppercase()
}
