pub mod format;
pub mod tables;

pub use format::{format_currency, format_percentage};
pub use tables::{account_table, positions_table};
