//! Terminal tables for account data.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;

use crate::display::format::format_currency;
use crate::grvt::types::{AccountSummary, Position};

const POSITION_HEADERS: [&str; 6] = [
    "Symbol",
    "Side",
    "Size",
    "Entry Price",
    "Mark Price",
    "Unrealized P&L",
];

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)));
    table
}

fn money(value: Decimal) -> Cell {
    Cell::new(format_currency(value, 2, "$")).set_alignment(CellAlignment::Right)
}

/// Equity, free balance, margin in use and unrealized P&L.
pub fn account_table(summary: &AccountSummary) -> Table {
    let mut table = base_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total Equity"), money(summary.total_equity)]);
    table.add_row(vec![
        Cell::new("Available Balance"),
        money(summary.available_balance),
    ]);
    table.add_row(vec![Cell::new("Used Margin"), money(summary.initial_margin)]);
    table.add_row(vec![
        Cell::new("Unrealized P&L"),
        money(summary.unrealized_pnl),
    ]);
    table
}

/// One row per open position; flat positions are skipped.
pub fn positions_table(positions: &[Position]) -> Table {
    let mut table = base_table(&POSITION_HEADERS);
    for position in positions.iter().filter(|p| p.is_open()) {
        let symbol = if position.instrument.is_empty() {
            "N/A"
        } else {
            position.instrument.as_str()
        };
        table.add_row(vec![
            Cell::new(symbol),
            Cell::new(position.side().label()),
            Cell::new(position.size.abs().normalize()).set_alignment(CellAlignment::Right),
            money(position.entry_price),
            money(position.mark_price),
            money(position.unrealized_pnl),
        ]);
    }
    table
}
