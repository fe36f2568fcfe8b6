//! Render-time styling for categorical cell values. Pure value-to-descriptor
//! mappings; the data layer never depends on this.

use crate::stock::RestockFlag;

/// How a cell should be decorated by whatever renders the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub background: &'static str,
    pub foreground: &'static str,
    pub bold: bool,
}

const GREEN: Style = Style {
    background: "rgba(0, 200, 0, 0.18)",
    foreground: "#9eff9e",
    bold: true,
};

const RED: Style = Style {
    background: "rgba(255, 0, 0, 0.18)",
    foreground: "#ffb3b3",
    bold: true,
};

/// Style for a `KET.PV` payment-voucher cell, `None` for anything unrecognized.
pub fn pv_style(value: &str) -> Option<Style> {
    match value.trim().to_uppercase().as_str() {
        "SUDAH BUAT PV" => Some(GREEN),
        "BELUM BUAT PV" => Some(RED),
        _ => None,
    }
}

pub fn restock_style(flag: RestockFlag) -> Style {
    match flag {
        RestockFlag::NeedsRestock => RED,
        RestockFlag::Sufficient => GREEN,
    }
}
