/// Whether an inventory row needs to be replenished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockFlag {
    NeedsRestock,
    Sufficient,
}

impl RestockFlag {
    /// A row needs restocking when what is on hand does not exceed the
    /// safety-stock threshold.
    pub fn evaluate(qty: f64, safety_stock: f64) -> RestockFlag {
        if qty <= safety_stock {
            RestockFlag::NeedsRestock
        } else {
            RestockFlag::Sufficient
        }
    }

    /// The label the sheets use for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestockFlag::NeedsRestock => "RE-STOCK",
            RestockFlag::Sufficient => "AMAN",
        }
    }
}

/// Numeric coercion for quantity cells: missing or non-numeric reads as 0.
pub fn to_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

/// Stock levels evaluated against their safety-stock thresholds.
#[derive(Debug)]
pub struct View {
    /// One flag per feed row; `None` when `QTY` or `SAFETY STOCK` is absent.
    pub flags: Option<Vec<RestockFlag>>,
    pub restock_count: usize,
    pub sufficient_count: usize,
    /// Indices of flagged rows, lowest quantity first.
    pub restock_priority: Vec<usize>,
}

pub(crate) mod function {
    use super::{to_number, RestockFlag, View};
    use crate::table::Table;

    /// Build the stock view. Both quantity columns are coerced to numbers
    /// with anything unreadable counting as 0 before the comparison.
    pub fn stock_view(feed: &Table) -> View {
        let qty_idx = feed.column("QTY");
        let safety_idx = feed.column("SAFETY STOCK");
        let (qty_idx, safety_idx) = match (qty_idx, safety_idx) {
            (Some(qty), Some(safety)) => (qty, safety),
            _ => {
                return View {
                    flags: None,
                    restock_count: 0,
                    sufficient_count: 0,
                    restock_priority: Vec::new(),
                }
            }
        };

        let quantities: Vec<f64> = (0..feed.len())
            .map(|row| to_number(feed.cell(row, qty_idx)))
            .collect();
        let flags: Vec<RestockFlag> = quantities
            .iter()
            .enumerate()
            .map(|(row, &qty)| RestockFlag::evaluate(qty, to_number(feed.cell(row, safety_idx))))
            .collect();

        let restock_count = flags
            .iter()
            .filter(|flag| **flag == RestockFlag::NeedsRestock)
            .count();
        let mut restock_priority: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter_map(|(row, flag)| (*flag == RestockFlag::NeedsRestock).then_some(row))
            .collect();
        restock_priority.sort_by(|&a, &b| {
            quantities[a]
                .partial_cmp(&quantities[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        View {
            sufficient_count: flags.len() - restock_count,
            flags: Some(flags),
            restock_count,
            restock_priority,
        }
    }
}
