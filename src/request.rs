use crate::rupiah;

/// Totals and the project breakdown of the purchase-request feed.
///
/// Unlike the ledger there are no mandatory columns here: a feed without
/// `SUBTOTAL` simply totals to zero, and without `PROJECT` there is nothing
/// to narrow by.
#[derive(Debug)]
pub struct View {
    /// Parsed subtotal per feed row, present when the feed has a `SUBTOTAL` column.
    pub subtotals: Option<Vec<u64>>,
    /// Sum of every subtotal, across all rows regardless of the project filter.
    pub total_estimation: u64,
    /// Row count of the whole feed.
    pub item_count: usize,
    /// Distinct non-empty `PROJECT` values, sorted.
    pub projects: Vec<String>,
    /// Indices of the rows passing the project filter, in feed order.
    pub visible: Vec<usize>,
    /// Parse-quality counters for the `SUBTOTAL` column.
    pub report: rupiah::Report,
}

pub(crate) mod function {
    use super::View;
    use crate::rupiah;
    use crate::table::Table;

    /// Build the purchase-request view. `project` narrows the visible rows to
    /// one `PROJECT` value; `None` or `ALL` keeps everything. The estimation
    /// total is always computed over the full feed.
    pub fn request_view(feed: &Table, project: Option<&str>) -> View {
        let subtotal_idx = feed.column("SUBTOTAL");
        let project_idx = feed.column("PROJECT");

        let (subtotals, report) = match subtotal_idx {
            Some(idx) => {
                let outcome = rupiah::parse_amounts_report(feed.column_values(idx));
                (Some(outcome.amounts), outcome.report)
            }
            None => (None, rupiah::Report::default()),
        };
        let total_estimation = subtotals
            .as_ref()
            .map(|amounts| amounts.iter().sum())
            .unwrap_or(0);

        let mut projects: Vec<String> = match project_idx {
            Some(idx) => {
                let mut values: Vec<String> = feed
                    .column_values(idx)
                    .into_iter()
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| value.to_string())
                    .collect();
                values.sort();
                values
            }
            None => Vec::new(),
        };
        projects.dedup();

        let selected = project.filter(|choice| *choice != "ALL");
        let visible = (0..feed.len())
            .filter(|&row| match (selected, project_idx) {
                (Some(choice), Some(idx)) => feed.cell(row, idx) == choice,
                _ => true,
            })
            .collect();

        View {
            subtotals,
            total_estimation,
            item_count: feed.len(),
            projects,
            visible,
            report,
        }
    }
}
