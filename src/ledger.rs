use crate::rupiah;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Required columns {missing:?} are not present in the ledger feed (available: {available:?})")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },
}

/// The names the ledger sheet uses for its mandatory columns.
pub const REQUIRED_COLUMNS: [&str; 4] = ["DATE", "KETERANGAN", "TIPE", "JUMLAH"];

/// The direction of a ledger row, taken from the `TIPE` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tipe {
    In,
    Out,
    /// Anything that is neither `IN` nor `OUT`; contributes nothing to the balance.
    Other,
}

impl Tipe {
    pub fn from_raw(value: &str) -> Tipe {
        match value.trim().to_uppercase().as_str() {
            "IN" => Tipe::In,
            "OUT" => Tipe::Out,
            _ => Tipe::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tipe::In => "IN",
            Tipe::Out => "OUT",
            Tipe::Other => "",
        }
    }

    /// Apply the direction sign to an amount.
    pub fn signed(&self, amount: u64) -> i64 {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        match self {
            Tipe::In => amount,
            Tipe::Out => -amount,
            Tipe::Other => 0,
        }
    }
}

/// One ledger transaction after normalization, in date-sorted position.
#[derive(Debug, Clone)]
pub struct Row {
    /// `None` when the `DATE` cell did not parse; such rows sort last.
    pub date: Option<time::Date>,
    pub keterangan: String,
    pub deskripsi: String,
    pub project: String,
    /// Payment-voucher status, only when the feed has a `KET.PV` column.
    pub ket_pv: Option<String>,
    pub tipe: Tipe,
    pub amount: u64,
    /// `amount` with the direction sign applied.
    pub signed: i64,
    /// Running balance up to and including this row.
    pub balance: i64,
}

/// Cashflow metrics of a ledger view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Closing balance of the full feed. Filtering never changes this.
    pub final_balance: i64,
    /// Sum of `IN` amounts within the filtered subset.
    pub total_in: u64,
    /// Sum of `OUT` amounts within the filtered subset.
    pub total_out: u64,
    /// Sum of signed amounts within the filtered subset.
    pub net: i64,
    /// Number of rows within the filtered subset.
    pub transactions: usize,
}

#[derive(Debug)]
pub struct View {
    /// Every row of the feed, date-sorted, with the running balance applied.
    pub rows: Vec<Row>,
    /// Indices into `rows` that pass the filter, in display order.
    pub visible: Vec<usize>,
    pub summary: Summary,
    /// Whether the feed carries the optional `KET.PV` column.
    pub has_ket_pv: bool,
    /// Parse-quality counters for the `JUMLAH` column.
    pub report: rupiah::Report,
}

pub(crate) mod function {
    use super::{Error, Row, Summary, Tipe, View, REQUIRED_COLUMNS};
    use crate::filter::{CompiledFilter, TipeFilter};
    use crate::table::Table;
    use crate::{filter, rupiah};

    /// Build the petty-cash view: validate the feed, normalize directions and
    /// amounts, sort by date, accumulate the running balance and apply `filter`.
    ///
    /// The running balance and the final-balance metric always cover the full
    /// feed; the filter only selects which rows and totals are displayed.
    pub fn ledger_view(feed: &Table, filter: &CompiledFilter) -> Result<View, Error> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| feed.column(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                missing,
                available: feed.headers().to_vec(),
            });
        }
        let date_idx = feed.column("DATE").expect("validated above");
        let keterangan_idx = feed.column("KETERANGAN").expect("validated above");
        let tipe_idx = feed.column("TIPE").expect("validated above");
        let jumlah_idx = feed.column("JUMLAH").expect("validated above");
        let deskripsi_idx = feed.column("DESKRIPSI");
        let project_idx = feed.column("PROJECT/PJ");
        let ket_pv_idx = feed.column("KET.PV");

        let amounts = rupiah::parse_amounts_report(feed.column_values(jumlah_idx));
        let mut rows: Vec<Row> = (0..feed.len())
            .map(|row| {
                let tipe = Tipe::from_raw(feed.cell(row, tipe_idx));
                let amount = amounts.amounts[row];
                Row {
                    date: filter::parse_day_first(feed.cell(row, date_idx)),
                    keterangan: feed.cell(row, keterangan_idx).to_string(),
                    deskripsi: deskripsi_idx
                        .map(|idx| feed.cell(row, idx).to_string())
                        .unwrap_or_default(),
                    project: project_idx
                        .map(|idx| feed.cell(row, idx).to_string())
                        .unwrap_or_default(),
                    ket_pv: ket_pv_idx
                        .map(|idx| feed.cell(row, idx).trim().to_uppercase()),
                    tipe,
                    amount,
                    signed: tipe.signed(amount),
                    balance: 0,
                }
            })
            .collect();

        // undated rows go last; the sort is stable so ties keep feed order
        rows.sort_by_key(|row| (row.date.is_none(), row.date));
        let mut balance = 0i64;
        for row in &mut rows {
            // saturate like Tipe::signed does instead of tripping overflow checks
            balance = balance.saturating_add(row.signed);
            row.balance = balance;
        }

        let visible: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| passes(filter, row).then_some(idx))
            .collect();
        let total_in = visible
            .iter()
            .filter(|&&idx| rows[idx].tipe == Tipe::In)
            .map(|&idx| rows[idx].amount)
            .sum();
        let total_out = visible
            .iter()
            .filter(|&&idx| rows[idx].tipe == Tipe::Out)
            .map(|&idx| rows[idx].amount)
            .sum();
        let net = visible.iter().map(|&idx| rows[idx].signed).sum();

        Ok(View {
            summary: Summary {
                final_balance: rows.last().map(|row| row.balance).unwrap_or(0),
                total_in,
                total_out,
                net,
                transactions: visible.len(),
            },
            visible,
            has_ket_pv: ket_pv_idx.is_some(),
            report: amounts.report,
            rows,
        })
    }

    fn passes(filter: &CompiledFilter, row: &Row) -> bool {
        if let Some(from) = filter.from {
            match row.date {
                Some(date) if date >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = filter.to {
            match row.date {
                Some(date) if date <= to => {}
                _ => return false,
            }
        }
        match filter.tipe {
            TipeFilter::All => {}
            TipeFilter::In if row.tipe == Tipe::In => {}
            TipeFilter::Out if row.tipe == Tipe::Out => {}
            _ => return false,
        }
        if let Some(keyword) = &filter.search {
            let haystack =
                format!("{} {} {}", row.keterangan, row.deskripsi, row.project).to_uppercase();
            if !haystack.contains(keyword) {
                return false;
            }
        }
        true
    }
}
