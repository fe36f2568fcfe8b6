use crate::options::Args;
use anyhow::Context;
use clap::Parser;
use kastool::filter::Filter;
use kastool::rupiah::{format_rp, Report};
use kastool::stock::RestockFlag;
use kastool::table::Table;
use kastool::{ledger, request, stock};
use std::io::Write;
use std::path::Path;

mod options {
    use std::path::PathBuf;

    #[derive(Debug, clap::Parser)]
    #[clap(
        name = "kastool",
        about = "A dashboard over petty-cash, purchase-request and cutting-stock sheet exports"
    )]
    pub enum Args {
        /// Render the petty-cash ledger with its running balance and cashflow metrics.
        Ledger {
            /// A filter preset in ron format; the explicit flags below override its fields.
            #[clap(long, short = 'f')]
            filter: Option<PathBuf>,
            /// Keep rows from this day-first date onwards, e.g. 01/02/2026.
            #[clap(long)]
            from: Option<String>,
            /// Keep rows up to this day-first date, inclusive.
            #[clap(long)]
            to: Option<String>,
            /// Keep only this direction: ALL, IN or OUT.
            #[clap(long)]
            tipe: Option<String>,
            /// Keep rows whose descriptive columns contain this text, case-insensitively.
            #[clap(long)]
            search: Option<String>,
            /// The CSV export of the petty-cash sheet.
            csv_file: PathBuf,
        },
        /// Summarize purchase requests, optionally narrowed to one project.
        Requests {
            /// Keep only rows of this PROJECT; ALL keeps everything.
            #[clap(long, short = 'p')]
            project: Option<String>,
            /// The CSV export of the purchase-request sheet.
            csv_file: PathBuf,
        },
        /// Evaluate stock levels against their safety-stock thresholds.
        Stock {
            /// The CSV export of the cutting-stock sheet.
            csv_file: PathBuf,
        },
        /// Print the headline metrics of all three feeds at once.
        Overview {
            petty_cash: PathBuf,
            purchase_requests: PathBuf,
            stock: PathBuf,
        },
    }
}

fn main() -> anyhow::Result<()> {
    let args = options::Args::parse();
    let mut out = std::io::BufWriter::new(std::io::stdout());
    match args {
        Args::Ledger {
            filter,
            from,
            to,
            tipe,
            search,
            csv_file,
        } => {
            let mut preset: Filter = match filter {
                Some(path) => ron::de::from_reader(std::fs::File::open(&path).with_context(
                    || format!("Could not open filter preset at '{}'", path.display()),
                )?)?,
                None => Filter::default(),
            };
            preset.from = from.or(preset.from);
            preset.to = to.or(preset.to);
            preset.tipe = tipe.or(preset.tipe);
            preset.search = search.or(preset.search);
            let view = kastool::ledger_view(&read_table(&csv_file)?, &preset.compile()?)?;
            parse_note("JUMLAH", &view.report);
            print_ledger(&view, &mut out)?;
        }
        Args::Requests { project, csv_file } => {
            let table = read_table(&csv_file)?;
            let view = kastool::request_view(&table, project.as_deref());
            parse_note("SUBTOTAL", &view.report);
            print_requests(&table, &view, &mut out)?;
        }
        Args::Stock { csv_file } => {
            let table = read_table(&csv_file)?;
            let view = kastool::stock_view(&table);
            print_stock(&table, &view, &mut out)?;
        }
        Args::Overview {
            petty_cash,
            purchase_requests,
            stock,
        } => {
            let feeds = kastool::feeds::load_feeds(
                open(&petty_cash)?,
                open(&purchase_requests)?,
                open(&stock)?,
            )?;
            let ledger = kastool::ledger_view(&feeds.petty_cash, &Default::default())?;
            let requests = kastool::request_view(&feeds.purchase_requests, None);
            let stock = kastool::stock_view(&feeds.stock);
            writeln!(
                out,
                "Saldo akhir: {}",
                format_rp(ledger.summary.final_balance)
            )?;
            writeln!(
                out,
                "Total estimasi pembelian: {}",
                rp_unsigned(requests.total_estimation)
            )?;
            writeln!(out, "Total item request: {}", requests.item_count)?;
            writeln!(out, "Item perlu re-stock: {}", stock.restock_count)?;
            writeln!(out, "Item aman: {}", stock.sufficient_count)?;
        }
    };
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<std::fs::File> {
    std::fs::File::open(path)
        .with_context(|| format!("Could not read from CSV file at '{}'", path.display()))
}

fn read_table(path: &Path) -> anyhow::Result<Table> {
    Ok(Table::from_reader(open(path)?)?)
}

fn rp_unsigned(amount: u64) -> String {
    format_rp(i64::try_from(amount).unwrap_or(i64::MAX))
}

/// Point the operator at suspicious amount cells; the amounts themselves have
/// already degraded to 0 where unreadable.
fn parse_note(column: &str, report: &Report) {
    if !report.is_clean() {
        eprintln!(
            "Note: in column {column}, {} value(s) needed bare digit extraction and {} failed to parse numerically",
            report.fallback_hits, report.parse_failures
        );
    }
}

fn print_ledger(view: &ledger::View, mut out: impl Write) -> anyhow::Result<()> {
    let summary = &view.summary;
    writeln!(
        out,
        "Saldo akhir (seluruh data): {}",
        format_rp(summary.final_balance)
    )?;
    writeln!(out, "Total IN (filter): {}", rp_unsigned(summary.total_in))?;
    writeln!(
        out,
        "Total OUT (filter): {}",
        rp_unsigned(summary.total_out)
    )?;
    writeln!(out, "Net (filter): {}", format_rp(summary.net))?;
    writeln!(out, "Total transaksi: {}", summary.transactions)?;
    writeln!(out)?;

    let mut csv = csv::Writer::from_writer(out);
    let mut header = vec!["DATE", "KETERANGAN", "DESKRIPSI", "PROJECT/PJ"];
    if view.has_ket_pv {
        header.push("KET.PV");
    }
    header.extend(["TIPE", "JUMLAH", "SALDO"]);
    csv.write_record(&header)?;
    for &idx in &view.visible {
        let row = &view.rows[idx];
        let mut record = vec![
            row.date.map(|date| date.to_string()).unwrap_or_default(),
            row.keterangan.clone(),
            row.deskripsi.clone(),
            row.project.clone(),
        ];
        if let Some(pv) = &row.ket_pv {
            record.push(pv.clone());
        }
        record.push(row.tipe.as_str().to_string());
        record.push(rp_unsigned(row.amount));
        record.push(format_rp(row.balance));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

fn print_requests(table: &Table, view: &request::View, mut out: impl Write) -> anyhow::Result<()> {
    writeln!(
        out,
        "Total estimasi pembelian: {}",
        rp_unsigned(view.total_estimation)
    )?;
    writeln!(out, "Total item request: {}", view.item_count)?;
    if !view.projects.is_empty() {
        writeln!(out, "Projects: {}", view.projects.join(", "))?;
    }
    writeln!(out)?;

    let subtotal_idx = table.column("SUBTOTAL");
    let mut csv = csv::Writer::from_writer(out);
    csv.write_record(table.headers())?;
    for &row in &view.visible {
        let record: Vec<String> = (0..table.headers().len())
            .map(|column| match (&view.subtotals, subtotal_idx) {
                (Some(subtotals), Some(idx)) if idx == column => rp_unsigned(subtotals[row]),
                _ => table.cell(row, column).to_string(),
            })
            .collect();
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

fn print_stock(table: &Table, view: &stock::View, mut out: impl Write) -> anyhow::Result<()> {
    writeln!(out, "Item perlu re-stock: {}", view.restock_count)?;
    writeln!(out, "Item aman: {}", view.sufficient_count)?;
    writeln!(out)?;
    let flags = match &view.flags {
        Some(flags) => flags,
        None => {
            writeln!(
                out,
                "QTY and SAFETY STOCK columns are needed for restock evaluation; printing the feed as-is"
            )?;
            return write_rows(table, None, 0..table.len(), &mut out);
        }
    };

    writeln!(out, "Prioritas re-stock:")?;
    write_rows(
        table,
        Some(flags),
        view.restock_priority.iter().copied(),
        &mut out,
    )?;
    writeln!(out)?;
    writeln!(out, "Data stok lengkap:")?;
    write_rows(table, Some(flags), 0..table.len(), &mut out)
}

fn write_rows(
    table: &Table,
    flags: Option<&[RestockFlag]>,
    rows: impl Iterator<Item = usize>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(&mut *out);
    let mut header: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    if flags.is_some() {
        header.push("SYSTEM STATUS");
    }
    csv.write_record(&header)?;
    for row in rows {
        let mut record: Vec<String> = (0..table.headers().len())
            .map(|column| table.cell(row, column).to_string())
            .collect();
        if let Some(flags) = flags {
            record.push(flags[row].as_str().to_string());
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
