#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not parse '{value}' as a day-first date")]
    InvalidDate { value: String },
    #[error("'{value}' is not a recognized direction, use ALL, IN or OUT")]
    InvalidTipe { value: String },
}

/// A ledger filter as the user states it, storable as a ron document so
/// frequently used presets can be kept in a file.
///
/// Dates stay in their day-first textual form here and are only parsed by
/// [`Filter::compile()`], keeping presets trivially (de)serializable.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
    /// Inclusive start date, day-first, e.g. `01/02/2026`.
    pub from: Option<String>,
    /// Inclusive end date, day-first.
    pub to: Option<String>,
    /// `ALL`, `IN` or `OUT`.
    pub tipe: Option<String>,
    /// Case-insensitive substring sought in the descriptive columns.
    pub search: Option<String>,
}

impl Filter {
    /// Validate the textual fields into a [`CompiledFilter`] ready for row matching.
    pub fn compile(&self) -> Result<CompiledFilter, Error> {
        let parse = |value: &Option<String>| -> Result<Option<time::Date>, Error> {
            value
                .as_deref()
                .map(|value| {
                    parse_day_first(value).ok_or_else(|| Error::InvalidDate {
                        value: value.to_string(),
                    })
                })
                .transpose()
        };
        Ok(CompiledFilter {
            from: parse(&self.from)?,
            to: parse(&self.to)?,
            tipe: match self.tipe.as_deref() {
                None => TipeFilter::All,
                Some(value) => match value.trim().to_uppercase().as_str() {
                    "ALL" => TipeFilter::All,
                    "IN" => TipeFilter::In,
                    "OUT" => TipeFilter::Out,
                    _ => {
                        return Err(Error::InvalidTipe {
                            value: value.to_string(),
                        })
                    }
                },
            },
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|kw| !kw.is_empty())
                .map(str::to_uppercase),
        })
    }
}

/// The direction subset a filter keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TipeFilter {
    #[default]
    All,
    In,
    Out,
}

/// A validated filter; [`Default`] keeps every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilter {
    pub from: Option<time::Date>,
    pub to: Option<time::Date>,
    pub tipe: TipeFilter,
    /// Already upper-cased for case-insensitive matching.
    pub search: Option<String>,
}

/// Parse `value` as a date the way the sheets write them: day first, with
/// `/` or `-` separators, or ISO as a courtesy. `None` if no format fits.
pub fn parse_day_first(value: &str) -> Option<time::Date> {
    static SLASH: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[day padding:none]/[month padding:none]/[year]");
    static DASH: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[day padding:none]-[month padding:none]-[year]");
    static ISO: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[year]-[month]-[day]");
    let value = value.trim();
    [SLASH, DASH, ISO]
        .into_iter()
        .find_map(|format| time::Date::parse(value, format).ok())
}
