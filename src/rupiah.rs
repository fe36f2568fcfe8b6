//! Normalization of rupiah amount text as it appears in spreadsheet exports.
//!
//! The feeds mix several incompatible separator conventions in the same column,
//! with no format tag per row. Each value is classified against anchored
//! patterns and resolved accordingly; anything unparseable degrades to 0 so a
//! report never fails on bad cells.

use regex::Regex;
use std::sync::OnceLock;

/// The separator convention a cleaned amount text matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// `1,234,567` - comma as thousands grouping.
    MultiComma,
    /// `1.234.567` or `1.234.567,89` - dot grouping, optional comma decimals.
    IdDot,
    /// `38,00` - a lone two-digit comma suffix denoting thousands.
    TwoDecComma,
    /// Anything else - digits are extracted as-is.
    Fallback,
}

struct Patterns {
    multi_comma: Regex,
    id_dot: Regex,
    two_dec_comma: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        multi_comma: Regex::new(r"^\d{1,3}(,\d{3})+$").expect("valid pattern"),
        id_dot: Regex::new(r"^\d{1,3}(\.\d{3})+(,\d{2})?$").expect("valid pattern"),
        two_dec_comma: Regex::new(r"^\d{1,3},\d{2}$").expect("valid pattern"),
    })
}

/// Determine the [`FormatClass`] of an already cleaned amount text.
///
/// The first three classes are mutually exclusive thanks to the anchoring;
/// the evaluation order only hardens against malformed input.
pub fn classify(cleaned: &str) -> FormatClass {
    let p = patterns();
    if p.multi_comma.is_match(cleaned) {
        FormatClass::MultiComma
    } else if p.id_dot.is_match(cleaned) {
        FormatClass::IdDot
    } else if p.two_dec_comma.is_match(cleaned) {
        FormatClass::TwoDecComma
    } else {
        FormatClass::Fallback
    }
}

/// Parse-quality counters for a batch of amount values.
///
/// The amounts themselves never carry an error, so these counts are the only
/// way for an operator to notice a data-quality regression in a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Values that were empty or a missing-marker and resolved to 0 directly.
    pub missing: usize,
    /// Values that matched no separator convention and went through digit extraction.
    pub fallback_hits: usize,
    /// Values whose numeric parse failed after classification and resolved to 0.
    pub parse_failures: usize,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.fallback_hits == 0 && self.parse_failures == 0
    }
}

/// The result of parsing a batch of raw amount values.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// One non-negative amount per input value, in input order.
    pub amounts: Vec<u64>,
    pub report: Report,
}

/// Like [`parse_amounts()`], but additionally count the values that needed
/// the fallback class or failed to parse numerically.
pub fn parse_amounts_report(values: impl IntoIterator<Item = impl AsRef<str>>) -> Outcome {
    let mut out = Outcome::default();
    for value in values {
        let cleaned = clean(value.as_ref());
        let amount = if is_missing(&cleaned) {
            out.report.missing += 1;
            0
        } else {
            resolve(&cleaned, &mut out.report)
        };
        out.amounts.push(amount);
    }
    out
}

/// Turn raw amount text values into non-negative integer amounts, one output
/// per input and in the same order.
///
/// This is a total function: missing markers (`""`, `"nan"`, `"None"`) and
/// values that cannot be resolved numerically all become 0.
pub fn parse_amounts(values: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<u64> {
    parse_amounts_report(values).amounts
}

/// Strip the currency marker and invisible characters a spreadsheet export
/// tends to leave in amount cells.
fn clean(raw: &str) -> String {
    raw.replace("Rp", "")
        .replace('\u{feff}', "")
        .replace('\u{a0}', "")
        .trim()
        .to_string()
}

fn is_missing(cleaned: &str) -> bool {
    matches!(cleaned, "" | "nan" | "None")
}

fn resolve(cleaned: &str, report: &mut Report) -> u64 {
    match classify(cleaned) {
        FormatClass::MultiComma => parse_int(&cleaned.replace(',', ""), report),
        FormatClass::IdDot => {
            let no_dots = cleaned.replace('.', "");
            // the anchoring permits at most one comma, introducing a `,dd`
            // decimal remainder which is dropped entirely
            let integral = no_dots.split(',').next().unwrap_or(no_dots.as_str());
            parse_int(integral, report)
        }
        FormatClass::TwoDecComma => match cleaned.replace(',', ".").parse::<f64>() {
            // the two-digit comma suffix denotes thousands in these sheets
            Ok(real) => (real * 1000.0).trunc() as u64,
            Err(_) => {
                report.parse_failures += 1;
                0
            }
        },
        FormatClass::Fallback => {
            report.fallback_hits += 1;
            let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                0
            } else {
                parse_int(&digits, report)
            }
        }
    }
}

fn parse_int(digits: &str, report: &mut Report) -> u64 {
    digits.parse().unwrap_or_else(|_| {
        report.parse_failures += 1;
        0
    })
}

/// Render an amount for display, e.g. `Rp 1.234.567`.
///
/// Digits are grouped in threes from the right with a period. Negative values
/// occur in net totals and keep their sign. This is display-only and lossy;
/// its output is never meant to be fed back into the parser.
pub fn format_rp(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("Rp {}{grouped}", if amount < 0 { "-" } else { "" })
}

/// Like [`format_rp()`], with a missing amount displayed as the zero amount.
pub fn format_rp_or_zero(amount: Option<i64>) -> String {
    format_rp(amount.unwrap_or(0))
}
