pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::OutputFormat;

/// One tabular view of a command's result, cells already formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Sheet {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }
}

/// What a command hands back: the envelope printed as JSON or reduced to
/// one value, and the sheets shown as tables or written as CSV.
pub struct Report {
    pub envelope: Value,
    /// Field/value headline, shown above the detail table
    pub summary: Option<Sheet>,
    /// Month-by-month, per-scenario, per-threshold or per-step rows
    pub detail: Sheet,
}

pub fn render(format: &OutputFormat, report: &Report) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => json::print_json(&report.envelope),
        OutputFormat::Table => table::print_report(report),
        OutputFormat::Csv => csv_out::write_sheet(std::io::stdout().lock(), &report.detail)?,
        OutputFormat::Minimal => minimal::print_minimal(&report.envelope),
    }
    Ok(())
}

/// Currency amount to the cent.
pub fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

/// Fraction as a percent with two decimals.
pub fn percent(rate: Decimal) -> String {
    format!("{:.2}%", (rate * Decimal::ONE_HUNDRED).round_dp(2))
}

pub fn month(month: Option<u32>) -> String {
    month.map_or_else(|| "-".to_string(), |m| m.to_string())
}
