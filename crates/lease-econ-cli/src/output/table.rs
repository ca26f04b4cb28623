use colored::Colorize;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{Report, Sheet};

pub fn print_report(report: &Report) {
    if let Some(summary) = &report.summary {
        println!("{}", sheet_table(summary));
    }
    if !report.detail.rows.is_empty() {
        println!("\n{}", report.detail.title.bold());
        println!("{}", sheet_table(&report.detail));
    }
    print_notes(&report.envelope);
}

fn sheet_table(sheet: &Sheet) -> Table {
    let mut builder = Builder::default();
    builder.push_record(sheet.headers.clone());
    for row in &sheet.rows {
        builder.push_record(row.clone());
    }
    Table::from(builder)
}

/// Engine warnings and the methodology line from the envelope.
fn print_notes(envelope: &Value) {
    let warnings: Vec<&str> = envelope
        .get("warnings")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow());
        for w in warnings {
            println!("  - {}", w);
        }
    }

    if let Some(methodology) = envelope.get("methodology").and_then(Value::as_str) {
        println!("\n{} {}", "Methodology:".dimmed(), methodology);
    }
}
