//! Sales Export
//!
//! Flattens ledger records into [`SaleRow`] values and writes them as CSV or as a
//! terminal table.

use std::{fs::File, io, path::Path};

use csv::WriterBuilder;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    ledger::{PaymentMethod, SaleRecord},
    pricing::to_decimal,
};

/// Default file name for [`export_to_path`] callers without a preference.
pub const DEFAULT_EXPORT_FILE: &str = "sales_report.csv";

/// CSV header, in column order.
pub const EXPORT_HEADERS: [&str; 5] = ["id", "date", "total", "items", "paymentMethod"];

/// Shown in the history table when there are no sales.
pub const EMPTY_HISTORY: &str = "No sales yet.";

/// Date format used by the history table.
const TABLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while exporting sales.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error writing the export
    #[error("Failed to write export: {0}")]
    Io(#[from] io::Error),

    /// CSV encoding error
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One sale, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    /// Transaction id
    pub id: String,

    /// Checkout instant
    pub date: Timestamp,

    /// Amount charged in major units, e.g. `12.15`
    pub total: Decimal,

    /// Line summary
    pub items: String,

    /// Payment method
    pub payment_method: PaymentMethod,
}

impl From<&SaleRecord> for SaleRow {
    fn from(record: &SaleRecord) -> Self {
        Self {
            id: record.id().to_string(),
            date: record.timestamp(),
            total: to_decimal(&record.total()),
            items: record.line_summary().to_string(),
            payment_method: record.payment_method(),
        }
    }
}

/// Flatten records into rows, keeping their order.
pub fn export<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Vec<SaleRow> {
    records.into_iter().map(SaleRow::from).collect()
}

/// Write a header row and then one row per sale.
///
/// # Errors
///
/// Returns an [`ExportError`] if a row cannot be encoded or written.
pub fn write_csv(out: impl io::Write, rows: &[SaleRow]) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);

    writer.write_record(EXPORT_HEADERS)?;

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;

    Ok(())
}

/// Write rows as CSV to a file at `path`, replacing it if it exists.
///
/// # Errors
///
/// Returns an [`ExportError`] if the file cannot be created or written.
pub fn export_to_path(path: impl AsRef<Path>, rows: &[SaleRow]) -> Result<(), ExportError> {
    let file = File::create(path)?;

    write_csv(file, rows)
}

/// Print the sales history as a table.
///
/// # Errors
///
/// Returns an [`ExportError`] if the table cannot be written.
pub fn write_table<'a>(
    mut out: impl io::Write,
    records: impl IntoIterator<Item = &'a SaleRecord>,
) -> Result<(), ExportError> {
    let mut builder = Builder::default();

    builder.push_record(["Transaction ID", "Date", "Items", "Total"]);

    let mut rows = 0usize;

    for record in records {
        builder.push_record([
            format!("#{}", record.id()),
            record.timestamp().strftime(TABLE_DATE_FORMAT).to_string(),
            record.line_summary().to_string(),
            record.total().to_string(),
        ]);

        rows += 1;
    }

    if rows == 0 {
        builder.push_record([EMPTY_HISTORY, "", "", ""]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::last(), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}
