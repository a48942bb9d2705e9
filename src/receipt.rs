//! Receipt
//!
//! Terminal rendering of the order being rung up: one row per cart line followed
//! by the subtotal, tax and total.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::{OrderTotals, PricingError, percent_points},
};

/// Errors that can occur when rendering an order.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating line or order totals.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the cart as an itemised order with totals at `rate`.
///
/// # Errors
///
/// Returns an error if a total cannot be computed or the output cannot be written.
pub fn write_order(
    mut out: impl io::Write,
    cart: &Cart,
    rate: Percentage,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Category", "Unit Price", "Qty", "Total"]);

    for (idx, line) in cart.lines().iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.item().name().to_string(),
            line.item().category().to_string(),
            line.item().price().to_string(),
            line.quantity().to_string(),
            line.total()?.to_string(),
        ]);
    }

    write_order_table(&mut out, builder)?;

    write_order_summary(&mut out, &cart.totals(rate)?, rate)
}

fn write_order_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());
    table.modify(Columns::first(), color_dark_grey());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_order_summary(
    out: &mut impl io::Write,
    totals: &OrderTotals,
    rate: Percentage,
) -> Result<(), ReceiptError> {
    let subtotal_label = " Subtotal:";
    let tax_label = format!(" Tax ({}%):", percent_points(rate));
    let total_label = " \x1b[1mTotal:\x1b[0m";

    let subtotal_val = format!("{}  ", totals.subtotal);
    let tax_val = format!("{}  ", totals.tax);
    let total_val = format!("{}  ", totals.total);

    let label_width = visible_width(subtotal_label)
        .max(visible_width(&tax_label))
        .max(visible_width(total_label));

    let value_width = subtotal_val.len().max(tax_val.len()).max(total_val.len());

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
    write_summary_line(out, &tax_label, &tax_val, label_width, value_width)?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Width of `s` once ANSI escape sequences are stripped.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Right-aligns `label` and `value` in their columns.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
