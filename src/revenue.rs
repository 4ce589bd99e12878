//! Revenue adjuster
//!
//! Rewrites a sales CSV so rows with a 20-30% discount (inclusive) carry
//! 20% more revenue. Every other cell and row is copied through as-is.

use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// Discounts (percent) that receive the uplift
pub const DISCOUNT_RANGE: RangeInclusive<f64> = 20.0..=30.0;

/// Revenue multiplier for rows in [`DISCOUNT_RANGE`]
pub const REVENUE_UPLIFT: f64 = 1.2;

const DISCOUNT: &str = "discount";
const REVENUE: &str = "revenue";
const QUANTITY: &str = "quantity";
const PRODUCT_PRICE: &str = "product_price";

/// Adjuster errors
#[derive(Debug, Error)]
pub enum AdjustError {
    /// Malformed CSV
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// File could not be opened or written
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Header lacks a required column
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
    /// A cell could not be parsed as a number
    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        /// 1-based data row
        row: u64,
        /// Column name
        column: &'static str,
        /// Raw cell text
        value: String,
    },
}

/// Outcome of an adjustment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdjustSummary {
    /// Data rows read
    pub rows: u64,
    /// Rows whose revenue was raised
    pub adjusted: u64,
}

struct Columns {
    discount: usize,
    revenue: usize,
    quantity: usize,
    product_price: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, AdjustError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(AdjustError::MissingColumn(name))
        };
        Ok(Self {
            discount: find(DISCOUNT)?,
            revenue: find(REVENUE)?,
            quantity: find(QUANTITY)?,
            product_price: find(PRODUCT_PRICE)?,
        })
    }
}

/// Adjust `input` into `output`.
pub fn adjust_revenue<R: Read, W: Write>(input: R, output: W) -> Result<AdjustSummary, AdjustError> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(output);

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;
    writer.write_record(&headers)?;

    let mut summary = AdjustSummary::default();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i as u64 + 1;
        summary.rows += 1;

        let discount: f64 = parse_cell(&record, columns.discount, DISCOUNT, row)?;
        let revenue: f64 = parse_cell(&record, columns.revenue, REVENUE, row)?;
        let _: i64 = parse_cell(&record, columns.quantity, QUANTITY, row)?;
        let _: f64 = parse_cell(&record, columns.product_price, PRODUCT_PRICE, row)?;

        if DISCOUNT_RANGE.contains(&discount) {
            let adjusted = format_float(revenue * REVENUE_UPLIFT);
            let record: csv::StringRecord = record
                .iter()
                .enumerate()
                .map(|(j, cell)| if j == columns.revenue { adjusted.as_str() } else { cell })
                .collect();
            writer.write_record(&record)?;
            summary.adjusted += 1;
        } else {
            writer.write_record(&record)?;
        }
    }

    writer.flush()?;
    Ok(summary)
}

/// Adjust the CSV at `input`, writing the result to `output`.
pub fn adjust_file(input: &Path, output: &Path) -> Result<AdjustSummary, AdjustError> {
    let reader = File::open(input)?;
    let writer = File::create(output)?;
    adjust_revenue(reader, writer)
}

fn parse_cell<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    column: &'static str,
    row: u64,
) -> Result<T, AdjustError> {
    let value = record.get(index).unwrap_or_default();
    value.trim().parse().map_err(|_| AdjustError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

/// Shortest round-trip decimal; integral values keep a trailing `.0`
/// and very large or small magnitudes use `e+NN` / `e-NN` notation.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }

    let magnitude = value.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => formatted,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
