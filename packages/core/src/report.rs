//! Hourly fee report: rows, reporting window, CSV output and a short
//! cheapest/most expensive hour summary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::history::types::{hour_bucket, SECONDS_PER_HOUR};
use crate::store::HourBucketStore;

/// One CSV row. Field order and names are the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub hour_epoch: i64,
    pub hour_utc: String,
    pub avg_base_fee_gwei: f64,
    pub avg_tip_gwei_p50: f64,
    pub avg_gas_price_gwei: f64,
    pub blocks: u64,
}

/// Cheapest and most expensive hour of a report, by average gas price.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub cheapest: OutputRow,
    pub most_expensive: OutputRow,
    /// Block-weighted mean of the hourly average gas prices.
    pub mean_gas_price_gwei: f64,
    pub total_blocks: u64,
}

/// Turn buckets into rows, ascending by hour, keeping only hours in
/// `[end_hour - window_hours, end_hour]` where `end_hour` is
/// `latest_anchor` floored to the hour.
///
/// Without an anchor nothing was ever ingested, so there is nothing to keep.
pub fn build_rows(
    buckets: &HourBucketStore,
    latest_anchor: Option<i64>,
    window_hours: u64,
) -> Vec<OutputRow> {
    let Some(latest_anchor) = latest_anchor else {
        return Vec::new();
    };

    let end_hour = hour_bucket(latest_anchor);
    let start_hour = end_hour - window_hours as i64 * SECONDS_PER_HOUR;

    buckets
        .iter()
        .filter(|(hour, _)| (start_hour..=end_hour).contains(hour))
        .map(|(hour, bucket)| OutputRow {
            hour_epoch: hour,
            hour_utc: format_hour_utc(hour),
            avg_base_fee_gwei: round4(bucket.avg_base_fee()),
            avg_tip_gwei_p50: round4(bucket.avg_tip()),
            avg_gas_price_gwei: round4(bucket.avg_gas_price()),
            blocks: bucket.count,
        })
        .collect()
}

/// `YYYY-MM-DD HH:00:00` in UTC.
pub fn format_hour_utc(hour_epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(hour_epoch, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:00:00").to_string())
        .unwrap_or_else(|| hour_epoch.to_string())
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Write `rows` to a new file at `path`, replacing any existing file.
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<(), AppError> {
    let file = File::create(path)?;
    write_rows(file, rows)
}

/// Header plus one record per row. Zero rows produce zero bytes, not even
/// a header.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), AppError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn summarize(rows: &[OutputRow]) -> Option<ReportSummary> {
    let cheapest = rows
        .iter()
        .min_by(|a, b| a.avg_gas_price_gwei.total_cmp(&b.avg_gas_price_gwei))?;
    let most_expensive = rows
        .iter()
        .max_by(|a, b| a.avg_gas_price_gwei.total_cmp(&b.avg_gas_price_gwei))?;

    let total_blocks: u64 = rows.iter().map(|row| row.blocks).sum();
    let weighted: f64 = rows
        .iter()
        .map(|row| row.avg_gas_price_gwei * row.blocks as f64)
        .sum();
    let mean_gas_price_gwei = if total_blocks == 0 {
        0.0
    } else {
        round4(weighted / total_blocks as f64)
    };

    Some(ReportSummary {
        cheapest: cheapest.clone(),
        most_expensive: most_expensive.clone(),
        mean_gas_price_gwei,
        total_blocks,
    })
}
