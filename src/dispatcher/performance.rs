//! Performance command dispatcher implementation

use crate::error::PortfolioError;
use crate::reports::{self, PerformanceReport, Period};
use crate::{cli, db};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::info;

/// Parse a period string (MTD, QTD, YTD, 1Y, ALL, YYYY, or from:to)
///
/// A `from:to` range is not checked for order; a reversed range yields an
/// empty report.
pub fn parse_period_string(period: &str) -> Result<Period> {
    let upper = period.trim().to_uppercase();
    match upper.as_str() {
        "MTD" => Ok(Period::Mtd),
        "QTD" => Ok(Period::Qtd),
        "YTD" => Ok(Period::Ytd),
        "1Y" | "ONEYEAR" => Ok(Period::OneYear),
        "ALL" | "ALLTIME" => Ok(Period::AllTime),
        _ => {
            // YYYY -> YYYY-01-01:YYYY-12-31
            if let Ok(year) = upper.parse::<i32>() {
                if (1900..=2100).contains(&year) {
                    let from = NaiveDate::from_ymd_opt(year, 1, 1)
                        .ok_or_else(|| anyhow!("Invalid year: {}", year))?;
                    let to = NaiveDate::from_ymd_opt(year, 12, 31)
                        .ok_or_else(|| anyhow!("Invalid year: {}", year))?;
                    return Ok(Period::Custom { from, to });
                }
            }

            if let Some((from_str, to_str)) = upper.split_once(':') {
                let from = NaiveDate::parse_from_str(from_str, "%Y-%m-%d").map_err(|_| {
                    anyhow!("Invalid from date: {}. Use YYYY-MM-DD format.", from_str)
                })?;
                let to = NaiveDate::parse_from_str(to_str, "%Y-%m-%d")
                    .map_err(|_| anyhow!("Invalid to date: {}. Use YYYY-MM-DD format.", to_str))?;
                Ok(Period::Custom { from, to })
            } else {
                Err(anyhow!(
                    "Invalid period '{}'. Use: MTD, QTD, YTD, 1Y, ALL, YYYY, or from:to (YYYY-MM-DD:YYYY-MM-DD)",
                    period
                ))
            }
        }
    }
}

/// Resolve `period` against `today` and build the report, turning a missing
/// portfolio into `PortfolioError::NotFound`.
pub fn build_report(
    conn: &Connection,
    portfolio_id: i64,
    period: &Period,
    today: NaiveDate,
) -> Result<PerformanceReport> {
    let earliest = match period {
        Period::AllTime => db::get_earliest_transaction_date(conn, portfolio_id)?,
        _ => None,
    };
    let (start, end) = reports::get_period_dates(period, today, earliest)?;

    reports::calculate_performance(conn, portfolio_id, start, end)?
        .ok_or_else(|| PortfolioError::NotFound(portfolio_id).into())
}

pub async fn dispatch_performance_show(
    db_path: Option<PathBuf>,
    portfolio_id: i64,
    period_str: &str,
    json_output: bool,
) -> Result<()> {
    let period = parse_period_string(period_str)?;
    info!("Performance for portfolio {} over {:?}", portfolio_id, period);

    db::init_database(db_path.clone())?;
    let conn = db::open_db(db_path)?;

    let today = chrono::Local::now().date_naive();
    let report = build_report(&conn, portfolio_id, &period, today)?;

    if json_output {
        println!("{}", cli::formatters::format_performance_json(&report)?);
    } else {
        print!("{}", cli::formatters::format_performance_table(&report)?);
    }

    Ok(())
}
