use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::PortfolioRepository;
use crate::error::PortfolioError;
use crate::reports::allocation::{calculate_allocation, AssetAllocation};
use crate::reports::valuation::{value_portfolio, AssetPerformance, ValueOverTime};

/// Performance of one portfolio over an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub portfolio_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Portfolio value on `end_date`
    pub total_value: Decimal,
    pub assets: Vec<AssetPerformance>,
    pub value_over_time: Vec<ValueOverTime>,
    pub allocation: Vec<AssetAllocation>,
}

impl PerformanceReport {
    pub fn realized_gain(&self) -> Result<Decimal, PortfolioError> {
        sum_gains(self.assets.iter().map(|a| a.realized_gain), "realized gain")
    }

    pub fn unrealized_gain(&self) -> Result<Decimal, PortfolioError> {
        sum_gains(self.assets.iter().map(|a| a.unrealized_gain), "unrealized gain")
    }
}

fn sum_gains(
    mut gains: impl Iterator<Item = Decimal>,
    what: &str,
) -> Result<Decimal, PortfolioError> {
    gains.try_fold(Decimal::ZERO, |total, gain| {
        total
            .checked_add(gain)
            .ok_or_else(|| PortfolioError::Overflow(format!("total {}", what)))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Mtd,     // Month-to-date
    Qtd,     // Quarter-to-date
    Ytd,     // Year-to-date
    OneYear, // Last 365 days
    AllTime, // Since first transaction
    Custom { from: NaiveDate, to: NaiveDate },
}

/// Resolve a period to `(start, end)` relative to `today`.
///
/// `earliest` is the portfolio's first trade date, used by `AllTime`
/// (a portfolio without transactions starts today). Custom ranges are
/// returned as given, even when `from > to`.
pub fn get_period_dates(
    period: &Period,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate)> {
    let range = match period {
        Period::Mtd => {
            let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .ok_or_else(|| anyhow!("Invalid current month"))?;
            (start, today)
        }
        Period::Qtd => {
            let quarter_start_month = ((today.month() - 1) / 3) * 3 + 1;
            let start = NaiveDate::from_ymd_opt(today.year(), quarter_start_month, 1)
                .ok_or_else(|| anyhow!("Invalid quarter start"))?;
            (start, today)
        }
        Period::Ytd => {
            let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                .ok_or_else(|| anyhow!("Invalid year start"))?;
            (start, today)
        }
        Period::OneYear => {
            let start = today
                .checked_sub_days(chrono::Days::new(365))
                .ok_or_else(|| anyhow!("Failed to compute one-year start"))?;
            (start, today)
        }
        Period::AllTime => (earliest.unwrap_or(today), today),
        Period::Custom { from, to } => (*from, *to),
    };

    Ok(range)
}

/// Calculate the performance report of a portfolio between two dates, inclusive.
///
/// Returns `Ok(None)` when the repository has no such portfolio. A range with
/// `end_date < start_date` is not an error: it produces an empty series and a
/// zero total.
pub fn calculate_performance<R>(
    repo: &R,
    portfolio_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Option<PerformanceReport>>
where
    R: PortfolioRepository + ?Sized,
{
    info!(
        "Retrieving performance for portfolio ID {} from {} to {}",
        portfolio_id, start_date, end_date
    );

    let Some(portfolio) = repo.load_portfolio(portfolio_id)? else {
        warn!("No performance data found for portfolio ID {}", portfolio_id);
        return Ok(None);
    };

    let valuation = value_portfolio(&portfolio, start_date, end_date)?;
    let allocation = calculate_allocation(&valuation.assets, valuation.total_value)?;

    debug!(
        points = valuation.value_over_time.len(),
        assets = valuation.assets.len(),
        total_value = %valuation.total_value,
        "Valuation complete"
    );
    info!(
        "Successfully retrieved performance for portfolio ID {}",
        portfolio_id
    );

    Ok(Some(PerformanceReport {
        portfolio_id,
        start_date,
        end_date,
        total_value: valuation.total_value,
        assets: valuation.assets,
        value_over_time: valuation.value_over_time,
        allocation,
    }))
}
