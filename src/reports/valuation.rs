use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::db::{Asset, Portfolio};
use crate::error::PortfolioError;
use crate::ledger::LedgerCursor;

/// Per-asset snapshot at the end of the valuation range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPerformance {
    pub asset_id: i64,
    pub name: String,
    pub ticker: String,
    pub value: Decimal,
    pub realized_gain: Decimal,
    pub unrealized_gain: Decimal,
}

/// Total portfolio value on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueOverTime {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Output of the day loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Valuation {
    pub value_over_time: Vec<ValueOverTime>,
    /// Empty unless the range contains its end date (i.e. `start <= end`)
    pub assets: Vec<AssetPerformance>,
    pub total_value: Decimal,
}

/// Number of calendar days in `[start, end]`, zero when `end < start`
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> usize {
    usize::try_from((end - start).num_days() + 1).unwrap_or(0)
}

/// Value every asset of the portfolio on every day from `start` to `end` inclusive.
///
/// Each asset keeps one ledger cursor that moves forward a day at a time;
/// the result is the same as replaying each asset's history from scratch
/// on every day. An asset's value is its held quantity times the price of
/// its latest transaction on or before that day.
///
/// Fails with [`PortfolioError::Overflow`] when a position or a daily total
/// does not fit in a `Decimal`.
pub fn value_portfolio(
    portfolio: &Portfolio,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Valuation, PortfolioError> {
    let days = days_in_range(start, end);
    debug!(
        assets = portfolio.assets.len(),
        days,
        "Valuing portfolio {} from {} to {}",
        portfolio.name,
        start,
        end
    );

    let mut cursors: Vec<(&Asset, LedgerCursor)> = portfolio
        .assets
        .iter()
        .map(|asset| (asset, LedgerCursor::new(&asset.transactions)))
        .collect();

    let mut valuation = Valuation {
        value_over_time: Vec::with_capacity(days),
        ..Valuation::default()
    };

    for day in start.iter_days().take(days) {
        let is_end = day == end;
        let mut daily_total = Decimal::ZERO;

        for (asset, cursor) in cursors.iter_mut() {
            let state = cursor.advance_to(day)?;
            let value = state.market_value()?;

            if is_end {
                valuation.assets.push(AssetPerformance {
                    // Assets read from the store always carry an id
                    asset_id: asset.id.unwrap_or_default(),
                    name: asset.name.clone(),
                    ticker: asset.ticker.clone(),
                    value,
                    realized_gain: state.realized_gain,
                    unrealized_gain: state.unrealized_gain()?,
                });
            }

            daily_total = daily_total
                .checked_add(value)
                .ok_or_else(|| PortfolioError::Overflow(format!("portfolio total on {}", day)))?;
        }

        valuation.value_over_time.push(ValueOverTime {
            date: day,
            value: daily_total,
        });

        if is_end {
            valuation.total_value = daily_total;
        }
    }

    Ok(valuation)
}
