//! Internal command representation
//!
//! The clap layer (`cli::runner`) converts parsed arguments into these
//! typed commands, so dispatchers never see raw strings for dates,
//! amounts or transaction types.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::{AssetKind, BondType, FundType, TransactionType};
use crate::error::PortfolioError;

/// Parsed command ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `seed`
    Seed,
    /// `customers add|list`
    Customers { action: CustomerAction },
    /// `portfolios list|create|delete`
    Portfolios { action: PortfolioAction },
    /// `assets add|list|delete`
    Assets { action: AssetAction },
    /// `performance show <id> [period]`
    Performance { action: PerformanceAction },
    /// `transactions add|list|delete`
    Transactions { action: TransactionAction },
    /// No subcommand given
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAction {
    Add { name: String },
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioAction {
    List,
    Create { customer_id: i64, name: String },
    Delete { portfolio_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetAction {
    Add {
        portfolio_id: i64,
        ticker: String,
        name: String,
        kind: AssetKind,
    },
    List { portfolio_id: i64 },
    Delete { asset_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformanceAction {
    /// `period` is resolved later, against the configured default and the
    /// portfolio's own history
    Show {
        portfolio_id: i64,
        period: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAction {
    Add {
        asset_id: i64,
        transaction_type: TransactionType,
        quantity: Decimal,
        price: Decimal,
        trade_date: NaiveDate,
    },
    List { asset_id: i64 },
    Delete { transaction_id: i64 },
}

pub fn parse_transaction_type(s: &str) -> Result<TransactionType> {
    TransactionType::from_str(s)
        .map_err(|_| anyhow!("Transaction type must be 'buy' or 'sell'"))
}

pub fn parse_bond_type(s: &str) -> Result<BondType> {
    BondType::from_str(s)
        .map_err(|_| anyhow!("Bond type must be one of: government, corporate, municipal"))
}

pub fn parse_fund_type(s: &str) -> Result<FundType> {
    FundType::from_str(s)
        .map_err(|_| anyhow!("Fund type must be one of: etf, mutual, index, hedge, other"))
}

/// Trim a required text field (names, tickers), rejecting blank input
pub fn parse_required<'a>(s: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(PortfolioError::ValidationError(format!("{} cannot be empty", field)).into());
    }
    Ok(trimmed)
}

/// Parse a decimal amount, naming the field in the error
pub fn parse_decimal(s: &str, field: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim())
        .map_err(|e| PortfolioError::ParseError(format!("{} '{}': {}", field, s, e)))
        .with_context(|| format!("Invalid {}. Must be a decimal number", field))
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| PortfolioError::ParseError(format!("date '{}': {}", s, e)))
        .context("Invalid date format. Use YYYY-MM-DD")
}
