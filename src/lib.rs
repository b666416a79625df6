//! Folio - portfolio bookkeeping with day-by-day performance valuation
//!
//! This library stores customers, portfolios, assets and their buy/sell
//! transactions, and values a portfolio on every calendar day of a range
//! using the average-cost method.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod ledger;
pub mod reports;
pub mod utils;
