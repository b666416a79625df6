//! Demo data for a fresh database: one customer, one portfolio holding a
//! stock, a bond and an index fund, each with a single recent purchase.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use super::{
    count_portfolios, insert_asset, insert_customer, insert_portfolio, insert_transaction, Asset,
    AssetKind, BondType, Customer, FundType, Transaction, TransactionType,
};

/// What a seeding run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Portfolios already existed; nothing was written
    Skipped,
    Seeded { portfolio_id: i64 },
}

/// Seed the database relative to `today`; skipped when any portfolio exists
pub fn seed_database(conn: &mut Connection, today: NaiveDate) -> Result<SeedOutcome> {
    if count_portfolios(conn)? > 0 {
        info!("Database already has portfolios, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let tx = conn.transaction().context("Failed to start seed transaction")?;

    let customer_id = insert_customer(
        &tx,
        &Customer {
            id: None,
            name: "John Doe".to_string(),
        },
    )?;
    let portfolio_id = insert_portfolio(&tx, "Default Portfolio", customer_id)?;

    let holdings = [
        (
            "AAPL",
            "Apple Inc",
            AssetKind::Stock {
                exchange: Some("NASDAQ".to_string()),
                sector: Some("Technology".to_string()),
                dividend_yield: Decimal::new(6, 1),
            },
            20,
            10,
            150,
        ),
        (
            "UST10",
            "US Treasury 10Y",
            AssetKind::Bond {
                coupon_rate: Decimal::new(25, 1),
                maturity_date: today.checked_add_months(chrono::Months::new(120)),
                issuer: Some("US Govt".to_string()),
                bond_type: BondType::Government,
            },
            15,
            5,
            100,
        ),
        (
            "SPY",
            "S&P 500 ETF",
            AssetKind::Fund {
                fund_manager: Some("Vanguard".to_string()),
                fund_type: FundType::Index,
                expense_ratio: Decimal::new(9, 2),
            },
            10,
            3,
            300,
        ),
    ];

    for (ticker, name, kind, days_ago, quantity, price) in holdings {
        let asset_id = insert_asset(
            &tx,
            &Asset {
                id: None,
                portfolio_id,
                ticker: ticker.to_string(),
                name: name.to_string(),
                kind,
                transactions: Vec::new(),
            },
        )?;

        let trade_date = today
            .checked_sub_days(Days::new(days_ago))
            .ok_or_else(|| anyhow::anyhow!("Failed to compute seed trade date"))?;

        insert_transaction(
            &tx,
            &Transaction {
                id: None,
                asset_id,
                transaction_type: TransactionType::Buy,
                trade_date,
                quantity: Decimal::from(quantity),
                price: Decimal::from(price),
            },
        )?;
    }

    tx.commit().context("Failed to commit seed data")?;

    info!(portfolio_id, "Seeded demo portfolio");
    Ok(SeedOutcome::Seeded { portfolio_id })
}
