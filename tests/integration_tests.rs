//! Integration tests for folio
//!
//! These run the valuation end-to-end against a real SQLite file:
//! - aggregate loading (assets in id order, transactions in date/id order)
//! - average-cost gains through the performance report
//! - allocation shares
//! - missing portfolios

use anyhow::Result;
use chrono::NaiveDate;
use folio::db::{
    get_asset_transactions, get_earliest_transaction_date, init_database, insert_asset,
    insert_customer, insert_portfolio, insert_transaction, load_portfolio, open_db, Asset,
    AssetKind, BondType, Customer, FundType, Transaction, TransactionType,
};
use folio::ledger::replay;
use folio::reports::{calculate_performance, value_portfolio};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

/// Test helper: Create a temporary database
fn create_test_db() -> Result<(TempDir, Connection)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    init_database(Some(db_path.clone()))?;
    let conn = open_db(Some(db_path))?;
    Ok((temp_dir, conn))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_portfolio(conn: &Connection) -> i64 {
    let customer_id = insert_customer(
        conn,
        &Customer {
            id: None,
            name: "Test Customer".to_string(),
        },
    )
    .unwrap();
    insert_portfolio(conn, "Test Portfolio", customer_id).unwrap()
}

fn add_asset(
    conn: &Connection,
    portfolio_id: i64,
    ticker: &str,
    name: &str,
    kind: AssetKind,
) -> i64 {
    insert_asset(
        conn,
        &Asset {
            id: None,
            portfolio_id,
            ticker: ticker.to_string(),
            name: name.to_string(),
            kind,
            transactions: Vec::new(),
        },
    )
    .unwrap()
}

fn stock_kind() -> AssetKind {
    AssetKind::Stock {
        exchange: Some("NASDAQ".to_string()),
        sector: None,
        dividend_yield: Decimal::ZERO,
    }
}

fn trade(
    conn: &Connection,
    asset_id: i64,
    transaction_type: TransactionType,
    day: NaiveDate,
    quantity: Decimal,
    price: Decimal,
) {
    insert_transaction(
        conn,
        &Transaction {
            id: None,
            asset_id,
            transaction_type,
            trade_date: day,
            quantity,
            price,
        },
    )
    .unwrap();
}

#[test]
fn test_buy_then_sell_through_sqlite() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);
    let apple = add_asset(&conn, portfolio_id, "AAPL", "Apple", stock_kind());

    trade(&conn, apple, TransactionType::Buy, date(2025, 1, 5), dec!(10), dec!(150));
    trade(&conn, apple, TransactionType::Sell, date(2025, 1, 10), dec!(5), dec!(170));

    let report = calculate_performance(&conn, portfolio_id, date(2025, 1, 1), date(2025, 1, 15))?
        .expect("portfolio exists");

    assert_eq!(report.value_over_time.len(), 15);
    assert_eq!(report.value_over_time[3].value, Decimal::ZERO);
    assert_eq!(report.value_over_time[4].value, dec!(1500));
    assert_eq!(report.value_over_time[9].value, dec!(850));
    assert_eq!(report.total_value, dec!(850));
    assert_eq!(report.assets[0].asset_id, apple);
    assert_eq!(report.assets[0].realized_gain, dec!(100));
    assert_eq!(report.assets[0].unrealized_gain, dec!(100));
    Ok(())
}

#[test]
fn test_purchase_before_range_is_held() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);
    let legacy = add_asset(&conn, portfolio_id, "LEG", "Legacy Stock", stock_kind());
    trade(&conn, legacy, TransactionType::Buy, date(2023, 6, 1), dec!(50), dec!(100));

    let report = calculate_performance(&conn, portfolio_id, date(2025, 5, 2), date(2025, 6, 1))?
        .expect("portfolio exists");

    assert_eq!(report.total_value, dec!(5000));
    assert_eq!(report.assets.len(), 1);
    assert_eq!(report.assets[0].unrealized_gain, Decimal::ZERO);
    assert_eq!(
        get_earliest_transaction_date(&conn, portfolio_id)?,
        Some(date(2023, 6, 1))
    );
    Ok(())
}

#[test]
fn test_mixed_kinds_allocation() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);

    let bond = add_asset(
        &conn,
        portfolio_id,
        "USGB10Y",
        "US Gov Bond",
        AssetKind::Bond {
            coupon_rate: dec!(2.5),
            maturity_date: Some(date(2035, 1, 1)),
            issuer: Some("US Treasury".to_string()),
            bond_type: BondType::Government,
        },
    );
    let fund = add_asset(
        &conn,
        portfolio_id,
        "VTI",
        "Vanguard ETF",
        AssetKind::Fund {
            fund_manager: Some("Vanguard".to_string()),
            fund_type: FundType::Etf,
            expense_ratio: dec!(0.03),
        },
    );

    trade(&conn, bond, TransactionType::Buy, date(2025, 1, 1), dec!(20), dec!(100));
    trade(&conn, bond, TransactionType::Sell, date(2025, 1, 11), dec!(10), dec!(110));
    trade(&conn, fund, TransactionType::Buy, date(2024, 12, 22), dec!(5), dec!(200));

    let report = calculate_performance(&conn, portfolio_id, date(2024, 11, 21), date(2025, 1, 20))?
        .expect("portfolio exists");

    assert_eq!(report.total_value, dec!(2100));
    assert_eq!(report.assets[0].realized_gain, dec!(100));
    let sum: Decimal = report
        .allocation
        .iter()
        .map(|a| a.allocation_percentage)
        .sum();
    assert!((sum - dec!(100)).abs() < dec!(0.000000001));
    assert_eq!(report.allocation[0].asset_name, "US Gov Bond");
    assert_eq!(report.allocation[1].asset_name, "Vanguard ETF");
    Ok(())
}

#[test]
fn test_same_day_trades_keep_insertion_order() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);
    let asset = add_asset(&conn, portfolio_id, "TIE", "Tie Breaker", stock_kind());

    // Inserted out of date order; the two trades on the 3rd keep this order
    trade(&conn, asset, TransactionType::Sell, date(2025, 3, 3), dec!(4), dec!(12));
    trade(&conn, asset, TransactionType::Buy, date(2025, 3, 1), dec!(10), dec!(10));
    trade(&conn, asset, TransactionType::Buy, date(2025, 3, 3), dec!(2), dec!(11));

    let txs = get_asset_transactions(&conn, asset)?;
    let order: Vec<_> = txs.iter().map(|t| (t.trade_date, t.transaction_type)).collect();
    assert_eq!(
        order,
        vec![
            (date(2025, 3, 1), TransactionType::Buy),
            (date(2025, 3, 3), TransactionType::Sell),
            (date(2025, 3, 3), TransactionType::Buy),
        ]
    );

    let state = replay(&txs, date(2025, 3, 3))?;
    assert_eq!(state.quantity, dec!(8));
    assert_eq!(state.realized_gain, dec!(8));
    assert_eq!(state.last_price, dec!(11));
    Ok(())
}

#[test]
fn test_decimal_precision_survives_storage() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);
    let asset = add_asset(&conn, portfolio_id, "FRAC", "Fractional", stock_kind());
    trade(&conn, asset, TransactionType::Buy, date(2025, 1, 1), dec!(0.125), dec!(33.3333));

    let portfolio = load_portfolio(&conn, portfolio_id)?.expect("portfolio exists");
    let tx = &portfolio.assets[0].transactions[0];
    assert_eq!(tx.quantity, dec!(0.125));
    assert_eq!(tx.price, dec!(33.3333));

    let valuation = value_portfolio(&portfolio, date(2025, 1, 1), date(2025, 1, 1))?;
    assert_eq!(valuation.total_value, dec!(0.125) * dec!(33.3333));
    Ok(())
}

#[test]
fn test_empty_and_missing_portfolios() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);

    let empty = calculate_performance(&conn, portfolio_id, date(2025, 1, 1), date(2025, 1, 11))?
        .expect("portfolio exists");
    assert_eq!(empty.total_value, Decimal::ZERO);
    assert!(empty.assets.is_empty());
    assert_eq!(empty.value_over_time.len(), 11);
    assert_eq!(get_earliest_transaction_date(&conn, portfolio_id)?, None);

    let missing_id = portfolio_id + 100;
    let missing = calculate_performance(&conn, missing_id, date(2025, 1, 1), date(2025, 1, 11))?;
    assert!(missing.is_none());
    Ok(())
}

#[test]
fn test_repeated_reports_are_identical() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);
    let asset = add_asset(&conn, portfolio_id, "AAPL", "Apple", stock_kind());
    trade(&conn, asset, TransactionType::Buy, date(2025, 1, 1), dec!(3), dec!(100));
    trade(&conn, asset, TransactionType::Sell, date(2025, 1, 2), dec!(1), dec!(90));

    let first = calculate_performance(&conn, portfolio_id, date(2024, 12, 1), date(2025, 1, 31))?;
    let second = calculate_performance(&conn, portfolio_id, date(2024, 12, 1), date(2025, 1, 31))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_overflowing_history_reports_error() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let portfolio_id = new_portfolio(&conn);
    let asset = add_asset(&conn, portfolio_id, "HUGE", "Huge Position", stock_kind());
    // Written straight to the store, past the validation done by `transactions add`
    let huge = dec!(1000000000000000);
    trade(&conn, asset, TransactionType::Buy, date(2025, 1, 1), huge, huge);

    let result = calculate_performance(&conn, portfolio_id, date(2025, 1, 1), date(2025, 1, 3));
    let err = result.expect_err("overflow must surface as an error");
    assert!(err.to_string().contains("arithmetic overflow"));
    Ok(())
}
