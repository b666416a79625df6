// Database module - SQLite connection, models and the portfolio aggregate loader

pub mod models;
pub mod seed;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::PortfolioError;
pub use models::{
    Asset, AssetKind, AssetType, BondType, Customer, FundType, Portfolio, PortfolioSummary,
    Transaction, TransactionType,
};
pub use seed::seed_database;

/// Source of fully-populated portfolio aggregates.
///
/// `Ok(None)` means the portfolio does not exist; `Err` is reserved for
/// failures of the store itself.
pub trait PortfolioRepository {
    fn load_portfolio(&self, portfolio_id: i64) -> Result<Option<Portfolio>>;
}

impl PortfolioRepository for Connection {
    fn load_portfolio(&self, portfolio_id: i64) -> Result<Option<Portfolio>> {
        load_portfolio(self, portfolio_id)
    }
}

/// Get the default database path (~/.folio/data.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let folio_dir = PathBuf::from(home).join(".folio");

    std::fs::create_dir_all(&folio_dir).context("Failed to create .folio directory")?;

    Ok(folio_dir.join("data.db"))
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = match db_path {
        Some(p) => p,
        None => get_default_db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Failed to open database at {:?}", path))?;

    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("Failed to enable foreign keys")?;

    Ok(conn)
}

/// Initialize the database with schema
///
/// Creates the database file if needed and runs the (idempotent) schema SQL.
pub fn init_database(db_path: Option<PathBuf>) -> Result<()> {
    let path = match db_path {
        Some(p) => p,
        None => get_default_db_path()?,
    };

    info!("Initializing database at: {:?}", path);

    let conn = open_db(Some(path))?;
    apply_schema(&conn)?;

    info!("Database initialized successfully");
    Ok(())
}

/// Run the schema on an already open connection (used for in-memory databases too)
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("schema.sql"))
        .context("Failed to execute schema")
}

pub fn insert_customer(conn: &Connection, customer: &Customer) -> Result<i64> {
    conn.execute(
        "INSERT INTO customers (name) VALUES (?1)",
        params![customer.name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert the portfolio row only; assets are inserted separately
pub fn insert_portfolio(conn: &Connection, name: &str, customer_id: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO portfolios (name, customer_id) VALUES (?1, ?2)",
        params![name, customer_id],
    )
    .with_context(|| format!("Failed to insert portfolio '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

/// Insert an asset with its kind-specific columns, returns asset_id
pub fn insert_asset(conn: &Connection, asset: &Asset) -> Result<i64> {
    let mut exchange = None;
    let mut sector = None;
    let mut dividend_yield = None;
    let mut coupon_rate = None;
    let mut maturity_date = None;
    let mut issuer = None;
    let mut bond_type = None;
    let mut fund_manager = None;
    let mut fund_type = None;
    let mut expense_ratio = None;

    match &asset.kind {
        AssetKind::Stock {
            exchange: e,
            sector: s,
            dividend_yield: d,
        } => {
            exchange = e.clone();
            sector = s.clone();
            dividend_yield = Some(d.to_string());
        }
        AssetKind::Bond {
            coupon_rate: c,
            maturity_date: m,
            issuer: i,
            bond_type: b,
        } => {
            coupon_rate = Some(c.to_string());
            maturity_date = *m;
            issuer = i.clone();
            bond_type = Some(b.as_str());
        }
        AssetKind::Fund {
            fund_manager: m,
            fund_type: f,
            expense_ratio: r,
        } => {
            fund_manager = m.clone();
            fund_type = Some(f.as_str());
            expense_ratio = Some(r.to_string());
        }
    }

    conn.execute(
        "INSERT INTO assets (
            portfolio_id, ticker, name, asset_type,
            exchange, sector, dividend_yield,
            coupon_rate, maturity_date, issuer, bond_type,
            fund_manager, fund_type, expense_ratio
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            asset.portfolio_id,
            asset.ticker,
            asset.name,
            asset.asset_type().as_str(),
            exchange,
            sector,
            dividend_yield,
            coupon_rate,
            maturity_date,
            issuer,
            bond_type,
            fund_manager,
            fund_type,
            expense_ratio,
        ],
    )
    .with_context(|| format!("Failed to insert asset {}", asset.ticker))?;

    Ok(conn.last_insert_rowid())
}

/// Insert transaction
///
/// Sells are not checked against the held quantity.
pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions (asset_id, transaction_type, trade_date, quantity, price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            tx.asset_id,
            tx.transaction_type.as_str(),
            tx.trade_date,
            tx.quantity.to_string(),
            tx.price.to_string(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn asset_exists(conn: &Connection, asset_id: i64) -> Result<bool> {
    row_exists(conn, "SELECT id FROM assets WHERE id = ?1", asset_id)
}

pub fn customer_exists(conn: &Connection, customer_id: i64) -> Result<bool> {
    row_exists(conn, "SELECT id FROM customers WHERE id = ?1", customer_id)
}

pub fn portfolio_exists(conn: &Connection, portfolio_id: i64) -> Result<bool> {
    row_exists(conn, "SELECT id FROM portfolios WHERE id = ?1", portfolio_id)
}

fn row_exists(conn: &Connection, sql: &str, id: i64) -> Result<bool> {
    let found: Option<i64> = conn.query_row(sql, [id], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

pub fn list_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn.prepare("SELECT id, name FROM customers ORDER BY id")?;
    let customers = stmt
        .query_map([], |row| {
            Ok(Customer {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(customers)
}

/// Delete a portfolio with its assets and their transactions.
/// Returns false when no such portfolio exists.
pub fn delete_portfolio(conn: &Connection, portfolio_id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM portfolios WHERE id = ?1", [portfolio_id])
        .with_context(|| format!("Failed to delete portfolio {}", portfolio_id))?;
    Ok(deleted > 0)
}

/// Delete an asset with its transactions
pub fn delete_asset(conn: &Connection, asset_id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM assets WHERE id = ?1", [asset_id])
        .with_context(|| format!("Failed to delete asset {}", asset_id))?;
    Ok(deleted > 0)
}

pub fn delete_transaction(conn: &Connection, transaction_id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM transactions WHERE id = ?1", [transaction_id])
        .with_context(|| format!("Failed to delete transaction {}", transaction_id))?;
    Ok(deleted > 0)
}

pub fn count_portfolios(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM portfolios", [], |row| row.get(0))?;
    Ok(count)
}

/// List portfolios with owner name and asset count
pub fn list_portfolios(conn: &Connection) -> Result<Vec<PortfolioSummary>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, c.name, COUNT(a.id)
         FROM portfolios p
         JOIN customers c ON c.id = p.customer_id
         LEFT JOIN assets a ON a.portfolio_id = p.id
         GROUP BY p.id, p.name, c.name
         ORDER BY p.id",
    )?;

    let portfolios = stmt
        .query_map([], |row| {
            Ok(PortfolioSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                customer_name: row.get(2)?,
                asset_count: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(portfolios)
}

/// Earliest trade date across a portfolio's assets
pub fn get_earliest_transaction_date(
    conn: &Connection,
    portfolio_id: i64,
) -> Result<Option<NaiveDate>> {
    let date: Option<NaiveDate> = conn.query_row(
        "SELECT MIN(t.trade_date)
         FROM transactions t
         JOIN assets a ON a.id = t.asset_id
         WHERE a.portfolio_id = ?1",
        [portfolio_id],
        |row| row.get(0),
    )?;
    Ok(date)
}

/// Load the portfolio aggregate: portfolio, its assets, and each asset's transactions
///
/// Assets come back in id order and transactions in `(trade_date, id)` order,
/// so same-day transactions keep their insertion order.
pub fn load_portfolio(conn: &Connection, portfolio_id: i64) -> Result<Option<Portfolio>> {
    let header: Option<(i64, String, i64)> = conn
        .query_row(
            "SELECT id, name, customer_id FROM portfolios WHERE id = ?1",
            [portfolio_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()
        .with_context(|| format!("Failed to load portfolio {}", portfolio_id))?;

    let Some((id, name, customer_id)) = header else {
        return Ok(None);
    };

    let mut assets = get_portfolio_assets(conn, id)?;
    for asset in assets.iter_mut() {
        if let Some(asset_id) = asset.id {
            asset.transactions = get_asset_transactions(conn, asset_id)?;
        }
    }

    debug!(
        portfolio_id = id,
        assets = assets.len(),
        transactions = assets.iter().map(|a| a.transactions.len()).sum::<usize>(),
        "Loaded portfolio aggregate"
    );

    Ok(Some(Portfolio {
        id: Some(id),
        name,
        customer_id,
        assets,
    }))
}

/// Assets of a portfolio in id order, without their transactions
pub fn get_portfolio_assets(conn: &Connection, portfolio_id: i64) -> Result<Vec<Asset>> {
    let mut stmt = conn.prepare(
        "SELECT id, portfolio_id, ticker, name, asset_type,
                exchange, sector, dividend_yield,
                coupon_rate, maturity_date, issuer, bond_type,
                fund_manager, fund_type, expense_ratio
         FROM assets
         WHERE portfolio_id = ?1
         ORDER BY id ASC",
    )?;

    let assets = stmt
        .query_map([portfolio_id], |row| {
            let asset_type: AssetType = parse_column(row, 4)?;
            let kind = match asset_type {
                AssetType::Stock => AssetKind::Stock {
                    exchange: row.get(5)?,
                    sector: row.get(6)?,
                    dividend_yield: get_optional_decimal_value(row, 7)?.unwrap_or(Decimal::ZERO),
                },
                AssetType::Bond => AssetKind::Bond {
                    coupon_rate: get_optional_decimal_value(row, 8)?.unwrap_or(Decimal::ZERO),
                    maturity_date: row.get(9)?,
                    issuer: row.get(10)?,
                    bond_type: parse_optional_column(row, 11)?.unwrap_or(BondType::Government),
                },
                AssetType::Fund => AssetKind::Fund {
                    fund_manager: row.get(12)?,
                    fund_type: parse_optional_column(row, 13)?.unwrap_or(FundType::Other),
                    expense_ratio: get_optional_decimal_value(row, 14)?.unwrap_or(Decimal::ZERO),
                },
            };

            Ok(Asset {
                id: Some(row.get(0)?),
                portfolio_id: row.get(1)?,
                ticker: row.get(2)?,
                name: row.get(3)?,
                kind,
                transactions: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read assets of portfolio {}", portfolio_id))?;

    Ok(assets)
}

/// Get all transactions for an asset, ordered by trade date then insertion
pub fn get_asset_transactions(conn: &Connection, asset_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, asset_id, transaction_type, trade_date, quantity, price
         FROM transactions
         WHERE asset_id = ?1
         ORDER BY trade_date ASC, id ASC",
    )?;

    let transactions = stmt
        .query_map([asset_id], |row| {
            Ok(Transaction {
                id: Some(row.get(0)?),
                asset_id: row.get(1)?,
                transaction_type: parse_column(row, 2)?,
                trade_date: row.get(3)?,
                quantity: get_decimal_value(row, 4)?,
                price: get_decimal_value(row, 5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read transactions of asset {}", asset_id))?;

    Ok(transactions)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(PortfolioError::ParseError(message)),
    )
}

/// Parse a TEXT enum column (transaction/asset/bond/fund type)
fn parse_column<T: FromStr>(row: &rusqlite::Row, idx: usize) -> Result<T, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|_| conversion_error(idx, format!("unknown value '{}'", raw)))
}

fn parse_optional_column<T: FromStr>(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<Option<T>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|_| conversion_error(idx, format!("unknown value '{}'", s)))
    })
    .transpose()
}

/// Helper to read Decimal from SQLite (handles INTEGER, REAL and TEXT)
pub fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    get_optional_decimal_value(row, idx)?.ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(idx, "decimal".to_string(), Type::Null)
    })
}

/// Helper to read optional Decimal from SQLite
fn get_optional_decimal_value(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<Option<Decimal>, rusqlite::Error> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let s = std::str::from_utf8(bytes).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })?;
            Decimal::from_str(s).map(Some).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        }
        ValueRef::Integer(i) => Ok(Some(Decimal::from(i))),
        ValueRef::Real(f) => Decimal::try_from(f).map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))
        }),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Blob,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    fn stock(portfolio_id: i64, ticker: &str) -> Asset {
        Asset {
            id: None,
            portfolio_id,
            ticker: ticker.to_string(),
            name: format!("{} Inc", ticker),
            kind: AssetKind::Stock {
                exchange: Some("NASDAQ".to_string()),
                sector: None,
                dividend_yield: dec!(0.6),
            },
            transactions: Vec::new(),
        }
    }

    fn tx(
        asset_id: i64,
        tt: TransactionType,
        date: &str,
        qty: Decimal,
        price: Decimal,
    ) -> Transaction {
        Transaction {
            id: None,
            asset_id,
            transaction_type: tt,
            trade_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            quantity: qty,
            price,
        }
    }

    #[test]
    fn test_load_missing_portfolio_is_none() {
        let conn = memory_db();
        assert!(load_portfolio(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_load_portfolio_aggregate() {
        let conn = memory_db();
        let customer_id = insert_customer(
            &conn,
            &Customer {
                id: None,
                name: "Jane".to_string(),
            },
        )
        .unwrap();
        let portfolio_id = insert_portfolio(&conn, "Main", customer_id).unwrap();
        let asset_id = insert_asset(&conn, &stock(portfolio_id, "AAPL")).unwrap();

        // Inserted out of date order; same-day pair keeps insertion order
        for trade in [
            tx(asset_id, TransactionType::Sell, "2024-03-01", dec!(2), dec!(12)),
            tx(asset_id, TransactionType::Buy, "2024-01-01", dec!(10), dec!(10.5)),
            tx(asset_id, TransactionType::Buy, "2024-03-01", dec!(1), dec!(11)),
        ] {
            insert_transaction(&conn, &trade).unwrap();
        }

        let portfolio = conn.load_portfolio(portfolio_id).unwrap().unwrap();
        assert_eq!(portfolio.name, "Main");
        assert_eq!(portfolio.customer_id, customer_id);
        assert_eq!(portfolio.assets.len(), 1);

        let asset = &portfolio.assets[0];
        assert_eq!(asset.ticker, "AAPL");
        assert_eq!(asset.asset_type(), AssetType::Stock);
        assert_eq!(asset.transactions.len(), 3);
        assert_eq!(asset.transactions[0].price, dec!(10.5));
        assert_eq!(asset.transactions[1].transaction_type, TransactionType::Sell);
        assert_eq!(asset.transactions[2].transaction_type, TransactionType::Buy);
    }

    #[test]
    fn test_bond_and_fund_columns_round_trip() {
        let conn = memory_db();
        let customer_id = insert_customer(
            &conn,
            &Customer {
                id: None,
                name: "Jane".to_string(),
            },
        )
        .unwrap();
        let portfolio_id = insert_portfolio(&conn, "Income", customer_id).unwrap();

        let bond_kind = AssetKind::Bond {
            coupon_rate: dec!(2.5),
            maturity_date: NaiveDate::from_ymd_opt(2035, 1, 15),
            issuer: Some("US Treasury".to_string()),
            bond_type: BondType::Government,
        };
        let fund_kind = AssetKind::Fund {
            fund_manager: Some("Vanguard".to_string()),
            fund_type: FundType::Etf,
            expense_ratio: dec!(0.05),
        };
        for (ticker, kind) in [("UST10", bond_kind.clone()), ("VTI", fund_kind.clone())] {
            let mut asset = stock(portfolio_id, ticker);
            asset.kind = kind;
            insert_asset(&conn, &asset).unwrap();
        }

        let portfolio = load_portfolio(&conn, portfolio_id).unwrap().unwrap();
        assert_eq!(portfolio.assets[0].kind, bond_kind);
        assert_eq!(portfolio.assets[1].kind, fund_kind);
    }

    #[test]
    fn test_list_portfolios_and_earliest_date() {
        let conn = memory_db();
        let customer_id = insert_customer(
            &conn,
            &Customer {
                id: None,
                name: "Jane".to_string(),
            },
        )
        .unwrap();
        let p1 = insert_portfolio(&conn, "A", customer_id).unwrap();
        insert_portfolio(&conn, "B", customer_id).unwrap();
        let asset_id = insert_asset(&conn, &stock(p1, "MSFT")).unwrap();
        for trade in [
            tx(asset_id, TransactionType::Buy, "2023-06-01", dec!(1), dec!(300)),
            tx(asset_id, TransactionType::Buy, "2022-06-01", dec!(1), dec!(250)),
        ] {
            insert_transaction(&conn, &trade).unwrap();
        }

        let list = list_portfolios(&conn).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].asset_count, 1);
        assert_eq!(list[1].asset_count, 0);
        assert_eq!(list[0].customer_name, "Jane");

        assert_eq!(
            get_earliest_transaction_date(&conn, p1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 6, 1)
        );
        assert!(asset_exists(&conn, asset_id).unwrap());
        assert!(!asset_exists(&conn, asset_id + 100).unwrap());
    }

    #[test]
    fn test_bad_decimal_surfaces_as_error() {
        let conn = memory_db();
        let customer_id = insert_customer(
            &conn,
            &Customer {
                id: None,
                name: "Jane".to_string(),
            },
        )
        .unwrap();
        let portfolio_id = insert_portfolio(&conn, "A", customer_id).unwrap();
        let asset_id = insert_asset(&conn, &stock(portfolio_id, "BAD")).unwrap();
        conn.execute(
            "INSERT INTO transactions (asset_id, transaction_type, trade_date, quantity, price)
             VALUES (?1, 'BUY', '2024-01-01', 'ten', '1')",
            [asset_id],
        )
        .unwrap();

        assert!(load_portfolio(&conn, portfolio_id).is_err());
    }

    #[test]
    fn test_deletes_cascade_down_to_transactions() {
        let conn = memory_db();
        let customer_id = insert_customer(
            &conn,
            &Customer {
                id: None,
                name: "Jane".to_string(),
            },
        )
        .unwrap();
        let portfolio_id = insert_portfolio(&conn, "A", customer_id).unwrap();
        let keep = insert_asset(&conn, &stock(portfolio_id, "KEEP")).unwrap();
        let doomed = insert_asset(&conn, &stock(portfolio_id, "DROP")).unwrap();
        let kept_tx = insert_transaction(
            &conn,
            &tx(keep, TransactionType::Buy, "2024-01-01", dec!(1), dec!(10)),
        )
        .unwrap();
        insert_transaction(
            &conn,
            &tx(doomed, TransactionType::Buy, "2024-01-01", dec!(1), dec!(10)),
        )
        .unwrap();

        assert!(delete_asset(&conn, doomed).unwrap());
        assert!(!delete_asset(&conn, doomed).unwrap());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 1);
        assert_eq!(get_portfolio_assets(&conn, portfolio_id).unwrap().len(), 1);

        assert!(delete_transaction(&conn, kept_tx).unwrap());
        assert!(get_asset_transactions(&conn, keep).unwrap().is_empty());

        assert!(portfolio_exists(&conn, portfolio_id).unwrap());
        assert!(delete_portfolio(&conn, portfolio_id).unwrap());
        assert!(!portfolio_exists(&conn, portfolio_id).unwrap());
        assert!(!asset_exists(&conn, keep).unwrap());
        assert!(customer_exists(&conn, customer_id).unwrap());
    }

    #[test]
    fn test_list_customers_in_id_order() {
        let conn = memory_db();
        for name in ["Jane", "John"] {
            insert_customer(
                &conn,
                &Customer {
                    id: None,
                    name: name.to_string(),
                },
            )
            .unwrap();
        }

        let customers = list_customers(&conn).unwrap();
        let names: Vec<_> = customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Jane", "John"]);
        assert_eq!(customers[0].id, Some(1));
        assert!(!customer_exists(&conn, 3).unwrap());
    }
}
