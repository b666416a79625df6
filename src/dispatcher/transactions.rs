use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::cli;
use crate::db::{self, Transaction, TransactionType};
use crate::error::PortfolioError;
use crate::utils::format_currency;

fn open_conn(db_path: Option<PathBuf>) -> Result<Connection> {
    db::init_database(db_path.clone())?;
    db::open_db(db_path)
}

/// Quantity times price, rejected when it does not fit in a `Decimal`
pub fn trade_value(quantity: Decimal, price: Decimal) -> Result<Decimal, PortfolioError> {
    quantity.checked_mul(price).ok_or_else(|| {
        PortfolioError::ValidationError(format!(
            "Trade value of {} x {} is too large",
            quantity, price
        ))
    })
}

/// Validate and insert a manual transaction, returning its id.
///
/// A zero quantity is accepted. Sells are not checked against the held quantity.
pub fn record_transaction(
    conn: &Connection,
    asset_id: i64,
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
    trade_date: NaiveDate,
) -> Result<i64> {
    if quantity < Decimal::ZERO {
        return Err(
            PortfolioError::ValidationError("Quantity cannot be negative".to_string()).into(),
        );
    }

    if price <= Decimal::ZERO {
        return Err(
            PortfolioError::ValidationError("Price must be greater than zero".to_string()).into(),
        );
    }

    trade_value(quantity, price)?;

    if !db::asset_exists(conn, asset_id)? {
        return Err(
            PortfolioError::ValidationError(format!("Asset {} does not exist", asset_id)).into(),
        );
    }

    let transaction = Transaction {
        id: None,
        asset_id,
        transaction_type,
        trade_date,
        quantity,
        price,
    };

    db::insert_transaction(conn, &transaction)
}

/// Transactions of an existing asset in replay order
pub fn asset_transactions(conn: &Connection, asset_id: i64) -> Result<Vec<Transaction>> {
    if !db::asset_exists(conn, asset_id)? {
        return Err(PortfolioError::RecordNotFound {
            kind: "asset",
            id: asset_id,
        }
        .into());
    }
    db::get_asset_transactions(conn, asset_id)
}

pub fn remove_transaction(conn: &Connection, transaction_id: i64) -> Result<()> {
    if !db::delete_transaction(conn, transaction_id)? {
        return Err(PortfolioError::RecordNotFound {
            kind: "transaction",
            id: transaction_id,
        }
        .into());
    }
    Ok(())
}

pub async fn dispatch_transaction_add(
    db_path: Option<PathBuf>,
    asset_id: i64,
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
    trade_date: NaiveDate,
    json_output: bool,
) -> Result<()> {
    tracing::info!(
        "Adding {} transaction for asset {}",
        transaction_type.as_str(),
        asset_id
    );

    let conn = open_conn(db_path)?;

    let tx_id = record_transaction(&conn, asset_id, transaction_type, quantity, price, trade_date)?;

    if json_output {
        let payload = serde_json::json!({
            "id": tx_id,
            "assetId": asset_id,
            "type": transaction_type.as_str(),
            "date": trade_date,
            "quantity": quantity,
            "price": price,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("\n{} Transaction added successfully!", "✓".green().bold());
    println!("  Transaction ID: {}", tx_id);
    println!("  Asset ID:       {}", asset_id.to_string().cyan().bold());
    println!("  Type:           {}", transaction_type.as_str());
    println!("  Date:           {}", trade_date.format("%Y-%m-%d"));
    println!("  Quantity:       {}", quantity);
    println!("  Price:          {}", format_currency(price).cyan());
    println!(
        "  Total:          {}",
        format_currency(trade_value(quantity, price)?).cyan().bold()
    );
    println!();

    Ok(())
}

pub async fn dispatch_transactions_list(
    db_path: Option<PathBuf>,
    asset_id: i64,
    json_output: bool,
) -> Result<()> {
    let conn = open_conn(db_path)?;
    let transactions = asset_transactions(&conn, asset_id)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
    } else {
        print!(
            "{}",
            cli::formatters::format_transaction_list(asset_id, &transactions)
        );
    }

    Ok(())
}

pub async fn dispatch_transaction_delete(
    db_path: Option<PathBuf>,
    transaction_id: i64,
    json_output: bool,
) -> Result<()> {
    tracing::info!("Deleting transaction {}", transaction_id);

    let conn = open_conn(db_path)?;
    remove_transaction(&conn, transaction_id)?;

    if json_output {
        let payload = serde_json::json!({ "deleted": transaction_id });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} Removed transaction {}", "✓".green().bold(), transaction_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{apply_schema, get_asset_transactions, seed_database};
    use crate::ledger::replay;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        seed_database(&mut conn, date(2025, 3, 31)).unwrap();
        conn
    }

    fn aapl_id(conn: &Connection) -> i64 {
        conn.query_row("SELECT id FROM assets WHERE ticker = 'AAPL'", [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn test_record_sell_realizes_gain() {
        let conn = seeded_conn();
        let asset_id = aapl_id(&conn);

        record_transaction(
            &conn,
            asset_id,
            TransactionType::Sell,
            dec!(5),
            dec!(170),
            date(2025, 3, 25),
        )
        .unwrap();

        let txs = get_asset_transactions(&conn, asset_id).unwrap();
        assert_eq!(txs.len(), 2);

        let state = replay(&txs, date(2025, 3, 31)).unwrap();
        assert_eq!(state.quantity, dec!(5));
        assert_eq!(state.realized_gain, dec!(100));
        assert_eq!(state.cost_basis, dec!(750));
    }

    #[test]
    fn test_oversell_is_recorded() {
        let conn = seeded_conn();
        let asset_id = aapl_id(&conn);

        let result = record_transaction(
            &conn,
            asset_id,
            TransactionType::Sell,
            dec!(50),
            dec!(160),
            date(2025, 3, 30),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_negative_quantity_and_non_positive_price() {
        let conn = seeded_conn();
        let asset_id = aapl_id(&conn);

        for (qty, price) in [(dec!(-1), dec!(10)), (dec!(1), dec!(0)), (dec!(1), dec!(-3))] {
            let err = record_transaction(
                &conn,
                asset_id,
                TransactionType::Buy,
                qty,
                price,
                date(2025, 3, 30),
            )
            .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<PortfolioError>(),
                Some(PortfolioError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unknown_asset() {
        let conn = seeded_conn();
        let err = record_transaction(
            &conn,
            999,
            TransactionType::Buy,
            dec!(1),
            dec!(10),
            date(2025, 3, 30),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Asset 999 does not exist"));
    }

    #[test]
    fn test_zero_quantity_is_recorded() {
        let conn = seeded_conn();
        let asset_id = aapl_id(&conn);

        let id = record_transaction(
            &conn,
            asset_id,
            TransactionType::Buy,
            Decimal::ZERO,
            dec!(155),
            date(2025, 3, 30),
        )
        .unwrap();

        let txs = get_asset_transactions(&conn, asset_id).unwrap();
        assert_eq!(txs.last().and_then(|t| t.id), Some(id));
        // Holding is unchanged, only the market price moves
        let state = replay(&txs, date(2025, 3, 31)).unwrap();
        assert_eq!(state.quantity, dec!(10));
        assert_eq!(state.last_price, dec!(155));
    }

    #[test]
    fn test_oversized_trade_is_rejected_before_insert() {
        let conn = seeded_conn();
        let asset_id = aapl_id(&conn);
        let before = get_asset_transactions(&conn, asset_id).unwrap().len();
        let huge = dec!(1000000000000000);

        let err = record_transaction(
            &conn,
            asset_id,
            TransactionType::Buy,
            huge,
            huge,
            date(2025, 1, 1),
        )
        .unwrap_err();

        assert!(err.to_string().contains("too large"));
        assert_eq!(get_asset_transactions(&conn, asset_id).unwrap().len(), before);
        assert_eq!(trade_value(dec!(3), dec!(2.5)).unwrap(), dec!(7.5));
    }

    #[test]
    fn test_list_and_delete_transactions() {
        let conn = seeded_conn();
        let asset_id = aapl_id(&conn);
        let sell_id = record_transaction(
            &conn,
            asset_id,
            TransactionType::Sell,
            dec!(2),
            dec!(160),
            date(2025, 3, 20),
        )
        .unwrap();

        let listed = asset_transactions(&conn, asset_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, Some(sell_id));

        remove_transaction(&conn, sell_id).unwrap();
        assert_eq!(asset_transactions(&conn, asset_id).unwrap().len(), 1);

        let err = remove_transaction(&conn, sell_id).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PortfolioError>(),
            Some(PortfolioError::RecordNotFound {
                kind: "transaction",
                ..
            })
        ));
        assert!(asset_transactions(&conn, 999).is_err());
    }
}
