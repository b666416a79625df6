use anyhow::Result;
use colored::Colorize;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::db::{self, Asset, AssetKind};
use crate::error::PortfolioError;
use crate::{cli, commands};

fn open_conn(db_path: Option<PathBuf>) -> Result<Connection> {
    db::init_database(db_path.clone())?;
    db::open_db(db_path)
}

fn ensure_portfolio(conn: &Connection, portfolio_id: i64) -> Result<()> {
    if !db::portfolio_exists(conn, portfolio_id)? {
        return Err(PortfolioError::ValidationError(format!(
            "Portfolio {} does not exist",
            portfolio_id
        ))
        .into());
    }
    Ok(())
}

/// Add an asset to an existing portfolio, returning the new asset id.
/// Ticker and name are trimmed and must not be blank.
pub fn create_asset(
    conn: &Connection,
    portfolio_id: i64,
    ticker: &str,
    name: &str,
    kind: AssetKind,
) -> Result<i64> {
    let ticker = commands::parse_required(ticker, "Ticker")?;
    let name = commands::parse_required(name, "Asset name")?;
    ensure_portfolio(conn, portfolio_id)?;

    db::insert_asset(
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
}

pub fn portfolio_assets(conn: &Connection, portfolio_id: i64) -> Result<Vec<Asset>> {
    if !db::portfolio_exists(conn, portfolio_id)? {
        return Err(PortfolioError::NotFound(portfolio_id).into());
    }
    db::get_portfolio_assets(conn, portfolio_id)
}

pub fn remove_asset(conn: &Connection, asset_id: i64) -> Result<()> {
    if !db::delete_asset(conn, asset_id)? {
        return Err(PortfolioError::RecordNotFound {
            kind: "asset",
            id: asset_id,
        }
        .into());
    }
    Ok(())
}

pub async fn dispatch_asset_add(
    db_path: Option<PathBuf>,
    portfolio_id: i64,
    ticker: &str,
    name: &str,
    kind: AssetKind,
    json_output: bool,
) -> Result<()> {
    let asset_type = kind.asset_type();
    tracing::info!(
        "Adding {} {} to portfolio {}",
        asset_type.as_str(),
        ticker,
        portfolio_id
    );

    let conn = open_conn(db_path)?;
    let id = create_asset(&conn, portfolio_id, ticker, name, kind)?;

    if json_output {
        let payload = serde_json::json!({
            "id": id,
            "portfolioId": portfolio_id,
            "ticker": ticker.trim(),
            "type": asset_type.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} Added {} {} as asset {}",
        "✓".green().bold(),
        asset_type.as_str().to_lowercase(),
        ticker.trim().bold(),
        id.to_string().cyan().bold()
    );
    Ok(())
}

pub async fn dispatch_assets_list(
    db_path: Option<PathBuf>,
    portfolio_id: i64,
    json_output: bool,
) -> Result<()> {
    let conn = open_conn(db_path)?;
    let assets = portfolio_assets(&conn, portfolio_id)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&assets)?);
    } else {
        print!(
            "{}",
            cli::formatters::format_asset_list(portfolio_id, &assets)
        );
    }

    Ok(())
}

pub async fn dispatch_asset_delete(
    db_path: Option<PathBuf>,
    asset_id: i64,
    json_output: bool,
) -> Result<()> {
    tracing::info!("Deleting asset {}", asset_id);

    let conn = open_conn(db_path)?;
    remove_asset(&conn, asset_id)?;

    if json_output {
        let payload = serde_json::json!({ "deleted": asset_id });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} Removed asset {}", "✓".green().bold(), asset_id);
    Ok(())
}
