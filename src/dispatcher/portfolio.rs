use anyhow::Result;
use colored::Colorize;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::db::seed::SeedOutcome;
use crate::dispatcher::customers::ensure_customer;
use crate::error::PortfolioError;
use crate::{cli, commands, db};

fn open_conn(db_path: Option<PathBuf>) -> Result<Connection> {
    db::init_database(db_path.clone())?;
    db::open_db(db_path)
}

/// Create an empty portfolio owned by an existing customer
pub fn create_portfolio(conn: &Connection, customer_id: i64, name: &str) -> Result<i64> {
    let name = commands::parse_required(name, "Portfolio name")?;
    ensure_customer(conn, customer_id)?;
    db::insert_portfolio(conn, name, customer_id)
}

/// Delete a portfolio together with its assets and transactions
pub fn remove_portfolio(conn: &Connection, portfolio_id: i64) -> Result<()> {
    if !db::delete_portfolio(conn, portfolio_id)? {
        return Err(PortfolioError::NotFound(portfolio_id).into());
    }
    Ok(())
}

pub async fn dispatch_seed(db_path: Option<PathBuf>, json_output: bool) -> Result<()> {
    tracing::info!("Seeding database");

    let mut conn = open_conn(db_path)?;

    let today = chrono::Local::now().date_naive();
    let outcome = db::seed_database(&mut conn, today)?;

    if json_output {
        let payload = match outcome {
            SeedOutcome::Skipped => serde_json::json!({ "seeded": false }),
            SeedOutcome::Seeded { portfolio_id } => {
                serde_json::json!({ "seeded": true, "portfolioId": portfolio_id })
            }
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match outcome {
        SeedOutcome::Skipped => println!(
            "{} Database already has portfolios, nothing seeded",
            "ℹ".blue().bold()
        ),
        SeedOutcome::Seeded { portfolio_id } => {
            println!("\n{} Demo data created", "✓".green().bold());
            println!("  Portfolio ID: {}", portfolio_id.to_string().cyan().bold());
            println!(
                "  Try:          folio performance show {} ALL\n",
                portfolio_id
            );
        }
    }

    Ok(())
}

pub async fn dispatch_portfolios_list(db_path: Option<PathBuf>, json_output: bool) -> Result<()> {
    let conn = open_conn(db_path)?;

    let portfolios = db::list_portfolios(&conn)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&portfolios)?);
    } else {
        print!("{}", cli::formatters::format_portfolio_list(&portfolios));
    }

    Ok(())
}

pub async fn dispatch_portfolio_create(
    db_path: Option<PathBuf>,
    customer_id: i64,
    name: &str,
    json_output: bool,
) -> Result<()> {
    tracing::info!("Creating portfolio {} for customer {}", name, customer_id);

    let conn = open_conn(db_path)?;
    let id = create_portfolio(&conn, customer_id, name)?;

    if json_output {
        let payload = serde_json::json!({
            "id": id,
            "name": name.trim(),
            "customerId": customer_id,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} Created portfolio {} ({})",
        "✓".green().bold(),
        id.to_string().cyan().bold(),
        name.trim()
    );
    println!("  Add assets with: folio assets add {} <type> <ticker> <name>", id);
    Ok(())
}

pub async fn dispatch_portfolio_delete(
    db_path: Option<PathBuf>,
    portfolio_id: i64,
    json_output: bool,
) -> Result<()> {
    tracing::info!("Deleting portfolio {}", portfolio_id);

    let conn = open_conn(db_path)?;
    remove_portfolio(&conn, portfolio_id)?;

    if json_output {
        let payload = serde_json::json!({ "deleted": portfolio_id });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} Removed portfolio {}", "✓".green().bold(), portfolio_id);
    Ok(())
}
