use anyhow::Result;
use colored::Colorize;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::db::{self, Customer};
use crate::error::PortfolioError;
use crate::{cli, commands};

fn open_conn(db_path: Option<PathBuf>) -> Result<Connection> {
    db::init_database(db_path.clone())?;
    db::open_db(db_path)
}

/// Insert a customer after trimming its name, returning the new id
pub fn create_customer(conn: &Connection, name: &str) -> Result<i64> {
    let name = commands::parse_required(name, "Customer name")?;
    db::insert_customer(
        conn,
        &Customer {
            id: None,
            name: name.to_string(),
        },
    )
}

pub async fn dispatch_customer_add(
    db_path: Option<PathBuf>,
    name: &str,
    json_output: bool,
) -> Result<()> {
    tracing::info!("Adding customer {}", name);

    let conn = open_conn(db_path)?;
    let id = create_customer(&conn, name)?;

    if json_output {
        let payload = serde_json::json!({ "id": id, "name": name.trim() });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} Added customer {} ({})",
        "✓".green().bold(),
        id.to_string().cyan().bold(),
        name.trim()
    );
    Ok(())
}

pub async fn dispatch_customers_list(db_path: Option<PathBuf>, json_output: bool) -> Result<()> {
    let conn = open_conn(db_path)?;
    let customers = db::list_customers(&conn)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&customers)?);
    } else {
        print!("{}", cli::formatters::format_customer_list(&customers));
    }

    Ok(())
}

/// Fail with a validation error unless the customer exists
pub(crate) fn ensure_customer(conn: &Connection, customer_id: i64) -> Result<()> {
    if !db::customer_exists(conn, customer_id)? {
        return Err(PortfolioError::ValidationError(format!(
            "Customer {} does not exist",
            customer_id
        ))
        .into());
    }
    Ok(())
}
