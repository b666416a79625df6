//! Command dispatcher that routes internal `Command`s to their handlers.
//!
//! Handlers open the database themselves (path from `Config`) and print
//! either tables or JSON depending on `json_output`.

pub mod assets;
pub mod customers;
pub mod performance;
pub mod portfolio;
pub mod transactions;

use anyhow::Result;

use crate::cli::help::{render_help, RenderOpts};
use crate::commands::{
    AssetAction, Command, CustomerAction, PerformanceAction, PortfolioAction, TransactionAction,
};
use crate::config::Config;

/// Route a parsed command to its handler
pub async fn dispatch_command(command: Command, config: &Config, json_output: bool) -> Result<()> {
    let db_path = config.db_path.clone();

    match command {
        Command::Seed => portfolio::dispatch_seed(db_path, json_output).await,
        Command::Customers { action } => match action {
            CustomerAction::Add { name } => {
                customers::dispatch_customer_add(db_path, &name, json_output).await
            }
            CustomerAction::List => customers::dispatch_customers_list(db_path, json_output).await,
        },
        Command::Portfolios { action } => match action {
            PortfolioAction::List => {
                portfolio::dispatch_portfolios_list(db_path, json_output).await
            }
            PortfolioAction::Create { customer_id, name } => {
                portfolio::dispatch_portfolio_create(db_path, customer_id, &name, json_output)
                    .await
            }
            PortfolioAction::Delete { portfolio_id } => {
                portfolio::dispatch_portfolio_delete(db_path, portfolio_id, json_output).await
            }
        },
        Command::Assets { action } => match action {
            AssetAction::Add {
                portfolio_id,
                ticker,
                name,
                kind,
            } => {
                assets::dispatch_asset_add(db_path, portfolio_id, &ticker, &name, kind, json_output)
                    .await
            }
            AssetAction::List { portfolio_id } => {
                assets::dispatch_assets_list(db_path, portfolio_id, json_output).await
            }
            AssetAction::Delete { asset_id } => {
                assets::dispatch_asset_delete(db_path, asset_id, json_output).await
            }
        },
        Command::Performance {
            action: PerformanceAction::Show {
                portfolio_id,
                period,
            },
        } => {
            let period = period.unwrap_or_else(|| config.default_period.clone());
            performance::dispatch_performance_show(db_path, portfolio_id, &period, json_output)
                .await
        }
        Command::Transactions { action } => match action {
            TransactionAction::Add {
                asset_id,
                transaction_type,
                quantity,
                price,
                trade_date,
            } => {
                transactions::dispatch_transaction_add(
                    db_path,
                    asset_id,
                    transaction_type,
                    quantity,
                    price,
                    trade_date,
                    json_output,
                )
                .await
            }
            TransactionAction::List { asset_id } => {
                transactions::dispatch_transactions_list(db_path, asset_id, json_output).await
            }
            TransactionAction::Delete { transaction_id } => {
                transactions::dispatch_transaction_delete(db_path, transaction_id, json_output)
                    .await
            }
        },
        Command::Help => {
            render_help(std::io::stdout().lock(), &RenderOpts::default())?;
            Ok(())
        }
    }
}
