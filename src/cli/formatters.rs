//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use crate::db::{Asset, AssetKind, Customer, PortfolioSummary, Transaction, TransactionType};
use crate::reports::PerformanceReport;
use crate::utils::{format_amount, format_currency, format_percent};
use anyhow::Result;
use colored::Colorize;
use itertools::{Itertools, MinMaxResult};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

/// Format a performance report for JSON output (camelCase fields)
pub fn format_performance_json(report: &PerformanceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn colored_gain(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format_amount(value).green().to_string()
    } else {
        format_amount(value).red().to_string()
    }
}

/// Format a performance report for terminal table output
///
/// Fails only when the gain totals cannot be summed.
pub fn format_performance_table(report: &PerformanceReport) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} Performance Report - Portfolio #{}\n",
        "📈".cyan().bold(),
        report.portfolio_id
    ));
    output.push_str(&format!(
        "  Period: {} → {} ({} days)\n\n",
        report.start_date,
        report.end_date,
        report.value_over_time.len()
    ));

    if report.value_over_time.is_empty() {
        output.push_str(&format!(
            "{} No days in range (end date is before start date)\n",
            "ℹ".blue().bold()
        ));
        return Ok(output);
    }

    if report.assets.is_empty() {
        output.push_str(&format!("{} Portfolio has no assets\n", "ℹ".blue().bold()));
    } else {
        #[derive(Tabled)]
        struct AssetRow {
            #[tabled(rename = "Ticker")]
            ticker: String,
            #[tabled(rename = "Name")]
            name: String,
            #[tabled(rename = "Value")]
            value: String,
            #[tabled(rename = "Realized")]
            realized: String,
            #[tabled(rename = "Unrealized")]
            unrealized: String,
            #[tabled(rename = "Allocation")]
            allocation: String,
        }

        // Allocation is computed from the asset list, so both share its order
        let rows: Vec<AssetRow> = report
            .assets
            .iter()
            .zip(&report.allocation)
            .map(|(asset, alloc)| AssetRow {
                ticker: asset.ticker.clone(),
                name: asset.name.clone(),
                value: format_amount(asset.value),
                realized: colored_gain(asset.realized_gain),
                unrealized: colored_gain(asset.unrealized_gain),
                allocation: format_percent(alloc.allocation_percentage),
            })
            .collect();

        let mut table = Table::new(&rows);
        table.with(Style::modern());
        // Right-align all columns except Ticker (0) and Name (1)
        table.modify(Columns::new(2..), Alignment::right());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&format!("\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total Value:".bold(),
        format_currency(report.total_value).cyan()
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Realized Gains:".bold(),
        colored_gain(report.realized_gain()?)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Unrealized Gains:".bold(),
        colored_gain(report.unrealized_gain()?)
    ));

    match report.value_over_time.iter().minmax_by_key(|p| p.value) {
        MinMaxResult::MinMax(low, high) => {
            output.push_str(&format!(
                "\n{:<20} {} ({}) / {} ({})",
                "Low / High:".bold(),
                format_currency(low.value),
                low.date,
                format_currency(high.value),
                high.date
            ));
        }
        MinMaxResult::OneElement(point) => {
            output.push_str(&format!(
                "\n{:<20} {} ({})",
                "Value:".bold(),
                format_currency(point.value),
                point.date
            ));
        }
        MinMaxResult::NoElements => {}
    }
    output.push('\n');

    Ok(output)
}

/// Format the portfolio listing for terminal table output
pub fn format_portfolio_list(portfolios: &[PortfolioSummary]) -> String {
    if portfolios.is_empty() {
        return format_empty_portfolios();
    }

    #[derive(Tabled)]
    struct PortfolioRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Owner")]
        owner: String,
        #[tabled(rename = "Assets")]
        assets: i64,
    }

    let rows = portfolios.iter().map(|p| PortfolioRow {
        id: p.id,
        name: p.name.clone(),
        owner: p.customer_name.clone(),
        assets: p.asset_count,
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.modify(Columns::new(3..), Alignment::right());

    format!(
        "\n{} Portfolios ({})\n\n{}\n",
        "📊".cyan().bold(),
        portfolios.iter().map(|p| p.id).join(", "),
        table
    )
}

/// Format empty portfolio list message
pub fn format_empty_portfolios() -> String {
    format!(
        "{} No portfolios found\nCreate demo data using: {} seed\n",
        "ℹ".blue().bold(),
        "folio".bold()
    )
}

/// Format the customer listing for terminal table output
pub fn format_customer_list(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return format!(
            "{} No customers found\nAdd one using: {} customers add <name>\n",
            "ℹ".blue().bold(),
            "folio".bold()
        );
    }

    #[derive(Tabled)]
    struct CustomerRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
    }

    let rows = customers.iter().map(|c| CustomerRow {
        id: c.id.unwrap_or_default(),
        name: c.name.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("\n{} Customers\n\n{}\n", "👤".cyan().bold(), table)
}

/// One-line summary of the kind-specific attributes
fn describe_kind(kind: &AssetKind) -> String {
    match kind {
        AssetKind::Stock {
            exchange,
            sector,
            dividend_yield,
        } => [exchange.clone(), sector.clone()]
            .into_iter()
            .flatten()
            .chain(std::iter::once(format!(
                "yield {}",
                format_percent(*dividend_yield)
            )))
            .join(", "),
        AssetKind::Bond {
            coupon_rate,
            maturity_date,
            issuer,
            bond_type,
        } => [
            Some(bond_type.as_str().to_lowercase()),
            issuer.clone(),
            Some(format!("coupon {}", format_percent(*coupon_rate))),
            maturity_date.map(|d| format!("matures {}", d)),
        ]
        .into_iter()
        .flatten()
        .join(", "),
        AssetKind::Fund {
            fund_manager,
            fund_type,
            expense_ratio,
        } => [
            Some(fund_type.as_str().to_string()),
            fund_manager.clone(),
            Some(format!("expense {}", format_percent(*expense_ratio))),
        ]
        .into_iter()
        .flatten()
        .join(", "),
    }
}

/// Format a portfolio's assets for terminal table output
pub fn format_asset_list(portfolio_id: i64, assets: &[Asset]) -> String {
    if assets.is_empty() {
        return format!(
            "{} Portfolio #{} has no assets\n",
            "ℹ".blue().bold(),
            portfolio_id
        );
    }

    #[derive(Tabled)]
    struct AssetRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        asset_type: &'static str,
        #[tabled(rename = "Details")]
        details: String,
    }

    let rows = assets.iter().map(|a| AssetRow {
        id: a.id.unwrap_or_default(),
        ticker: a.ticker.clone(),
        name: a.name.clone(),
        asset_type: a.asset_type().as_str(),
        details: describe_kind(&a.kind),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!(
        "\n{} Assets of Portfolio #{}\n\n{}\n",
        "📊".cyan().bold(),
        portfolio_id,
        table
    )
}

/// Format an asset's transactions for terminal table output
pub fn format_transaction_list(asset_id: i64, transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return format!(
            "{} Asset #{} has no transactions\n",
            "ℹ".blue().bold(),
            asset_id
        );
    }

    #[derive(Tabled)]
    struct TransactionRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Price")]
        price: String,
    }

    let rows = transactions.iter().map(|t| TransactionRow {
        id: t.id.unwrap_or_default(),
        date: t.trade_date.format("%Y-%m-%d").to_string(),
        kind: match t.transaction_type {
            TransactionType::Buy => "BUY".green().to_string(),
            TransactionType::Sell => "SELL".red().to_string(),
        },
        quantity: t.quantity.normalize().to_string(),
        price: format_amount(t.price),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.modify(Columns::new(3..), Alignment::right());
    format!(
        "\n{} Transactions of Asset #{}\n\n{}\n",
        "📋".cyan().bold(),
        asset_id,
        table
    )
}
