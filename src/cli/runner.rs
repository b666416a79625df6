use anyhow::Result;
use rust_decimal::Decimal;

use crate::cli::{
    AssetCommands, AssetKindArgs, Commands, CustomerCommands, PerformanceCommands,
    PortfolioCommands, TransactionCommands,
};
use crate::commands::{self as cmd, Command};
use crate::db::{AssetKind, AssetType, BondType, FundType};
use crate::error::PortfolioError;

/// Convert clap `Commands` into the internal `commands::Command`.
/// `None` (no subcommand) becomes `Command::Help`. Returns Err on parse
/// errors such as invalid dates or amounts.
pub fn to_internal_command(c: Option<&Commands>) -> Result<Command> {
    let Some(c) = c else {
        return Ok(Command::Help);
    };

    match c {
        Commands::Seed => Ok(Command::Seed),

        Commands::Customers { action } => match action {
            CustomerCommands::Add { name } => Ok(Command::Customers {
                action: cmd::CustomerAction::Add { name: name.clone() },
            }),
            CustomerCommands::List => Ok(Command::Customers {
                action: cmd::CustomerAction::List,
            }),
        },

        Commands::Portfolios { action } => match action {
            PortfolioCommands::List => Ok(Command::Portfolios {
                action: cmd::PortfolioAction::List,
            }),
            PortfolioCommands::Create { customer_id, name } => Ok(Command::Portfolios {
                action: cmd::PortfolioAction::Create {
                    customer_id: *customer_id,
                    name: name.clone(),
                },
            }),
            PortfolioCommands::Delete { portfolio_id } => Ok(Command::Portfolios {
                action: cmd::PortfolioAction::Delete {
                    portfolio_id: *portfolio_id,
                },
            }),
        },

        Commands::Assets { action } => match action {
            AssetCommands::Add {
                portfolio_id,
                asset_type,
                ticker,
                name,
                attributes,
            } => Ok(Command::Assets {
                action: cmd::AssetAction::Add {
                    portfolio_id: *portfolio_id,
                    ticker: ticker.clone(),
                    name: name.clone(),
                    kind: asset_kind(asset_type, attributes)?,
                },
            }),
            AssetCommands::List { portfolio_id } => Ok(Command::Assets {
                action: cmd::AssetAction::List {
                    portfolio_id: *portfolio_id,
                },
            }),
            AssetCommands::Delete { asset_id } => Ok(Command::Assets {
                action: cmd::AssetAction::Delete {
                    asset_id: *asset_id,
                },
            }),
        },

        Commands::Performance { action } => match action {
            PerformanceCommands::Show {
                portfolio_id,
                period,
            } => Ok(Command::Performance {
                action: cmd::PerformanceAction::Show {
                    portfolio_id: *portfolio_id,
                    period: period.clone(),
                },
            }),
        },

        Commands::Transactions { action } => match action {
            TransactionCommands::Add {
                asset_id,
                transaction_type,
                quantity,
                price,
                date,
            } => Ok(Command::Transactions {
                action: cmd::TransactionAction::Add {
                    asset_id: *asset_id,
                    transaction_type: cmd::parse_transaction_type(transaction_type)?,
                    quantity: cmd::parse_decimal(quantity, "quantity")?,
                    price: cmd::parse_decimal(price, "price")?,
                    trade_date: cmd::parse_date(date)?,
                },
            }),
            TransactionCommands::List { asset_id } => Ok(Command::Transactions {
                action: cmd::TransactionAction::List {
                    asset_id: *asset_id,
                },
            }),
            TransactionCommands::Delete { transaction_id } => Ok(Command::Transactions {
                action: cmd::TransactionAction::Delete {
                    transaction_id: *transaction_id,
                },
            }),
        },
    }
}

/// Build the asset kind from its type name and the kind flags.
/// A flag that belongs to another kind is rejected.
fn asset_kind(asset_type: &str, args: &AssetKindArgs) -> Result<AssetKind> {
    let asset_type: AssetType = asset_type
        .parse()
        .map_err(|_| {
            PortfolioError::ValidationError(format!("Unknown asset type '{}'", asset_type))
        })?;

    let flags = [
        ("--exchange", AssetType::Stock, args.exchange.is_some()),
        ("--sector", AssetType::Stock, args.sector.is_some()),
        ("--dividend-yield", AssetType::Stock, args.dividend_yield.is_some()),
        ("--coupon-rate", AssetType::Bond, args.coupon_rate.is_some()),
        ("--maturity-date", AssetType::Bond, args.maturity_date.is_some()),
        ("--issuer", AssetType::Bond, args.issuer.is_some()),
        ("--bond-type", AssetType::Bond, args.bond_type.is_some()),
        ("--fund-manager", AssetType::Fund, args.fund_manager.is_some()),
        ("--fund-type", AssetType::Fund, args.fund_type.is_some()),
        ("--expense-ratio", AssetType::Fund, args.expense_ratio.is_some()),
    ];
    if let Some((flag, owner, _)) = flags
        .iter()
        .find(|(_, owner, given)| *given && *owner != asset_type)
    {
        return Err(PortfolioError::ValidationError(format!(
            "{} only applies to {} assets",
            flag,
            owner.as_str().to_lowercase()
        ))
        .into());
    }

    let decimal_or_zero = |value: &Option<String>, field: &str| -> Result<Decimal> {
        value
            .as_deref()
            .map_or(Ok(Decimal::ZERO), |v| cmd::parse_decimal(v, field))
    };

    let kind = match asset_type {
        AssetType::Stock => AssetKind::Stock {
            exchange: args.exchange.clone(),
            sector: args.sector.clone(),
            dividend_yield: decimal_or_zero(&args.dividend_yield, "dividend yield")?,
        },
        AssetType::Bond => AssetKind::Bond {
            coupon_rate: decimal_or_zero(&args.coupon_rate, "coupon rate")?,
            maturity_date: args.maturity_date.as_deref().map(cmd::parse_date).transpose()?,
            issuer: args.issuer.clone(),
            bond_type: args
                .bond_type
                .as_deref()
                .map_or(Ok(BondType::Government), cmd::parse_bond_type)?,
        },
        AssetType::Fund => AssetKind::Fund {
            fund_manager: args.fund_manager.clone(),
            fund_type: args
                .fund_type
                .as_deref()
                .map_or(Ok(FundType::Other), cmd::parse_fund_type)?,
            expense_ratio: decimal_or_zero(&args.expense_ratio, "expense ratio")?,
        },
    };

    Ok(kind)
}
