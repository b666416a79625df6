use clap::{Args, Parser, Subcommand};

pub mod formatters;
pub mod help;
pub mod runner;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Portfolio bookkeeping with day-by-day performance valuation")]
#[command(
    long_about = "Record buys and sells of stocks, bonds and funds, then value a portfolio day by day over any date range with realized/unrealized gains and allocation."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create demo data (customer, portfolio, three assets) in an empty database
    Seed,

    /// Customer management
    Customers {
        #[command(subcommand)]
        action: CustomerCommands,
    },

    /// Portfolio management
    Portfolios {
        #[command(subcommand)]
        action: PortfolioCommands,
    },

    /// Asset management
    Assets {
        #[command(subcommand)]
        action: AssetCommands,
    },

    /// Performance analysis and reporting
    Performance {
        #[command(subcommand)]
        action: PerformanceCommands,
    },

    /// Manual transaction management
    Transactions {
        #[command(subcommand)]
        action: TransactionCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// Create a customer
    Add {
        /// Customer name
        name: String,
    },
    /// List customers
    List,
}

#[derive(Subcommand, Debug)]
pub enum PortfolioCommands {
    /// List portfolios with owner and asset count
    List,
    /// Create an empty portfolio for a customer
    Create {
        /// Owner (see `customers list`)
        customer_id: i64,
        /// Portfolio name
        name: String,
    },
    /// Delete a portfolio with all its assets and transactions
    Delete {
        /// Portfolio id
        portfolio_id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// Add a stock, bond or fund to a portfolio
    Add {
        /// Portfolio id
        portfolio_id: i64,

        /// Asset kind
        #[arg(value_parser = ["stock", "bond", "fund"], ignore_case = true)]
        asset_type: String,

        /// Ticker symbol
        ticker: String,

        /// Display name
        name: String,

        #[command(flatten)]
        attributes: AssetKindArgs,
    },
    /// List the assets of a portfolio
    List {
        /// Portfolio id
        portfolio_id: i64,
    },
    /// Delete an asset with all its transactions
    Delete {
        /// Asset id
        asset_id: i64,
    },
}

/// Kind-specific attributes. Each flag applies to one kind only.
#[derive(Args, Debug, Default)]
pub struct AssetKindArgs {
    /// Stock: listing exchange
    #[arg(long)]
    pub exchange: Option<String>,

    /// Stock: sector
    #[arg(long)]
    pub sector: Option<String>,

    /// Stock: dividend yield (decimal, default 0)
    #[arg(long)]
    pub dividend_yield: Option<String>,

    /// Bond: coupon rate (decimal, default 0)
    #[arg(long)]
    pub coupon_rate: Option<String>,

    /// Bond: maturity date (YYYY-MM-DD)
    #[arg(long)]
    pub maturity_date: Option<String>,

    /// Bond: issuer
    #[arg(long)]
    pub issuer: Option<String>,

    /// Bond: government, corporate or municipal (default government)
    #[arg(long)]
    pub bond_type: Option<String>,

    /// Fund: manager
    #[arg(long)]
    pub fund_manager: Option<String>,

    /// Fund: etf, mutual, index, hedge or other (default other)
    #[arg(long)]
    pub fund_type: Option<String>,

    /// Fund: expense ratio (decimal, default 0)
    #[arg(long)]
    pub expense_ratio: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PerformanceCommands {
    /// Show the performance report of a portfolio
    Show {
        /// Portfolio id (see `portfolios list`)
        portfolio_id: i64,

        /// Period: MTD, QTD, YTD, 1Y, ALL, YYYY, or from:to (YYYY-MM-DD:YYYY-MM-DD).
        /// Defaults to the configured `default_period`.
        period: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a buy or sell against an existing asset
    Add {
        /// Asset id
        asset_id: i64,

        /// buy or sell
        #[arg(value_parser = ["buy", "sell", "BUY", "SELL"])]
        transaction_type: String,

        /// Quantity (non-negative decimal)
        quantity: String,

        /// Unit price (positive decimal)
        price: String,

        /// Trade date (YYYY-MM-DD)
        date: String,
    },
    /// List an asset's transactions in trade-date order
    List {
        /// Asset id
        asset_id: i64,
    },
    /// Delete a transaction
    Delete {
        /// Transaction id
        transaction_id: i64,
    },
}
