use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Owner of one or more portfolios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
}

/// Portfolio aggregate: the portfolio row plus its assets and their transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: Option<i64>,
    pub name: String,
    pub customer_id: i64,
    pub assets: Vec<Asset>,
}

/// Asset held in a portfolio
///
/// Valuation only looks at `id`, `name`, `ticker` and `transactions`;
/// `kind` carries descriptive attributes that never enter the math.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Option<i64>,
    pub portfolio_id: i64,
    pub ticker: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: AssetKind,
    pub transactions: Vec<Transaction>,
}

impl Asset {
    pub fn asset_type(&self) -> AssetType {
        self.kind.asset_type()
    }
}

/// Kind-specific asset attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum AssetKind {
    #[serde(rename_all = "camelCase")]
    Stock {
        exchange: Option<String>,
        sector: Option<String>,
        dividend_yield: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Bond {
        coupon_rate: Decimal,
        maturity_date: Option<NaiveDate>,
        issuer: Option<String>,
        bond_type: BondType,
    },
    #[serde(rename_all = "camelCase")]
    Fund {
        fund_manager: Option<String>,
        fund_type: FundType,
        expense_ratio: Decimal,
    },
}

impl AssetKind {
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetKind::Stock { .. } => AssetType::Stock,
            AssetKind::Bond { .. } => AssetType::Bond,
            AssetKind::Fund { .. } => AssetType::Fund,
        }
    }
}

/// Asset types supported by the system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Stock,
    Bond,
    Fund,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "STOCK",
            AssetType::Bond => "BOND",
            AssetType::Fund => "FUND",
        }
    }
}

impl FromStr for AssetType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STOCK" => Ok(AssetType::Stock),
            "BOND" => Ok(AssetType::Bond),
            "FUND" => Ok(AssetType::Fund),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BondType {
    Government,
    Corporate,
    Municipal,
}

impl BondType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BondType::Government => "GOVERNMENT",
            BondType::Corporate => "CORPORATE",
            BondType::Municipal => "MUNICIPAL",
        }
    }
}

impl FromStr for BondType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GOVERNMENT" => Ok(BondType::Government),
            "CORPORATE" => Ok(BondType::Corporate),
            "MUNICIPAL" => Ok(BondType::Municipal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FundType {
    Etf,
    Mutual,
    Index,
    Hedge,
    Other,
}

impl FundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundType::Etf => "ETF",
            FundType::Mutual => "MUTUAL",
            FundType::Index => "INDEX",
            FundType::Hedge => "HEDGE",
            FundType::Other => "OTHER",
        }
    }
}

impl FromStr for FundType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETF" => Ok(FundType::Etf),
            "MUTUAL" => Ok(FundType::Mutual),
            "INDEX" => Ok(FundType::Index),
            "HEDGE" => Ok(FundType::Hedge),
            "OTHER" => Ok(FundType::Other),
            _ => Err(()),
        }
    }
}

/// Transaction type (buy or sell)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "B" => Ok(TransactionType::Buy),
            "SELL" | "S" => Ok(TransactionType::Sell),
            _ => Err(()),
        }
    }
}

/// Transaction (buy or sell of an asset)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Option<i64>,
    pub asset_id: i64,
    pub transaction_type: TransactionType,
    pub trade_date: NaiveDate,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// Portfolio row without its assets, for listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub id: i64,
    pub name: String,
    pub customer_name: String,
    pub asset_count: i64,
}
