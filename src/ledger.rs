//! Average-cost ledger replay for a single asset
//!
//! An asset's position on any day is rebuilt from its own transactions:
//! buys grow quantity and cost basis, sells realize gain against the
//! average cost held just before the sale. The price of the most recent
//! transaction doubles as the asset's market price, since there is no
//! external quote feed.
//!
//! Two entry points produce identical states:
//! - [`replay`] folds every transaction up to a cutoff from scratch
//! - [`LedgerCursor`] sorts once and folds forward as the cutoff advances,
//!   which is what the day-by-day valuation uses

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::{Transaction, TransactionType};
use crate::error::PortfolioError;

/// Running position of one asset as of some date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub realized_gain: Decimal,
    /// Price of the last transaction folded in, zero before the first one
    pub last_price: Decimal,
}

impl LedgerState {
    /// Fold one transaction into the position.
    ///
    /// Sells are not checked against the held quantity: over-selling drives
    /// quantity and cost basis negative and the next transactions build on that.
    /// On overflow the state is left unchanged.
    pub fn apply(&mut self, tx: &Transaction) -> Result<(), PortfolioError> {
        *self = self.folded(tx).ok_or_else(|| {
            PortfolioError::Overflow(format!(
                "{} of asset {} on {}",
                tx.transaction_type.as_str(),
                tx.asset_id,
                tx.trade_date
            ))
        })?;
        Ok(())
    }

    fn folded(&self, tx: &Transaction) -> Option<LedgerState> {
        let mut next = *self;
        match tx.transaction_type {
            TransactionType::Buy => {
                next.quantity = self.quantity.checked_add(tx.quantity)?;
                next.cost_basis = self
                    .cost_basis
                    .checked_add(tx.quantity.checked_mul(tx.price)?)?;
            }
            TransactionType::Sell => {
                let avg_cost = self.checked_average_cost()?;
                let gain = tx.price.checked_sub(avg_cost)?.checked_mul(tx.quantity)?;
                next.realized_gain = self.realized_gain.checked_add(gain)?;
                next.quantity = self.quantity.checked_sub(tx.quantity)?;
                next.cost_basis = self
                    .cost_basis
                    .checked_sub(avg_cost.checked_mul(tx.quantity)?)?;
            }
        }
        next.last_price = tx.price;
        Some(next)
    }

    fn checked_average_cost(&self) -> Option<Decimal> {
        if self.quantity > Decimal::ZERO {
            self.cost_basis.checked_div(self.quantity)
        } else {
            Some(Decimal::ZERO)
        }
    }

    /// Cost per held unit; zero when nothing (or less than nothing) is held
    pub fn average_cost(&self) -> Result<Decimal, PortfolioError> {
        self.checked_average_cost()
            .ok_or_else(|| PortfolioError::Overflow("average cost".to_string()))
    }

    pub fn market_value(&self) -> Result<Decimal, PortfolioError> {
        self.quantity
            .checked_mul(self.last_price)
            .ok_or_else(|| PortfolioError::Overflow("market value".to_string()))
    }

    pub fn unrealized_gain(&self) -> Result<Decimal, PortfolioError> {
        self.market_value()?
            .checked_sub(self.cost_basis)
            .ok_or_else(|| PortfolioError::Overflow("unrealized gain".to_string()))
    }
}

/// Transactions in replay order: ascending trade date, ties kept in input order
pub fn chronological(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    // sort_by_key is stable, which is what keeps same-day ties in insertion order
    ordered.sort_by_key(|tx| tx.trade_date);
    ordered
}

/// Replay an asset's full history up to and including `cutoff`
pub fn replay(
    transactions: &[Transaction],
    cutoff: NaiveDate,
) -> Result<LedgerState, PortfolioError> {
    chronological(transactions)
        .into_iter()
        .filter(|tx| tx.trade_date <= cutoff)
        .try_fold(LedgerState::default(), |mut state, tx| {
            state.apply(tx)?;
            Ok(state)
        })
}

/// Incremental replay over a sorted transaction list.
///
/// Advancing to a later date only folds the transactions in between.
/// Moving to an earlier date restarts from the beginning.
#[derive(Debug, Clone)]
pub struct LedgerCursor<'a> {
    transactions: Vec<&'a Transaction>,
    next: usize,
    cutoff: Option<NaiveDate>,
    state: LedgerState,
}

impl<'a> LedgerCursor<'a> {
    pub fn new(transactions: &'a [Transaction]) -> Self {
        Self {
            transactions: chronological(transactions),
            next: 0,
            cutoff: None,
            state: LedgerState::default(),
        }
    }

    /// Move the cutoff to `day` and return the position as of that day
    pub fn advance_to(&mut self, day: NaiveDate) -> Result<LedgerState, PortfolioError> {
        if self.cutoff.is_some_and(|c| day < c) {
            self.next = 0;
            self.state = LedgerState::default();
        }
        self.cutoff = Some(day);

        while let Some(tx) = self.transactions.get(self.next) {
            if tx.trade_date > day {
                break;
            }
            self.state.apply(tx)?;
            self.next += 1;
        }

        Ok(self.state)
    }
}
