use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::PortfolioError;
use crate::reports::valuation::AssetPerformance;

/// One asset's share of the portfolio at the end of the range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub asset_name: String,
    pub value: Decimal,
    pub allocation_percentage: Decimal,
}

/// Calculate each asset's percentage of `total_value`, in input order.
///
/// With a zero or negative total every percentage is zero. No rounding is
/// applied, so percentages sum to 100 only up to decimal precision.
pub fn calculate_allocation(
    assets: &[AssetPerformance],
    total_value: Decimal,
) -> Result<Vec<AssetAllocation>, PortfolioError> {
    assets
        .iter()
        .map(|asset| {
            let allocation_percentage = if total_value > Decimal::ZERO {
                asset
                    .value
                    .checked_div(total_value)
                    .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or_else(|| {
                        PortfolioError::Overflow(format!("allocation of {}", asset.name))
                    })?
            } else {
                Decimal::ZERO
            };
            Ok(AssetAllocation {
                asset_name: asset.name.clone(),
                value: asset.value,
                allocation_percentage,
            })
        })
        .collect()
}
