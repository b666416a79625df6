// Reports module - day-by-day valuation, allocation and the performance report

pub mod allocation;
pub mod performance;
pub mod valuation;

pub use allocation::{calculate_allocation, AssetAllocation};
pub use performance::{calculate_performance, get_period_dates, PerformanceReport, Period};
pub use valuation::{value_portfolio, AssetPerformance, Valuation, ValueOverTime};
