//! Utility functions for formatting and common operations
//!
//! Centralized formatting for consistent display of money amounts and
//! percentages throughout the CLI output.

use rust_decimal::Decimal;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "$ " prefix
    Dollar,
    /// No currency symbol (for table cells)
    None,
}

/// Core formatting function with full control over output.
///
/// Rounds to 2 decimal places (banker's rounding) and groups thousands
/// with `,`, using `.` as the decimal separator.
///
/// # Examples
/// ```
/// use folio::utils::{format_amount_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_amount_with_width(dec!(1234.56), 0, CurrencySymbol::Dollar),
///     "$ 1,234.56"
/// );
///
/// assert_eq!(
///     format_amount_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1,234.00"
/// );
/// ```
pub fn format_amount_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = value.round_dp(2);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Dollar => "$ ",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", prefix, sign, with_separators, decimal_part);

    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

// ============ Convenience functions ============

/// Format with currency symbol: "$ 1,234.56"
///
/// # Examples
/// ```
/// use folio::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "$ 1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "$ -500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_amount_with_width(value, 0, CurrencySymbol::Dollar)
}

/// Format number only (no symbol): "1,234.56"
pub fn format_amount(value: Decimal) -> String {
    format_amount_with_width(value, 0, CurrencySymbol::None)
}

/// Format a percentage with 2 decimals: "33.33%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}
