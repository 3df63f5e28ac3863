use crate::error::{BoardError, BoardResult};
use crate::models::{DisplayRow, RatesSnapshot, TargetCurrency};

/// Rounds to `places` decimals on the exact binary value, ties to even.
///
/// Scaling by `10^places` first would round twice: `1.0 * 0.105` is stored
/// just below `0.105` and must come out as `0.1`, not `0.11`.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Shortest decimal form that keeps a fractional part, e.g. `710.0`, `0.1408`.
pub fn format_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Value of one unit of `code` in the base currency.
pub fn headline(rates: &RatesSnapshot, code: &str) -> BoardResult<f64> {
    Ok(round_to(1.0 / rates.rate(code)?, 4))
}

/// Builds one row per target, in target order. Fails without producing any
/// rows if a target is missing from the snapshot.
pub fn build_rows(
    rates: &RatesSnapshot,
    amount: f64,
    targets: &[TargetCurrency],
) -> BoardResult<Vec<DisplayRow>> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BoardError::InvalidAmount(amount));
    }

    targets
        .iter()
        .map(|target| -> BoardResult<DisplayRow> {
            let rate = rates.rate(target.code)?;
            Ok(DisplayRow {
                label: format!("{} ({})", target.name, target.code),
                inverse_rate: round_to(1.0 / rate, 4),
                converted: format!(
                    "{} {}",
                    format_decimal(round_to(amount * rate, 2)),
                    target.code
                ),
            })
        })
        .collect()
}
