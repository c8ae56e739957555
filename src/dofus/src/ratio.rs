//! Cost per experience point.
//!
//! The ratio is the price of a single unit divided by the experience that
//! unit grants. Lower is cheaper experience.

/// Compute `(price / lot_size) / xp_per_unit`.
///
/// Returns `None` when the price or the xp value is missing, zero,
/// negative or not finite, or when the lot size is not a positive number.
/// The result is unrounded; use [`format_ratio`] for display only.
pub fn compute_ratio(price: Option<f64>, xp_per_unit: Option<f64>, lot_size: f64) -> Option<f64> {
    let price = positive(price)?;
    let xp = positive(xp_per_unit)?;
    let lot = positive(Some(lot_size))?;
    Some((price / lot) / xp)
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Two-decimal display form of a ratio, `-` when absent
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}", r),
        None => "-".to_string(),
    }
}
