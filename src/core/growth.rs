/// Compounds `pv` annually at `rate_pct` percent for `years` (fractional allowed).
pub fn future_value(pv: f64, rate_pct: f64, years: f64) -> f64 {
    let years = years.max(0.0);
    pv * (1.0 + rate_pct / 100.0).powf(years)
}

/// Lump sum needed today to fund `monthly` withdrawals at the end of each month
/// for `years`, while the remaining balance earns `annual_return_pct`.
pub fn pv_of_annuity(monthly: f64, annual_return_pct: f64, years: f64) -> f64 {
    let n = month_count(years);
    let r = annual_return_pct / 100.0 / 12.0;
    if r == 0.0 {
        return monthly * n as f64;
    }
    monthly * (1.0 - (1.0 + r).powi(-n)) / r
}

pub(crate) fn month_count(years: f64) -> i32 {
    ((years * 12.0).round() as i32).max(1)
}

pub(crate) fn year_count(years: f64) -> i32 {
    (years.round() as i32).max(1)
}
