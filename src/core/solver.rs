use super::growth::{month_count, year_count};
use super::types::SetAside;

/// Level end-of-month contribution that grows `current_pv` into `target_fv`
/// within `years` at `annual_return_pct`, compounded monthly.
///
/// Returns 0 when the projected balance already covers the target.
pub fn monthly_pmt(target_fv: f64, current_pv: f64, annual_return_pct: f64, years: f64) -> f64 {
    let n = month_count(years);
    let r = annual_return_pct / 100.0 / 12.0;
    sinking_fund_payment(target_fv, current_pv, r, n)
}

/// Yearly counterpart of [`monthly_pmt`], compounded once a year.
pub fn yearly_pmt(target_fv: f64, current_pv: f64, annual_return_pct: f64, years: f64) -> f64 {
    let n = year_count(years);
    let r = annual_return_pct / 100.0;
    sinking_fund_payment(target_fv, current_pv, r, n)
}

/// Solves the contribution for both periodic units at once.
pub fn solve_set_aside(
    target_fv: f64,
    current_pv: f64,
    annual_return_pct: f64,
    years: f64,
) -> SetAside {
    SetAside {
        monthly: monthly_pmt(target_fv, current_pv, annual_return_pct, years),
        annual: yearly_pmt(target_fv, current_pv, annual_return_pct, years),
    }
}

fn sinking_fund_payment(target_fv: f64, current_pv: f64, r: f64, n: i32) -> f64 {
    let fv_current = current_pv * (1.0 + r).powi(n);
    let gap = (target_fv - fv_current).max(0.0);
    if r == 0.0 {
        return gap / n as f64;
    }
    gap * r / ((1.0 + r).powi(n) - 1.0)
}
