use super::types::{
    EducationResult, EducationYearCost, MoneyMode, ProtectionResult, ResilienceResult,
    RetirementResult, ScenarioResult,
};

const SEPARATOR: &str = " • ";

/// Rows of the per-year education breakdown shown on screen. Totals always
/// include every study year.
pub const EDUCATION_BREAKDOWN_ROWS: usize = 6;

/// Whole-dollar amount with thousands separators, e.g. `$1,254,000`.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

impl ResilienceResult {
    pub fn summary(&self) -> String {
        [
            format!("Resilience Score {}/100", self.score),
            format!("Buffer {:.1} months", self.buffer_months),
            format!("6-month shock gap {}", format_money(self.shock_gap)),
        ]
        .join(SEPARATOR)
    }
}

impl ProtectionResult {
    pub fn summary(&self) -> String {
        [
            format!("Protection gap {}", format_money(self.total_gap)),
            format!("Death {}", format_money(self.death_gap)),
            format!("TPD {}", format_money(self.tpd_gap)),
            format!("CI {}", format_money(self.ci_gap)),
            self.risk.as_str().to_string(),
        ]
        .join(SEPARATOR)
    }
}

impl EducationResult {
    pub fn summary(&self, mode: MoneyMode) -> String {
        let years = self.yearly_costs.len();
        let unit = if years == 1 { "year" } else { "years" };
        [
            format!(
                "Education fund {} over {years} {unit}",
                format_money(self.total_future_cost)
            ),
            format!("Starts in {} years", self.years_to_start),
            format!(
                "Set aside {}/{}",
                format_money(self.set_aside.amount(mode)),
                mode.period_label()
            ),
        ]
        .join(SEPARATOR)
    }

    /// Leading study years for display, plus how many were left out.
    pub fn display_rows(&self) -> (&[EducationYearCost], usize) {
        let shown = self.yearly_costs.len().min(EDUCATION_BREAKDOWN_ROWS);
        (
            &self.yearly_costs[..shown],
            self.yearly_costs.len() - shown,
        )
    }
}

impl RetirementResult {
    pub fn summary(&self, mode: MoneyMode) -> String {
        [
            format!(
                "Nest egg {} at {}",
                format_money(self.nest_egg_at_retirement),
                self.retirement_age
            ),
            format!("Gap {}", format_money(self.gap_at_retirement)),
            format!(
                "Set aside {}/{}",
                format_money(self.set_aside.amount(mode)),
                mode.period_label()
            ),
            self.outlook.as_str().to_string(),
        ]
        .join(SEPARATOR)
    }
}

impl ScenarioResult {
    /// One-line text handed to the contact flow alongside the scenario key.
    pub fn summary(&self, mode: MoneyMode) -> String {
        match self {
            ScenarioResult::Resilience(result) => result.summary(),
            ScenarioResult::Protection(result) => result.summary(),
            ScenarioResult::Education(result) => result.summary(mode),
            ScenarioResult::Retirement(result) => result.summary(mode),
        }
    }
}
