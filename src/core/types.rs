use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Resilience,
    Protection,
    Education,
    Retirement,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::Resilience,
        ScenarioKind::Protection,
        ScenarioKind::Education,
        ScenarioKind::Retirement,
    ];

    /// Stable key used when a scenario is handed to the contact flow.
    pub fn key(self) -> &'static str {
        match self {
            ScenarioKind::Resilience => "resilience",
            ScenarioKind::Protection => "protection",
            ScenarioKind::Education => "education",
            ScenarioKind::Retirement => "retirement",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key.trim()))
    }
}

/// Periodic unit a suggested contribution is shown in.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneyMode {
    #[default]
    Monthly,
    Annual,
}

impl MoneyMode {
    pub fn period_label(self) -> &'static str {
        match self {
            MoneyMode::Monthly => "month",
            MoneyMode::Annual => "year",
        }
    }
}

/// Required contribution solved both ways; [`MoneyMode`] only picks one for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAside {
    pub monthly: f64,
    pub annual: f64,
}

impl SetAside {
    pub fn amount(self, mode: MoneyMode) -> f64 {
        match mode {
            MoneyMode::Monthly => self.monthly,
            MoneyMode::Annual => self.annual,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResilienceInput {
    pub monthly_essentials: f64,
    pub liquid_savings: f64,
    pub dependents: u32,
    pub has_life_cover: bool,
    pub has_critical_illness_cover: bool,
    pub has_disability_cover: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ResilienceLabel {
    Low,
    Moderate,
    Strong,
}

impl ResilienceLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ResilienceLabel::Low => "Low",
            ResilienceLabel::Moderate => "Moderate",
            ResilienceLabel::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResilienceResult {
    pub score: u32,
    pub label: ResilienceLabel,
    pub buffer_months: f64,
    pub buffer_score: f64,
    pub shock_need: f64,
    pub shock_gap: f64,
    pub shock_score: f64,
    pub awareness_score: f64,
    pub dependent_penalty: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionInput {
    pub monthly_commitments: f64,
    pub years_to_support: f64,
    pub one_time_costs: f64,
    pub income_replace_pct: f64,
    pub ci_months_cover: u32,
    pub existing_death: f64,
    pub existing_tpd: f64,
    pub existing_ci: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProtectionRisk {
    Low,
    Moderate,
    Risk,
}

impl ProtectionRisk {
    pub fn as_str(self) -> &'static str {
        match self {
            ProtectionRisk::Low => "LOW",
            ProtectionRisk::Moderate => "MODERATE",
            ProtectionRisk::Risk => "RISK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionResult {
    pub death_need: f64,
    pub tpd_need: f64,
    pub ci_need: f64,
    pub death_gap: f64,
    pub tpd_gap: f64,
    pub ci_gap: f64,
    pub total_gap: f64,
    pub gap_ratio: f64,
    pub risk: ProtectionRisk,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    pub child_age: u32,
    pub start_age: u32,
    pub study_years: u32,
    pub annual_cost_today: f64,
    pub inflation_pct: f64,
    pub current_savings: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationYearCost {
    /// 1-based year of study.
    pub study_year: u32,
    pub child_age: u32,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationResult {
    pub years_to_start: u32,
    pub annual_at_start: f64,
    pub yearly_costs: Vec<EducationYearCost>,
    pub total_future_cost: f64,
    pub fv_savings_at_start: f64,
    pub shortfall_at_start: f64,
    pub set_aside: SetAside,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub plan_until_age: u32,
    pub monthly_expense_today: f64,
    pub inflation_pct: f64,
    pub monthly_income_at_retirement: f64,
    pub current_savings: f64,
    pub pre_retirement_return_pct: f64,
    pub post_retirement_return_pct: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum RetirementOutlook {
    OnTrack,
    TightRunway,
    BigGap,
    GapToPlan,
}

impl RetirementOutlook {
    pub fn as_str(self) -> &'static str {
        match self {
            RetirementOutlook::OnTrack => "On track",
            RetirementOutlook::TightRunway => "Tight runway",
            RetirementOutlook::BigGap => "Big gap",
            RetirementOutlook::GapToPlan => "Gap to plan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResult {
    pub retirement_age: u32,
    pub years_to_retire: u32,
    pub years_in_retirement: u32,
    pub expense_at_retirement: f64,
    pub net_monthly_need_at_retirement: f64,
    pub nest_egg_at_retirement: f64,
    pub fv_current_savings_at_retirement: f64,
    pub gap_at_retirement: f64,
    pub set_aside: SetAside,
    pub outlook: RetirementOutlook,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum ScenarioInput {
    Resilience(ResilienceInput),
    Protection(ProtectionInput),
    Education(EducationInput),
    Retirement(RetirementInput),
}

impl ScenarioInput {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            ScenarioInput::Resilience(_) => ScenarioKind::Resilience,
            ScenarioInput::Protection(_) => ScenarioKind::Protection,
            ScenarioInput::Education(_) => ScenarioKind::Education,
            ScenarioInput::Retirement(_) => ScenarioKind::Retirement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum ScenarioResult {
    Resilience(ResilienceResult),
    Protection(ProtectionResult),
    Education(EducationResult),
    Retirement(RetirementResult),
}

impl ScenarioResult {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            ScenarioResult::Resilience(_) => ScenarioKind::Resilience,
            ScenarioResult::Protection(_) => ScenarioKind::Protection,
            ScenarioResult::Education(_) => ScenarioKind::Education,
            ScenarioResult::Retirement(_) => ScenarioKind::Retirement,
        }
    }
}
