use tracing::debug;

use super::growth::{future_value, pv_of_annuity};
use super::solver::solve_set_aside;
use super::types::{
    EducationInput, EducationResult, EducationYearCost, ProtectionInput, ProtectionResult,
    ProtectionRisk, ResilienceInput, ResilienceLabel, ResilienceResult, RetirementInput,
    RetirementOutlook, RetirementResult, ScenarioInput, ScenarioResult,
};

const SHOCK_MONTHS: f64 = 6.0;
const SHOCK_INCOME_SHARE: f64 = 0.5;

const BUFFER_WEIGHT: f64 = 0.45;
const SHOCK_WEIGHT: f64 = 0.35;
const AWARENESS_WEIGHT: f64 = 0.2;

const RESILIENCE_LOW_BELOW: u32 = 40;
const RESILIENCE_STRONG_FROM: u32 = 70;

const PROTECTION_LOW_MAX_RATIO: f64 = 8.0;
const PROTECTION_MODERATE_MAX_RATIO: f64 = 20.0;

const TIGHT_RUNWAY_YEARS: u32 = 5;
const BIG_GAP_THRESHOLD: f64 = 500_000.0;

/// Computes the scenario a caller selected. `None` means the inputs cannot
/// produce a meaningful result yet (e.g. zero monthly essentials).
pub fn run_scenario(input: &ScenarioInput) -> Option<ScenarioResult> {
    let result = match input {
        ScenarioInput::Resilience(input) => resilience(input).map(ScenarioResult::Resilience),
        ScenarioInput::Protection(input) => protection(input).map(ScenarioResult::Protection),
        ScenarioInput::Education(input) => Some(ScenarioResult::Education(education(input))),
        ScenarioInput::Retirement(input) => Some(ScenarioResult::Retirement(retirement(input))),
    };
    debug!(
        scenario = input.kind().key(),
        produced = result.is_some(),
        "scenario computed"
    );
    result
}

pub fn resilience(input: &ResilienceInput) -> Option<ResilienceResult> {
    let essentials = input.monthly_essentials;
    if !(essentials > 0.0) {
        return None;
    }
    let savings = input.liquid_savings;

    let buffer_months = savings / essentials;
    let buffer_score = buffer_score(buffer_months);

    let shock_need = essentials * SHOCK_MONTHS * SHOCK_INCOME_SHARE;
    let shock_gap = (shock_need - savings).max(0.0);
    let shock_score = (100.0 - shock_gap / shock_need * 100.0).clamp(0.0, 100.0);

    let covered = [
        input.has_life_cover,
        input.has_critical_illness_cover,
        input.has_disability_cover,
    ]
    .into_iter()
    .filter(|&flag| flag)
    .count();
    let awareness_score = covered as f64 / 3.0 * 100.0;

    let dependent_penalty = dependent_penalty(input.dependents, input.has_life_cover);

    let raw = buffer_score * BUFFER_WEIGHT + shock_score * SHOCK_WEIGHT
        + awareness_score * AWARENESS_WEIGHT
        - dependent_penalty;
    let score = raw.round().clamp(0.0, 100.0) as u32;

    Some(ResilienceResult {
        score,
        label: resilience_label(score),
        buffer_months,
        buffer_score,
        shock_need,
        shock_gap,
        shock_score,
        awareness_score,
        dependent_penalty,
    })
}

fn buffer_score(buffer_months: f64) -> f64 {
    if buffer_months >= 12.0 {
        95.0
    } else if buffer_months >= 6.0 {
        85.0
    } else if buffer_months >= 3.0 {
        60.0
    } else if buffer_months >= 1.0 {
        30.0
    } else if buffer_months > 0.0 {
        10.0
    } else {
        0.0
    }
}

fn dependent_penalty(dependents: u32, has_life_cover: bool) -> f64 {
    if has_life_cover {
        return 0.0;
    }
    match dependents {
        0 => 0.0,
        1 => 12.0,
        2 => 18.0,
        _ => 22.0,
    }
}

fn resilience_label(score: u32) -> ResilienceLabel {
    if score < RESILIENCE_LOW_BELOW {
        ResilienceLabel::Low
    } else if score >= RESILIENCE_STRONG_FROM {
        ResilienceLabel::Strong
    } else {
        ResilienceLabel::Moderate
    }
}

pub fn protection(input: &ProtectionInput) -> Option<ProtectionResult> {
    let monthly = input.monthly_commitments;
    let years = input.years_to_support;
    if !(monthly > 0.0) || !(years > 0.0) {
        return None;
    }

    let annual = monthly * 12.0;
    let income_over_support = annual * years;

    let death_need = income_over_support + input.one_time_costs;
    let tpd_need = income_over_support * (input.income_replace_pct / 100.0);
    let ci_need = monthly * input.ci_months_cover as f64;

    let death_gap = (death_need - input.existing_death).max(0.0);
    let tpd_gap = (tpd_need - input.existing_tpd).max(0.0);
    let ci_gap = (ci_need - input.existing_ci).max(0.0);
    let total_gap = death_gap + tpd_gap + ci_gap;

    let gap_ratio = total_gap / annual.max(1.0);
    let risk = if gap_ratio <= PROTECTION_LOW_MAX_RATIO {
        ProtectionRisk::Low
    } else if gap_ratio <= PROTECTION_MODERATE_MAX_RATIO {
        ProtectionRisk::Moderate
    } else {
        ProtectionRisk::Risk
    };

    Some(ProtectionResult {
        death_need,
        tpd_need,
        ci_need,
        death_gap,
        tpd_gap,
        ci_gap,
        total_gap,
        gap_ratio,
        risk,
    })
}

pub fn education(input: &EducationInput) -> EducationResult {
    let years_to_start = input.start_age.saturating_sub(input.child_age);
    let horizon = years_to_start as f64;

    let annual_at_start = future_value(input.annual_cost_today, input.inflation_pct, horizon);

    let yearly_costs: Vec<EducationYearCost> = (0..input.study_years)
        .map(|i| EducationYearCost {
            study_year: i + 1,
            child_age: input.start_age.max(input.child_age).saturating_add(i),
            annual_cost: future_value(annual_at_start, input.inflation_pct, i as f64),
        })
        .collect();
    let total_future_cost = yearly_costs.iter().map(|row| row.annual_cost).sum::<f64>();

    let fv_savings_at_start = future_value(input.current_savings, input.return_pct, horizon);
    let shortfall_at_start = (total_future_cost - fv_savings_at_start).max(0.0);

    let set_aside = solve_set_aside(
        total_future_cost,
        input.current_savings,
        input.return_pct,
        horizon,
    );

    EducationResult {
        years_to_start,
        annual_at_start,
        yearly_costs,
        total_future_cost,
        fv_savings_at_start,
        shortfall_at_start,
        set_aside,
    }
}

pub fn retirement(input: &RetirementInput) -> RetirementResult {
    let years_to_retire = input.retirement_age.saturating_sub(input.current_age);
    let years_in_retirement = input.plan_until_age.saturating_sub(input.retirement_age).max(1);

    let expense_at_retirement = future_value(
        input.monthly_expense_today,
        input.inflation_pct,
        years_to_retire as f64,
    );
    let net_monthly_need_at_retirement =
        (expense_at_retirement - input.monthly_income_at_retirement).max(0.0);
    let nest_egg_at_retirement = pv_of_annuity(
        net_monthly_need_at_retirement,
        input.post_retirement_return_pct,
        years_in_retirement as f64,
    );
    let fv_current_savings_at_retirement = future_value(
        input.current_savings,
        input.pre_retirement_return_pct,
        years_to_retire as f64,
    );
    let gap_at_retirement = (nest_egg_at_retirement - fv_current_savings_at_retirement).max(0.0);

    let set_aside = solve_set_aside(
        nest_egg_at_retirement,
        input.current_savings,
        input.pre_retirement_return_pct,
        years_to_retire as f64,
    );

    RetirementResult {
        retirement_age: input.retirement_age,
        years_to_retire,
        years_in_retirement,
        expense_at_retirement,
        net_monthly_need_at_retirement,
        nest_egg_at_retirement,
        fv_current_savings_at_retirement,
        gap_at_retirement,
        set_aside,
        outlook: retirement_outlook(gap_at_retirement, years_to_retire),
    }
}

fn retirement_outlook(gap: f64, years_to_retire: u32) -> RetirementOutlook {
    if gap <= 0.0 {
        RetirementOutlook::OnTrack
    } else if years_to_retire <= TIGHT_RUNWAY_YEARS {
        RetirementOutlook::TightRunway
    } else if gap >= BIG_GAP_THRESHOLD {
        RetirementOutlook::BigGap
    } else {
        RetirementOutlook::GapToPlan
    }
}
