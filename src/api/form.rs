use std::ops::RangeInclusive;

use clap::Args;
use thiserror::Error;
use tracing::warn;

use crate::core::{EducationInput, ProtectionInput, ResilienceInput, RetirementInput};

pub const MAX_DEPENDENTS: u32 = 3;
pub const INCOME_REPLACE_PCT: RangeInclusive<f64> = 30.0..=100.0;
pub const CI_MONTHS_COVER: RangeInclusive<u32> = 6..=60;
pub const EDUCATION_INFLATION_PCT: RangeInclusive<f64> = 0.0..=10.0;
pub const EDUCATION_RETURN_PCT: RangeInclusive<f64> = 0.0..=10.0;
pub const RETIREMENT_INFLATION_PCT: RangeInclusive<f64> = 0.0..=8.0;
pub const PRE_RETIREMENT_RETURN_PCT: RangeInclusive<f64> = 0.0..=10.0;
pub const POST_RETIREMENT_RETURN_PCT: RangeInclusive<f64> = 0.0..=8.0;
pub const MAX_AGE: u32 = 120;
pub const MAX_STUDY_YEARS: u32 = 10;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum InputError {
    #[error("--{field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> InputError {
    InputError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Cleans a typed money amount such as `S$12,500` or ` 3 000 `.
///
/// Empty text is `Ok(None)` (field not filled yet); negatives clamp to zero.
pub fn sanitize_amount(raw: &str) -> Result<Option<f64>, String> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("S$")
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    let value = cleaned
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", raw.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite amount", raw.trim()));
    }
    Ok(Some(value.max(0.0)))
}

/// clap value parser for money flags; an empty value is rejected.
pub fn amount_arg(raw: &str) -> Result<f64, String> {
    sanitize_amount(raw)?.ok_or_else(|| "an amount is required".to_string())
}

/// clap value parser for percentages and durations; accepts a trailing `%`.
pub fn finite_arg(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let value = trimmed
        .strip_suffix('%')
        .unwrap_or(trimmed)
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{trimmed}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("'{trimmed}' is not a finite number"));
    }
    Ok(value)
}

fn clamp_pct(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(invalid(field, "must be a finite percentage"));
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        warn!(field, value, clamped, "rate clamped into allowed range");
    }
    Ok(clamped)
}

fn check_age(field: &'static str, age: u32) -> Result<u32, InputError> {
    if age > MAX_AGE {
        return Err(invalid(field, format!("must be <= {MAX_AGE}")));
    }
    Ok(age)
}

#[derive(Args, Debug, Clone)]
pub struct ResilienceForm {
    #[arg(long, value_parser = amount_arg, help = "Monthly essential expenses")]
    pub essentials: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0", help = "Liquid savings")]
    pub savings: f64,
    #[arg(long, default_value_t = 0, help = "Number of dependents (3 means 3 or more)")]
    pub dependents: u32,
    #[arg(long, help = "Has life cover")]
    pub life_cover: bool,
    #[arg(long, help = "Has critical illness cover")]
    pub ci_cover: bool,
    #[arg(long, help = "Has disability income cover")]
    pub disability_cover: bool,
}

impl ResilienceForm {
    pub fn build(&self) -> Result<ResilienceInput, InputError> {
        Ok(ResilienceInput {
            monthly_essentials: self.essentials,
            liquid_savings: self.savings,
            dependents: self.dependents.min(MAX_DEPENDENTS),
            has_life_cover: self.life_cover,
            has_critical_illness_cover: self.ci_cover,
            has_disability_cover: self.disability_cover,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct ProtectionForm {
    #[arg(long, value_parser = amount_arg, help = "Monthly commitments to keep paying")]
    pub monthly_commitments: f64,
    #[arg(
        long,
        value_parser = finite_arg,
        default_value = "20",
        help = "Years the family needs support"
    )]
    pub years_to_support: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0", help = "One-time costs (debts, funeral)")]
    pub one_time_costs: f64,
    #[arg(
        long,
        value_parser = finite_arg,
        default_value = "60",
        help = "Income replaced on total permanent disability, percent (30-100)"
    )]
    pub income_replace_pct: f64,
    #[arg(long, default_value_t = 24, help = "Critical illness months of cover (6-60)")]
    pub ci_months: u32,
    #[arg(long, value_parser = amount_arg, default_value = "0")]
    pub existing_death: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0")]
    pub existing_tpd: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0")]
    pub existing_ci: f64,
}

impl ProtectionForm {
    pub fn build(&self) -> Result<ProtectionInput, InputError> {
        if !self.years_to_support.is_finite() || self.years_to_support < 0.0 {
            return Err(invalid("years-to-support", "must be >= 0"));
        }

        let ci_months_cover = self
            .ci_months
            .clamp(*CI_MONTHS_COVER.start(), *CI_MONTHS_COVER.end());
        if ci_months_cover != self.ci_months {
            warn!(
                requested = self.ci_months,
                ci_months_cover, "critical illness months clamped into allowed range"
            );
        }

        Ok(ProtectionInput {
            monthly_commitments: self.monthly_commitments,
            years_to_support: self.years_to_support,
            one_time_costs: self.one_time_costs,
            income_replace_pct: clamp_pct(
                "income-replace-pct",
                self.income_replace_pct,
                INCOME_REPLACE_PCT,
            )?,
            ci_months_cover,
            existing_death: self.existing_death,
            existing_tpd: self.existing_tpd,
            existing_ci: self.existing_ci,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct EducationForm {
    #[arg(long, default_value_t = 5, help = "Child's current age")]
    pub child_age: u32,
    #[arg(long, default_value_t = 18, help = "Age the child starts tertiary study")]
    pub start_age: u32,
    #[arg(long, default_value_t = 4)]
    pub study_years: u32,
    #[arg(long, value_parser = amount_arg, default_value = "25000", help = "Annual cost in today's money")]
    pub annual_cost: f64,
    #[arg(
        long,
        value_parser = finite_arg,
        default_value = "4",
        help = "Education inflation in percent (0-10)"
    )]
    pub inflation: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0", help = "Education savings today")]
    pub savings: f64,
    #[arg(
        long = "return",
        value_parser = finite_arg,
        default_value = "4",
        help = "Expected return in percent (0-10)"
    )]
    pub expected_return: f64,
}

impl EducationForm {
    pub fn build(&self) -> Result<EducationInput, InputError> {
        let child_age = check_age("child-age", self.child_age)?;
        let start_age = check_age("start-age", self.start_age)?;
        if start_age < child_age {
            return Err(invalid("start-age", "must be >= --child-age"));
        }
        if self.study_years == 0 || self.study_years > MAX_STUDY_YEARS {
            return Err(invalid(
                "study-years",
                format!("must be between 1 and {MAX_STUDY_YEARS}"),
            ));
        }

        Ok(EducationInput {
            child_age,
            start_age,
            study_years: self.study_years,
            annual_cost_today: self.annual_cost,
            inflation_pct: clamp_pct("inflation", self.inflation, EDUCATION_INFLATION_PCT)?,
            current_savings: self.savings,
            return_pct: clamp_pct("return", self.expected_return, EDUCATION_RETURN_PCT)?,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct RetirementForm {
    #[arg(long, default_value_t = 35)]
    pub current_age: u32,
    #[arg(long, default_value_t = 65)]
    pub retirement_age: u32,
    #[arg(long, default_value_t = 85, help = "Age to fund retirement through")]
    pub plan_until_age: u32,
    #[arg(long, value_parser = amount_arg, default_value = "3000", help = "Monthly expenses in today's money")]
    pub monthly_expense: f64,
    #[arg(
        long,
        value_parser = finite_arg,
        default_value = "3",
        help = "Expected inflation in percent (0-8)"
    )]
    pub inflation: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0", help = "Expected monthly income at retirement")]
    pub retirement_income: f64,
    #[arg(long, value_parser = amount_arg, default_value = "0", help = "Current retirement savings")]
    pub savings: f64,
    #[arg(
        long,
        value_parser = finite_arg,
        default_value = "5",
        help = "Return before retirement in percent (0-10)"
    )]
    pub pre_return: f64,
    #[arg(
        long,
        value_parser = finite_arg,
        default_value = "3",
        help = "Return during retirement in percent (0-8)"
    )]
    pub post_return: f64,
}

impl RetirementForm {
    pub fn build(&self) -> Result<RetirementInput, InputError> {
        check_age("current-age", self.current_age)?;
        check_age("retirement-age", self.retirement_age)?;
        check_age("plan-until-age", self.plan_until_age)?;
        if self.retirement_age < self.current_age {
            return Err(invalid("retirement-age", "must be >= --current-age"));
        }
        if self.plan_until_age <= self.retirement_age {
            return Err(invalid("plan-until-age", "must be > --retirement-age"));
        }

        Ok(RetirementInput {
            current_age: self.current_age,
            retirement_age: self.retirement_age,
            plan_until_age: self.plan_until_age,
            monthly_expense_today: self.monthly_expense,
            inflation_pct: clamp_pct("inflation", self.inflation, RETIREMENT_INFLATION_PCT)?,
            monthly_income_at_retirement: self.retirement_income,
            current_savings: self.savings,
            pre_retirement_return_pct: clamp_pct(
                "pre-return",
                self.pre_return,
                PRE_RETIREMENT_RETURN_PCT,
            )?,
            post_retirement_return_pct: clamp_pct(
                "post-return",
                self.post_return,
                POST_RETIREMENT_RETURN_PCT,
            )?,
        })
    }
}
