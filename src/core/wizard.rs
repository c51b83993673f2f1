use thiserror::Error;

use super::types::{EducationInput, ProtectionInput, ResilienceInput, RetirementInput};

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Basics,
    Costs,
    Savings,
    Results,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 4] = [
        WizardStep::Basics,
        WizardStep::Costs,
        WizardStep::Savings,
        WizardStep::Results,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum WizardError {
    #[error("step {0:?} is incomplete")]
    Incomplete(WizardStep),
    #[error("already at the results step")]
    AtEnd,
}

/// Completeness predicate a scenario input exposes to the wizard.
pub trait StepGate {
    fn is_complete(&self, step: WizardStep) -> bool;
}

#[derive(Debug, Clone)]
pub struct Wizard<I> {
    step: WizardStep,
    input: I,
}

impl<I: StepGate + Default> Default for Wizard<I> {
    fn default() -> Self {
        Self::new(I::default())
    }
}

impl<I: StepGate + Default> Wizard<I> {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl<I: StepGate> Wizard<I> {
    pub fn new(input: I) -> Self {
        Self {
            step: WizardStep::Basics,
            input,
        }
    }

    pub fn current(&self) -> WizardStep {
        self.step
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Edits never move the wizard; gating is re-evaluated on the next transition.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.input.is_complete(self.step)
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let Some(next) = self.step.next() else {
            return Err(WizardError::AtEnd);
        };
        if !self.input.is_complete(self.step) {
            return Err(WizardError::Incomplete(self.step));
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Jumps to `target`. Backward jumps always succeed; forward jumps need every
    /// step before `target` to be complete.
    pub fn goto(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        if target > self.step {
            if let Some(blocked) = WizardStep::ORDER[..target.index()]
                .iter()
                .copied()
                .find(|step| !self.input.is_complete(*step))
            {
                return Err(WizardError::Incomplete(blocked));
            }
        }
        self.step = target;
        Ok(target)
    }
}

fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl StepGate for ResilienceInput {
    fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Basics => self.monthly_essentials.is_finite() && self.monthly_essentials > 0.0,
            WizardStep::Costs => true,
            WizardStep::Savings => is_amount(self.liquid_savings),
            WizardStep::Results => true,
        }
    }
}

impl StepGate for ProtectionInput {
    fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Basics => self.monthly_commitments > 0.0 && self.years_to_support > 0.0,
            WizardStep::Costs => {
                is_amount(self.one_time_costs)
                    && (30.0..=100.0).contains(&self.income_replace_pct)
                    && (6..=60).contains(&self.ci_months_cover)
            }
            WizardStep::Savings => {
                is_amount(self.existing_death)
                    && is_amount(self.existing_tpd)
                    && is_amount(self.existing_ci)
            }
            WizardStep::Results => true,
        }
    }
}

impl StepGate for EducationInput {
    fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Basics => self.start_age >= self.child_age && self.study_years > 0,
            WizardStep::Costs => {
                self.annual_cost_today > 0.0 && (0.0..=10.0).contains(&self.inflation_pct)
            }
            WizardStep::Savings => {
                is_amount(self.current_savings) && (0.0..=10.0).contains(&self.return_pct)
            }
            WizardStep::Results => true,
        }
    }
}

impl StepGate for RetirementInput {
    fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Basics => {
                self.current_age > 0
                    && self.retirement_age >= self.current_age
                    && self.plan_until_age > self.retirement_age
            }
            WizardStep::Costs => {
                self.monthly_expense_today > 0.0
                    && (0.0..=8.0).contains(&self.inflation_pct)
                    && is_amount(self.monthly_income_at_retirement)
            }
            WizardStep::Savings => {
                is_amount(self.current_savings)
                    && (0.0..=10.0).contains(&self.pre_retirement_return_pct)
                    && (0.0..=8.0).contains(&self.post_retirement_return_pct)
            }
            WizardStep::Results => true,
        }
    }
}
