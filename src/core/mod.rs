mod engine;
mod growth;
mod solver;
mod summary;
mod types;
mod wizard;

pub use engine::{education, protection, resilience, retirement, run_scenario};
pub use growth::{future_value, pv_of_annuity};
pub use solver::{monthly_pmt, solve_set_aside, yearly_pmt};
pub use summary::{EDUCATION_BREAKDOWN_ROWS, format_money};
pub use types::{
    EducationInput, EducationResult, EducationYearCost, MoneyMode, ProtectionInput,
    ProtectionResult, ProtectionRisk, ResilienceInput, ResilienceLabel, ResilienceResult,
    RetirementInput, RetirementOutlook, RetirementResult, ScenarioInput, ScenarioKind,
    ScenarioResult, SetAside,
};
pub use wizard::{StepGate, Wizard, WizardError, WizardStep};
