pub mod form;
pub mod lead;

use std::sync::Once;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::core::{
    EducationResult, MoneyMode, ProtectionResult, ResilienceResult, RetirementResult,
    ScenarioInput, ScenarioKind, ScenarioResult, format_money, run_scenario,
};
use form::{EducationForm, InputError, ProtectionForm, ResilienceForm, RetirementForm};
use lead::{ContactHandoff, LeadClient, LeadDraft, LeadError, PreferredContact};

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber once; `RUST_LOG` overrides the default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("advisor_tools=info"));

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMoneyMode {
    Monthly,
    Annual,
}

impl From<CliMoneyMode> for MoneyMode {
    fn from(value: CliMoneyMode) -> Self {
        match value {
            CliMoneyMode::Monthly => MoneyMode::Monthly,
            CliMoneyMode::Annual => MoneyMode::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliScenarioKind {
    Resilience,
    Protection,
    Education,
    Retirement,
}

impl From<CliScenarioKind> for ScenarioKind {
    fn from(value: CliScenarioKind) -> Self {
        match value {
            CliScenarioKind::Resilience => ScenarioKind::Resilience,
            CliScenarioKind::Protection => ScenarioKind::Protection,
            CliScenarioKind::Education => ScenarioKind::Education,
            CliScenarioKind::Retirement => ScenarioKind::Retirement,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPreferredContact {
    #[value(name = "whatsapp")]
    WhatsApp,
    Call,
    Telegram,
}

impl From<CliPreferredContact> for PreferredContact {
    fn from(value: CliPreferredContact) -> Self {
        match value {
            CliPreferredContact::WhatsApp => PreferredContact::WhatsApp,
            CliPreferredContact::Call => PreferredContact::Call,
            CliPreferredContact::Telegram => PreferredContact::Telegram,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "advisor-tools",
    version,
    about = "Financial self-check calculators (resilience, protection, education, retirement) and lead submission"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emergency buffer, shock gap and protection awareness score
    Resilience {
        #[command(flatten)]
        form: ResilienceForm,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Death, TPD and critical illness cover gaps
    Protection {
        #[command(flatten)]
        form: ProtectionForm,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Future education cost and the set-aside needed to fund it
    Education {
        #[command(flatten)]
        form: EducationForm,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Retirement nest egg, gap and the set-aside needed to close it
    Retirement {
        #[command(flatten)]
        form: RetirementForm,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Submit a contact request to the lead endpoint
    Lead(LeadArgs),
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(
        long,
        value_enum,
        default_value_t = CliMoneyMode::Monthly,
        help = "Unit for suggested set-aside amounts"
    )]
    mode: CliMoneyMode,
    #[arg(long, help = "Print the result as JSON")]
    json: bool,
    #[arg(long, help = "Contact page URL; prints a link carrying this result")]
    contact_url: Option<String>,
}

#[derive(Args, Debug)]
struct LeadArgs {
    #[arg(long)]
    name: String,
    #[arg(long, help = "Singapore mobile number, with or without +65")]
    phone: String,
    #[arg(long, value_enum, default_value_t = CliPreferredContact::WhatsApp)]
    preferred_contact: CliPreferredContact,
    #[arg(long, default_value = "")]
    message: String,
    #[arg(long, value_enum, requires = "context", help = "Calculator the visitor came from")]
    tool: Option<CliScenarioKind>,
    #[arg(long, requires = "tool", help = "Summary line produced by that calculator")]
    context: Option<String>,
    #[arg(long, default_value = "https://localhost/contact")]
    page_url: String,
    #[arg(long, env = "ADVISOR_LEAD_ENDPOINT", help = "URL the lead JSON is posted to")]
    endpoint: String,
    #[arg(long, help = "Visitor agreed to be contacted")]
    consent: bool,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Lead(#[from] LeadError),
    #[error("could not encode result: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioReport<'a> {
    mode: MoneyMode,
    result: &'a ScenarioResult,
    summary: String,
    contact_url: Option<String>,
}

pub async fn run(cli: Cli) -> Result<(), CommandError> {
    let (input, output) = match cli.command {
        Command::Resilience { form, output } => (ScenarioInput::Resilience(form.build()?), output),
        Command::Protection { form, output } => (ScenarioInput::Protection(form.build()?), output),
        Command::Education { form, output } => (ScenarioInput::Education(form.build()?), output),
        Command::Retirement { form, output } => (ScenarioInput::Retirement(form.build()?), output),
        Command::Lead(args) => return submit_lead(args).await,
    };
    print_scenario(&input, &output)
}

fn print_scenario(input: &ScenarioInput, output: &OutputArgs) -> Result<(), CommandError> {
    let mode: MoneyMode = output.mode.into();
    let Some(result) = run_scenario(input) else {
        println!("{}", no_result_message(input.kind()));
        return Ok(());
    };

    let summary = result.summary(mode);
    let contact_url = match &output.contact_url {
        Some(base) => Some(
            ContactHandoff::from_result(&result, mode)
                .to_url(base)?
                .to_string(),
        ),
        None => None,
    };

    if output.json {
        let report = ScenarioReport {
            mode,
            result: &result,
            summary,
            contact_url,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", render_text(&result, mode));
    println!();
    println!("{summary}");
    if let Some(url) = contact_url {
        println!("Talk it through: {url}");
    }
    Ok(())
}

fn no_result_message(kind: ScenarioKind) -> &'static str {
    match kind {
        ScenarioKind::Resilience => "No result: monthly essentials must be greater than 0.",
        ScenarioKind::Protection => {
            "No result: monthly commitments and years to support must be greater than 0."
        }
        ScenarioKind::Education | ScenarioKind::Retirement => "No result.",
    }
}

fn render_text(result: &ScenarioResult, mode: MoneyMode) -> String {
    match result {
        ScenarioResult::Resilience(r) => render_resilience(r),
        ScenarioResult::Protection(r) => render_protection(r),
        ScenarioResult::Education(r) => render_education(r, mode),
        ScenarioResult::Retirement(r) => render_retirement(r, mode),
    }
}

fn render_resilience(r: &ResilienceResult) -> String {
    [
        format!("Resilience score      {}/100 ({})", r.score, r.label.as_str()),
        format!("Buffer                {:.1} months", r.buffer_months),
        format!("6-month shock need    {}", format_money(r.shock_need)),
        format!("6-month shock gap     {}", format_money(r.shock_gap)),
        format!("Protection awareness  {:.0}/100", r.awareness_score),
        format!("Dependents penalty    -{:.0}", r.dependent_penalty),
    ]
    .join("\n")
}

fn render_protection(r: &ProtectionResult) -> String {
    [
        format!("{:<18}{:>14}{:>14}", "", "Need", "Gap"),
        format!(
            "{:<18}{:>14}{:>14}",
            "Death",
            format_money(r.death_need),
            format_money(r.death_gap)
        ),
        format!(
            "{:<18}{:>14}{:>14}",
            "TPD",
            format_money(r.tpd_need),
            format_money(r.tpd_gap)
        ),
        format!(
            "{:<18}{:>14}{:>14}",
            "Critical illness",
            format_money(r.ci_need),
            format_money(r.ci_gap)
        ),
        format!(
            "Total gap {} ({:.1}x annual commitments) {}",
            format_money(r.total_gap),
            r.gap_ratio,
            r.risk.as_str()
        ),
    ]
    .join("\n")
}

fn render_education(r: &EducationResult, mode: MoneyMode) -> String {
    let mut lines = vec![
        format!("Years to start        {}", r.years_to_start),
        format!("Annual cost at start  {}", format_money(r.annual_at_start)),
    ];
    let (rows, hidden) = r.display_rows();
    for row in rows {
        lines.push(format!(
            "  Year {} (age {:>2})    {}",
            row.study_year,
            row.child_age,
            format_money(row.annual_cost)
        ));
    }
    if hidden > 0 {
        lines.push(format!("  … {hidden} more years"));
    }
    lines.push(format!(
        "Total future cost     {}",
        format_money(r.total_future_cost)
    ));
    lines.push(format!(
        "Savings at start      {}",
        format_money(r.fv_savings_at_start)
    ));
    lines.push(format!(
        "Shortfall at start    {}",
        format_money(r.shortfall_at_start)
    ));
    lines.push(format!(
        "Set aside             {}/{}",
        format_money(r.set_aside.amount(mode)),
        mode.period_label()
    ));
    lines.join("\n")
}

fn render_retirement(r: &RetirementResult, mode: MoneyMode) -> String {
    [
        format!("Years to retirement   {}", r.years_to_retire),
        format!("Years in retirement   {}", r.years_in_retirement),
        format!(
            "Monthly expense then  {}",
            format_money(r.expense_at_retirement)
        ),
        format!(
            "Net monthly need      {}",
            format_money(r.net_monthly_need_at_retirement)
        ),
        format!(
            "Nest egg at {:<10}{}",
            r.retirement_age,
            format_money(r.nest_egg_at_retirement)
        ),
        format!(
            "Savings projected     {}",
            format_money(r.fv_current_savings_at_retirement)
        ),
        format!("Gap                   {}", format_money(r.gap_at_retirement)),
        format!(
            "Set aside             {}/{}",
            format_money(r.set_aside.amount(mode)),
            mode.period_label()
        ),
        format!("Outlook               {}", r.outlook.as_str()),
    ]
    .join("\n")
}

fn lead_draft(args: LeadArgs) -> LeadDraft {
    let handoff = match (args.tool, args.context) {
        (Some(tool), Some(summary)) => Some(ContactHandoff {
            tool: tool.into(),
            summary,
        }),
        _ => None,
    };
    LeadDraft {
        name: args.name,
        phone: args.phone,
        preferred_contact: args.preferred_contact.into(),
        message: args.message,
        handoff,
        page_url: args.page_url,
        consent: args.consent,
    }
}

async fn submit_lead(args: LeadArgs) -> Result<(), CommandError> {
    let client = LeadClient::new(&args.endpoint)?;
    let payload = lead_draft(args).into_payload(Utc::now())?;
    client.submit(&payload).await?;
    info!(phone = %payload.phone, "lead submitted");
    println!("Thanks {}, we will reach out via {:?}.", payload.name, payload.preferred_contact);
    Ok(())
}
