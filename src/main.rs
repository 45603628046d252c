//! Console front end for the screening flow.
//!
//! Reads answers from stdin and writes prompts to stdout; logs go to stderr.
//! Options may be picked by number or by their text. During the interview
//! `stop` ends early, `retry` resends after a transient failure and
//! `restart` opens a fresh session after any other failure.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use medinator::adapters::{HttpInferenceConfig, HttpInferenceService};
use medinator::application::{FlowController, FlowError, QuestionnaireStep, SubmitOutcome};
use medinator::config::{AppConfig, LogFormat, LoggingConfig};
use medinator::domain::flow::FlowPhase;
use medinator::domain::intake::ContextField;
use medinator::domain::interview::{InterviewQuestion, InterviewState};
use medinator::domain::questionnaire::QuestionView;
use medinator::domain::report::{RankingSchema, Report};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    tracing::info!(service = %config.service.base_url, "medinator starting");

    let service = HttpInferenceService::new(HttpInferenceConfig::from(&config.service))?;
    let mut flow = FlowController::new(Arc::new(service), config.interview.clone());
    let mut console = Console::new();

    loop {
        let keep_going = match flow.phase() {
            FlowPhase::Welcome => welcome(&mut flow, &mut console).await?,
            FlowPhase::ContextIntake => intake(&mut flow, &mut console).await?,
            FlowPhase::Questionnaire => questionnaire(&mut flow, &mut console).await?,
            FlowPhase::Interview => interview(&mut flow, &mut console).await?,
            FlowPhase::Report => report(&mut flow, &mut console).await?,
        };
        if !keep_going {
            break;
        }
    }

    tracing::info!("medinator exiting");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Phases
// ─────────────────────────────────────────────────────────────────────────────

async fn welcome(flow: &mut FlowController, console: &mut Console) -> Result<bool, Box<dyn Error>> {
    println!();
    println!("Medinator health-risk screening");
    println!("This is not a medical diagnosis. Consult a professional about any concern.");
    let Some(input) = console.prompt("Press Enter to begin, or q to quit").await? else {
        return Ok(false);
    };
    if input.eq_ignore_ascii_case("q") {
        return Ok(false);
    }
    flow.begin()?;
    Ok(true)
}

async fn intake(flow: &mut FlowController, console: &mut Console) -> Result<bool, Box<dyn Error>> {
    println!();
    println!("About you (Enter keeps the current value, 'back' returns)");
    for field in ContextField::ALL {
        let current = flow.intake().draft().get(field).to_string();
        let marker = if field.is_required() { "*" } else { "" };
        let label = if current.is_empty() {
            format!("{}{}", field.label(), marker)
        } else {
            format!("{}{} [{}]", field.label(), marker, current)
        };
        let Some(input) = console.prompt(&label).await? else {
            return Ok(false);
        };
        if input.eq_ignore_ascii_case("back") {
            flow.back()?;
            return Ok(true);
        }
        if !input.is_empty() {
            flow.set_context_field(field, input)?;
        }
    }

    match flow.submit_context() {
        Ok(()) => {}
        Err(FlowError::Incomplete(errors)) => {
            for (_, message) in errors.iter() {
                println!("  ! {}", message);
            }
        }
        Err(err) => return Err(err.into()),
    }
    Ok(true)
}

async fn questionnaire(flow: &mut FlowController, console: &mut Console) -> Result<bool, Box<dyn Error>> {
    let options = match flow.current_question() {
        Some(QuestionView::Active {
            question,
            position,
            total,
        }) => {
            println!();
            println!("Question {} of {}: {}", position, total, question.prompt);
            if let Some(message) = &question.message {
                println!("  {}", message);
            }
            print_options(&question.options);
            question.options.clone()
        }
        Some(QuestionView::NotFound { index, total }) => {
            return Err(format!("no question at position {} of {}", index + 1, total).into());
        }
        Some(QuestionView::Completed) | None => return Ok(true),
    };

    let Some(input) = console.prompt("Your answer").await? else {
        return Ok(false);
    };
    let Some(option) = pick(&options, &input) else {
        println!("  ! Choose one of the listed options");
        return Ok(true);
    };

    match flow.answer_question(option).await {
        Ok(QuestionnaireStep::Advanced { .. }) => {}
        Ok(QuestionnaireStep::InterviewStarted(_)) => {
            print_screening(flow);
        }
        Err(err @ (FlowError::Diagnosis(_) | FlowError::Interview(_))) => {
            println!("  ! Could not start the interview: {}", err);
        }
        Err(err) => println!("  ! {}", err),
    }
    Ok(true)
}

async fn interview(flow: &mut FlowController, console: &mut Console) -> Result<bool, Box<dyn Error>> {
    let Some(coordinator) = flow.interview() else {
        if let Err(err) = flow.restart_interview().await {
            println!("  ! Could not start the interview: {}", err);
        }
        return Ok(true);
    };
    let session = coordinator.snapshot().await;

    match session.state() {
        InterviewState::AwaitingAnswer => {
            if coordinator.is_typing().await {
                println!("...");
                coordinator.wait_until_visible().await;
            }
            let Some(question) = session.current_question() else {
                return Ok(true);
            };
            let condition = session.current_condition().map(|c| c.label());
            print_interview_question(question, condition, session.questions_asked());

            let Some(input) = console.prompt("Your answer (or 'stop')").await? else {
                return Ok(false);
            };
            if input.eq_ignore_ascii_case("stop") {
                if let Err(err) = flow.stop_interview().await {
                    println!("  ! {}", err);
                }
                return Ok(true);
            }
            let Some(option) = pick(&question.options, &input) else {
                println!("  ! Choose one of the listed options");
                return Ok(true);
            };
            match flow.submit_answer(option).await {
                Ok(SubmitOutcome::Transitioned { assessment, .. }) => {
                    println!();
                    println!(
                        "Completed {}: {} ({})",
                        assessment.condition.label(),
                        assessment.confidence,
                        assessment.status.label()
                    );
                    if !assessment.comment.is_empty() {
                        println!("  {}", assessment.comment);
                    }
                }
                Ok(_) => {}
                Err(err) => println!("  ! {}", err),
            }
        }
        InterviewState::Faulted => {
            let fault = session.fault().cloned();
            let retryable = fault.as_ref().map(|f| f.retryable).unwrap_or(false);
            if let Some(fault) = &fault {
                println!("  ! {} ({})", fault.message, fault.code);
            }
            let hint = if retryable { "retry or stop" } else { "restart or stop" };
            let Some(input) = console.prompt(hint).await? else {
                return Ok(false);
            };
            let result = match input.to_ascii_lowercase().as_str() {
                "retry" if retryable => flow.retry().await.map(|_| ()),
                "restart" if !retryable => flow.restart_interview().await.map(|_| ()),
                "stop" => flow.stop_interview().await.map(|_| ()),
                _ => Ok(()),
            };
            if let Err(err) = result {
                println!("  ! {}", err);
            }
        }
        InterviewState::Terminal => {
            flow.sync_report().await?;
        }
        InterviewState::Initializing
        | InterviewState::Submitting
        | InterviewState::ShowingTransition => {
            tokio::task::yield_now().await;
        }
    }
    Ok(true)
}

async fn report(flow: &mut FlowController, console: &mut Console) -> Result<bool, Box<dyn Error>> {
    if let Some(report) = flow.report() {
        print_report(report);
    }
    let Some(input) = console.prompt("Press Enter to start over, or q to quit").await? else {
        return Ok(false);
    };
    if input.eq_ignore_ascii_case("q") {
        return Ok(false);
    }
    flow.restart()?;
    Ok(true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn print_options(options: &[String]) {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
}

fn print_screening(flow: &FlowController) {
    let screening = flow.screening();
    if screening.is_empty() {
        return;
    }
    println!();
    println!("Initial screening");
    for result in screening {
        match (&result.error, result.probability, &result.risk_level) {
            (Some(error), _, _) => println!("  {}: unavailable ({})", result.display_name, error),
            (None, Some(p), _) => {
                let percent = if p <= 1.0 { p * 100.0 } else { p };
                println!("  {}: {:.0}%", result.display_name, percent)
            }
            (None, None, Some(level)) => println!("  {}: {}", result.display_name, level),
            (None, None, None) => println!("  {}", result.display_name),
        }
    }
}

fn print_interview_question(question: &InterviewQuestion, condition: Option<String>, asked: u32) {
    println!();
    if let Some(condition) = condition {
        println!("Investigating {} (question {})", condition, asked);
    }
    if let Some(message) = &question.message {
        println!("  {}", message);
    }
    println!("{}", question.text);
    print_options(&question.options);
}

fn print_report(report: &Report) {
    let ranked = report.ranked();
    println!();
    if report.stopped_by_user() {
        println!("Interview stopped early");
    } else {
        println!("Interview complete");
    }
    println!("Questions asked: {}", report.total_questions);
    if ranked.is_empty() {
        println!("No conditions were assessed.");
        return;
    }
    if ranked.schema == RankingSchema::Numeric {
        println!("Average confidence: {}", ranked.average_confidence);
    }
    for entry in &ranked.entries {
        let band = entry
            .risk_band()
            .map(|b| format!(" - {}", b.label()))
            .unwrap_or_default();
        println!(
            "  {}. {}: {}{} ({})",
            entry.rank,
            entry.label,
            entry.assessment.confidence,
            band,
            entry.assessment.status.label()
        );
        if !entry.assessment.indicators.is_empty() {
            println!("     indicators: {}", entry.assessment.indicators.join(", "));
        }
    }
}

/// Resolves input to an offered option, by 1-based number or case-insensitive text.
fn pick<'a>(options: &'a [String], input: &str) -> Option<&'a str> {
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).map(String::as_str);
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .map(String::as_str)
}

// ─────────────────────────────────────────────────────────────────────────────
// Console input
// ─────────────────────────────────────────────────────────────────────────────

struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// Prints `label` and reads one trimmed line. `None` at end of input.
    async fn prompt(&mut self, label: &str) -> std::io::Result<Option<String>> {
        println!("{}:", label);
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}
