use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use vendor_eval::config::AppConfig;
use vendor_eval::error::AppError;
use vendor_eval::evaluation::{
    export_to_path, parse_minutes, suggest_from_form, Evaluation, EvaluationMetadata,
    EvaluationScore, EvaluationTemplate, MetricInput, ScoringEngine,
};
use vendor_eval::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Vendor Evaluation",
    about = "Score IT vendor evaluation forms and export them as CSV",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a blank standard evaluation form as JSON
    Template,
    /// Score an evaluation form and print section and global results
    Score(ScoreArgs),
    /// Score an evaluation form and write the CSV export
    Export(ExportArgs),
    /// Convert a raw metric into a suggested rating
    Suggest {
        #[command(subcommand)]
        metric: SuggestCommand,
    },
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Evaluation form in JSON (see the `template` command)
    #[arg(long)]
    input: PathBuf,
    /// Fill ratings suggested by the ticket statistics and critical SLA row first
    #[arg(long)]
    suggest: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Evaluation form in JSON (see the `template` command)
    #[arg(long)]
    input: PathBuf,
    /// Destination CSV (defaults to APP_EXPORT_PATH)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Fill ratings suggested by the ticket statistics and critical SLA row first
    #[arg(long)]
    suggest: bool,
}

#[derive(Subcommand, Debug)]
enum SuggestCommand {
    /// Critical incident response time against the agreed SLA, e.g. "4 horas"
    ResponseTime {
        #[arg(long)]
        agreed: String,
        #[arg(long)]
        actual: String,
    },
    /// Average problem resolution time against the agreed average
    ProblemResolution {
        #[arg(long)]
        agreed: String,
        #[arg(long)]
        actual: String,
    },
    /// Service availability percentage
    Uptime {
        #[arg(long)]
        percent: f64,
    },
    /// Resolved tickets over opened tickets
    Tickets {
        #[arg(long)]
        opened: u32,
        #[arg(long)]
        resolved: u32,
    },
    /// Reopened tickets over resolved tickets
    Reopen {
        #[arg(long)]
        resolved: u32,
        #[arg(long)]
        reopened: u32,
    },
    /// Days between the committed and actual delivery dates (YYYY-MM-DD)
    Delivery {
        #[arg(long)]
        committed: String,
        #[arg(long)]
        delivered: String,
    },
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Template => print_template(),
        Command::Score(args) => run_score(args),
        Command::Export(args) => run_export(args, &config),
        Command::Suggest { metric } => run_suggest(metric),
    }
}

fn print_template() -> Result<(), AppError> {
    let evaluation = EvaluationTemplate::standard().instantiate(EvaluationMetadata::default())?;
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

fn load_evaluation(path: &Path, suggest: bool) -> Result<Evaluation, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let mut evaluation: Evaluation = serde_json::from_str(&raw)?;
    info!(path = %path.display(), vendor = %evaluation.metadata.vendor, "evaluation loaded");

    if suggest {
        let batch = suggest_from_form(&evaluation);
        for (kind, err) in &batch.skipped {
            println!("Aviso ({}): {}", kind.label(), err.notice());
        }
        let rejected = evaluation.apply_suggestions(&batch);
        info!(
            applied = batch.suggestions.len().saturating_sub(rejected.len()),
            rejected = rejected.len(),
            "suggested ratings applied"
        );
    }

    Ok(evaluation)
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let evaluation = load_evaluation(&args.input, args.suggest)?;
    let score = ScoringEngine::new().score(&evaluation);
    render_score(&evaluation, &score);
    Ok(())
}

fn run_export(args: ExportArgs, config: &AppConfig) -> Result<(), AppError> {
    let evaluation = load_evaluation(&args.input, args.suggest)?;
    let score = ScoringEngine::new().score(&evaluation);
    let output = args
        .output
        .unwrap_or_else(|| config.export.output_path.clone());

    export_to_path(&output, &evaluation, &score)?;
    println!("Evaluación exportada a {}", output.display());
    Ok(())
}

fn run_suggest(metric: SuggestCommand) -> Result<(), AppError> {
    let input = match metric {
        SuggestCommand::ResponseTime { agreed, actual } => {
            MetricInput::response_time_from_text(&agreed, &actual)
        }
        SuggestCommand::ProblemResolution { agreed, actual } => MetricInput::ProblemResolution {
            agreed_minutes: parse_minutes(&agreed),
            actual_minutes: parse_minutes(&actual),
        },
        SuggestCommand::Uptime { percent } => MetricInput::Uptime { percent },
        SuggestCommand::Tickets { opened, resolved } => {
            MetricInput::TicketResolution { opened, resolved }
        }
        SuggestCommand::Reopen { resolved, reopened } => {
            MetricInput::ReopenRate { resolved, reopened }
        }
        SuggestCommand::Delivery {
            committed,
            delivered,
        } => match MetricInput::delivery_delay_from_text(&committed, &delivered) {
            Ok(input) => input,
            Err(err) => {
                println!("{}", err.notice());
                return Ok(());
            }
        },
    };

    match input.suggest() {
        Ok(suggestion) => {
            println!("{} ({})", suggestion.kind.label(), suggestion.target);
            println!("{}", suggestion.detail);
            println!(
                "Calificación sugerida: {} - {}",
                suggestion.rating, suggestion.justification
            );
        }
        Err(err) => println!("{}", err.notice()),
    }

    Ok(())
}

fn render_score(evaluation: &Evaluation, score: &EvaluationScore) {
    let metadata = &evaluation.metadata;
    println!("Evaluación de proveedor: {}", metadata.vendor);
    if !metadata.period.is_empty() {
        println!("Período: {}", metadata.period);
    }

    for (section, scored) in evaluation.sections().iter().zip(&score.sections) {
        println!(
            "\n{} (factor {:.4})",
            section.title(),
            scored.redistribution.factor
        );
        for criterion in &scored.criteria {
            let rating = criterion
                .rating
                .map(|rating| rating.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "- {} {} | calificación {} | ponderado {}",
                criterion.id,
                criterion.name,
                rating,
                criterion.contribution.display()
            );
        }
        println!(
            "Subtotal: {} ({})",
            scored.outcome.subtotal_display(),
            scored.outcome.label_display()
        );
    }

    println!(
        "\nPuntaje total: {} ({})",
        score.total_display(),
        score.label.label()
    );
}
