use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use copydesk::{AnalysisInput, ComplianceEngine, Config};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Analyzer {
    Fact,
    Quality,
    Style,
}

#[derive(Parser)]
#[command(
    name = "copydesk",
    about = "Score news copy for factual, quality and house-style compliance",
    version
)]
struct Cli {
    /// Article files to score (reads stdin if none provided)
    files: Vec<PathBuf>,

    /// Style profile: wire, blog, social or newsletter
    #[arg(long, default_value = "wire")]
    style: String,

    /// Source facts, one per line
    #[arg(long)]
    facts: Option<PathBuf>,

    /// TOML config with lexicon overrides and limits
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a single analyzer's report instead of the full assessment
    #[arg(long, value_enum)]
    only: Option<Analyzer>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    let engine = ComplianceEngine::from_config(&config).map_err(|e| e.to_string())?;

    let facts = match &cli.facts {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    };

    if cli.files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Error reading stdin: {e}"))?;
        return score(&engine, cli, text, &facts);
    }

    for path in &cli.files {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        score(&engine, cli, text, &facts)?;
    }
    Ok(())
}

fn score(engine: &ComplianceEngine, cli: &Cli, text: String, facts: &[String]) -> Result<(), String> {
    let input = AnalysisInput::new(text)
        .with_facts(facts.to_vec())
        .with_style(cli.style.as_str());

    match cli.only {
        Some(Analyzer::Fact) => print_json(
            &engine
                .fact_checker()
                .verify_facts(&input.text, &input.source_facts),
        ),
        Some(Analyzer::Quality) => {
            let article = copydesk::ArticleInput::new(input.text.as_str())
                .with_facts(input.source_facts.clone());
            print_json(&engine.quality_evaluator().evaluate_article(&article))
        }
        Some(Analyzer::Style) => print_json(
            &engine
                .style_validator()
                .validate_style_compliance(&input.text, &input.style_name),
        ),
        None => print_json(&engine.assess(&input)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
