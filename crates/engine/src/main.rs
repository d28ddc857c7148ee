//! Play Together - bestiary ingestion CLI.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playtogether_domain::{parse_fraction, Monster};
use playtogether_engine::infrastructure::config::IngestConfig;
use playtogether_engine::infrastructure::importers::{
    BestiaryImport, FiveToolsImporter, ImportSummary,
};
use playtogether_engine::use_cases::encounter::{
    EncounterFilter, EncounterService, EnvironmentFilter,
};

#[derive(Parser, Debug)]
#[command(name = "playtogether", version, about = "Bestiary ingestion for Play Together")]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
    #[arg(long, global = true, help = "Also write logs to this file")]
    log_file: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, global = true, help = "Replace inline formatting tags with plain text")]
    strip_tags: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import the bestiary and report what was read
    Setup {
        /// Root of a 5etools checkout (defaults to FIVETOOLS_DATA_PATH)
        #[arg(short, long)]
        source: Option<PathBuf>,
        #[arg(short = 't', long = "type", value_enum, default_value_t = Module::All)]
        module: Module,
    },
    /// List creatures suitable for an encounter
    Encounter {
        /// Root of a 5etools checkout (defaults to FIVETOOLS_DATA_PATH)
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Highest challenge rating, e.g. `5` or `1/4`
        #[arg(long, value_parser = parse_rating)]
        challenge_rating: f64,
        #[arg(short, long, value_enum, default_value_t = Environment::Any)]
        environment: Environment,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Module {
    All,
    Bestiary,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Environment {
    Any,
    /// Creatures without a listed environment
    None,
    Arctic,
    Coastal,
    Desert,
    Forest,
    Grassland,
    Hill,
    Mountain,
    Swamp,
    Underdark,
    Underwater,
    Urban,
}

impl From<Environment> for EnvironmentFilter {
    fn from(env: Environment) -> Self {
        let name = match env {
            Environment::Any => return EnvironmentFilter::Any,
            Environment::None => return EnvironmentFilter::Unlisted,
            Environment::Arctic => "arctic",
            Environment::Coastal => "coastal",
            Environment::Desert => "desert",
            Environment::Forest => "forest",
            Environment::Grassland => "grassland",
            Environment::Hill => "hill",
            Environment::Mountain => "mountain",
            Environment::Swamp => "swamp",
            Environment::Underdark => "underdark",
            Environment::Underwater => "underwater",
            Environment::Urban => "urban",
        };
        EnvironmentFilter::Named(name.to_string())
    }
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct SetupReport<'a> {
    summary: ImportSummary,
    monsters: &'a [Monster],
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.log_file.as_deref())?;

    let mut config = IngestConfig::from_env()?;
    if cli.strip_tags {
        config.strip_formatting_tags = true;
    }

    match cli.command {
        Commands::Setup { source, module } => {
            if module == Module::All {
                tracing::info!("Only the bestiary module is available; importing bestiary");
            }
            let result = import(source, &config)?;
            let summary = result.summary();
            if cli.json {
                let report = SetupReport {
                    summary,
                    monsters: &result.monsters,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut { ok: true, data: report })?
                );
            } else {
                println!(
                    "imported {} monsters, {} legendary groups, {} diagnostics from {} files",
                    summary.monsters, summary.legendary_groups, summary.diagnostics, summary.files
                );
            }
        }
        Commands::Encounter {
            source,
            challenge_rating,
            environment,
            limit,
        } => {
            let result = import(source, &config)?;
            let filter = EncounterFilter {
                environment: environment.into(),
                max_challenge_rating: challenge_rating,
                limit,
            };
            let service = EncounterService::new(result.monsters);
            let candidates = service.candidates(&filter);
            tracing::info!(
                count = candidates.len(),
                monsters = service.monster_count(),
                "Selected encounter candidates"
            );
            print_out(cli.json, &candidates, |m| {
                format!("{}\t{}\t{}", m.challenge_rating, m.name, m.source)
            })?;
        }
    }
    Ok(())
}

fn import(source: Option<PathBuf>, config: &IngestConfig) -> anyhow::Result<BestiaryImport> {
    let source = source
        .or_else(|| config.data_path.clone())
        .context("No source given: pass --source or set FIVETOOLS_DATA_PATH")?;
    FiveToolsImporter::new(&source, config)
        .import_bestiary()
        .with_context(|| format!("Failed to import bestiary from {}", source.display()))
}

fn parse_rating(input: &str) -> Result<f64, String> {
    parse_fraction(input).map_err(|e| e.to_string())
}

fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

fn init_tracing(level: LogLevel, log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

/// Load `.env.local` then `.env` from the working directory; earlier files win.
fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let path = Path::new(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
