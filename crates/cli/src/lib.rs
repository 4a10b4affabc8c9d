pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use advisor_core::config::{AppConfig, LoadOptions, LogFormat};
use advisor_core::domain::advice::{AdviceType, CategoryFilter};
use advisor_core::domain::profile::ProfileId;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "advisor",
    about = "Consumer advisory CLI",
    long_about = "Generate rule-based product, messaging, and pricing advice for consumer personas.",
    after_help = "Examples:\n  advisor profiles\n  advisor advise --profile 1 --advice-type pricing-strategy\n  advisor advise --profile-file persona.json --save --advice-type marketing-messaging\n  advisor doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List the consumer personas loaded for this session")]
    Profiles,
    #[command(about = "Preview the filtered and ranked products for a persona")]
    Products {
        #[arg(long, help = "Consumer profile id")]
        profile: u32,
        #[arg(long, default_value = CategoryFilter::ALL_LABEL, help = "Product category filter")]
        category: CategoryFilter,
    },
    #[command(about = "Generate advice for a persona and show recent history")]
    Advise {
        #[arg(
            long,
            required_unless_present = "profile_file",
            conflicts_with = "profile_file",
            help = "Consumer profile id"
        )]
        profile: Option<u32>,
        #[arg(long, help = "JSON persona to advise without adding it to the profile store")]
        profile_file: Option<PathBuf>,
        #[arg(long, requires = "profile_file", help = "Store the persona from --profile-file")]
        save: bool,
        #[arg(
            long = "advice-type",
            required = true,
            help = "Advice type to generate; repeat to generate several in order"
        )]
        advice_types: Vec<AdviceType>,
        #[arg(long, default_value = CategoryFilter::ALL_LABEL, help = "Product category filter")]
        category: CategoryFilter,
    },
    #[command(about = "Summarize interests, pain points, and the buying funnel across personas")]
    Insights,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, data files, and advice generation readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Commands report their own config failures, so logging only needs a best effort load.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Profiles => commands::profiles::run(),
        Command::Products { profile, category } => {
            commands::products::run(ProfileId(profile), category)
        }
        Command::Advise { profile, profile_file, save, advice_types, category } => {
            match (profile, profile_file) {
                (_, Some(path)) => {
                    commands::advise::run_with_profile_file(&path, save, &advice_types, category)
                }
                (Some(profile), None) => {
                    commands::advise::run(ProfileId(profile), &advice_types, category)
                }
                (None, None) => commands::CommandResult::failure(
                    "advise",
                    "invalid_input",
                    "either --profile or --profile-file is required",
                    1,
                ),
            }
        }
        Command::Insights => commands::insights::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON payload.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
