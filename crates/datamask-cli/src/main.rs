//! DataMask CLI
//!
//! Command-line interface for masking PII values and inspecting the rule
//! catalog

mod app;
mod config;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use datamask_core::{MaskingStrategy, PiiType};
use datamask_observability::{LogFormat, init_logging};

use crate::app::{App, MaskOverrides};
use crate::config::DataMaskConfig;

#[derive(Parser)]
#[command(name = "datamask")]
#[command(about = "DataMask - PII masking engine", long_about = None)]
struct Cli {
    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the masking rule catalog (overrides config and DATAMASK_RULES_PATH)
    #[arg(long, global = true)]
    rules: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format (text or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask a single value and print the response as JSON
    Mask {
        /// Value to mask
        value: String,

        #[command(flatten)]
        options: MaskArgs,
    },
    /// Mask one value per line from a file or stdin
    Batch {
        /// Input file, or '-' for stdin
        #[arg(long, default_value = "-")]
        input: String,

        #[command(flatten)]
        options: MaskArgs,
    },
    /// Inspect the masking rule catalog
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// List supported PII types
    PiiTypes,
    /// List supported masking strategies
    Strategies,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// List rules ordered by id
    List {
        /// Only active rules, ordered by PII type
        #[arg(long)]
        active: bool,
    },
    /// Show the active rule for a PII type
    Show {
        pii_type: PiiType,
    },
    /// Check a catalog file without loading it
    Validate {
        file: PathBuf,
    },
}

#[derive(Args)]
struct MaskArgs {
    /// PII type of the value(s), e.g. EMAIL or tc-kimlik-no
    #[arg(long)]
    pii_type: PiiType,

    /// Masking strategy; defaults to the active rule, then the fallback
    #[arg(long)]
    strategy: Option<MaskingStrategy>,

    /// Replacement text for the PLACEHOLDER strategy
    #[arg(long)]
    replacement: Option<String>,

    #[arg(long)]
    preserve_length: Option<bool>,

    #[arg(long)]
    preserve_format: Option<bool>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

impl MaskArgs {
    fn overrides(&self) -> MaskOverrides {
        MaskOverrides {
            strategy: self.strategy,
            replacement: self.replacement.clone(),
            preserve_length: self.preserve_length,
            preserve_format: self.preserve_format,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DataMaskConfig::from_file(path)?,
        None => DataMaskConfig::default(),
    };
    config.merge_env();

    // CLI flags win over file and environment
    if let Some(rules) = cli.rules {
        config.rules_path = Some(rules);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!(?config, "Loaded configuration");

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Mask { value, options } => {
            let app = App::from_config(&config).await?;
            let success = app
                .mask(value, options.pii_type, &options.overrides(), options.pretty, &mut stdout)
                .await?;
            if !success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Batch { input, options } => {
            let app = App::from_config(&config).await?;
            let overrides = options.overrides();

            if input == "-" {
                let stdin = io::stdin().lock();
                app.batch(stdin, options.pii_type, &overrides, options.pretty, &mut stdout)
                    .await?;
            } else {
                let file = std::fs::File::open(&input)
                    .with_context(|| format!("Failed to open batch input {}", input))?;
                app.batch(
                    BufReader::new(file),
                    options.pii_type,
                    &overrides,
                    options.pretty,
                    &mut stdout,
                )
                .await?;
            }

            if let Some(metrics) = app.metrics_text()? {
                eprint!("{}", metrics);
            }
        }
        Commands::Rules { command } => match command {
            RulesCommand::List { active } => {
                App::from_config(&config)
                    .await?
                    .list_rules(active, &mut stdout)
                    .await?
            }
            RulesCommand::Show { pii_type } => {
                App::from_config(&config)
                    .await?
                    .show_rule(pii_type, &mut stdout)
                    .await?
            }
            RulesCommand::Validate { file } => app::validate_rules(&file, &mut stdout)?,
        },
        Commands::PiiTypes => app::list_pii_types(&mut stdout)?,
        Commands::Strategies => app::list_strategies(&mut stdout)?,
    }

    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}
