//! rolesync CLI
//!
//! Command-line interface for synchronizing assume-role authentication on
//! billing platform cloud accounts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::HashSet;
use std::path::PathBuf;

mod config;
mod validator;

use config::AppConfig;
use rolesync_connectors::{CloudHealthConfig, CloudHealthConnector, SecureString};
use rolesync_core::{
    sync, AccountOutcome, AccountService, RoleArnTemplate, ServiceHealth, SyncMode, SyncReport,
    UpdateOptions,
};
use validator::ConfigValidator;

#[derive(Parser)]
#[command(name = "rolesync")]
#[command(version)]
#[command(about = "Synchronize IAM role ARNs on billing platform cloud accounts", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assign the configured role to registered accounts
    Sync {
        /// Only accounts whose status level is unknown or red
        #[arg(long)]
        unhealthy_only: bool,
    },

    /// Point every account, payers included, at the de-register role
    Deregister {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List the accounts a run would select, without updating anything
    List {
        /// Only accounts whose status level is unknown or red
        #[arg(long, conflicts_with = "deregister")]
        unhealthy_only: bool,

        /// Select every account, as a de-register run would
        #[arg(long)]
        deregister: bool,
    },

    /// Show the effective configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },

    /// Validate configuration and exit
    Validate,

    /// Check connectivity to the billing platform API
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    rolesync_observability::init_logging_with_config(rolesync_observability::LoggingConfig {
        level: log_level,
        json_format: cli.format == OutputFormat::Json,
        ..Default::default()
    });

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync { unhealthy_only } => {
            let mode = if unhealthy_only {
                SyncMode::Unhealthy
            } else {
                SyncMode::All
            };
            cmd_sync(config, mode, cli.format).await
        }
        Commands::Deregister { yes } => {
            if !yes {
                println!(
                    "{}: de-registering updates every account, payer accounts included.",
                    "Confirm".yellow()
                );
                println!("Re-run with --yes to proceed.");
                return Ok(());
            }
            cmd_sync(config, SyncMode::Deregister, cli.format).await
        }
        Commands::List {
            unhealthy_only,
            deregister,
        } => {
            let mode = selection_mode(unhealthy_only, deregister);
            cmd_list(config, mode, cli.format).await
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format),
        Commands::Validate => cmd_validate(config),
        Commands::Test => cmd_test(config).await,
    }
}

fn selection_mode(unhealthy_only: bool, deregister: bool) -> SyncMode {
    if deregister {
        SyncMode::Deregister
    } else if unhealthy_only {
        SyncMode::Unhealthy
    } else {
        SyncMode::All
    }
}

/// Validates the configuration and aborts the process on errors.
fn require_valid_config(config: &AppConfig) {
    let validation = ConfigValidator::validate(config);
    if validation.has_errors() {
        validation.print();
        println!();
        println!(
            "{}",
            "Cannot run with invalid configuration. Fix the errors above."
                .red()
                .bold()
        );
        std::process::exit(1);
    }
}

fn build_connector(config: &AppConfig) -> Result<CloudHealthConnector> {
    CloudHealthConnector::new(CloudHealthConfig {
        base_url: config.base_url.clone(),
        api_token: SecureString::from(config.api_token.clone()),
        client_api_id: config.client_api_id.clone(),
        timeout_secs: config.timeout_secs,
    })
    .context("Failed to initialize the billing platform connector")
}

fn update_options(config: &AppConfig) -> Result<UpdateOptions> {
    Ok(UpdateOptions {
        payer_accounts: config.payer_accounts.iter().cloned().collect::<HashSet<_>>(),
        external_id: config.external_id.clone(),
        template: RoleArnTemplate::new(config.role_template.clone())
            .context("Invalid role template")?,
        role_name: config.role_name.clone(),
    })
}

async fn cmd_sync(config: AppConfig, mode: SyncMode, format: OutputFormat) -> Result<()> {
    require_valid_config(&config);

    let connector = build_connector(&config)?;
    let options = update_options(&config)?;

    let accounts = match sync::list_accounts(&connector, mode).await {
        Ok(accounts) => accounts,
        Err(e) => {
            println!("{}: {}", "Error fetching accounts".red(), e);
            println!("Nothing to process.");
            std::process::exit(1);
        }
    };

    if accounts.is_empty() {
        println!("No accounts selected in mode '{}'.", mode);
        return Ok(());
    }

    if format == OutputFormat::Text {
        println!(
            "Selected {} account(s) in mode '{}'",
            accounts.len().to_string().cyan(),
            mode
        );
    }

    let report = sync::apply_role_assignments(&connector, mode, &options, &accounts).await;
    print_report(&report, format)?;
    Ok(())
}

fn print_report(report: &SyncReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    println!("{}", "Synchronization Report".bold());
    println!("──────────────────────");
    for result in &report.results {
        match &result.outcome {
            AccountOutcome::Updated => {
                println!("  {} {}", "✓".green(), result.account);
            }
            AccountOutcome::SkippedPayer => {
                println!("  {} {} (payer)", "-".yellow(), result.account);
            }
            AccountOutcome::Failed { reason } => {
                println!("  {} {} - {}", "✗".red(), result.account, reason);
            }
        }
    }
    println!();
    println!(
        "Updated: {}  Skipped: {}  Failed: {}",
        report.updated().to_string().green(),
        report.skipped().to_string().yellow(),
        report.failed().to_string().red()
    );
    Ok(())
}

async fn cmd_list(config: AppConfig, mode: SyncMode, format: OutputFormat) -> Result<()> {
    require_valid_config(&config);

    let connector = build_connector(&config)?;
    let accounts = match sync::list_accounts(&connector, mode).await {
        Ok(accounts) => accounts,
        Err(e) => {
            println!("{}: {}", "Error fetching accounts".red(), e);
            std::process::exit(1);
        }
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    println!("{} (mode '{}')", "Selected Accounts".bold(), mode);
    println!("─────────────────");
    if accounts.is_empty() {
        println!("  none");
    }
    for account in &accounts {
        println!("  {} {}", account.owner_id.cyan(), account.name);
    }
    println!();
    println!("Total: {}", accounts.len());
    Ok(())
}

fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
        return Ok(());
    }

    println!("{}", "Current Configuration".bold());
    println!("─────────────────────");
    println!("  Base URL: {}", display_config.base_url);
    println!("  Client API id: {}", display_config.client_api_id);
    println!("  API token: {}", display_config.api_token);
    println!("  External id: {}", display_config.external_id);
    println!("  Role template: {}", display_config.role_template);
    println!("  Role name: {}", display_config.role_name);
    println!("  Payer accounts: {}", display_config.payer_accounts.join(", "));
    println!("  Timeout: {}s", display_config.timeout_secs);
    Ok(())
}

fn cmd_validate(config: AppConfig) -> Result<()> {
    let validation = ConfigValidator::validate(&config);
    validation.print();

    if validation.has_errors() {
        println!();
        println!(
            "{}",
            "Configuration validation failed. Fix the errors above."
                .red()
                .bold()
        );
        std::process::exit(1);
    } else if validation.has_warnings() {
        println!();
        println!(
            "{}",
            "Configuration is valid with warnings.".yellow().bold()
        );
    } else {
        println!();
        println!("{}", "Configuration is valid.".green().bold());
    }
    Ok(())
}

async fn cmd_test(config: AppConfig) -> Result<()> {
    require_valid_config(&config);

    let connector = build_connector(&config)?;
    println!("Testing connection to {}", config.base_url.cyan());

    match connector.health_check().await {
        Ok(ServiceHealth::Healthy) => {
            println!("  {} API reachable", "✓".green());
            Ok(())
        }
        Ok(ServiceHealth::Degraded(reason)) => {
            println!("  {} Degraded: {}", "⚠".yellow(), reason);
            Ok(())
        }
        Ok(ServiceHealth::Unhealthy(reason)) => {
            println!("  {} Unhealthy: {}", "✗".red(), reason);
            std::process::exit(1);
        }
        Err(e) => {
            println!("  {} {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}
