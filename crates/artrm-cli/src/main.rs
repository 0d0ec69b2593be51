//! artrm - bulk artifact deletion for Artifactory
//!
//! Usage:
//!   artrm delete <pattern>         # Delete everything matching a pattern
//!   artrm delete --spec-aql <aql>  # Delete everything an AQL query returns
//!   artrm encrypt-password         # Print the server-encrypted password
//!   artrm config add|show          # Manage saved servers

mod server;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::Confirm;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use artrm_core::auth::AuthDetails;
use artrm_core::config::{ServerProfile, ServerProfileStore};
use artrm_core::delete::DeleteParamsImpl;
use artrm_core::reduce::DeletionPlan;
use artrm_core::search::FileSpec;
use artrm_core::service::ServiceManager;

use crate::server::{ServerArgs, resolve_service_config};

#[derive(Parser)]
#[command(name = "artrm")]
#[command(about = "Bulk artifact deletion for Artifactory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete artifacts matching a pattern or AQL query
    ///
    /// Matching folders are deleted with a single call; files below a
    /// matching folder are not deleted separately.
    #[command(alias = "del")]
    Delete(DeleteArgs),

    /// Print the encrypted form of the configured password
    EncryptPassword {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Manage saved server profiles
    Config(ConfigArgs),
}

#[derive(Args)]
struct DeleteArgs {
    /// `<repo>/<path>/<name>` pattern (wildcards: * and ?), or AQL with --spec-aql
    pattern: String,
    /// Treat the pattern as a literal AQL query
    #[arg(long)]
    spec_aql: bool,
    /// Match in sub-folders too
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    recursive: bool,
    /// Only list what would be deleted
    #[arg(long)]
    dry_run: bool,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    quiet: bool,
    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
    #[command(flatten)]
    server: ServerArgs,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add or replace a server profile
    Add {
        /// Profile id
        id: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        apikey: Option<String>,
        #[arg(long)]
        access_token: Option<String>,
        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
    /// Show saved server profiles (secrets are hidden)
    Show {
        /// Profile id (all profiles when omitted)
        id: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable list
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artrm=info,artrm_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(run_cli(cli.command))
}

async fn run_cli(command: Commands) -> Result<()> {
    match command {
        Commands::Delete(args) => run_delete(args).await,
        Commands::EncryptPassword { server } => run_encrypt_password(server).await,
        Commands::Config(args) => run_config(args),
    }
}

fn load_manager(server: &ServerArgs, dry_run: bool) -> Result<ServiceManager> {
    let profiles = ServerProfileStore::from_home()?.load()?;
    let config = resolve_service_config(server, &profiles, dry_run)?;
    tracing::debug!(url = config.url(), dry_run, "Resolved server");
    Ok(ServiceManager::new(config)?)
}

async fn run_delete(args: DeleteArgs) -> Result<()> {
    let manager = load_manager(&args.server, args.dry_run)?;

    let spec = if args.spec_aql {
        FileSpec::aql(args.pattern)
    } else {
        FileSpec::pattern(args.pattern).with_recursive(args.recursive)
    };

    let plan = manager
        .search_paths_to_delete(DeleteParamsImpl::new(spec))
        .await?;

    if plan.is_empty() {
        if matches!(args.format, OutputFormat::Table) {
            println!("No artifacts matched.");
        } else {
            print_json_report(&plan, 0, args.dry_run)?;
        }
        return Ok(());
    }

    if matches!(args.format, OutputFormat::Table) {
        print_plan(&plan);
    }

    if !args.quiet && !args.dry_run && !confirm_deletion(plan.len())? {
        println!("Aborted.");
        return Ok(());
    }

    let report = match manager.delete_files(&plan).await {
        Ok(report) => report,
        Err(err) => {
            if let Some(completed) = err.completed() {
                eprintln!(
                    "{} {} of {} paths were deleted before the failure",
                    style("!").yellow(),
                    completed,
                    plan.len()
                );
            }
            return Err(err.into());
        }
    };

    match args.format {
        OutputFormat::Table => {
            let verb = if report.dry_run {
                "Would delete"
            } else {
                "Deleted"
            };
            println!(
                "{} {} {} path(s)",
                style("✓").green(),
                verb,
                report.deleted_count()
            );
        }
        OutputFormat::Json => print_json_report(&plan, report.deleted_count(), report.dry_run)?,
    }

    Ok(())
}

fn print_plan(plan: &DeletionPlan) {
    for item in plan {
        let marker = if item.is_folder() { "/" } else { "" };
        println!("  {}{}", item.full_path(), style(marker).dim());
    }
}

fn print_json_report(plan: &DeletionPlan, deleted: usize, dry_run: bool) -> Result<()> {
    let paths: Vec<String> = plan.iter().map(|item| item.full_path()).collect();
    let output = serde_json::json!({
        "paths": paths,
        "deleted": deleted,
        "dry_run": dry_run,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn confirm_deletion(count: usize) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete the above {count} path(s)?"
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

async fn run_encrypt_password(server: ServerArgs) -> Result<()> {
    let manager = load_manager(&server, false)?;
    let encrypted = manager.retrieve_encrypted_credential().await?;
    println!("{encrypted}");
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let store = ServerProfileStore::from_home()?;
    let mut profiles = store.load()?;

    match args.command {
        ConfigSubcommand::Add {
            id,
            url,
            user,
            password,
            apikey,
            access_token,
            default,
        } => {
            let profile = ServerProfile {
                url,
                auth: AuthDetails {
                    user,
                    password,
                    api_key: apikey,
                    access_token,
                },
            };
            profiles.insert(id.clone(), profile);
            if default {
                profiles.default = Some(id.clone());
            }
            store.save(&profiles)?;
            println!(
                "{} Saved server '{}' to {}",
                style("✓").green(),
                id,
                store.config_path().display()
            );
        }
        ConfigSubcommand::Show { id } => {
            let selected: Vec<_> = match id.as_deref() {
                Some(id) => vec![
                    profiles
                        .get(Some(id))
                        .with_context(|| format!("Server ID '{id}' does not exist"))?,
                ],
                None => profiles
                    .servers
                    .iter()
                    .map(|(id, profile)| (id.as_str(), profile))
                    .collect(),
            };
            for (id, profile) in selected {
                let is_default = profiles.default.as_deref() == Some(id);
                println!(
                    "{}{}",
                    style(id).bold(),
                    if is_default { " (default)" } else { "" }
                );
                println!("  url:  {}", profile.url);
                println!("  auth: {}", describe_auth(&profile.auth));
            }
        }
    }
    Ok(())
}

/// Which credential a profile sends, without revealing it.
fn describe_auth(auth: &AuthDetails) -> String {
    let is_set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
    if is_set(&auth.access_token) {
        return "access token".to_string();
    }
    match auth.user.as_deref().filter(|user| !user.is_empty()) {
        Some(user) if is_set(&auth.password) => format!("user {user} (password)"),
        Some(user) if is_set(&auth.api_key) => format!("user {user} (API key)"),
        Some(user) => format!("user {user} (no secret)"),
        None if is_set(&auth.api_key) => "API key".to_string(),
        None => "anonymous".to_string(),
    }
}
