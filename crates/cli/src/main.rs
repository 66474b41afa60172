//! LUIS CLI - Command-line interface for the LUIS SDK

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use luis_sdk::{
    cancel_channel, ListOptions, LuisConfig, LuisError, ManagementClient,
    PublishAppOptions, RecognitionClient, RecognizerOptions, TrainingStatus, WaitOptions,
};
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "luis")]
#[command(about = "LUIS recognition and authoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Subscription (or authoring) key
    #[arg(long, env = "LUIS_SUBSCRIPTION_KEY", hide_env_values = true)]
    subscription_key: String,

    /// Azure region hosting the app
    #[arg(long, env = "LUIS_REGION", default_value = luis_sdk::config::DEFAULT_REGION)]
    region: String,

    /// Override the service origin (e.g. a local mock)
    #[arg(long, env = "LUIS_ENDPOINT")]
    endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize intents and entities in an utterance
    Recognize {
        /// Utterance text
        text: String,

        /// Application ID
        #[arg(long, env = "LUIS_APP_ID")]
        app_id: String,

        /// Query the staging slot
        #[arg(long)]
        staging: bool,

        /// Return scores for every intent
        #[arg(long)]
        verbose: bool,

        /// Timezone offset in minutes for datetime entities
        #[arg(long, allow_hyphen_values = true)]
        timezone_offset: Option<i32>,
    },

    /// List applications
    Apps {
        #[arg(long)]
        skip: Option<i64>,

        #[arg(long)]
        take: Option<i64>,
    },

    /// Import an application, reusing an existing one with the same name
    Import {
        /// Exported application JSON
        file: PathBuf,

        /// Name to import under (overrides the file's name)
        #[arg(long)]
        app_name: Option<String>,
    },

    /// List versions of an application
    Versions {
        app_id: String,

        #[arg(long)]
        skip: Option<i64>,

        #[arg(long)]
        take: Option<i64>,
    },

    /// Train a version
    Train {
        app_id: String,
        version_id: String,

        /// Wait until training completes (Ctrl-C to stop waiting)
        #[arg(short, long)]
        wait: bool,

        /// Give up after this many status polls
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Show per-model training status
    Status { app_id: String, version_id: String },

    /// Publish a version
    Publish {
        app_id: String,
        version_id: String,

        /// Publish to the staging slot
        #[arg(long)]
        staging: bool,
    },
}

#[derive(Tabled)]
struct AppRow {
    id: String,
    name: String,
    culture: String,
}

#[derive(Tabled)]
struct ModelRow {
    model_id: String,
    status: String,
    examples: String,
    failure: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = LuisConfig::new(&cli.subscription_key).with_region(&cli.region);
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint);
    }

    match cli.command {
        Commands::Recognize {
            text,
            app_id,
            staging,
            verbose,
            timezone_offset,
        } => {
            let client = RecognitionClient::new(config.with_app_id(app_id).with_recognizer_options(
                RecognizerOptions {
                    staging,
                    verbose,
                    timezone_offset,
                },
            ))?;
            let result = client.recognize(&text).await?;

            println!(
                "{} {} ({:.3})",
                "Intent:".bold(),
                result.top_scoring_intent.intent.green().bold(),
                result.top_scoring_intent.score
            );
            for entity in &result.entities {
                println!(
                    "  {} {} [{}..{}] {}",
                    "•".bold(),
                    entity.entity,
                    entity.start_index,
                    entity.end_index,
                    entity.entity_type.cyan()
                );
            }
            if verbose {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }

        Commands::Apps { skip, take } => {
            let client = ManagementClient::new(config)?;
            let apps = client
                .list_user_apps(ListOptions::new(skip, take))
                .await?
                .apps()?;

            if apps.is_empty() {
                println!("{}", "No applications".yellow());
            } else {
                let rows: Vec<AppRow> = apps
                    .into_iter()
                    .map(|app| AppRow {
                        culture: app
                            .extra
                            .get("culture")
                            .and_then(|c| c.as_str())
                            .unwrap_or("-")
                            .to_string(),
                        id: app.id,
                        name: app.name,
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Import { file, app_name } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut app: serde_json::Value =
                serde_json::from_str(&raw).context("Invalid application JSON")?;
            let client = ManagementClient::new(config)?;

            if let Some(name) = app_name {
                app["name"] = serde_json::Value::String(name);
            }
            let app_id = client.try_import_app(&app).await?;

            println!("{}", "✓ Application ready".green().bold());
            println!("  {} {}", "App ID:".bold(), app_id);
        }

        Commands::Versions { app_id, skip, take } => {
            let client = ManagementClient::new(config)?;
            let response = client
                .list_versions(&app_id, ListOptions::new(skip, take))
                .await?;
            println!("{}", serde_json::to_string_pretty(&response.body)?);
        }

        Commands::Train {
            app_id,
            version_id,
            wait,
            max_attempts,
        } => {
            let client = ManagementClient::new(config)?;
            client.train_app(&app_id, &version_id).await?;
            println!("{}", format!("✓ Training started for {}", version_id).green().bold());

            if wait {
                let (handle, token) = cancel_channel();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        handle.cancel();
                    }
                });

                let mut options = WaitOptions::default().with_cancel(token);
                if let Some(max) = max_attempts {
                    options = options.with_max_attempts(max);
                }

                info!(app_id = %app_id, version_id = %version_id, "Waiting for training");
                match client
                    .wait_for_training_with(&app_id, &version_id, options)
                    .await
                {
                    Ok(()) => println!("{}", "✓ Training completed".green().bold()),
                    Err(LuisError::Cancelled) => println!("{}", "Stopped waiting".yellow()),
                    Err(e) => {
                        println!("{} {}", "✗ Training failed:".red().bold(), e);
                        return Err(e.into());
                    }
                }
            }
        }

        Commands::Status { app_id, version_id } => {
            let client = ManagementClient::new(config)?;
            let models = client
                .training_status(&app_id, &version_id)
                .await?
                .model_statuses()?;

            let rows: Vec<ModelRow> = models
                .into_iter()
                .map(|m| ModelRow {
                    model_id: m.model_id,
                    status: status_label(m.details.status),
                    examples: m
                        .details
                        .example_count
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                    failure: m.details.failure_reason.unwrap_or_default(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Publish {
            app_id,
            version_id,
            staging,
        } => {
            let client = ManagementClient::new(config)?;
            let mut options = PublishAppOptions::new(&version_id);
            options.is_staging = Some(staging);
            let response = client.publish_app(&app_id, options).await?;

            println!("{}", format!("✓ Published {}", version_id).green().bold());
            if let Some(url) = response.body.get("endpointUrl").and_then(|u| u.as_str()) {
                println!("  {} {}", "Endpoint:".bold(), url);
            }
        }
    }

    Ok(())
}

fn status_label(status: TrainingStatus) -> String {
    match status {
        TrainingStatus::Success | TrainingStatus::UpToDate => format!("{:?}", status).green(),
        TrainingStatus::InProgress => "InProgress".yellow(),
        TrainingStatus::Fail => "Fail".red(),
        TrainingStatus::Unknown => "Unknown".normal(),
    }
    .to_string()
}

/// `LUIS_LOG_FORMAT=json` for structured logs, pretty otherwise.
/// Logs go to stderr so command output stays pipeable.
fn init_logging() {
    let log_format = std::env::var("LUIS_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("luis_sdk=warn,luis=info"));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
