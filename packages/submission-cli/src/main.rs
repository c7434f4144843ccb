// CLI host for the publication story-request library.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use submission::{
    FileSettings, HttpService, Orchestrator, RequestOutcome, DEFAULT_XSRF_TOKEN, SERVICE_ROOT,
};

#[derive(Parser)]
#[command(name = "submit", about = "Request Medium stories into your publication")]
struct Cli {
    /// Settings file (flat JSON key-value store)
    #[arg(long, global = true, default_value = "submission-settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit one or more story URLs
    Submit {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Template id to render; the stored default when omitted
        #[arg(long)]
        template: Option<u8>,
    },

    /// Submit every story linked from a Google Sheets spreadsheet
    Sheet { url: String },

    /// Resolve a publication URL and store its id as the default
    Publication { url: String },

    /// Inspect and edit the saved email templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List templates; the default is marked with '*'
    List,
    /// Make a template the default
    SetDefault { id: u8 },
    /// Rename a template
    Rename { id: u8, name: String },
    /// Replace a template's body
    Edit { id: u8, body: String },
}

struct Config {
    xsrf_token: String,
    service_root: String,
}

impl Config {
    fn from_env() -> Self {
        Self {
            xsrf_token: env::var("MEDIUM_XSRF_TOKEN")
                .unwrap_or_else(|_| DEFAULT_XSRF_TOKEN.to_string()),
            service_root: env::var("MEDIUM_SERVICE_ROOT")
                .unwrap_or_else(|_| SERVICE_ROOT.to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,submission=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let store = FileSettings::open(&cli.settings)
        .await
        .with_context(|| format!("failed to open settings at {}", cli.settings.display()))?;
    let remote = HttpService::new()
        .with_service_root(config.service_root)
        .with_xsrf_token(config.xsrf_token);

    let orchestrator = Orchestrator::new(store, remote);
    orchestrator
        .settings()
        .seed_defaults()
        .await
        .context("failed to seed default settings")?;
    tracing::debug!(settings = %cli.settings.display(), "settings ready");

    match cli.command {
        Command::Submit { urls, template } => {
            let template_id = match template {
                Some(id) => id,
                None => {
                    orchestrator
                        .settings()
                        .default_template_id_lenient()
                        .await?
                }
            };

            let total = urls.len();
            let mut failed = 0;
            let mut outcomes = orchestrator.submit_batch(urls, template_id);
            while let Some(outcome) = outcomes.next().await {
                if !outcome.success {
                    failed += 1;
                }
                print_outcome(&outcome);
            }
            if failed > 0 {
                bail!("{failed} of {total} requests failed");
            }
        }

        Command::Sheet { url } => match orchestrator.submit_spreadsheet(&url).await {
            Ok(mut outcomes) => {
                let mut failed = 0;
                while let Some(outcome) = outcomes.next().await {
                    if !outcome.success {
                        failed += 1;
                    }
                    print_outcome(&outcome);
                }
                if failed > 0 {
                    bail!("{failed} requests failed");
                }
            }
            Err(error) => {
                print_outcome(&RequestOutcome::failure(url.as_str(), &error));
                bail!("spreadsheet could not be processed");
            }
        },

        Command::Publication { url } => {
            let identity = orchestrator
                .resolve_publication(&url)
                .await
                .context("publication update failed")?;
            println!("default publication set to {} ({})", identity.id, identity.url);
        }

        Command::Templates { action } => match action {
            TemplateAction::List => {
                let settings = orchestrator.settings();
                let templates = settings.templates().await?;
                let selection = settings.default_selection().await?;
                for template in templates {
                    let marker = if template.id == selection.template_id {
                        "*"
                    } else {
                        " "
                    };
                    println!("{marker} {} {}", template.id, template.name);
                    println!("    {}", template.body);
                }
            }
            TemplateAction::SetDefault { id } => {
                orchestrator.settings().set_default_template(id).await?;
                println!("template {id} is now the default");
            }
            TemplateAction::Rename { id, name } => {
                orchestrator.settings().update_template_name(id, &name).await?;
                println!("template {id} renamed");
            }
            TemplateAction::Edit { id, body } => {
                orchestrator.settings().update_template_body(id, &body).await?;
                println!("template {id} updated");
            }
        },
    }

    Ok(())
}

fn print_outcome(outcome: &RequestOutcome) {
    if outcome.success {
        println!("ok    {}", outcome.story_url);
    } else {
        println!(
            "fail  {}  {}",
            outcome.story_url,
            outcome.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}
