use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crm::config::AppConfig;
use crm::dashboard::{self, format_currency, format_percent};
use crm::gateway::{
    sample_activities, sample_clients, sample_contacts, sample_opportunities, Gateway, HttpGateway,
    MockGateway,
};
use crm::model::{Activity, Client, Contact, Opportunity, Record};
use crm::query::{filter_records, StatusFilter};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[clap(short, long, global = true, default_value = "crm.yaml")]
    config: PathBuf,

    #[clap(short, long, global = true)]
    log_level: Option<String>,

    /// Run against the seeded in-memory mock gateway.
    #[clap(long, global = true)]
    mock: bool,

    #[clap(subcommand)]
    command: Commands,
}

/// CRM entity collections addressable from the CLI.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Entity {
    Clients,
    Contacts,
    Activities,
    Opportunities,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, optionally filtered by status label and search term.
    List {
        #[clap(value_enum)]
        entity: Entity,
        /// Exact status label, e.g. "Activo"; omit for all.
        #[clap(long)]
        status: Option<String>,
        /// Case-insensitive substring over the entity's text fields.
        #[clap(long, default_value = "")]
        search: String,
    },
    /// Create a record from an inline JSON payload in wire format.
    Create {
        #[clap(value_enum)]
        entity: Entity,
        #[clap(long, conflicts_with = "payload_file")]
        payload_json: Option<String>,
        #[clap(long, conflicts_with = "payload_json")]
        payload_file: Option<PathBuf>,
    },
    /// Update a record from an inline JSON payload in wire format.
    Update {
        #[clap(value_enum)]
        entity: Entity,
        #[clap(long, conflicts_with = "payload_file")]
        payload_json: Option<String>,
        #[clap(long, conflicts_with = "payload_json")]
        payload_file: Option<PathBuf>,
    },
    /// Delete a record by id.
    Delete {
        #[clap(value_enum)]
        entity: Entity,
        #[clap(long)]
        id: i64,
    },
    /// Print the aggregated dashboard summary.
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = AppConfig::load(&args.config)?;
    if args.mock {
        config.mock = true;
    }

    match args.command {
        Commands::List {
            entity,
            status,
            search,
        } => {
            let status = match status {
                Some(label) => StatusFilter::Only(label),
                None => StatusFilter::All,
            };
            match entity {
                Entity::Clients => list::<Client>(&config, sample_clients(), &status, &search).await,
                Entity::Contacts => {
                    list::<Contact>(&config, sample_contacts(), &status, &search).await
                }
                Entity::Activities => {
                    list::<Activity>(&config, sample_activities(), &status, &search).await
                }
                Entity::Opportunities => {
                    list::<Opportunity>(&config, sample_opportunities(), &status, &search).await
                }
            }
        }
        Commands::Create {
            entity,
            payload_json,
            payload_file,
        } => {
            let payload = read_payload(payload_json, payload_file)?;
            match entity {
                Entity::Clients => create::<Client>(&config, sample_clients(), &payload).await,
                Entity::Contacts => create::<Contact>(&config, sample_contacts(), &payload).await,
                Entity::Activities => {
                    create::<Activity>(&config, sample_activities(), &payload).await
                }
                Entity::Opportunities => {
                    create::<Opportunity>(&config, sample_opportunities(), &payload).await
                }
            }
        }
        Commands::Update {
            entity,
            payload_json,
            payload_file,
        } => {
            let payload = read_payload(payload_json, payload_file)?;
            match entity {
                Entity::Clients => update::<Client>(&config, sample_clients(), &payload).await,
                Entity::Contacts => update::<Contact>(&config, sample_contacts(), &payload).await,
                Entity::Activities => {
                    update::<Activity>(&config, sample_activities(), &payload).await
                }
                Entity::Opportunities => {
                    update::<Opportunity>(&config, sample_opportunities(), &payload).await
                }
            }
        }
        Commands::Delete { entity, id } => match entity {
            Entity::Clients => delete::<Client>(&config, sample_clients(), id).await,
            Entity::Contacts => delete::<Contact>(&config, sample_contacts(), id).await,
            Entity::Activities => delete::<Activity>(&config, sample_activities(), id).await,
            Entity::Opportunities => delete::<Opportunity>(&config, sample_opportunities(), id).await,
        },
        Commands::Dashboard => dashboard_summary(&config).await,
    }
}

fn gateway_for<R: Record>(config: &AppConfig, seed: Vec<R>) -> Result<Box<dyn Gateway<R>>> {
    if config.mock {
        let gateway = MockGateway::with_records(seed).with_latency(
            Duration::from_millis(config.mock_list_delay_ms),
            Duration::from_millis(config.mock_mutate_delay_ms),
        );
        Ok(Box::new(gateway))
    } else {
        let token = config.read_token()?;
        Ok(Box::new(HttpGateway::new(config.base_url.clone(), token)))
    }
}

async fn list<R: Record>(
    config: &AppConfig,
    seed: Vec<R>,
    status: &StatusFilter,
    search: &str,
) -> Result<()> {
    let gateway = gateway_for::<R>(config, seed)?;
    let records = gateway.list().await?;
    let visible = filter_records(&records, status, search);
    info!(entity = R::ENTITY, total = records.len(), shown = visible.len(), "listed");

    let dtos: Vec<R::Dto> = visible.iter().map(Record::to_dto).collect();
    println!("{}", serde_json::to_string_pretty(&dtos)?);
    Ok(())
}

async fn create<R: Record>(config: &AppConfig, seed: Vec<R>, payload: &str) -> Result<()> {
    let gateway = gateway_for::<R>(config, seed)?;
    let dto: R::Dto = serde_json::from_str(payload).context("invalid JSON payload")?;
    let record = R::from_dto(dto)?;
    let created = gateway.create(&record).await?;
    info!(entity = R::ENTITY, id = created.id(), "created");
    println!("{}", serde_json::to_string_pretty(&created.to_dto())?);
    Ok(())
}

async fn update<R: Record>(config: &AppConfig, seed: Vec<R>, payload: &str) -> Result<()> {
    let gateway = gateway_for::<R>(config, seed)?;
    let dto: R::Dto = serde_json::from_str(payload).context("invalid JSON payload")?;
    let record = R::from_dto(dto)?;
    let updated = gateway.update(&record).await?;
    info!(entity = R::ENTITY, id = updated.id(), "updated");
    println!("{}", serde_json::to_string_pretty(&updated.to_dto())?);
    Ok(())
}

async fn delete<R: Record>(config: &AppConfig, seed: Vec<R>, id: i64) -> Result<()> {
    let gateway = gateway_for::<R>(config, seed)?;
    gateway.delete(id).await?;
    info!(entity = R::ENTITY, id, "deleted");
    println!("deleted {} {}", R::ENTITY, id);
    Ok(())
}

async fn dashboard_summary(config: &AppConfig) -> Result<()> {
    let clients = gateway_for::<Client>(config, sample_clients())?.list().await?;
    let activities = gateway_for::<Activity>(config, sample_activities())?
        .list()
        .await?;
    let opportunities = gateway_for::<Opportunity>(config, sample_opportunities())?
        .list()
        .await?;

    let summary = dashboard::summarize(&clients, &activities, &opportunities);

    println!("Tareas pendientes:   {}", summary.pending_activities);
    println!("Tareas en progreso:  {}", summary.in_progress_activities);
    println!(
        "Leads por prioridad: alta {}, media {}, baja {}",
        summary.leads_by_priority[0], summary.leads_by_priority[1], summary.leads_by_priority[2]
    );
    println!(
        "Pipeline abierto:    {}",
        format_currency(summary.open_pipeline_value)
    );
    println!(
        "Tasa de éxito:       {}",
        format_percent(summary.win_rate_pct)
    );
    println!("Ventas por mes:");
    for (label, value) in summary
        .monthly_sales
        .labels
        .iter()
        .zip(&summary.monthly_sales.values)
    {
        println!("  {label}  {}", format_currency(*value));
    }
    println!("Clientes recientes:");
    for client in &summary.recent_clients {
        println!(
            "  {}  {} ({})",
            client.registered_on, client.name, client.status
        );
    }
    Ok(())
}

fn read_payload(inline: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (inline, file) {
        (Some(json), None) => Ok(json),
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
        }
        (None, None) => bail!("either --payload-json or --payload-file is required"),
        (Some(_), Some(_)) => unreachable!("clap conflicts_with prevents this"),
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .without_time()
        .init();
}
