//! DirectBank Command Line Tool
//!
//! Provides commands for working with a bank over the DirectBank protocol:
//! - settings: fetch the exchange settings document (enrollment)
//! - kinds: show the document kinds enabled in a settings file
//! - logon: check credentials against the bank
//! - list: list packets ready for pickup
//! - fetch: fetch one packet and print its document
//! - statement: submit a statement request
//! - status: probe the state of a submitted request

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directbank_client::{fetch_exchange_settings, DirectBankClient, HttpTransport};
use directbank_core::ExchangeConfig;
use directbank_envelope::{StatementQuery, StatementType};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "directbank")]
#[command(version)]
#[command(about = "DirectBank exchange client - talk to a bank from the command line")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the exchange settings document from a bank (enrollment)
    #[command(about = "Fetch the exchange settings document from a bank")]
    Settings {
        /// Bank endpoint base URL
        #[arg(long)]
        url: String,

        /// Account number the settings are requested for
        #[arg(long)]
        account: String,

        /// Taxpayer identification number
        #[arg(long)]
        inn: String,

        /// Bank identification code
        #[arg(long)]
        bic: String,

        /// Write the document here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the document kinds enabled in a settings file
    #[command(about = "Show the document kinds enabled in a settings file")]
    Kinds {
        /// Path to the settings file
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,
    },

    /// Check credentials against the bank
    #[command(about = "Logon to the bank and print the issued session id")]
    Logon {
        /// Path to the settings file
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,

        /// Logon password
        #[arg(long, short)]
        password: String,
    },

    /// List packets ready for pickup
    #[command(about = "List packets the bank prepared for pickup")]
    List {
        /// Path to the settings file
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,

        /// Logon password
        #[arg(long, short)]
        password: String,

        /// Only packets after this date (bank-defined format)
        #[arg(long)]
        since: Option<String>,
    },

    /// Fetch one packet and print its document
    #[command(about = "Fetch one packet and print the decoded document")]
    Fetch {
        /// Path to the settings file
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,

        /// Logon password
        #[arg(long, short)]
        password: String,

        /// Packet identifier from the list command
        #[arg(long)]
        id: String,

        /// Write the document here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Submit a statement request
    #[command(about = "Submit a statement request and print the assigned id")]
    Statement {
        /// Path to the settings file
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,

        /// Logon password
        #[arg(long, short)]
        password: String,

        /// Account number to request the statement for
        #[arg(long)]
        account: String,

        /// Statement type: 0 final, 1 intermediate, 2 current balance
        #[arg(long = "type", value_name = "TYPE", default_value = "0")]
        statement_type: String,

        /// Period start, YYYY-MM-DDTHH:MM:SS (defaults to yesterday)
        #[arg(long)]
        from: Option<String>,

        /// Period end, YYYY-MM-DDTHH:MM:SS (defaults to today)
        #[arg(long)]
        to: Option<String>,
    },

    /// Probe the state of a submitted request
    #[command(about = "Probe the state of a previously submitted request")]
    Status {
        /// Path to the settings file
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,

        /// Logon password
        #[arg(long, short)]
        password: String,

        /// Identifier returned by the statement command
        #[arg(long)]
        ext_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "directbank=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Settings {
            url,
            account,
            inn,
            bic,
            output,
        } => handle_settings(&url, &account, &inn, &bic, output.as_deref()).await,
        Commands::Kinds { settings } => handle_kinds(&settings),
        Commands::Logon { settings, password } => handle_logon(&settings, &password).await,
        Commands::List {
            settings,
            password,
            since,
        } => handle_list(&settings, &password, since.as_deref()).await,
        Commands::Fetch {
            settings,
            password,
            id,
            output,
        } => handle_fetch(&settings, &password, &id, output.as_deref()).await,
        Commands::Statement {
            settings,
            password,
            account,
            statement_type,
            from,
            to,
        } => {
            handle_statement(&settings, &password, &account, &statement_type, from, to).await
        }
        Commands::Status {
            settings,
            password,
            ext_id,
        } => handle_status(&settings, &password, &ext_id).await,
    }
}

async fn handle_settings(
    url: &str,
    account: &str,
    inn: &str,
    bic: &str,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let transport = HttpTransport::new().context("Failed to build HTTP transport")?;
    let document = fetch_exchange_settings(&transport, url, account, inn, bic)
        .await
        .context("Failed to fetch exchange settings")?;

    write_document(&document, output)
}

fn handle_kinds(settings: &std::path::Path) -> Result<()> {
    let config = load_config(settings)?;

    for (code, description) in config.allowed_doc_kinds() {
        println!("{code}  {description}");
    }

    Ok(())
}

async fn handle_logon(settings: &std::path::Path, password: &str) -> Result<()> {
    let client = connect(settings, password).await?;

    // connect() already logged on; surface the issued id
    if let Some(sid) = client.sid() {
        println!("Session established: {sid}");
    }

    Ok(())
}

async fn handle_list(
    settings: &std::path::Path,
    password: &str,
    since: Option<&str>,
) -> Result<()> {
    let mut client = connect(settings, password).await?;

    let ids = client
        .pack_list(since)
        .await
        .context("Failed to list packets")?;

    if ids.is_empty() {
        println!("No packets waiting");
    }
    for id in ids {
        println!("{id}");
    }

    Ok(())
}

async fn handle_fetch(
    settings: &std::path::Path,
    password: &str,
    id: &str,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let mut client = connect(settings, password).await?;

    let document = client
        .pack_data(id)
        .await
        .with_context(|| format!("Failed to fetch packet {id}"))?;

    write_document(&document, output)
}

async fn handle_statement(
    settings: &std::path::Path,
    password: &str,
    account: &str,
    statement_type: &str,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    let statement_type = StatementType::from_code(statement_type)
        .with_context(|| format!("Unknown statement type '{statement_type}', expected 0, 1 or 2"))?;

    let mut client = connect(settings, password).await?;

    let query = StatementQuery {
        statement_type: Some(statement_type),
        account: Some(account.to_string()),
        date_from: from,
        date_to: to,
        extra: Vec::new(),
    };
    let id = client
        .statement_request(&query)
        .await
        .context("Failed to submit statement request")?;

    println!("Statement request accepted: {id}");

    Ok(())
}

async fn handle_status(settings: &std::path::Path, password: &str, ext_id: &str) -> Result<()> {
    let mut client = connect(settings, password).await?;

    let id = client
        .status_request(ext_id)
        .await
        .with_context(|| format!("Failed to probe request {ext_id}"))?;

    println!("Status probe accepted: {id}");

    Ok(())
}

fn load_config(settings: &std::path::Path) -> Result<ExchangeConfig> {
    ExchangeConfig::from_settings_file(settings)
        .with_context(|| format!("Failed to load settings from {}", settings.display()))
}

async fn connect(settings: &std::path::Path, password: &str) -> Result<DirectBankClient> {
    let config = load_config(settings)?;
    tracing::info!(bank = %config.bank.name, url = %config.base_url, "connecting");

    let mut client = DirectBankClient::new(config).context("Failed to build client")?;
    client
        .logon(password)
        .await
        .context("Logon failed")?;
    Ok(client)
}

fn write_document(document: &str, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{document}"),
    }
    Ok(())
}
