use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use form_relay::admin::handlers::{SubmissionRow, DEFAULT_RECENT_LIMIT};
use form_relay::store::SubmissionLogStore;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Inspect a running form relay or its submission log", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "FORM_RELAY_URL")]
    url: String,

    #[arg(short, long, env = "FORM_RELAY_ADMIN_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay status and the configured endpoint
    Status,
    /// List the most recent submissions, newest first
    Recent {
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
        /// Print every entry in full instead of one line each
        #[arg(long)]
        details: bool,
    },
    /// Read a submission log file directly, without a running relay
    Inspect {
        path: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
        #[arg(long)]
        details: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            if let Some(json) = read_json(res).await? {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Commands::Recent { limit, details } => {
            let res = client
                .get(format!("{}/admin/submissions", cli.url))
                .query(&[("limit", limit)])
                .headers(headers)
                .send()
                .await?;
            if let Some(json) = read_json(res).await? {
                let rows: Vec<SubmissionRow> = serde_json::from_value(json)?;
                print_rows(&rows, details)?;
            }
        }
        Commands::Inspect {
            path,
            limit,
            details,
        } => {
            if !path.exists() {
                return Err(format!("{} does not exist", path.display()).into());
            }
            let store = SubmissionLogStore::open(path).await?;
            let rows: Vec<SubmissionRow> = store
                .read_recent(limit)
                .await?
                .into_iter()
                .map(SubmissionRow::from)
                .collect();
            print_rows(&rows, details)?;
        }
    }

    Ok(())
}

async fn read_json(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }
    Ok(Some(res.json().await?))
}

fn print_rows(rows: &[SubmissionRow], details: bool) -> Result<(), Box<dyn std::error::Error>> {
    if rows.is_empty() {
        println!("No submissions yet.");
        return Ok(());
    }

    for row in rows {
        if details {
            println!("{}", serde_json::to_string_pretty(&row.details)?);
        } else {
            println!(
                "{}  {:<7}  {}  {}",
                row.timestamp, row.status, row.form, row.details.api_response.message
            );
        }
    }
    Ok(())
}
