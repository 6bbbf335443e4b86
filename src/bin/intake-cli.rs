use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "intake-cli")]
#[command(about = "Management CLI for the quote intake service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin bearer token (INTAKE_ADMIN_TOKEN on the server)
    #[arg(short, long, env = "INTAKE_ADMIN_TOKEN", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status and configured features
    Status,
    /// Show recent security events
    Events {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Remove and print every buffered security event
    Drain,
    /// Submit a quote request read from a JSON file
    Submit { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let res = match cli.command {
        Commands::Status => {
            client.get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Events { limit } => {
            client.get(format!("{}/admin/events", cli.url))
                .query(&[("limit", limit)])
                .headers(headers)
                .send()
                .await?
        }
        Commands::Drain => {
            client.delete(format!("{}/admin/events", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Submit { file } => {
            let payload: Value = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            client.post(format!("{}/api/contact", cli.url))
                .json(&payload)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
