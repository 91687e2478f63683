use agency_core::{endpoints, Agent};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "agency")]
#[command(about = "Agency CLI - Agent record management")]
#[command(version = agency_core::VERSION)]
struct Cli {
    /// Base URL of the Agency server
    #[arg(
        long,
        global = true,
        env = "AGENCY_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all agents
    List,
    /// Show agent details
    Show { id: String },
    /// Recruit a new agent
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        gender: String,
    },
    /// Server health
    Health,
}

struct AgencyClient {
    base_url: String,
    http: reqwest::Client,
}

impl AgencyClient {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn list(&self) -> anyhow::Result<Vec<Agent>> {
        let response = self.http.get(self.url(endpoints::AGENTS)).send().await?;
        decode(response).await
    }

    async fn show(&self, id: &str) -> anyhow::Result<Agent> {
        let path = format!("{}/{}", endpoints::AGENTS, id);
        let response = self.http.get(self.url(&path)).send().await?;
        decode(response).await
    }

    async fn create(&self, name: &str, gender: &str) -> anyhow::Result<Agent> {
        let response = self
            .http
            .post(self.url(endpoints::AGENTS))
            .form(&[("name", name), ("gender", gender)])
            .send()
            .await?;
        decode(response).await
    }

    async fn health(&self) -> anyhow::Result<Value> {
        let response = self.http.get(self.url(endpoints::HEALTH)).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> anyhow::Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(anyhow!(error_message(status, &body)));
    }

    serde_json::from_str(&body).with_context(|| format!("Unexpected response body: {body}"))
}

fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    format!("{status}: {detail}")
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = AgencyClient::new(&cli.url);

    match cli.command {
        Commands::List => {
            let agents = client.list().await?;
            eprintln!("🕵️  {} agent(s)", agents.len());
            print_json(&agents)
        }
        Commands::Show { id } => print_json(&client.show(&id).await?),
        Commands::Create { name, gender } => {
            let agent = client.create(&name, &gender).await?;
            eprintln!("➕ Recruited agent {}", agent.id);
            print_json(&agent)
        }
        Commands::Health => print_json(&client.health().await?),
    }
}
