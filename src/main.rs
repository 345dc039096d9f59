//! jira-transitions - JQLに一致するIssueのステータス遷移と滞在日数をレポートする

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jira_transitions::{
    Auth, DEFAULT_PAGE_SIZE, InvalidIssuePolicy, JiraClient, JiraConfig, OutputFormat,
    ReconstructOptions, generate_report, write_report,
};

#[derive(Parser, Debug)]
#[command(name = "jira-transitions")]
#[command(about = "Query Jira issues and report time spent in each workflow state")]
#[command(version)]
struct Cli {
    /// Jira server URL
    #[arg(long, env = "JIRA_URL")]
    server: String,

    /// Jira username/email
    #[arg(long, env = "JIRA_USER")]
    username: Option<String>,

    /// API token or password (prompted when omitted)
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Send the token as a Bearer personal access token
    #[arg(long)]
    bearer: bool,

    /// JQL query string
    #[arg(long)]
    jql: String,

    /// First step in the workflow
    #[arg(long)]
    first_step: String,

    /// Path to CA certificate file (PEM)
    #[arg(long, env = "JIRA_CA_PATH")]
    ca_path: Option<PathBuf>,

    /// Issues requested per search page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Output format: csv, json or summary
    #[arg(short, long, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip issues with malformed data instead of aborting
    #[arg(long)]
    skip_invalid: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// 端末に表示せずにパスワードを読み取る
fn prompt_password() -> Result<String> {
    let password =
        rpassword::prompt_password("Enter password: ").context("Failed to read password")?;
    Ok(password.trim().to_string())
}

fn build_config(cli: &Cli) -> Result<JiraConfig> {
    let token = match &cli.token {
        Some(token) => token.trim().to_string(),
        None => prompt_password()?,
    };

    let auth = if cli.bearer {
        Auth::Bearer { token }
    } else {
        let Some(username) = cli.username.clone() else {
            bail!("--username (or JIRA_USER) is required unless --bearer is used");
        };
        Auth::Basic {
            username,
            api_token: token,
        }
    };

    let mut config = JiraConfig::new(cli.server.as_str(), auth)
        .context("Invalid Jira configuration")?
        .with_page_size(cli.page_size)?;
    if let Some(path) = &cli.ca_path {
        config = config.with_ca_cert(path);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let client = JiraClient::new(config).context("Failed to create Jira client")?;

    let policy = if cli.skip_invalid {
        InvalidIssuePolicy::Skip
    } else {
        InvalidIssuePolicy::Abort
    };
    let options = ReconstructOptions::new(cli.first_step.as_str()).invalid_issue_policy(policy);

    let transitions = generate_report(&client, &cli.jql, &options)
        .await
        .context("Failed to generate transition report")?;

    if !transitions.skipped().is_empty() {
        info!(skipped = transitions.skipped().len(), "issues excluded from the report");
    }

    // 全処理が成功してから出力する（部分的なレポートは書かない）
    let mut buffer = Vec::new();
    write_report(&transitions, cli.format, &mut buffer).context("Failed to render report")?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &buffer)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), issues = transitions.len(), "report written");
        }
        None => io::stdout().write_all(&buffer)?,
    }

    Ok(())
}
