//! shop-assistant - answer one shopper message against a JSON catalog
//!
//! # Input
//! Either `--message "..."` or JSON on stdin with fields: message, userId, sessionId
//!
//! # Output (via stdout)
//! The assistant reply as JSON: replyText, payload, meta
//!
//! Logging goes to stderr and is controlled by RUST_LOG.

use clap::Parser;
use colored::Colorize;
use serde::Deserialize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use storefront_assistant::assistant::AssistantReply;
use storefront_assistant::compose::INTERNAL_ERROR_REPLY;
use storefront_assistant::config::{default_catalog_path, default_config_path};
use storefront_assistant::{Assistant, AssistantConfig, AssistantError, InMemoryCatalog, Intent};
use tracing::{debug, error, info, warn};

// ============================================================================
// CLI
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "shop-assistant", version, about = "Answer a shopper message against a catalog")]
struct Cli {
    /// Catalog JSON file ({categories, items})
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Assistant config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message to answer; read as JSON from stdin when absent
    #[arg(long, short)]
    message: Option<String>,

    #[arg(long)]
    user_id: Option<String>,

    #[arg(long)]
    session_id: Option<String>,

    /// Pretty-print the reply JSON
    #[arg(long)]
    pretty: bool,
}

/// Request payload read from stdin
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageInput {
    message: String,

    #[serde(default)]
    user_id: Option<String>,

    #[serde(default)]
    session_id: Option<String>,
}

// ============================================================================
// Loading
// ============================================================================

fn load_config(path: Option<PathBuf>) -> Result<AssistantConfig, AssistantError> {
    if let Some(path) = path {
        return AssistantConfig::load(&path);
    }
    let path = default_config_path()?;
    debug!("Loading config from: {:?}", path);
    match AssistantConfig::load(&path) {
        Ok(config) => Ok(config),
        Err(AssistantError::FileNotFound(path)) => {
            warn!("Config not found at {:?}, using defaults", path);
            Ok(AssistantConfig::default())
        }
        Err(e) => Err(e),
    }
}

fn load_catalog(path: Option<PathBuf>) -> Result<InMemoryCatalog, AssistantError> {
    let path = match path {
        Some(path) => path,
        None => default_catalog_path()?,
    };
    debug!("Loading catalog from: {:?}", path);
    InMemoryCatalog::from_file(&path)
}

fn read_input(cli: &Cli) -> Result<MessageInput, AssistantError> {
    let input = match &cli.message {
        Some(message) => MessageInput {
            message: message.clone(),
            user_id: cli.user_id.clone(),
            session_id: cli.session_id.clone(),
        },
        None => {
            let mut input_json = String::new();
            io::stdin().read_to_string(&mut input_json)?;
            debug!("Received input: {}", input_json);
            serde_json::from_str(&input_json)?
        }
    };
    // Upstream validation: the engine assumes a non-empty message
    if input.message.trim().is_empty() {
        return Err(AssistantError::EmptyMessage);
    }
    Ok(input)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli).await {
        error!("Error: {}", e);
        let output = serde_json::json!({ "replyText": INTERNAL_ERROR_REPLY, "payload": {} });
        println!("{}", output);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), AssistantError> {
    let input = read_input(cli)?;
    let config = load_config(cli.config.clone())?;
    let catalog = load_catalog(cli.catalog.clone())?;
    info!(
        "Loaded {} categories and {} items",
        catalog.categories.len(),
        catalog.items.len()
    );

    let assistant = Assistant::new(Arc::new(catalog), config);
    let reply = assistant
        .handle_message(
            &input.message,
            input.user_id.as_deref(),
            input.session_id.as_deref(),
        )
        .await;

    log_reply(&reply);

    println!("{}", reply_json(&reply, cli.pretty)?);
    Ok(())
}

fn reply_json(reply: &AssistantReply, pretty: bool) -> Result<String, AssistantError> {
    let output = if pretty {
        serde_json::to_string_pretty(reply)
    } else {
        serde_json::to_string(reply)
    };
    output.map_err(AssistantError::ReplySerialize)
}

/// One colored summary line on stderr
fn log_reply(reply: &AssistantReply) {
    let meta = &reply.meta;
    let confidence = format!("{:.2}", meta.confidence);
    let confidence = if meta.confidence >= 0.75 {
        confidence.green()
    } else if meta.confidence >= 0.5 {
        confidence.yellow()
    } else {
        confidence.red()
    };
    info!(
        "{} {} - confidence {} ({} keywords, {}ms)",
        match meta.category {
            Intent::Products => "🛍".green(),
            Intent::Categories => "🗂".blue(),
            Intent::Payments => "💳".yellow(),
            Intent::Shipping => "📦".cyan(),
            Intent::Invalid => "❓".white(),
        },
        meta.category.as_str().bold(),
        confidence,
        meta.matched_keywords.len(),
        meta.elapsed_ms
    );
}

// ============================================================================
// Tests
// ============================================================================
