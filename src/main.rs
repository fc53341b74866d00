//! ajlist event client
//!
//! Startup routine for the shared client plus a small command line for
//! checking the configuration, publishing an event and running a prompt.

use ajlist_events::core::config::ClientConfig;
use ajlist_events::core::logging::init_logging;
use ajlist_events::{AppContext, Client, ClientError, Event, InferenceRequest};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Check for --help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return;
    }

    // Load configuration
    let config = match ClientConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    // Build the shared client from the configuration loaded above
    let context = match AppContext::bootstrap_with(move || Ok(config)) {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to initialize client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(context, &args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(context: AppContext, args: &[String]) -> Result<()> {
    let client = context.client();

    match args.first().map(String::as_str) {
        None | Some("check") => {
            print_startup_banner(client);
            Ok(())
        }
        Some("send") => {
            let name = args.get(1).context("usage: ajlist-events send <name> [json-data]")?;
            let data = match args.get(2) {
                Some(raw) => serde_json::from_str::<Value>(raw)
                    .context("event data must be valid JSON")?,
                None => Value::Null,
            };

            let response = client
                .send(Event::new(name.as_str(), data))
                .await
                .inspect_err(|e| {
                    if matches!(e, ClientError::MissingEventKey) {
                        info!("Set INNGEST_DEV=1 to send events to a local dev server");
                    }
                })?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Some("infer") => {
            let prompt = args[1..].join(" ");
            if prompt.trim().is_empty() {
                bail!("usage: ajlist-events infer <prompt>");
            }

            let response = client.infer(&InferenceRequest::prompt(prompt)).await?;
            println!("{}", response.text);
            Ok(())
        }
        Some(other) => bail!("unknown command {:?}; see --help", other),
    }
}

/// Print startup banner with configuration
fn print_startup_banner(client: &Client) {
    let config = client.config();
    println!("ajlist event client v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!("   Service ID: {}", client.id());
    println!("   AI Provider: {}", client.ai().provider_name());
    println!("   Gemini Base URL: {}", config.ai.gemini.base_url);
    println!("   Gemini Model: {}", config.ai.gemini.default_model);
    println!("   Event API: {}", config.events.base_url);
    println!(
        "   Mode: {}",
        if config.is_dev() { "dev server" } else { "cloud" }
    );
    println!(
        "   Event Key: {}",
        if config.events.event_key.is_some() {
            "configured"
        } else {
            "not set"
        }
    );
    if let Some(env) = &config.events.env {
        println!("   Environment: {}", env);
    }
    println!("   Request Timeout: {}s", config.request_timeout.as_secs());
}

/// Print help message
fn print_help() {
    println!("ajlist event client v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: ajlist-events [COMMAND]");
    println!();
    println!("Commands:");
    println!("  check                    Build the client and print its configuration (default)");
    println!("  send <name> [json-data]  Publish one event");
    println!("  infer <prompt>           Run a prompt against the configured Gemini model");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  GEMINI_API_KEY - Gemini API key (required)");
    println!("  GEMINI_BASE_URL - Gemini API base URL");
    println!("  GEMINI_MODEL - Default Gemini model (default: gemini-1.5-flash)");
    println!("  INNGEST_EVENT_KEY - Event API key (required to send outside dev mode)");
    println!("  INNGEST_EVENT_API_BASE_URL / INNGEST_BASE_URL - Event API base URL");
    println!("  INNGEST_DEV - 1 to use a local dev server, or the dev server URL");
    println!("  INNGEST_ENV - Branch environment name");
    println!("  REQUEST_TIMEOUT - Request timeout in seconds (default: 30)");
    println!("  LOG_LEVEL - Logging level (default: info)");
    println!("  CONFIG_PATH - Optional TOML file with non-secret settings");
}
