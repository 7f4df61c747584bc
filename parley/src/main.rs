#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::path::Path;

use args::{Args, Command};
use clap::Parser;
use parley_config::{Config, ProviderConfig};
use parley_llm::{Client, Message, RequestContext, builtin_defaults, builtin_registry};
use tokio_util::sync::CancellationToken;

/// Provider used when neither `--provider` nor `ai.default_provider` is set
const FALLBACK_PROVIDER: &str = "anthropic";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    parley_telemetry::init(&config.telemetry)?;

    match args.command {
        Command::Providers => {
            let registry = builtin_registry();
            println!("{}", registry.list_providers());
        }
        Command::Ask { provider, system, prompt } => {
            let provider = provider
                .or_else(|| config.ai.default_provider.clone())
                .unwrap_or_else(|| FALLBACK_PROVIDER.to_owned());
            ask(&config, &provider, &system, &prompt).await?;
        }
    }

    Ok(())
}

/// Missing file at the given path means built-in defaults
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Ok(Config::default())
    }
}

async fn ask(config: &Config, provider: &str, system: &str, prompt: &str) -> anyhow::Result<()> {
    let registry = builtin_registry();
    let factory = registry.get_factory(provider)?;

    let defaults =
        builtin_defaults(provider).ok_or_else(|| anyhow::anyhow!("no built-in defaults for provider {provider}"))?;
    let provider_config = ProviderConfig::resolve(&config.ai, provider, &defaults);

    let shutdown = CancellationToken::new();
    let ctx = RequestContext::with_cancellation(shutdown.clone());

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.cancel();
    });

    let client = factory(ctx.clone(), provider_config).await?;

    tracing::info!(provider, model = client.model(), "sending message");

    let messages = [Message::user(prompt)];
    let response = client
        .send_message_with_system_prompt_and_tools(&ctx, system, "", &messages, &[])
        .await?;

    if let Some(usage) = &response.usage {
        tracing::debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_tokens = usage.total_tokens,
            cache_read_tokens = usage.cache_read_tokens,
            cache_creation_tokens = usage.cache_creation_tokens,
            "token usage"
        );
    }

    println!("{}", response.content);
    Ok(())
}

/// Wait for `SIGINT`
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("interrupt received, cancelling request");
}
