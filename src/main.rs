// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use bluecat_webhook::{
    call_context::CallContext,
    config::{config_schema, load_config_file},
    constants::{DEFAULT_NAMESPACE, DEFAULT_OPERATION_TIMEOUT_SECS},
    metrics::gather_metrics,
    secrets::{KubeSecretResolver, SecretResolver, StaticSecretResolver},
    solver::{BlueCatSolver, ChallengeOutcome, ChallengeRequest},
};
use clap::{Args, Parser, Subcommand};
use kube::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Solve cert-manager DNS-01 challenges with BlueCat Address Manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish the challenge token as a TXT record
    Present(ChallengeArgs),
    /// Remove the challenge TXT record
    Cleanup(ChallengeArgs),
    /// Print the JSON schema of the provider config
    Schema,
}

#[derive(Args, Debug)]
struct ChallengeArgs {
    /// Provider config file (YAML or JSON)
    #[arg(short, long, env = "BLUECAT_WEBHOOK_CONFIG")]
    config: PathBuf,

    /// FQDN of the challenge record (e.g., "_acme-challenge.example.com.")
    #[arg(long)]
    fqdn: String,

    /// Challenge token
    #[arg(short, long)]
    key: String,

    /// Namespace the password secret lives in
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Read the password from this environment variable instead of a Kubernetes Secret
    #[arg(long)]
    password_env: Option<String>,

    /// Overall operation timeout in seconds
    #[arg(long, default_value_t = DEFAULT_OPERATION_TIMEOUT_SECS)]
    timeout: u64,

    /// Print Prometheus metrics to stdout when done
    #[arg(long)]
    print_metrics: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("bluecat-webhook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Respects RUST_LOG (default INFO) and RUST_LOG_FORMAT=json|text
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&config_schema())?);
            Ok(())
        }
        Command::Present(args) => run_challenge("present", args).await,
        Command::Cleanup(args) => run_challenge("cleanup", args).await,
    }
}

async fn run_challenge(action: &str, args: ChallengeArgs) -> Result<()> {
    let request = build_request(&args)?;
    let secrets = secret_resolver(&args).await?;
    let solver = BlueCatSolver::new(secrets);

    let (ctx, cancel) = CallContext::cancellable();
    let ctx = ctx.with_timeout(Duration::from_secs(args.timeout));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, cancelling challenge");
            cancel.cancel();
        }
    });

    info!(
        solver = solver.name(),
        action = action,
        fqdn = %request.resolved_fqdn,
        namespace = %request.resource_namespace,
        "Starting challenge"
    );

    let result = match action {
        "present" => solver.present(&ctx, &request).await,
        _ => solver.cleanup(&ctx, &request).await,
    };

    if args.print_metrics {
        println!("{}", gather_metrics()?);
    }

    match result {
        Ok(ChallengeOutcome {
            zone_id,
            changed,
            deployed,
        }) => {
            info!(
                action = action,
                zone_id = zone_id,
                changed = changed,
                deployed = deployed,
                "Challenge completed"
            );
            Ok(())
        }
        Err(e) => {
            error!(
                action = action,
                reason = e.reason(),
                retryable = e.is_transient(),
                "Challenge failed: {e}"
            );
            Err(e).with_context(|| format!("{action} failed for {}", request.resolved_fqdn))
        }
    }
}

/// Turn CLI arguments into a challenge request.
fn build_request(args: &ChallengeArgs) -> Result<ChallengeRequest> {
    let config = load_config_file(&args.config)?;
    debug!(path = %args.config.display(), zone = %config.zone, "Loaded provider config");

    Ok(ChallengeRequest {
        uid: String::new(),
        resolved_fqdn: args.fqdn.clone(),
        resolved_zone: config.zone.clone(),
        key: args.key.clone(),
        resource_namespace: args.namespace.clone(),
        config: Some(serde_json::to_value(&config)?),
    })
}

/// Choose where the BlueCat password is read from.
async fn secret_resolver(args: &ChallengeArgs) -> Result<Arc<dyn SecretResolver>> {
    if let Some(var) = &args.password_env {
        let password = std::env::var(var)
            .with_context(|| format!("environment variable {var} is not set"))?;
        debug!(variable = %var, "Using password from environment");
        return Ok(Arc::new(StaticSecretResolver::new().with_fallback(password)));
    }

    debug!("Initializing Kubernetes client");
    let client = Client::try_default()
        .await
        .context("failed to create Kubernetes client")?;
    Ok(Arc::new(KubeSecretResolver::new(client)))
}
