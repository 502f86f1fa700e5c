//! # WHTRUST CLI
//!
//! Diagnostic command-line interface for an operator's admission webhooks.
//!
//! ## Usage
//!
//! ```bash
//! # Check that the webhook secret's CA is registered on every webhook entry
//! whtrust verify --namespace operator-system
//!
//! # Show which configuration registers a webhook entry
//! whtrust find --kind mutating --webhook mcluster.example.io
//!
//! # Change the failure policy of one webhook entry
//! whtrust set-failure-policy --kind validating --webhook vcluster.example.io --policy Ignore
//!
//! # Dump redacted Secrets, ConfigMaps and webhook configurations as YAML (or --json)
//! whtrust report --namespace operator-system
//! ```
//!
//! Object names not given on the command line come from the environment
//! (`WEBHOOK_SECRET_NAME`, `MUTATING_WEBHOOK_CONFIGURATION_NAME`, ...).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use kube::Client;
use std::time::Duration;
use webhook_trust::config::load_config;
use webhook_trust::observability::metrics;
use webhook_trust::redaction::{RedactionPolicy, RedactionTable, ResourceKind};
use webhook_trust::report::ReportCollector;
use webhook_trust::store::KubeStore;
use webhook_trust::verifier::render_ca_bytes;
use webhook_trust::webhook::{
    find_webhook, update_webhook_configuration, AdmissionWebhookConfiguration, FailurePolicy,
};
use webhook_trust::{TrustConfig, TrustVerifier};

/// Webhook trust diagnostics CLI
#[derive(Parser)]
#[command(name = "whtrust")]
#[command(about = "Admission webhook CA verification and diagnostic export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Namespace of the operator and its webhook secret
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Print Prometheus metrics collected during the command
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WebhookKind {
    Mutating,
    Validating,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the secret's CA matches every registered webhook entry
    Verify {
        /// Secret holding the webhook certificate
        #[arg(long)]
        secret_name: Option<String>,

        /// Key in the secret holding the CA certificate
        #[arg(long)]
        ca_key: Option<String>,

        /// Name of the MutatingWebhookConfiguration
        #[arg(long)]
        mutating: Option<String>,

        /// Name of the ValidatingWebhookConfiguration
        #[arg(long)]
        validating: Option<String>,

        /// Give up after this many seconds (0 keeps the configured default)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Find the configuration registering a webhook entry
    Find {
        #[arg(short, long, value_enum)]
        kind: WebhookKind,

        /// Name of the webhook entry
        #[arg(short, long)]
        webhook: String,
    },
    /// Set the failure policy of one webhook entry
    SetFailurePolicy {
        #[arg(short, long, value_enum)]
        kind: WebhookKind,

        /// Name of the webhook entry
        #[arg(short, long)]
        webhook: String,

        /// Fail or Ignore
        #[arg(short, long)]
        policy: FailurePolicy,
    },
    /// Print redacted Secrets, ConfigMaps and webhook configurations
    Report {
        /// Export ConfigMaps unredacted
        #[arg(long)]
        pass_config_maps: bool,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Required for rustls 0.23+ before the kube client opens a connection
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_provider| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webhook_trust=info,whtrust=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    metrics::register_metrics()?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig is configured.")?;
    let store = KubeStore::new(client);

    let mut config = load_config();
    if let Some(namespace) = cli.namespace {
        config = config.with_namespace(namespace);
    }

    let outcome = match cli.command {
        Commands::Verify {
            secret_name,
            ca_key,
            mutating,
            validating,
            timeout_secs,
        } => {
            if let Some(name) = secret_name {
                config = config.with_secret_name(name);
            }
            if let Some(key) = ca_key {
                config = config.with_ca_key(key);
            }
            if let Some(name) = mutating {
                config = config.with_mutating_configuration_name(name);
            }
            if let Some(name) = validating {
                config = config.with_validating_configuration_name(name);
            }
            if let Some(secs) = timeout_secs {
                config = config.with_request_timeout(Duration::from_secs(secs));
            }
            verify_command(store, config).await
        }
        Commands::Find { kind, webhook } => match kind {
            WebhookKind::Mutating => {
                find_command::<MutatingWebhookConfiguration>(&store, &webhook).await
            }
            WebhookKind::Validating => {
                find_command::<ValidatingWebhookConfiguration>(&store, &webhook).await
            }
        },
        Commands::SetFailurePolicy {
            kind,
            webhook,
            policy,
        } => match kind {
            WebhookKind::Mutating => {
                set_failure_policy_command::<MutatingWebhookConfiguration>(&store, &webhook, policy)
                    .await
            }
            WebhookKind::Validating => {
                set_failure_policy_command::<ValidatingWebhookConfiguration>(
                    &store, &webhook, policy,
                )
                .await
            }
        },
        Commands::Report {
            pass_config_maps,
            json,
        } => report_command(&store, &config.namespace, pass_config_maps, json).await,
    };

    if cli.metrics {
        print!("{}", metrics::gather_metrics()?);
    }
    outcome
}

async fn verify_command(store: KubeStore, config: TrustConfig) -> Result<()> {
    println!(
        "Verifying CA of secret '{}/{}' against '{}' and '{}'...",
        config.namespace,
        config.secret_name,
        config.mutating_configuration_name,
        config.validating_configuration_name
    );

    let verifier = TrustVerifier::new(store, config);
    verifier
        .verify_ready()
        .await
        .context("Webhook CA verification failed")?;

    println!("✅ All webhook entries carry the secret's CA");
    Ok(())
}

async fn find_command<C>(store: &KubeStore, webhook: &str) -> Result<()>
where
    C: AdmissionWebhookConfiguration,
    KubeStore: webhook_trust::store::ObjectReader<C>,
{
    let found = find_webhook::<C, _>(store, webhook)
        .await
        .with_context(|| format!("Failed to find webhook '{webhook}'"))?;

    println!("Webhook '{webhook}':");
    println!("  {}: {}", C::kind(&()), found.configuration.configuration_name());
    println!("  Index: {}", found.index);
    if let Some(entry) = found.entry() {
        println!(
            "  Failure Policy: {}",
            entry.failure_policy.unwrap_or("<default>")
        );
        if let Some(url) = entry.client_config.url.as_deref() {
            println!("  URL: {url}");
        }
        if let Some(service) = entry.client_config.service.as_ref() {
            println!("  Service: {}/{}", service.namespace, service.name);
        }
        let ca_bundle = entry
            .client_config
            .ca_bundle
            .as_ref()
            .map_or(&[][..], |bundle| bundle.0.as_slice());
        println!("  CA Bundle:\n{}", render_ca_bytes(ca_bundle));
    }
    Ok(())
}

async fn set_failure_policy_command<C>(
    store: &KubeStore,
    webhook: &str,
    policy: FailurePolicy,
) -> Result<()>
where
    C: AdmissionWebhookConfiguration,
    KubeStore: webhook_trust::store::ObjectReader<C> + webhook_trust::store::ObjectWriter<C>,
{
    let mut found = find_webhook::<C, _>(store, webhook)
        .await
        .with_context(|| format!("Failed to find webhook '{webhook}'"))?;

    if !found.configuration.set_failure_policy(found.index, policy) {
        anyhow::bail!("Webhook '{webhook}' disappeared from its configuration");
    }

    let updated = update_webhook_configuration(store, &found.configuration)
        .await
        .with_context(|| {
            format!(
                "Failed to update {} '{}'",
                C::kind(&()),
                found.configuration.configuration_name()
            )
        })?;

    println!(
        "✅ Failure policy of webhook '{}' in '{}' set to {}",
        webhook,
        updated.configuration_name(),
        policy
    );
    Ok(())
}

async fn report_command(
    store: &KubeStore,
    namespace: &str,
    pass_config_maps: bool,
    json: bool,
) -> Result<()> {
    let mut table = RedactionTable::default();
    if pass_config_maps {
        table = table.with_policy(ResourceKind::ConfigMap, RedactionPolicy::Pass);
    }

    let report = ReportCollector::new(store, table)
        .collect(namespace)
        .await
        .with_context(|| format!("Failed to collect diagnostic report for '{namespace}'"))?;

    let rendered = if json {
        serde_json::to_string_pretty(&report)? + "\n"
    } else {
        serde_yaml::to_string(&report)?
    };
    print!("{rendered}");
    Ok(())
}
