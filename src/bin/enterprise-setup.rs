//! # Enterprise Setup
//!
//! Applies the identity provider's SAML settings to the vault and writes the
//! enterprise configuration document.
//!
//! ## Usage
//!
//! ```bash
//! VAULT_ADMIN_TOKEN=... enterprise-setup --config integration.toml
//! enterprise-setup --config integration.toml --skip-saml --output out.json
//! ```
//!
//! Without `--config`, every required setting must come from the
//! environment. Set `RUST_LOG=debug` for request-level detail.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use vault_sso_config::{EnterpriseSetup, IntegrationError, IntegrationSettings, ValidationError};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "enterprise-setup")]
#[command(about = "Configure SAML SSO and SCIM provisioning for a self-hosted vault")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the configuration document
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Assemble and persist without contacting the admin endpoint
    #[arg(long)]
    skip_saml: bool,

    /// Accept invalid TLS certificates from the vault
    #[arg(long)]
    insecure: bool,

    /// Timeout for each admin request, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("❌ Enterprise setup failed: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), IntegrationError> {
    let mut settings = match &args.config {
        Some(path) => IntegrationSettings::from_file(path)?,
        None => IntegrationSettings::from_env(|key| std::env::var(key).ok())?,
    };
    if let Some(output) = args.output {
        settings.output_path = output;
    }
    if args.insecure {
        settings.transport = settings.transport.accept_invalid_certs(true);
    }
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            return Err(ValidationError::InvalidTimeout { secs }.into());
        }
        settings.transport = settings.transport.timeout(Duration::from_secs(secs));
    }

    let mut setup = EnterpriseSetup::from_settings(&settings)?.skip_saml(args.skip_saml);
    let report = setup.configure().await?;

    if let Err(e) = setup.persist(&report.document) {
        // Keep the document recoverable when the write fails.
        if let Ok(json) = serde_json::to_string_pretty(&report.document) {
            println!("{}", json);
        }
        return Err(e.into());
    }

    let summary = &report.summary;
    println!("✓ Enterprise configuration written to {}", setup.output_path().display());
    println!("  SCIM endpoint: {}", summary.scim_endpoint);
    println!(
        "  Provisioning features: {}",
        summary.provisioning_features.join(", ")
    );
    println!(
        "  Monitoring: {}",
        summary
            .enabled_monitoring
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Tenant: {}", summary.tenant_id);
    println!("  SSO URL: {}", summary.sso_url);
    println!(
        "  SAML settings applied: {}",
        if report.saml_applied { "yes" } else { "no" }
    );
    Ok(())
}
