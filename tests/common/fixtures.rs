//! Fixtures for building configuration inputs.

use url::Url;
use vault_sso_config::admin::{AdminClient, AdminToken, TransportOptions};
use vault_sso_config::assembler::{AssemblerOptions, ConfigAssembler};
use vault_sso_config::model::IdentityProviderConfig;

pub const TENANT_ID: &str = "11111111-2222-3333-4444-555555555555";
pub const APPLICATION_ID: &str = "66666666-7777-8888-9999-000000000000";

pub fn vault_url() -> Url {
    Url::parse("https://vault.example.com").unwrap()
}

pub fn identity_provider(base: &Url) -> IdentityProviderConfig {
    IdentityProviderConfig::azure_ad(TENANT_ID, APPLICATION_ID, base).unwrap()
}

pub fn assembler(base: &Url) -> ConfigAssembler {
    ConfigAssembler::new(AssemblerOptions::new(base.clone())).unwrap()
}

/// Client against a plain-HTTP mock with a short timeout.
pub fn admin_client(base: &Url) -> AdminClient {
    AdminClient::new(
        base.clone(),
        TransportOptions::default().timeout(std::time::Duration::from_secs(5)),
    )
    .unwrap()
}

pub fn token(value: &str) -> AdminToken {
    AdminToken::new(value).unwrap()
}
