//! Session-authenticated access to the vault's admin endpoint.
//!
//! # Architecture
//!
//! * [`AdminClient`] knows the vault URL and transport options but holds no
//!   credentials.
//! * [`AdminClient::login`] submits an [`AdminToken`] and returns an
//!   [`AdminSession`] on a 2xx response.
//! * [`AdminSession::apply_saml_config`] is only reachable through a session,
//!   so SAML settings cannot be sent before a successful login.
//!
//! No call is retried. Every operation returns a `Result`, so callers that
//! want retries can wrap the calls themselves.

mod client;
mod payload;
mod session;
mod token;
mod transport;

pub use client::AdminClient;
pub use payload::{OrganizationSpec, SamlSettings, SsoSettings};
pub use session::AdminSession;
pub use token::AdminToken;
pub use transport::{DEFAULT_TIMEOUT, TransportOptions};
