//! Durable storage for the enterprise configuration document.
//!
//! The document is the only artifact this crate persists. A reader must never
//! see a half-written file, so writes go through two phases:
//!
//! 1. **stage**: serialize into a temporary file in the target's directory and
//!    fsync it;
//! 2. **commit**: rename the temporary file over the target.
//!
//! If the process dies between the two phases, the previous document (or no
//! document) is still in place. Write failures are reported as
//! [`PersistenceError`](crate::error::PersistenceError) and are not retried;
//! the caller still owns the in-memory document and may try again.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use vault_sso_config::storage::DocumentStore;
//! # use vault_sso_config::model::EnterpriseConfigDocument;
//!
//! # fn example(document: &EnterpriseConfigDocument) -> Result<(), Box<dyn std::error::Error>> {
//! let store = DocumentStore::new("/etc/vault/enterprise-config.json");
//! store.write(document)?;
//!
//! let reloaded = store.load()?;
//! assert_eq!(&reloaded, document);
//! # Ok(())
//! # }
//! ```

mod file;

pub use file::{DocumentStore, StagedDocument};
