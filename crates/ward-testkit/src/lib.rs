//! Ward Testing Infrastructure
//!
//! Deterministic stand-ins for every collaborator the authorization core
//! consumes, plus real-key signing fixtures.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! ward-testkit = { path = "../ward-testkit" }
//! ```
//!
//! ```rust,no_run
//! use ward_testkit::*;
//!
//! let node = KeyTestFixture::from_seed(1);
//! let registry = MockRegistrySource::with_wallets(&[node.address()]);
//! let clock = ManualClock::new(1_700_000_000_000);
//! let signed = node.sign(&attestation("Qm1", 42, clock.now(), true));
//! ```

pub mod keys;
pub mod mocks;
pub mod time;

pub use keys::{attestation, KeyTestFixture};
pub use mocks::{MockBlacklistStore, MockRegistrySource};
pub use time::ManualClock;
