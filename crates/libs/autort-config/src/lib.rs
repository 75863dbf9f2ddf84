//! Configuration for the autort service.
//!
//! Three layers feed the resolved [`settings::Settings`]:
//!
//! 1. command line overrides,
//! 2. the TOML configuration file ([`config::UserConfig`]),
//! 3. built-in per-machine defaults ([`machine`]).
//!
//! `machine` and `account` are mandatory once all three layers are merged;
//! everything else stays optional until the workflow that needs it runs.

pub mod config;
pub mod error;
pub mod machine;
pub mod prelude;
pub mod settings;
