//! # pacbuilder core
//!
//! Builds proxy auto-configuration files for Zscaler ZIA disaster-recovery
//! mode: allow-listed domains go to a local proxy, everything else direct.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Allow-list parsing** - Normalize and validate a local domain list
//! - **Exclusion fetching** - Best-effort download of the remote DR list
//! - **Deduplication** - Drop domains the remote list already covers
//! - **Rendering** - Handlebars template to PAC script
//! - **Validation** - Structural checks plus an optional engine syntax check
//! - **Configuration** - TOML configuration for all of the above
//!
//! ## Example
//!
//! ```rust,no_run
//! use pacbuilder_core::{Config, Pipeline};
//!
//! let config = Config::load("pacbuilder.toml")?;
//! let report = Pipeline::from_config(&config)?.run()?;
//! println!("wrote {} domain(s)", report.published.len());
//! # Ok::<(), pacbuilder_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod allowlist;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod exclusion;
pub mod pipeline;
pub mod render;
pub mod validate;

// Re-exports for convenience
pub use allowlist::{AllowList, LineDiagnostic};
pub use config::Config;
pub use dedup::{deduplicate, Partition};
pub use domain::{Domain, DomainGrammar, Rejection};
pub use error::{Error, Result};
pub use exclusion::{ExclusionSet, ExclusionSource, HttpExclusionSource};
pub use pipeline::{BuildReport, Pipeline};
pub use render::{PacDocument, PacRenderer};
pub use validate::{Finding, NodeValidator, PacValidator, ScriptCheck, ScriptValidator, ValidationReport};
