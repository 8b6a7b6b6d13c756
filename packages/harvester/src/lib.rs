//! Volby Harvester - Download Czech presidential election results from volby.cz.
//!
//! This crate fetches one XML result document per region, decodes it into
//! vote tallies per candidate, and derives totals, percentages and
//! name-keyed views for display.
//!
//! # Example
//!
//! ```
//! use volby_harvester::{build_view, decode, CandidateRegistry};
//!
//! let xml = r#"<VYSLEDKY_KRAJ xmlns="http://www.volby.cz/prezident/">
//!   <KRAJ NUTS_KRAJ="CZ010" NAZ_KRAJ="Hlavní město Praha">
//!     <CELKEM>
//!       <HODN_KAND PORADOVE_CISLO="4" HLASY="300"/>
//!       <HODN_KAND PORADOVE_CISLO="7" HLASY="100"/>
//!     </CELKEM>
//!   </KRAJ>
//! </VYSLEDKY_KRAJ>"#;
//!
//! let record = decode(xml).unwrap();
//! assert_eq!(record.total_votes(), 400);
//!
//! let view = build_view(&record, &CandidateRegistry::presidential_2023_runoff(), true).unwrap();
//! assert_eq!(view.get("Pavel"), Some(75.0));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, validation and [`HarvestConfig`]
//! - [`types`]: Core data types (ResultRecord, CandidateRegistry, DisplayView)
//! - [`error`]: Error types and Result alias
//! - [`http`]: Transport trait and the reqwest-backed implementation
//! - [`retry`]: Retry policy and backoff
//! - [`fetch`]: Region fetcher with bounded retries
//! - [`xml`]: XML utilities
//! - [`decode`]: Result document decoding
//! - [`aggregate`]: Totals and percentages
//! - [`view`]: Display views in registry order
//! - [`pipeline`]: Sequential fetch/decode driver
//! - [`report`]: Text, JSON and YAML rendering
//! - [`cli`]: Command-line interface

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod http;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod types;
pub mod view;
pub mod xml;

// Re-export main functions
pub use decode::{decode, decode_many};
pub use pipeline::{AttemptHook, Pipeline, ResultSink};
pub use view::build_view;

// Re-export commonly used items
pub use config::{validate_region_code, HarvestConfig};
pub use error::{HarvesterError, Result};
pub use fetch::RegionFetcher;
pub use retry::{Backoff, RetryOutcome, RetryPolicy};
pub use types::{CandidateRegistry, DisplayView, ResultRecord};
