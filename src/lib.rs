//! # Lottery API - Static JSON API Generator
//!
//! Converts tabular lottery draw history (CSV) into a static, file-based JSON
//! API that can be served from any static host:
//!
//! ```text
//! <output>/
//!     index.json          every draw: id, date, endpoint
//!     draws/
//!         <id>.json       one document per draw
//!         latest.json     copy of the last draw in source order
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use lottery_api::api::{self, GenerateOptions, IndexOptions};
//! use lottery_api::ingest::IngestOptions;
//! use lottery_api::mapping::MappingKind;
//! use std::path::Path;
//!
//! let draws = Path::new("v1/lotteries/federal/draws");
//! let report = api::convert_file(
//!     Path::new("federal.csv"),
//!     draws,
//!     MappingKind::Federal,
//!     &IngestOptions::default(),
//!     &GenerateOptions::default(),
//! )?;
//! println!("{}", report.summary());
//!
//! let options = IndexOptions {
//!     lottery: "federal".to_owned(),
//!     endpoint_template: "/v1/lotteries/{lottery}/draws/{id}".to_owned(),
//! };
//! api::write_index(draws, &options)?;
//! # Ok::<(), lottery_api::error::LotteryApiError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`ingest`]: CSV reading with delimiter sniffing
//! - [`header`]: tolerant header lookup (accents, bold markup, ranked prizes)
//! - [`normalize`]: money, date and integer cleanup
//! - [`mapping`]: row-to-record strategies (`default`, `federal`)
//! - [`api`]: materialization of documents, `latest.json` and `index.json`
//! - [`upstream`]: conversion of the operator's "latest result" document
//! - [`config`] / [`logging`]: ambient setup for the binary
//! - [`error`]: error types and handling utilities
//!
//! ## Phases
//!
//! Generation and indexing are independent. The index is rebuilt from the
//! documents on disk, so it can be regenerated after a single-draw update
//! without re-reading the CSV.

#![warn(clippy::all, rust_2018_idioms)]

pub mod api;
pub mod config;
pub mod error;
pub mod header;
pub mod ingest;
pub mod logging;
pub mod mapping;
pub mod normalize;
pub mod record;
pub mod upstream;
