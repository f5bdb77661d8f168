//! # Iv3 Dataset Builder
//!
//! Builds the long-format dataset behind the begroting/jaarrekening
//! comparison dashboard from CBS Iv3 municipal finance extracts.
//!
//! ## Core Concepts
//!
//! - **Iv3 extract**: one CSV per (year, document) with raw budget lines
//!   keyed by the municipality names in use at record time
//! - **Pivot**: raw lines summed into Baten/Lasten/Saldo per
//!   (municipality, taakveld)
//! - **Taakveldgroepen**: ~18 policy-domain groups that fine-grained
//!   taakveld codes map onto by prefix
//! - **Herindeling**: municipal boundary reorganizations; historical
//!   predecessor municipalities are folded into their present-day
//!   successors with fractional allocation weights, so every year is
//!   comparable under current boundaries
//! - **Standen**: each value is reported as an absolute total and, where
//!   population data is available, per inhabitant
//! - **Rollups**: Nederland, per-province, per-size-class (and
//!   per-urbanisation) aggregate rows computed from summed totals and
//!   summed populations
//!
//! ## Example
//!
//! ```rust,ignore
//! use iv3_dataset_builder::{build_dataset, write_dataset, BuildConfig};
//!
//! let mut config = BuildConfig::new("iv3data", "gemeenteklassen.csv");
//! config.year_start = 2017;
//! config.year_end = 2024;
//!
//! let rows = build_dataset(&config)?;
//! write_dataset(&rows, "begroting_rekening.json".as_ref())?;
//! ```

pub mod aggregate;
pub mod assembler;
pub mod classifier;
pub mod error;
pub mod ingestion;
pub mod mergers;
pub mod pivot;
pub mod schema;

pub use aggregate::{add_aggregates, add_stands, ClassTable};
pub use assembler::{
    build_dataset, build_year_document, write_dataset, write_dataset_csv, BuildConfig,
};
pub use classifier::{is_balance_sheet_code, DomainGroup, TaakveldClassifier, DOMAIN_GROUPS};
pub use error::{DatasetError, Result};
pub use ingestion::{load_classes, load_iv3_file};
pub use mergers::{apply_merger_rules, apply_mergers, MergerRule, MunicipalitySeries, MERGER_RULES};
pub use pivot::pivot_records;
pub use schema::*;
