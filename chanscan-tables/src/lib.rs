//! Frequency tables and transport-scan planning for DVB-T and ATSC/QAM
//! tuner scanning.
//!
//! This crate drives the frequency side of a broadcast channel scan: it
//! ships the built-in catalog of country- and standard-specific tuning
//! ranges, derives per-channel candidate frequencies (including carrier
//! offset variants), and reconciles scanned transports against a persisted
//! multiplex registry so rescans do not duplicate records.
//!
//! Tuner I/O, signal-lock detection, and registry storage live elsewhere;
//! this crate only produces and interprets tuning-parameter data.
//!
//! # Catalog keys
//!
//! Tables are keyed `"{format}_{modulation}_{country}{index}"`, all
//! lowercase, with a non-padded decimal index starting at 0:
//!
//! ```rust
//! use chanscan_tables::builtin_catalog;
//!
//! let catalog = builtin_catalog();
//! assert!(catalog.lookup("atsc_vsb8_us0").is_some());
//!
//! let tables = catalog.matching_tables("atsc", "vsb8", "us");
//! assert_eq!(tables.len(), 4);
//! ```
//!
//! # Building a scan plan
//!
//! ```rust
//! use chanscan_tables::{build_scan_plan, builtin_catalog, EmptyRegistry, ScanStandard};
//!
//! let plan = build_scan_plan(
//!     builtin_catalog(),
//!     &EmptyRegistry,
//!     1,
//!     ScanStandard::Atsc,
//!     "qam256",
//!     "us",
//! );
//! assert!(!plan.is_empty());
//! assert!(plan.iter().all(|item| item.freq_offsets[0] == 0));
//! ```
//!
//! # DVB support
//!
//! OFDM parameter blocks and the DVB-T catalog entries sit behind the
//! default-on `dvb` cargo feature. Without it only the plain carrier shape
//! (frequency plus modulation) exists and ATSC/QAM scanning still works.

pub mod catalog;
pub mod error;
pub mod plan;
pub mod resolver;
pub mod scan_item;
pub mod tables;
pub mod types;

pub use catalog::{builtin_catalog, FrequencyTableCatalog};
pub use error::ParseError;
pub use plan::build_scan_plan;
pub use resolver::{resolve_multiplex, EmptyRegistry, MultiplexRegistry};
#[cfg(feature = "dvb")]
pub use scan_item::OfdmTuning;
pub use scan_item::{ScanTuning, TransportScanItem};
#[cfg(feature = "dvb")]
pub use tables::OfdmParams;
pub use tables::{FrequencyTable, TableVariant};
pub use types::{
    Modulation, MultiplexId, ScanStandard, SourceId, ATSC_TUNING_TIMEOUT, DVBT_TUNING_TIMEOUT,
};
#[cfg(feature = "dvb")]
pub use types::{Bandwidth, CodeRate, GuardInterval, Hierarchy, Inversion, TransmissionMode};
