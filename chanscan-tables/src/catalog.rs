//! The built-in frequency table catalog.
//!
//! One entry per `(format, modulation, country, index)` tuple, keyed as
//! `"{format}_{modulation}_{country}{index}"` with a non-padded decimal
//! index starting at 0. The catalog is populated once from the fixed data
//! set below and is immutable afterwards; downstream scan correctness
//! depends on these exact base/top/step values.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;

use crate::tables::FrequencyTable;
#[cfg(feature = "dvb")]
use crate::tables::OfdmParams;
use crate::types::Modulation;
#[cfg(feature = "dvb")]
use crate::types::{Bandwidth, CodeRate, GuardInterval, Hierarchy, Inversion, TransmissionMode};

/// Keyed collection of [`FrequencyTable`] entries.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTableCatalog {
    tables: HashMap<String, FrequencyTable>,
}

impl FrequencyTableCatalog {
    /// Create an empty catalog. Mainly useful for tests and callers that
    /// ship their own table sets; production code wants [`builtin_catalog`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table under a composite key.
    pub fn insert(&mut self, key: impl Into<String>, table: FrequencyTable) {
        self.tables.insert(key.into(), table);
    }

    /// Exact-key lookup. `None` simply means "no such table".
    pub fn lookup(&self, key: &str) -> Option<&FrequencyTable> {
        self.tables.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Collect the tables matching a `(format, modulation, country)` prefix,
    /// in index order.
    ///
    /// Indices are probed monotonically from 0 and enumeration stops at the
    /// first missing index, so a hole at index `i` masks all higher indices
    /// for that prefix. The built-in data set has no holes.
    pub fn matching_tables(
        &self,
        format: &str,
        modulation: &str,
        country: &str,
    ) -> Vec<&FrequencyTable> {
        let mut list = Vec::new();
        for index in 0.. {
            let key = format!("{format}_{modulation}_{country}{index}");
            match self.tables.get(&key) {
                Some(table) => list.push(table),
                None => break,
            }
        }
        list
    }

    /// Build the fixed catalog of DVB-T and ATSC/QAM search ranges.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.populate_builtin();
        debug!("frequency table catalog populated, {} entries", catalog.len());
        catalog
    }

    fn populate_builtin(&mut self) {
        #[cfg(feature = "dvb")]
        self.populate_dvbt();

        // USA terrestrial (center frequencies; subtract 1.75 MHz for the
        // visual carrier)
        self.insert(
            "atsc_vsb8_us0",
            FrequencyTable::new("ATSC Channel %1", 2, 57_000_000, 81_000_000, 6_000_000, Modulation::Vsb8),
        ); // VHF 2-6
        self.insert(
            "atsc_vsb8_us1",
            FrequencyTable::new("ATSC Channel %1", 7, 177_000_000, 213_000_000, 6_000_000, Modulation::Vsb8),
        ); // VHF 7-13
        self.insert(
            "atsc_vsb8_us2",
            FrequencyTable::new("ATSC Channel %1", 14, 473_000_000, 803_000_000, 6_000_000, Modulation::Vsb8),
        ); // UHF 14-69
        self.insert(
            "atsc_vsb8_us3",
            FrequencyTable::new("ATSC Channel %1", 70, 809_000_000, 887_000_000, 6_000_000, Modulation::Vsb8),
        ); // UHF 70-83

        // USA cable, QAM-256
        self.insert(
            "atsc_qam256_us0",
            FrequencyTable::new("QAM-256 Channel %1", 1, 75_000_000, 801_000_000, 6_000_000, Modulation::Qam256),
        );
        self.insert(
            "atsc_qam256_us1",
            FrequencyTable::new("QAM-256 Channel T-%1", 7, 10_000_000, 52_000_000, 6_000_000, Modulation::Qam256),
        );

        // USA cable, QAM-128
        self.insert(
            "atsc_qam128_us0",
            FrequencyTable::new("QAM-128 Channel %1", 1, 75_000_000, 801_000_000, 6_000_000, Modulation::Qam128),
        );
        self.insert(
            "atsc_qam128_us1",
            FrequencyTable::new("QAM-128 Channel T-%1", 7, 10_000_000, 52_000_000, 6_000_000, Modulation::Qam128),
        );

        // USA cable, QAM-64
        self.insert(
            "atsc_qam64_us0",
            FrequencyTable::new("QAM-64 Channel %1", 1, 75_000_000, 801_000_000, 6_000_000, Modulation::Qam64),
        );
        self.insert(
            "atsc_qam64_us1",
            FrequencyTable::new("QAM-64 Channel T-%1", 7, 10_000_000, 52_000_000, 6_000_000, Modulation::Qam64),
        );
    }

    #[cfg(feature = "dvb")]
    fn populate_dvbt(&mut self) {
        // United Kingdom
        self.insert(
            "dvbt_ofdm_uk0",
            FrequencyTable::ofdm(
                474_000_000,
                850_000_000,
                8_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz8,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::QamAuto,
                    transmission_mode: TransmissionMode::Mode2k,
                    guard_interval: GuardInterval::Interval1_32,
                    hierarchy: Hierarchy::None,
                    offset1: 166_670,
                    offset2: -166_670,
                },
            ),
        );

        // Finland
        self.insert(
            "dvbt_ofdm_fi0",
            FrequencyTable::ofdm(
                474_000_000,
                850_000_000,
                8_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz8,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::Qam64,
                    transmission_mode: TransmissionMode::Auto,
                    guard_interval: GuardInterval::Auto,
                    hierarchy: Hierarchy::None,
                    offset1: 0,
                    offset2: 0,
                },
            ),
        );

        // Sweden
        self.insert(
            "dvbt_ofdm_se0",
            FrequencyTable::ofdm(
                474_000_000,
                850_000_000,
                8_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz8,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::Qam64,
                    transmission_mode: TransmissionMode::Auto,
                    guard_interval: GuardInterval::Auto,
                    hierarchy: Hierarchy::None,
                    offset1: 0,
                    offset2: 0,
                },
            ),
        );

        // Australia
        self.insert(
            "dvbt_ofdm_au0",
            FrequencyTable::ofdm(
                177_500_000,
                226_500_000,
                7_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz7,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::Qam64,
                    transmission_mode: TransmissionMode::Mode8k,
                    guard_interval: GuardInterval::Auto,
                    hierarchy: Hierarchy::None,
                    offset1: 125_000,
                    offset2: 0,
                },
            ),
        ); // VHF 6-12
        self.insert(
            "dvbt_ofdm_au1",
            FrequencyTable::ofdm(
                529_500_000,
                816_500_000,
                7_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz7,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::Qam64,
                    transmission_mode: TransmissionMode::Mode8k,
                    guard_interval: GuardInterval::Auto,
                    hierarchy: Hierarchy::None,
                    offset1: 125_000,
                    offset2: 0,
                },
            ),
        ); // UHF 28-69

        // Germany
        self.insert(
            "dvbt_ofdm_de0",
            FrequencyTable::ofdm(
                177_500_000,
                226_500_000,
                7_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz7,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::QamAuto,
                    transmission_mode: TransmissionMode::Mode8k,
                    guard_interval: GuardInterval::Auto,
                    hierarchy: Hierarchy::None,
                    offset1: 125_000,
                    offset2: 0,
                },
            ),
        ); // VHF 6-12
        self.insert(
            "dvbt_ofdm_de1",
            FrequencyTable::ofdm(
                474_000_000,
                826_000_000,
                8_000_000,
                OfdmParams {
                    inversion: Inversion::Off,
                    bandwidth: Bandwidth::Mhz8,
                    code_rate_hp: CodeRate::Auto,
                    code_rate_lp: CodeRate::Auto,
                    constellation: Modulation::QamAuto,
                    transmission_mode: TransmissionMode::Auto,
                    guard_interval: GuardInterval::Auto,
                    hierarchy: Hierarchy::None,
                    offset1: 125_000,
                    offset2: 0,
                },
            ),
        ); // UHF 21-65
    }
}

/// Process-wide built-in catalog, populated exactly once on first use.
///
/// Concurrent first callers block until the single population pass finishes
/// and then share the same immutable reference.
pub fn builtin_catalog() -> &'static FrequencyTableCatalog {
    static CATALOG: Lazy<FrequencyTableCatalog> = Lazy::new(FrequencyTableCatalog::builtin);
    &CATALOG
}
