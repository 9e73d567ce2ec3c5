//! Per-transport scan records.
//!
//! A [`TransportScanItem`] is the mutable tuning-request/result record for
//! one candidate transport during a channel scan. It is built either around
//! an already-known multiplex or from a frequency-table entry; in the latter
//! case it derives its own offset-adjusted candidate frequencies and asks
//! the registry up front whether the transport is already known.
//!
//! Each item is owned exclusively by the scan plan or scan engine that
//! created it; the engine flips the `scanning`/`complete` flags and stores
//! the resolved multiplex id as the scan proceeds.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tables::FrequencyTable;
#[cfg(feature = "dvb")]
use crate::tables::{OfdmParams, TableVariant};
use crate::resolver::{resolve_multiplex, MultiplexRegistry};
use crate::types::{
    Modulation, MultiplexId, ScanStandard, SourceId, ATSC_TUNING_TIMEOUT, DVBT_TUNING_TIMEOUT,
};
#[cfg(feature = "dvb")]
use crate::types::{
    Bandwidth, CodeRate, GuardInterval, Hierarchy, Inversion, TransmissionMode,
};

/// Tuning parameters of a scan item.
///
/// Two concrete shapes share the candidate-frequency query: the plain
/// carrier shape (VSB/QAM, or any build without DVB support) and the full
/// OFDM parameter block for DVB-T.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanTuning {
    /// Center frequency plus modulation; enough for VSB and QAM frontends.
    Carrier { frequency: u64, modulation: Modulation },
    /// Full OFDM frontend parameters for a DVB-T transport.
    #[cfg(feature = "dvb")]
    Ofdm(OfdmTuning),
}

impl ScanTuning {
    /// Nominal center frequency in Hz.
    pub fn frequency(&self) -> u64 {
        match self {
            ScanTuning::Carrier { frequency, .. } => *frequency,
            #[cfg(feature = "dvb")]
            ScanTuning::Ofdm(tuning) => tuning.frequency,
        }
    }
}

/// OFDM tuning parameters resolved from a frequency table entry.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfdmTuning {
    pub frequency: u64,
    pub inversion: Inversion,
    pub bandwidth: Bandwidth,
    pub code_rate_hp: CodeRate,
    pub code_rate_lp: CodeRate,
    pub constellation: Modulation,
    pub transmission_mode: TransmissionMode,
    pub guard_interval: GuardInterval,
    pub hierarchy: Hierarchy,
}

#[cfg(feature = "dvb")]
impl OfdmTuning {
    fn from_params(frequency: u64, params: &OfdmParams) -> Self {
        Self {
            frequency,
            inversion: params.inversion,
            bandwidth: params.bandwidth,
            code_rate_hp: params.code_rate_hp,
            code_rate_lp: params.code_rate_lp,
            constellation: params.constellation,
            transmission_mode: params.transmission_mode,
            guard_interval: params.guard_interval,
            hierarchy: params.hierarchy,
        }
    }
}

/// Tuning-request/result record for one candidate transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportScanItem {
    /// Resolved multiplex id, once the transport is known to the registry.
    pub multiplex: Option<MultiplexId>,
    /// Broadcast standard family.
    pub standard: ScanStandard,
    /// Human-readable transport name.
    pub friendly_name: String,
    /// Numeric suffix of the name (channel number on the scan-plan path).
    pub friendly_num: u32,
    /// Video source this scan belongs to.
    pub source_id: SourceId,
    /// Whether the scan engine should drive this item off a timer.
    pub use_timer: bool,
    /// Set by the scan engine while the transport is being tuned.
    pub scanning: bool,
    /// Set by the scan engine once the transport has been handled.
    pub complete: bool,
    /// How long the engine may wait for a frontend lock.
    pub timeout_tune: Duration,
    /// Standard-specific tuning parameters.
    pub tuning: ScanTuning,
    /// Signed carrier offsets in Hz. Index 0 is always 0 (the nominal
    /// frequency itself); indices 1 and 2 come from the table variant.
    pub freq_offsets: [i64; 3],
}

impl Default for TransportScanItem {
    fn default() -> Self {
        Self {
            multiplex: None,
            standard: ScanStandard::Dvb,
            friendly_name: String::new(),
            friendly_num: 0,
            source_id: 0,
            use_timer: false,
            scanning: false,
            complete: false,
            timeout_tune: ATSC_TUNING_TIMEOUT,
            tuning: ScanTuning::Carrier {
                frequency: 0,
                modulation: Modulation::QamAuto,
            },
            freq_offsets: [0; 3],
        }
    }
}

impl TransportScanItem {
    /// Wrap an already-known multiplex; no frequency search is performed.
    pub fn known_multiplex(
        source_id: SourceId,
        multiplex: MultiplexId,
        friendly_name: impl Into<String>,
    ) -> Self {
        Self {
            multiplex: Some(multiplex),
            friendly_name: friendly_name.into(),
            source_id,
            ..Self::default()
        }
    }

    /// Build a scan item for one candidate channel of a frequency table.
    ///
    /// Copies the standard-specific fields from the table (the OFDM block
    /// when the standard is DVB and the table carries one), selects the
    /// tuning timeout by standard, populates the offset variants, and
    /// immediately asks the registry whether any candidate frequency already
    /// maps to a persisted multiplex.
    pub fn from_frequency_table(
        source_id: SourceId,
        standard: ScanStandard,
        friendly_name: impl Into<String>,
        channel_number: u32,
        frequency: u64,
        table: &FrequencyTable,
        registry: &dyn MultiplexRegistry,
    ) -> Self {
        let mut item = Self {
            standard,
            friendly_name: friendly_name.into(),
            friendly_num: channel_number,
            source_id,
            timeout_tune: match standard {
                ScanStandard::Dvb => DVBT_TUNING_TIMEOUT,
                _ => ATSC_TUNING_TIMEOUT,
            },
            ..Self::default()
        };

        match &table.variant {
            #[cfg(feature = "dvb")]
            TableVariant::Ofdm(params) if standard == ScanStandard::Dvb => {
                item.freq_offsets[1] = params.offset1;
                item.freq_offsets[2] = params.offset2;
                item.tuning = ScanTuning::Ofdm(OfdmTuning::from_params(frequency, params));
            }
            _ => {
                item.tuning = ScanTuning::Carrier {
                    frequency,
                    modulation: table.modulation,
                };
            }
        }

        let multiplex = resolve_multiplex(registry, source_id, item.candidate_frequencies());
        item.multiplex = multiplex;
        item
    }

    /// Number of candidate frequencies to probe: 1 unless the table supplied
    /// a non-zero offset variant, in which case all 3 slots are in play.
    pub fn offset_count(&self) -> usize {
        if self.freq_offsets[1] != 0 || self.freq_offsets[2] != 0 {
            3
        } else {
            1
        }
    }

    /// Offset-adjusted frequency for slot `i`, clamped at 0 Hz.
    pub fn frequency_at(&self, i: usize) -> u64 {
        let frequency = self.tuning.frequency() as i64 + self.freq_offsets[i];
        frequency.max(0) as u64
    }

    /// Candidate frequencies in priority order: nominal first, then the
    /// offset variants.
    pub fn candidate_frequencies(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.offset_count()).map(move |i| self.frequency_at(i))
    }
}

impl fmt::Display for TransportScanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Transport Scan Item '{}' #{}",
            self.friendly_name, self.friendly_num
        )?;
        match self.multiplex {
            Some(id) => writeln!(
                f,
                "\tmultiplex({id}) standard({}) source({})",
                self.standard, self.source_id
            )?,
            None => writeln!(
                f,
                "\tmultiplex(none) standard({}) source({})",
                self.standard, self.source_id
            )?,
        }
        writeln!(
            f,
            "\tuse_timer({}) scanning({}) complete({})",
            self.use_timer, self.scanning, self.complete
        )?;
        writeln!(f, "\ttimeout_tune({} ms)", self.timeout_tune.as_millis())?;
        match &self.tuning {
            ScanTuning::Carrier { frequency, modulation } => {
                writeln!(f, "\tfrequency({frequency}) modulation({modulation})")?;
            }
            #[cfg(feature = "dvb")]
            ScanTuning::Ofdm(t) => {
                writeln!(
                    f,
                    "\tfrequency({}) constellation({})",
                    t.frequency, t.constellation
                )?;
                writeln!(
                    f,
                    "\t  inversion({:?}) bandwidth({:?}) code_rate_hp({:?}) code_rate_lp({:?})",
                    t.inversion, t.bandwidth, t.code_rate_hp, t.code_rate_lp
                )?;
                writeln!(
                    f,
                    "\t  transmission_mode({:?}) guard_interval({:?}) hierarchy({:?})",
                    t.transmission_mode, t.guard_interval, t.hierarchy
                )?;
            }
        }
        writeln!(
            f,
            "\toffsets({}, {}, {})",
            self.freq_offsets[0], self.freq_offsets[1], self.freq_offsets[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FrequencyTableCatalog;
    use crate::resolver::EmptyRegistry;
    use crate::types::MultiplexId;

    struct FixedRegistry {
        frequency: u64,
        id: MultiplexId,
    }

    impl MultiplexRegistry for FixedRegistry {
        fn multiplex_id(&self, _source_id: SourceId, frequency: u64) -> Option<MultiplexId> {
            (frequency == self.frequency).then_some(self.id)
        }
    }

    fn us_vhf_item(registry: &dyn MultiplexRegistry) -> TransportScanItem {
        let catalog = FrequencyTableCatalog::builtin();
        let table = catalog.lookup("atsc_vsb8_us0").unwrap();
        TransportScanItem::from_frequency_table(
            1,
            ScanStandard::Atsc,
            table.channel_name(2),
            2,
            57_000_000,
            table,
            registry,
        )
    }

    #[test]
    fn test_default_is_unresolved_dvb_placeholder() {
        let item = TransportScanItem::default();
        assert_eq!(item.multiplex, None);
        assert_eq!(item.standard, ScanStandard::Dvb);
        assert_eq!(item.timeout_tune, ATSC_TUNING_TIMEOUT);
        assert_eq!(item.freq_offsets, [0, 0, 0]);
        assert_eq!(item.offset_count(), 1);
        assert!(!item.use_timer && !item.scanning && !item.complete);
    }

    #[test]
    fn test_known_multiplex_constructor() {
        let item = TransportScanItem::known_multiplex(3, 42, "Known mux");
        assert_eq!(item.multiplex, Some(42));
        assert_eq!(item.source_id, 3);
        assert_eq!(item.standard, ScanStandard::Dvb);
        assert_eq!(item.friendly_name, "Known mux");
        assert_eq!(item.offset_count(), 1);
    }

    #[test]
    fn test_atsc_item_uses_atsc_timeout_and_single_offset() {
        let item = us_vhf_item(&EmptyRegistry);
        assert_eq!(item.timeout_tune, ATSC_TUNING_TIMEOUT);
        assert_eq!(item.freq_offsets[0], 0);
        assert_eq!(item.offset_count(), 1);
        assert_eq!(
            item.candidate_frequencies().collect::<Vec<_>>(),
            vec![57_000_000]
        );
        assert_eq!(item.multiplex, None);
        match item.tuning {
            ScanTuning::Carrier { frequency, modulation } => {
                assert_eq!(frequency, 57_000_000);
                assert_eq!(modulation, Modulation::Vsb8);
            }
            #[cfg(feature = "dvb")]
            ScanTuning::Ofdm(_) => panic!("VSB table must not yield OFDM tuning"),
        }
    }

    #[test]
    fn test_construction_resolves_known_multiplex() {
        let registry = FixedRegistry {
            frequency: 57_000_000,
            id: 11,
        };
        let item = us_vhf_item(&registry);
        assert_eq!(item.multiplex, Some(11));
    }

    #[cfg(feature = "dvb")]
    #[test]
    fn test_dvb_item_copies_ofdm_fields_and_offsets() {
        let catalog = FrequencyTableCatalog::builtin();
        let table = catalog.lookup("dvbt_ofdm_uk0").unwrap();
        let item = TransportScanItem::from_frequency_table(
            1,
            ScanStandard::Dvb,
            "Transport 0",
            0,
            474_000_000,
            table,
            &EmptyRegistry,
        );
        assert_eq!(item.timeout_tune, DVBT_TUNING_TIMEOUT);
        assert_eq!(item.freq_offsets, [0, 166_670, -166_670]);
        assert_eq!(item.offset_count(), 3);
        assert_eq!(
            item.candidate_frequencies().collect::<Vec<_>>(),
            vec![474_000_000, 474_166_670, 473_833_330]
        );
        match &item.tuning {
            ScanTuning::Ofdm(t) => {
                assert_eq!(t.frequency, 474_000_000);
                assert_eq!(t.bandwidth, Bandwidth::Mhz8);
                assert_eq!(t.transmission_mode, TransmissionMode::Mode2k);
                assert_eq!(t.guard_interval, GuardInterval::Interval1_32);
            }
            ScanTuning::Carrier { .. } => panic!("OFDM table must yield OFDM tuning"),
        }
    }

    #[cfg(feature = "dvb")]
    #[test]
    fn test_atsc_standard_ignores_ofdm_variant() {
        // An OFDM table scanned under a non-DVB standard falls back to the
        // plain carrier shape.
        let catalog = FrequencyTableCatalog::builtin();
        let table = catalog.lookup("dvbt_ofdm_uk0").unwrap();
        let item = TransportScanItem::from_frequency_table(
            1,
            ScanStandard::Atsc,
            "odd pairing",
            0,
            474_000_000,
            table,
            &EmptyRegistry,
        );
        assert!(matches!(item.tuning, ScanTuning::Carrier { .. }));
        assert_eq!(item.offset_count(), 1);
        assert_eq!(item.timeout_tune, ATSC_TUNING_TIMEOUT);
    }

    #[cfg(feature = "dvb")]
    #[test]
    fn test_dvb_resolution_probes_offset_variants() {
        // Registry only recognizes the transport at nominal + offset2.
        let registry = FixedRegistry {
            frequency: 473_833_330,
            id: 9,
        };
        let catalog = FrequencyTableCatalog::builtin();
        let table = catalog.lookup("dvbt_ofdm_uk0").unwrap();
        let item = TransportScanItem::from_frequency_table(
            1,
            ScanStandard::Dvb,
            "Transport 0",
            0,
            474_000_000,
            table,
            &registry,
        );
        assert_eq!(item.multiplex, Some(9));
    }

    #[test]
    fn test_display_dump_lists_every_field() {
        let mut item = us_vhf_item(&EmptyRegistry);
        item.multiplex = Some(5);
        item.use_timer = true;
        let dump = item.to_string();
        assert!(dump.contains("'ATSC Channel 2' #2"));
        assert!(dump.contains("multiplex(5)"));
        assert!(dump.contains("standard(atsc)"));
        assert!(dump.contains("source(1)"));
        assert!(dump.contains("use_timer(true)"));
        assert!(dump.contains("scanning(false)"));
        assert!(dump.contains("complete(false)"));
        assert!(dump.contains("timeout_tune(10000 ms)"));
        assert!(dump.contains("frequency(57000000)"));
        assert!(dump.contains("modulation(vsb8)"));
        assert!(dump.contains("offsets(0, 0, 0)"));
    }

    #[test]
    fn test_tuning_state_serializes() {
        let item = us_vhf_item(&EmptyRegistry);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["standard"], "Atsc");
        assert_eq!(value["friendly_num"], 2);
        assert_eq!(value["freq_offsets"][0], 0);
        let restored: TransportScanItem = serde_json::from_value(value).unwrap();
        assert_eq!(restored, item);
    }
}
