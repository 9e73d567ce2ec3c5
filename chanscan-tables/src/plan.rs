//! Scan-plan construction.
//!
//! Turns a `(standard, modulation, country)` selection into the ordered list
//! of transports a scan engine should tune: every channel of every matching
//! frequency table, each already checked against the multiplex registry.

use log::debug;

use crate::catalog::FrequencyTableCatalog;
use crate::resolver::MultiplexRegistry;
use crate::scan_item::TransportScanItem;
use crate::types::{ScanStandard, SourceId};

/// Build scan items for all catalog tables matching the selection.
///
/// Tables are visited in catalog index order and channels in ascending
/// frequency order, so the returned plan is deterministic. Tables without a
/// display-name template get `Transport {n}` names.
pub fn build_scan_plan(
    catalog: &FrequencyTableCatalog,
    registry: &dyn MultiplexRegistry,
    source_id: SourceId,
    standard: ScanStandard,
    modulation: &str,
    country: &str,
) -> Vec<TransportScanItem> {
    let tables = catalog.matching_tables(standard.table_format(), modulation, country);
    debug!(
        "building scan plan for source {source_id}: {}_{modulation}_{country}, {} table(s)",
        standard.table_format(),
        tables.len()
    );

    let mut plan = Vec::new();
    for table in tables {
        for (number, frequency) in table.channels() {
            let mut name = table.channel_name(number);
            if name.is_empty() {
                name = format!("Transport {number}");
            }
            plan.push(TransportScanItem::from_frequency_table(
                source_id, standard, name, number, frequency, table, registry,
            ));
        }
    }
    debug!("scan plan for source {source_id}: {} transport(s)", plan.len());
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::EmptyRegistry;
    use crate::types::{MultiplexId, ATSC_TUNING_TIMEOUT};

    #[test]
    fn test_us_vsb8_plan_covers_all_bands() {
        let catalog = FrequencyTableCatalog::builtin();
        let plan = build_scan_plan(&catalog, &EmptyRegistry, 1, ScanStandard::Atsc, "vsb8", "us");

        // 5 low-VHF + 7 high-VHF + 56 UHF + 14 high-UHF channels
        assert_eq!(plan.len(), 5 + 7 + 56 + 14);
        assert_eq!(plan[0].friendly_name, "ATSC Channel 2");
        assert_eq!(plan[0].friendly_num, 2);
        assert_eq!(plan[0].tuning.frequency(), 57_000_000);
        assert_eq!(plan[0].timeout_tune, ATSC_TUNING_TIMEOUT);
        assert!(plan.iter().all(|item| item.freq_offsets[0] == 0));
        assert!(plan.iter().all(|item| item.multiplex.is_none()));

        // Band boundaries follow the table order.
        assert_eq!(plan[4].tuning.frequency(), 81_000_000);
        assert_eq!(plan[5].tuning.frequency(), 177_000_000);
        assert_eq!(plan[5].friendly_num, 7);
        let last = plan.last().unwrap();
        assert_eq!(last.tuning.frequency(), 887_000_000);
        assert_eq!(last.friendly_num, 83);
    }

    #[test]
    fn test_unknown_country_yields_empty_plan() {
        let catalog = FrequencyTableCatalog::builtin();
        let plan = build_scan_plan(&catalog, &EmptyRegistry, 1, ScanStandard::Atsc, "vsb8", "zz");
        assert!(plan.is_empty());
    }

    #[cfg(feature = "dvb")]
    #[test]
    fn test_uk_dvbt_plan() {
        let catalog = FrequencyTableCatalog::builtin();
        let plan = build_scan_plan(&catalog, &EmptyRegistry, 2, ScanStandard::Dvb, "ofdm", "uk");
        assert_eq!(plan.len(), 48);
        assert_eq!(plan[0].friendly_name, "Transport 0");
        assert_eq!(plan[0].offset_count(), 3);
        assert_eq!(plan[47].tuning.frequency(), 850_000_000);
    }

    #[cfg(feature = "dvb")]
    #[test]
    fn test_plan_marks_already_known_transports() {
        struct OneKnown;
        impl MultiplexRegistry for OneKnown {
            fn multiplex_id(&self, _source_id: SourceId, frequency: u64) -> Option<MultiplexId> {
                // Known only at the first offset variant of 602 MHz.
                (frequency == 602_125_000).then_some(21)
            }
        }

        let catalog = FrequencyTableCatalog::builtin();
        let plan = build_scan_plan(&catalog, &OneKnown, 2, ScanStandard::Dvb, "ofdm", "de");
        let known: Vec<_> = plan.iter().filter(|item| item.multiplex.is_some()).collect();
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].multiplex, Some(21));
        assert_eq!(known[0].tuning.frequency(), 602_000_000);
    }
}
