//! Multiplex resolution against an external registry.
//!
//! Broadcasters sometimes run a transport a few kHz off the table's nominal
//! center frequency. Probing the table's carrier offsets lets a previously
//! scanned transport be recognized even when it is rediscovered at a
//! slightly different frequency, instead of creating a duplicate multiplex
//! record.

use log::trace;

use crate::types::{MultiplexId, SourceId};

/// Lookup interface over the persisted multiplex registry.
///
/// The contract is an exact-frequency match against previously persisted
/// multiplex rows for the given source. Lookups are synchronous and may
/// block on I/O; implementations absorb their own failures (log and return
/// `None`) since a miss and a failed lookup are handled identically by
/// scan planning.
pub trait MultiplexRegistry {
    /// Return the multiplex id recorded for `(source_id, frequency)`, if any.
    fn multiplex_id(&self, source_id: SourceId, frequency: u64) -> Option<MultiplexId>;
}

/// A registry with no recorded multiplexes. Useful when planning a scan for
/// a source that has never been scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl MultiplexRegistry for EmptyRegistry {
    fn multiplex_id(&self, _source_id: SourceId, _frequency: u64) -> Option<MultiplexId> {
        None
    }
}

/// Resolve a transport to a known multiplex across its candidate
/// frequencies.
///
/// Candidates are probed strictly in iteration order (nominal first, then
/// the offset variants), one registry query per candidate, and the first
/// strictly positive id wins. Ids `<= 0` coming out of a registry are
/// treated as not-found.
pub fn resolve_multiplex<I>(
    registry: &dyn MultiplexRegistry,
    source_id: SourceId,
    candidates: I,
) -> Option<MultiplexId>
where
    I: IntoIterator<Item = u64>,
{
    for frequency in candidates {
        if let Some(id) = registry.multiplex_id(source_id, frequency) {
            if id > 0 {
                trace!("source {source_id}: {frequency} Hz resolves to multiplex {id}");
                return Some(id);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Registry stub that records every queried frequency and answers from a
    /// fixed list.
    struct RecordingRegistry {
        known: Vec<(u64, MultiplexId)>,
        queries: RefCell<Vec<u64>>,
    }

    impl RecordingRegistry {
        fn new(known: Vec<(u64, MultiplexId)>) -> Self {
            Self {
                known,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl MultiplexRegistry for RecordingRegistry {
        fn multiplex_id(&self, _source_id: SourceId, frequency: u64) -> Option<MultiplexId> {
            self.queries.borrow_mut().push(frequency);
            self.known
                .iter()
                .find(|(f, _)| *f == frequency)
                .map(|(_, id)| *id)
        }
    }

    #[test]
    fn test_resolve_unknown_transport() {
        let registry = RecordingRegistry::new(vec![]);
        assert_eq!(
            resolve_multiplex(&registry, 1, [474_000_000, 474_166_670, 473_833_330]),
            None
        );
        assert_eq!(
            *registry.queries.borrow(),
            vec![474_000_000, 474_166_670, 473_833_330]
        );
    }

    #[test]
    fn test_resolve_tries_offsets_in_order() {
        // Only the second offset variant is known; the nominal frequency and
        // first offset must still be probed first.
        let registry = RecordingRegistry::new(vec![(473_833_330, 7)]);
        assert_eq!(
            resolve_multiplex(&registry, 1, [474_000_000, 474_166_670, 473_833_330]),
            Some(7)
        );
        assert_eq!(
            *registry.queries.borrow(),
            vec![474_000_000, 474_166_670, 473_833_330]
        );
    }

    #[test]
    fn test_resolve_stops_at_first_hit() {
        let registry = RecordingRegistry::new(vec![(474_000_000, 3), (474_166_670, 4)]);
        assert_eq!(resolve_multiplex(&registry, 1, [474_000_000, 474_166_670]), Some(3));
        assert_eq!(*registry.queries.borrow(), vec![474_000_000]);
    }

    #[test]
    fn test_nonpositive_ids_are_not_found() {
        let registry = RecordingRegistry::new(vec![(474_000_000, 0), (474_166_670, -1)]);
        assert_eq!(
            resolve_multiplex(&registry, 1, [474_000_000, 474_166_670]),
            None
        );
    }

    #[test]
    fn test_empty_registry() {
        assert_eq!(resolve_multiplex(&EmptyRegistry, 9, [57_000_000]), None);
    }
}
