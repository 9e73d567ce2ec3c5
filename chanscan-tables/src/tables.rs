//! Frequency table descriptors.
//!
//! A [`FrequencyTable`] describes one contiguous frequency-search range for
//! one broadcast standard/region/modulation combination: where the band
//! starts and ends, how far apart the channel centers sit, and which
//! modulation-specific parameters a tuner needs to probe each candidate.
//!
//! Standard-specific parameter layouts are a tagged variant
//! ([`TableVariant`]), not a class hierarchy: construction logic branches on
//! the tag explicitly, so a table can never be half-initialized.

use serde::{Deserialize, Serialize};

use crate::types::Modulation;
#[cfg(feature = "dvb")]
use crate::types::{Bandwidth, CodeRate, GuardInterval, Hierarchy, Inversion, TransmissionMode};

/// Immutable descriptor of one frequency-search range.
///
/// Frequencies are in Hz. Constructors do not validate ranges; the built-in
/// catalog entries are checked by tests, and callers supplying their own
/// tables are responsible for `base <= top` and a positive step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Display-name template with a `%1` placeholder for the channel number.
    /// Empty for tables whose transports are named by the scan driver.
    pub name_template: String,
    /// Channel number assigned to the transport at `base_frequency`.
    pub first_channel: u32,
    /// Center frequency of the first channel (Hz).
    pub base_frequency: u64,
    /// Center frequency of the last channel (Hz).
    pub top_frequency: u64,
    /// Distance between adjacent channel centers (Hz).
    pub frequency_step: u64,
    /// Carrier modulation shared by every channel in the range.
    pub modulation: Modulation,
    /// Standard-specific parameter block.
    pub variant: TableVariant,
}

/// Standard-specific parameters of a [`FrequencyTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableVariant {
    /// Plain carrier table (VSB/QAM): frequency and modulation say it all.
    Plain,
    /// OFDM (DVB-T) table with full frontend parameters.
    #[cfg(feature = "dvb")]
    Ofdm(OfdmParams),
}

/// OFDM frontend parameters of a DVB-T frequency table.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfdmParams {
    pub inversion: Inversion,
    pub bandwidth: Bandwidth,
    pub code_rate_hp: CodeRate,
    pub code_rate_lp: CodeRate,
    pub constellation: Modulation,
    pub transmission_mode: TransmissionMode,
    pub guard_interval: GuardInterval,
    pub hierarchy: Hierarchy,
    /// First carrier offset to probe, signed Hz. Zero when unused.
    pub offset1: i64,
    /// Second carrier offset to probe, signed Hz. Zero when unused.
    pub offset2: i64,
}

impl FrequencyTable {
    /// Create a plain carrier table (ATSC VSB or cable QAM).
    pub fn new(
        name_template: impl Into<String>,
        first_channel: u32,
        base_frequency: u64,
        top_frequency: u64,
        frequency_step: u64,
        modulation: Modulation,
    ) -> Self {
        Self {
            name_template: name_template.into(),
            first_channel,
            base_frequency,
            top_frequency,
            frequency_step,
            modulation,
            variant: TableVariant::Plain,
        }
    }

    /// Create an OFDM (DVB-T) table.
    ///
    /// DVB-T transports carry their own identity in-band, so these tables
    /// have no display-name template and number channels from zero.
    #[cfg(feature = "dvb")]
    pub fn ofdm(
        base_frequency: u64,
        top_frequency: u64,
        frequency_step: u64,
        params: OfdmParams,
    ) -> Self {
        Self {
            name_template: String::new(),
            first_channel: 0,
            base_frequency,
            top_frequency,
            frequency_step,
            modulation: Modulation::QamAuto,
            variant: TableVariant::Ofdm(params),
        }
    }

    /// Number of channel centers in the range, inclusive of both ends.
    pub fn channel_count(&self) -> u32 {
        ((self.top_frequency - self.base_frequency) / self.frequency_step) as u32 + 1
    }

    /// Iterate `(channel_number, center_frequency)` pairs in ascending order.
    pub fn channels(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        (0..self.channel_count())
            .map(move |i| (self.first_channel + i, self.base_frequency + u64::from(i) * self.frequency_step))
    }

    /// Expand the display-name template for one channel number.
    ///
    /// Returns an empty string when the table has no template.
    pub fn channel_name(&self, channel_number: u32) -> String {
        self.name_template.replace("%1", &channel_number.to_string())
    }

    /// Carrier offsets to probe around each nominal frequency.
    ///
    /// `(0, 0)` for plain tables and OFDM tables without offsets.
    pub fn offsets(&self) -> (i64, i64) {
        match &self.variant {
            TableVariant::Plain => (0, 0),
            #[cfg(feature = "dvb")]
            TableVariant::Ofdm(params) => (params.offset1, params.offset2),
        }
    }
}
