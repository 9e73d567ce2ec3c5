//! Broadcast standard and modulation type definitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Identifier of a video source (capture card input) as assigned by the caller.
pub type SourceId = u32;

/// Identifier of a persisted multiplex row. Only strictly positive values
/// refer to an existing multiplex.
pub type MultiplexId = i64;

/// Per-transport tuning timeout for DVB-T scans.
///
/// OFDM frontends report lock quickly, so a scan can move on early.
pub const DVBT_TUNING_TIMEOUT: Duration = Duration::from_millis(3_000);

/// Per-transport tuning timeout for ATSC/QAM scans.
///
/// VSB and QAM demodulators take noticeably longer to acquire lock than
/// OFDM ones, hence the larger budget.
pub const ATSC_TUNING_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Broadcast standard family a scan item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStandard {
    /// DVB (terrestrial OFDM).
    Dvb,
    /// ATSC terrestrial (VSB) or US cable (QAM).
    Atsc,
}

impl ScanStandard {
    /// Tag used in scan records and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStandard::Dvb => "dvb",
            ScanStandard::Atsc => "atsc",
        }
    }

    /// Format token used as the first component of a catalog key.
    ///
    /// Note the DVB token is `"dvbt"`: catalog keys name the terrestrial
    /// variant, while the scan standard tag stays `"dvb"`.
    pub fn table_format(&self) -> &'static str {
        match self {
            ScanStandard::Dvb => "dvbt",
            ScanStandard::Atsc => "atsc",
        }
    }
}

impl fmt::Display for ScanStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStandard {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dvb" | "dvbt" => Ok(ScanStandard::Dvb),
            "atsc" => Ok(ScanStandard::Atsc),
            other => Err(ParseError::UnknownStandard(other.to_string())),
        }
    }
}

/// Carrier modulation of a frequency table entry.
///
/// For OFDM tables this doubles as the constellation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modulation {
    /// 8-level vestigial sideband (ATSC terrestrial).
    Vsb8,
    /// 64-QAM (US cable, or OFDM constellation).
    Qam64,
    /// 128-QAM (US cable).
    Qam128,
    /// 256-QAM (US cable).
    Qam256,
    /// Let the frontend detect the constellation.
    QamAuto,
}

impl Modulation {
    /// Lowercase token used in catalog keys and config strings.
    pub fn token(&self) -> &'static str {
        match self {
            Modulation::Vsb8 => "vsb8",
            Modulation::Qam64 => "qam64",
            Modulation::Qam128 => "qam128",
            Modulation::Qam256 => "qam256",
            Modulation::QamAuto => "auto",
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Modulation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vsb8" | "8vsb" => Ok(Modulation::Vsb8),
            "qam64" => Ok(Modulation::Qam64),
            "qam128" => Ok(Modulation::Qam128),
            "qam256" => Ok(Modulation::Qam256),
            "auto" => Ok(Modulation::QamAuto),
            other => Err(ParseError::UnknownModulation(other.to_string())),
        }
    }
}

/// Spectral inversion setting for an OFDM frontend.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inversion {
    Off,
    On,
    Auto,
}

/// Channel bandwidth of an OFDM transport.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bandwidth {
    Mhz6,
    Mhz7,
    Mhz8,
    Auto,
}

/// Forward error correction code rate.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeRate {
    None,
    Rate1_2,
    Rate2_3,
    Rate3_4,
    Rate5_6,
    Rate7_8,
    Auto,
}

/// OFDM transmission mode (carrier count).
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransmissionMode {
    Mode2k,
    Mode8k,
    Auto,
}

/// OFDM guard interval fraction.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardInterval {
    Interval1_32,
    Interval1_16,
    Interval1_8,
    Interval1_4,
    Auto,
}

/// OFDM hierarchical transmission setting.
#[cfg(feature = "dvb")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hierarchy {
    None,
    H1,
    H2,
    H4,
    Auto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tags() {
        assert_eq!(ScanStandard::Dvb.as_str(), "dvb");
        assert_eq!(ScanStandard::Dvb.table_format(), "dvbt");
        assert_eq!(ScanStandard::Atsc.as_str(), "atsc");
        assert_eq!(ScanStandard::Atsc.table_format(), "atsc");
    }

    #[test]
    fn test_standard_from_str() {
        assert_eq!("dvb".parse::<ScanStandard>(), Ok(ScanStandard::Dvb));
        assert_eq!("dvbt".parse::<ScanStandard>(), Ok(ScanStandard::Dvb));
        assert_eq!("atsc".parse::<ScanStandard>(), Ok(ScanStandard::Atsc));
        assert_eq!(
            "isdb".parse::<ScanStandard>(),
            Err(ParseError::UnknownStandard("isdb".to_string()))
        );
    }

    #[test]
    fn test_modulation_round_trip() {
        for m in [
            Modulation::Vsb8,
            Modulation::Qam64,
            Modulation::Qam128,
            Modulation::Qam256,
            Modulation::QamAuto,
        ] {
            assert_eq!(m.token().parse::<Modulation>(), Ok(m));
        }
        assert_eq!("8vsb".parse::<Modulation>(), Ok(Modulation::Vsb8));
        assert!("qpsk".parse::<Modulation>().is_err());
    }

    #[test]
    fn test_timeout_ordering() {
        assert!(DVBT_TUNING_TIMEOUT < ATSC_TUNING_TIMEOUT);
    }
}
