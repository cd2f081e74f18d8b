use core::fmt::Debug;

use crate::error::Error;

// Payload widths, in bytes, of the shapes the sensor emits.
const COMPACT_SHORT_LEN: usize = 12; // six u16 fields
const STANDARD_SHORT_LEN: usize = 4; // two u16 fields
const STREAM_LEN: usize = 26; // thirteen u16 fields

/// A single sample from a compact-series sensor (HPMA115C0).
///
/// All concentrations are in µg/m³ for particles up to the indicated
/// diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactSample {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm4_0: u16,
    pub pm10: u16,
}

/// A single sample from a standard-series sensor (HPMA115S0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardSample {
    /// PM2.5 concentration in µg/m³.
    pub pm2_5: u16,
    /// PM10 concentration in µg/m³.
    pub pm10: u16,
}

// Big-endian u16 field `idx` of a data payload.
fn field(payload: &[u8], idx: usize) -> u16 {
    u16::from_be_bytes([payload[2 * idx], payload[2 * idx + 1]])
}

impl CompactSample {
    /// Decodes the six-field payload of a single-shot read. The last two
    /// fields are reserved values on the wire and are dropped.
    pub fn from_short_payload<E: Debug>(payload: &[u8]) -> Result<Self, Error<E>> {
        if payload.len() != COMPACT_SHORT_LEN {
            return Err(Error::PayloadLength(payload.len()));
        }
        Ok(Self::from_leading_fields(payload))
    }

    /// Decodes the thirteen-field autosend payload. The PM readings sit
    /// in the leading four fields; the rest are auxiliary channels.
    pub fn from_stream_payload<E: Debug>(payload: &[u8]) -> Result<Self, Error<E>> {
        if payload.len() != STREAM_LEN {
            return Err(Error::PayloadLength(payload.len()));
        }
        Ok(Self::from_leading_fields(payload))
    }

    fn from_leading_fields(payload: &[u8]) -> Self {
        CompactSample {
            pm1_0: field(payload, 0),
            pm2_5: field(payload, 1),
            pm4_0: field(payload, 2),
            pm10: field(payload, 3),
        }
    }
}

impl StandardSample {
    /// Decodes either payload shape that carries a standard-series
    /// sample. The width is the discriminator: two fields from a
    /// single-shot read, thirteen from an autosend frame (where PM2.5
    /// and PM10 sit at fields one and two).
    pub fn from_payload<E: Debug>(payload: &[u8]) -> Result<Self, Error<E>> {
        match payload.len() {
            STANDARD_SHORT_LEN => Ok(StandardSample {
                pm2_5: field(payload, 0),
                pm10: field(payload, 1),
            }),
            STREAM_LEN => Ok(StandardSample {
                pm2_5: field(payload, 1),
                pm10: field(payload, 2),
            }),
            len => Err(Error::PayloadLength(len)),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Compact {}
    impl Sealed for super::Standard {}
}

/// Binds a sensor model to its sample shape and decode paths.
///
/// Exactly two models exist; the trait is sealed.
pub trait SensorVariant: sealed::Sealed {
    /// Sample type produced by this model.
    type Sample: Debug + Copy;

    /// Decodes the payload of a single-shot read (command 0x04).
    fn decode_sample<E: Debug>(payload: &[u8]) -> Result<Self::Sample, Error<E>>;

    /// Decodes the payload of one autosend frame.
    fn decode_stream_sample<E: Debug>(payload: &[u8]) -> Result<Self::Sample, Error<E>>;
}

/// Marker for the compact sensor model (four PM channels).
#[derive(Debug)]
pub enum Compact {}

/// Marker for the standard sensor model (two PM channels).
#[derive(Debug)]
pub enum Standard {}

impl SensorVariant for Compact {
    type Sample = CompactSample;

    fn decode_sample<E: Debug>(payload: &[u8]) -> Result<CompactSample, Error<E>> {
        CompactSample::from_short_payload(payload)
    }

    fn decode_stream_sample<E: Debug>(payload: &[u8]) -> Result<CompactSample, Error<E>> {
        CompactSample::from_stream_payload(payload)
    }
}

impl SensorVariant for Standard {
    type Sample = StandardSample;

    fn decode_sample<E: Debug>(payload: &[u8]) -> Result<StandardSample, Error<E>> {
        StandardSample::from_payload(payload)
    }

    fn decode_stream_sample<E: Debug>(payload: &[u8]) -> Result<StandardSample, Error<E>> {
        StandardSample::from_payload(payload)
    }
}
