use core::fmt::Debug;

/// Errors raised while talking to an HPMA115 sensor.
///
/// `E` is the error type of the underlying transport. None of these are
/// retried internally; every variant is terminal for the in-flight
/// operation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error<E: Debug> {
    /// Underlying transport error.
    #[error("transport error: {0:?}")]
    Transport(E),

    /// The transport did not deliver the requested bytes within its
    /// configured timeout.
    #[error("transport read timed out")]
    Timeout,

    /// The checksum carried by a frame disagrees with the recomputed one.
    #[error("checksum mismatch: received {received:#06x}, calculated {calculated:#06x}")]
    ChecksumMismatch { received: u16, calculated: u16 },

    /// The leading header bytes match none of the known frame families.
    /// The transport input buffer has been discarded; the exchange must be
    /// retried from scratch by the caller.
    #[error("malformed frame header: {0:02X?}")]
    MalformedFrame([u8; 2]),

    /// The sensor answered the given command with a negative
    /// acknowledgment.
    #[error("sensor rejected command {0:#04x}")]
    CommandFailure(u8),

    /// A data payload did not have the width the decode path requires.
    #[error("unexpected data payload length {0}")]
    PayloadLength(usize),

    /// Client-side argument check failed; no wire traffic occurred.
    #[error("coefficient {0} out of range, must be between 30 and 200")]
    CoefficientOutOfRange(u8),
}
