use embedded_io::{Error as IoError, ErrorKind, Read, ReadExactError, Write};

use crate::error::Error;

/// Byte-stream link to the sensor, typically a UART opened at 9600 8N1.
///
/// Reads are blocking up to a timeout configured on the transport itself;
/// a read that times out must fail rather than hand back a short buffer.
/// On top of [`embedded_io::Read`] and [`embedded_io::Write`] the protocol
/// needs one extra operation: dropping bytes that were received but not
/// yet consumed, used to resynchronize after a framing violation and to
/// flush stale frames accumulated during settling delays.
pub trait Transport: Read + Write {
    /// Drops any received-but-unread bytes.
    fn discard_input(&mut self) -> Result<(), Self::Error>;
}

impl<E: IoError> Error<E> {
    pub(crate) fn from_io(err: E) -> Self {
        match err.kind() {
            ErrorKind::TimedOut => Error::Timeout,
            _ => Error::Transport(err),
        }
    }

    pub(crate) fn from_read_exact(err: ReadExactError<E>) -> Self {
        match err {
            // The sensor stopped sending mid-frame before the transport
            // timeout drained; a short read is never valid frame data.
            ReadExactError::UnexpectedEof => Error::Timeout,
            ReadExactError::Other(e) => Error::from_io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockError;

    #[test]
    fn timed_out_io_error_maps_to_timeout() {
        let err = Error::from_io(MockError(ErrorKind::TimedOut));
        assert_eq!(err, Error::Timeout);
    }

    #[test]
    fn other_io_errors_stay_transport_errors() {
        let err = Error::from_io(MockError(ErrorKind::Other));
        assert_eq!(err, Error::Transport(MockError(ErrorKind::Other)));
    }

    #[test]
    fn short_read_maps_to_timeout() {
        let err: Error<MockError> = Error::from_read_exact(ReadExactError::UnexpectedEof);
        assert_eq!(err, Error::Timeout);
    }
}
