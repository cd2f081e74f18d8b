use log::debug;

use crate::error::Error;
use crate::frame::{encode_command, read_response, Response};
use crate::transport::Transport;

/// Half-duplex command/response sequencer.
///
/// Owns the transport for its lifetime, which makes the protocol's
/// ordering assumption explicit: the next frame read is the reply to the
/// last frame written. There is no request ID and no pipelining, so the
/// session must never be shared between exchanges in flight.
pub struct Session<T> {
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Session { transport }
    }

    /// Hands the transport back, consuming the session.
    pub fn release(self) -> T {
        self.transport
    }

    /// Encodes and writes one command frame. No response is read; the
    /// caller decides whether and when to read one.
    pub fn send(&mut self, command: u8, payload: &[u8]) -> Result<(), Error<T::Error>> {
        let frame = encode_command(command, payload);
        debug!("send command {command:#04x}: {:02X?}", frame.as_bytes());
        self.transport
            .write_all(frame.as_bytes())
            .map_err(Error::from_io)?;
        self.transport.flush().map_err(Error::from_io)?;
        Ok(())
    }

    /// Reads and classifies exactly one frame.
    pub fn receive(&mut self) -> Result<Response, Error<T::Error>> {
        read_response(&mut self.transport)
    }

    /// Writes a command and reads exactly one response. A negative
    /// acknowledgment is not an error at this layer; whether it is one
    /// is the caller's policy.
    pub fn transact(&mut self, command: u8, payload: &[u8]) -> Result<Response, Error<T::Error>> {
        self.send(command, payload)?;
        self.receive()
    }

    /// Drops any received-but-unread bytes from the transport.
    pub fn discard_input(&mut self) -> Result<(), Error<T::Error>> {
        self.transport.discard_input().map_err(Error::from_io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::frame::ResponseState;
    use crate::testutil::{ack_positive, data_frame, MockTransport};

    #[test]
    fn send_writes_a_framed_command() {
        let mock = MockTransport::default();
        let mut session = Session::new(mock.clone());
        session.send(CMD_STOP_AUTOSEND, &[]).unwrap();
        assert_eq!(mock.written(), vec![0x68, 0x01, 0x20, 0x77]);
    }

    #[test]
    fn transact_reads_exactly_one_response() {
        let mock = MockTransport::default();
        mock.push(&ack_positive());
        mock.push(&data_frame(CMD_READ_COEFFICIENT, &[0x64]));
        let mut session = Session::new(mock.clone());

        let response = session.transact(CMD_START_MEASUREMENT, &[]).unwrap();
        assert_eq!(response.state(), ResponseState::PositiveAck);
        // The second frame stays queued for the next exchange.
        assert!(mock.pending_input() > 0);
    }
}
