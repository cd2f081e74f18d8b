use log::{debug, warn};

use crate::constants::*;
use crate::error::Error;
use crate::transport::Transport;

// Largest payload a command frame can carry. Every documented command
// carries at most one byte; headroom for firmware extensions.
const MAX_CMD_PAYLOAD: usize = 4;

// Command frame overhead: header, length, command code, checksum.
const CMD_OVERHEAD: usize = 4;

// Largest response payload the decoder accepts. The biggest frame the
// sensor emits is the 26-byte autosend payload; a command-response length
// byte above this is treated as a framing violation rather than trusted.
pub(crate) const MAX_RSP_PAYLOAD: usize = 32;

/// Two's-complement checksum used by the command and command-response
/// frame families: `(65536 - sum(bytes)) % 256`.
pub fn checksum_mod256(bytes: &[u8]) -> u8 {
    // 65536 is a multiple of 256, so this reduces to negating the low
    // byte of the sum.
    let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    sum.wrapping_neg()
}

/// Plain 16-bit sum checksum used only by the autosend frame family:
/// `sum(bytes) % 65536`.
pub fn checksum_sum16(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// An encoded command frame ready to be written to the transport.
#[derive(Debug, Clone, Copy)]
pub struct CommandFrame {
    buf: [u8; CMD_OVERHEAD + MAX_CMD_PAYLOAD],
    len: usize,
}

impl CommandFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Builds a command frame: `68 LL CC [payload..] KS` with
/// `LL = payload.len() + 1` and `KS` the mod-256 checksum over everything
/// before it. Inputs are well-formed byte values by construction, so
/// there is no failure path.
pub fn encode_command(command: u8, payload: &[u8]) -> CommandFrame {
    debug_assert!(payload.len() <= MAX_CMD_PAYLOAD);
    let mut buf = [0u8; CMD_OVERHEAD + MAX_CMD_PAYLOAD];
    buf[0] = CMD_HEADER;
    buf[1] = (payload.len() + 1) as u8;
    buf[2] = command;
    buf[3..3 + payload.len()].copy_from_slice(payload);
    let len = 3 + payload.len();
    buf[len] = checksum_mod256(&buf[..len]);
    CommandFrame { buf, len: len + 1 }
}

/// Classification of a frame received from the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    /// A data-carrying frame from either frame family.
    Data,
    /// The sensor accepted the last command.
    PositiveAck,
    /// The sensor rejected the last command.
    NegativeAck,
}

/// One decoded frame from the sensor. Ephemeral: produced per read,
/// consumed within the exchange.
#[derive(Debug, Clone, Copy)]
pub struct Response {
    state: ResponseState,
    buf: [u8; MAX_RSP_PAYLOAD],
    len: usize,
}

impl Response {
    fn ack(state: ResponseState) -> Self {
        Response {
            state,
            buf: [0u8; MAX_RSP_PAYLOAD],
            len: 0,
        }
    }

    fn data(payload: &[u8]) -> Self {
        let mut buf = [0u8; MAX_RSP_PAYLOAD];
        buf[..payload.len()].copy_from_slice(payload);
        Response {
            state: ResponseState::Data,
            buf,
            len: payload.len(),
        }
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Reads and classifies exactly one frame from the transport.
///
/// Branches on the two leading header bytes alone, then validates with
/// the checksum algorithm of the selected frame family. On an
/// unrecognized header the stream position is unrecoverable: the
/// transport input buffer is discarded before [`Error::MalformedFrame`]
/// is returned. No retry is attempted at this layer.
pub fn read_response<T: Transport>(transport: &mut T) -> Result<Response, Error<T::Error>> {
    let mut scratch = [0u8; 2 + MAX_RSP_PAYLOAD];
    transport
        .read_exact(&mut scratch[..2])
        .map_err(Error::from_read_exact)?;

    match [scratch[0], scratch[1]] {
        [ACK_POSITIVE, ACK_POSITIVE] => {
            debug!("recv: positive ack");
            Ok(Response::ack(ResponseState::PositiveAck))
        }
        [ACK_NEGATIVE, ACK_NEGATIVE] => {
            debug!("recv: negative ack");
            Ok(Response::ack(ResponseState::NegativeAck))
        }
        [DATA_HEADER, len_byte] => {
            let len = usize::from(len_byte);
            if len == 0 || len > MAX_RSP_PAYLOAD {
                warn!("data frame with implausible length {len}, discarding input");
                transport.discard_input().map_err(Error::from_io)?;
                return Err(Error::MalformedFrame([DATA_HEADER, len_byte]));
            }
            transport
                .read_exact(&mut scratch[2..2 + len])
                .map_err(Error::from_read_exact)?;
            let mut cs = [0u8; 1];
            transport.read_exact(&mut cs).map_err(Error::from_read_exact)?;
            let calculated = checksum_mod256(&scratch[..2 + len]);
            if cs[0] != calculated {
                return Err(Error::ChecksumMismatch {
                    received: u16::from(cs[0]),
                    calculated: u16::from(calculated),
                });
            }
            debug!("recv data frame: {:02X?}", &scratch[..2 + len]);
            // First payload byte echoes the sub-command; drop it.
            Ok(Response::data(&scratch[3..2 + len]))
        }
        [a, b] if [a, b] == STREAM_HEADER => {
            transport
                .read_exact(&mut scratch[2..2 + STREAM_BODY_LEN])
                .map_err(Error::from_read_exact)?;
            let mut cs = [0u8; 2];
            transport.read_exact(&mut cs).map_err(Error::from_read_exact)?;
            let received = u16::from_be_bytes(cs);
            let calculated = checksum_sum16(&scratch[..2 + STREAM_BODY_LEN]);
            if received != calculated {
                return Err(Error::ChecksumMismatch {
                    received,
                    calculated,
                });
            }
            debug!("recv autosend frame: {:02X?}", &scratch[..2 + STREAM_BODY_LEN]);
            // First two body bytes echo the frame length; drop them.
            Ok(Response::data(&scratch[4..2 + STREAM_BODY_LEN]))
        }
        header => {
            warn!("unrecognized frame header {header:02X?}, discarding input");
            transport.discard_input().map_err(Error::from_io)?;
            Err(Error::MalformedFrame(header))
        }
    }
}
