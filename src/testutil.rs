//! Scripted transport and delay doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_io::ErrorKind;

use crate::constants::{DATA_HEADER, STREAM_HEADER};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub ErrorKind);

impl embedded_io::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Transport double with shared interior state, so a test can keep a
/// clone and push scripted sensor bytes after the driver has taken
/// ownership (the init sequence discards anything queued up front).
/// Running out of scripted bytes behaves like a timed-out serial read.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    incoming: Rc<RefCell<VecDeque<u8>>>,
    written: Rc<RefCell<Vec<u8>>>,
    discards: Rc<Cell<u32>>,
}

impl MockTransport {
    /// Queues bytes the "sensor" will deliver.
    pub fn push(&self, bytes: &[u8]) {
        self.incoming.borrow_mut().extend(bytes.iter().copied());
    }

    /// Everything the driver wrote so far.
    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    /// How often the input buffer was discarded.
    pub fn discards(&self) -> u32 {
        self.discards.get()
    }

    /// Scripted bytes not yet consumed.
    pub fn pending_input(&self) -> usize {
        self.incoming.borrow().len()
    }
}

impl embedded_io::ErrorType for MockTransport {
    type Error = MockError;
}

impl embedded_io::Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
        let mut incoming = self.incoming.borrow_mut();
        if incoming.is_empty() {
            return Err(MockError(ErrorKind::TimedOut));
        }
        let n = buf.len().min(incoming.len());
        for slot in buf[..n].iter_mut() {
            *slot = incoming.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl embedded_io::Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, MockError> {
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), MockError> {
        Ok(())
    }
}

impl Transport for MockTransport {
    fn discard_input(&mut self) -> Result<(), MockError> {
        self.incoming.borrow_mut().clear();
        self.discards.set(self.discards.get() + 1);
        Ok(())
    }
}

/// Delay double that only records the requested time.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn total_ns(&self) -> u64 {
        self.total_ns.get()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}

pub fn ack_positive() -> Vec<u8> {
    vec![0xA5, 0xA5]
}

pub fn ack_negative() -> Vec<u8> {
    vec![0x96, 0x96]
}

/// Encodes u16 values as the big-endian field bytes of a data payload.
pub fn fields(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Builds a command-response data frame around `payload`, with the
/// sub-command echo and a valid mod-256 checksum.
pub fn data_frame(sub_command: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![DATA_HEADER, (payload.len() + 1) as u8, sub_command];
    frame.extend_from_slice(payload);
    let sum = frame.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    frame.push(sum.wrapping_neg());
    frame
}

/// Builds a full autosend frame: "BM" header, length echo, thirteen
/// big-endian fields and the 16-bit sum checksum.
pub fn stream_frame(values: &[u16; 13]) -> Vec<u8> {
    let mut frame = vec![STREAM_HEADER[0], STREAM_HEADER[1], 0x00, 0x1C];
    for v in values {
        frame.extend_from_slice(&v.to_be_bytes());
    }
    let sum = frame
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
    frame.extend_from_slice(&sum.to_be_bytes());
    frame
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
pub fn count_frames(haystack: &[u8], needle: &[u8]) -> usize {
    let mut count = 0;
    let mut rest = haystack;
    while rest.len() >= needle.len() {
        match rest.windows(needle.len()).position(|w| w == needle) {
            Some(idx) => {
                count += 1;
                rest = &rest[idx + needle.len()..];
            }
            None => break,
        }
    }
    count
}
