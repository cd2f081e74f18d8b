// CMD_HEADER is the byte that starts every host-to-sensor command frame.
pub const CMD_HEADER: u8 = 0x68;

// DATA_HEADER is the byte that starts a command-response data frame
// received from the sensor.
pub const DATA_HEADER: u8 = 0x40;

// STREAM_HEADER is the two-byte marker ("BM") that starts an autosend
// data frame.
pub const STREAM_HEADER: [u8; 2] = [0x42, 0x4D];

// ACK_POSITIVE is both bytes of a positive acknowledgment frame.
pub const ACK_POSITIVE: u8 = 0xA5;

// ACK_NEGATIVE is both bytes of a negative acknowledgment frame.
pub const ACK_NEGATIVE: u8 = 0x96;

// Command codes understood by the sensor.
pub const CMD_START_MEASUREMENT: u8 = 0x01;
pub const CMD_STOP_MEASUREMENT: u8 = 0x02;
pub const CMD_READ_SAMPLE: u8 = 0x04;
pub const CMD_SET_COEFFICIENT: u8 = 0x08;
pub const CMD_READ_COEFFICIENT: u8 = 0x10;
pub const CMD_STOP_AUTOSEND: u8 = 0x20;
pub const CMD_START_AUTOSEND: u8 = 0x40;

// Fixed body length of an autosend frame, length echo included.
pub const STREAM_BODY_LEN: usize = 28;

// Settling time the sensor needs after a stop/disable command before it
// accepts the next exchange. A hardware timing requirement, not an
// acknowledgment.
pub const SETTLE_DELAY_MS: u32 = 200;

// Inclusive bounds of the customer adjustment coefficient.
pub const COEFF_MIN: u8 = 30;
pub const COEFF_MAX: u8 = 200;
