#![cfg_attr(not(test), no_std)]

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use log::{debug, error, warn};

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod frame;
pub use frame::*;

mod sample;
pub use sample::*;

mod session;
pub use session::*;

mod transport;
pub use transport::*;

#[cfg(test)]
mod testutil;

/// Operational state the driver last put the sensor in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Fan and measurement are off.
    Stopped,
    /// Measurement is running; single-shot reads return live data.
    Measuring,
    /// Autosend is enabled and the sensor pushes frames unsolicited.
    Streaming,
}

/// Driver for a Honeywell HPMA115 particle sensor.
///
/// Generic over the serial transport `T`, a delay provider `D` for the
/// sensor's settling times, and the sensor model `V`, which fixes the
/// sample shape at construction. Use the [`Hpma115C0`] or [`Hpma115S0`]
/// alias for the model at hand.
///
/// The driver owns the transport exclusively for its lifetime; all
/// operations are strictly sequential request/response exchanges.
pub struct Hpma115<T, D, V> {
    session: Session<T>,
    delay: D,
    state: DriverState,
    _variant: PhantomData<V>,
}

/// Driver for the compact model, reporting four PM channels.
pub type Hpma115C0<T, D> = Hpma115<T, D, Compact>;

/// Driver for the standard model, reporting PM2.5 and PM10.
pub type Hpma115S0<T, D> = Hpma115<T, D, Standard>;

impl<T, D, V> Hpma115<T, D, V>
where
    T: Transport,
    D: DelayNs,
    V: SensorVariant,
{
    /// Takes ownership of the transport and brings the sensor into a
    /// known state: autosend disabled, measurement stopped, settling
    /// time honored and any stale input dropped. The driver starts in
    /// [`DriverState::Stopped`].
    pub fn new(transport: T, delay: D) -> Result<Self, Error<T::Error>> {
        let mut driver = Hpma115 {
            session: Session::new(transport),
            delay,
            state: DriverState::Stopped,
            _variant: PhantomData,
        };
        driver.session.send(CMD_STOP_AUTOSEND, &[])?;
        driver.session.send(CMD_STOP_MEASUREMENT, &[])?;
        driver.settle()?;
        debug!("init sequence complete");
        Ok(driver)
    }

    /// Current driver-side view of the sensor state. After an
    /// error-terminated streaming loop this stays
    /// [`DriverState::Streaming`]: the device is presumed still
    /// streaming until [`Self::stop_autosend`] is called.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Releases the underlying transport.
    pub fn release(self) -> T {
        self.session.release()
    }

    /// Starts the fan and measurement; required before single-shot
    /// reads return live data.
    pub fn start_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.expect_ack(CMD_START_MEASUREMENT, &[])?;
        self.state = DriverState::Measuring;
        Ok(())
    }

    /// Stops measurement. Shutting the fan down prolongs device life,
    /// but sampling stays disabled until measurement is started again.
    pub fn stop_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.expect_ack(CMD_STOP_MEASUREMENT, &[])?;
        self.state = DriverState::Stopped;
        Ok(())
    }

    /// Reads a single sample. Only meaningful while measurement is
    /// running; the sensor itself does not enforce this.
    pub fn sample(&mut self) -> Result<V::Sample, Error<T::Error>> {
        let response = self.expect_ack(CMD_READ_SAMPLE, &[])?;
        V::decode_sample(response.payload())
    }

    /// Sets the customer adjustment coefficient. The valid range of 30
    /// to 200 inclusive is checked here, before any wire traffic.
    pub fn set_adjustment_coefficient(&mut self, coeff: u8) -> Result<(), Error<T::Error>> {
        if !(COEFF_MIN..=COEFF_MAX).contains(&coeff) {
            return Err(Error::CoefficientOutOfRange(coeff));
        }
        self.expect_ack(CMD_SET_COEFFICIENT, &[coeff])?;
        Ok(())
    }

    /// Reads the customer adjustment coefficient.
    pub fn read_adjustment_coefficient(&mut self) -> Result<u8, Error<T::Error>> {
        let response = self.expect_ack(CMD_READ_COEFFICIENT, &[])?;
        match response.payload() {
            [value] => Ok(*value),
            payload => Err(Error::PayloadLength(payload.len())),
        }
    }

    /// Enables autosend and hands every received sample to `consumer`.
    ///
    /// The consumer runs on the caller's execution context between
    /// frames; nothing is read from the transport while it runs. The
    /// loop continues as long as the consumer returns `true`. When the
    /// consumer returns `false`, or the sensor sends a negative
    /// acknowledgment after the stream started, autosend is disabled
    /// again and the driver returns with the sensor stopped.
    ///
    /// A decode failure terminates the loop without the disable
    /// sequence; the device is then presumed still streaming and the
    /// caller should invoke [`Self::stop_autosend`] once it wants the
    /// stream ended.
    pub fn autosample<F>(&mut self, mut consumer: F) -> Result<(), Error<T::Error>>
    where
        F: FnMut(V::Sample) -> bool,
    {
        self.expect_ack(CMD_START_AUTOSEND, &[])?;
        self.state = DriverState::Streaming;
        loop {
            let response = self.session.receive()?;
            match response.state() {
                ResponseState::NegativeAck => {
                    warn!("negative ack while streaming, stopping");
                    break;
                }
                ResponseState::PositiveAck => {
                    // Duplicate enable ack; neither data nor a stop.
                    debug!("stray positive ack while streaming, ignored");
                }
                ResponseState::Data => {
                    let sample = V::decode_stream_sample(response.payload())?;
                    if !consumer(sample) {
                        break;
                    }
                }
            }
        }
        self.stop_autosend()
    }

    /// Disables autosend, waits out the settling time and drops whatever
    /// the sensor pushed out before it saw the command. Also the manual
    /// recovery path after [`Self::autosample`] returned an error.
    pub fn stop_autosend(&mut self) -> Result<(), Error<T::Error>> {
        self.session.send(CMD_STOP_AUTOSEND, &[])?;
        self.settle()?;
        self.state = DriverState::Stopped;
        Ok(())
    }

    // The sensor needs time after a stop/disable before the next
    // exchange; anything received in the meantime is stale.
    fn settle(&mut self) -> Result<(), Error<T::Error>> {
        self.delay.delay_ms(SETTLE_DELAY_MS);
        self.session.discard_input()
    }

    fn expect_ack(&mut self, command: u8, payload: &[u8]) -> Result<Response, Error<T::Error>> {
        let response = self.session.transact(command, payload)?;
        if response.state() == ResponseState::NegativeAck {
            error!("command {command:#04x} rejected by sensor");
            return Err(Error::CommandFailure(command));
        }
        Ok(response)
    }
}
