//! Hardware interface abstraction
//!
//! This module provides the [`HardwareInterface`] trait the protocol driver
//! talks to, and the [`Interface`] struct that implements it over
//! embedded-hal v1.0 SPI, GPIO and delay traits.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (MOSI + SCK), chip select driven by this layer
//! - 6 GPIO pins:
//!   - **CS_M / CS_S**: Master and slave chip select (output, active low)
//!   - **RST**: Reset (output, active low)
//!   - **DC**: Data/Command select (output)
//!   - **PWR**: Panel power switch (output)
//!   - **BUSY**: Busy status (input, polarity per [`BusyPolarity`](crate::BusyPolarity))
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin, PinState, StatefulOutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epdif::{Config, HardwareInterface, Interface, Pin, Pins};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl StatefulOutputPin for MockPin {
//! #     fn is_set_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_set_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let pins = Pins {
//!     cs_master: MockPin,
//!     cs_slave: MockPin,
//!     reset: MockPin,
//!     data_command: MockPin,
//!     busy: MockPin,
//!     power: MockPin,
//! };
//! let mut interface = Interface::new(MockSpi, pins, MockDelay, Config::default());
//! let _ = interface.init();
//!
//! // Select the master controller and send a command byte
//! let _ = interface.write_pin(Pin::CsMaster, PinState::Low);
//! let _ = interface.write_pin(Pin::DataCommand, PinState::Low);
//! let _ = interface.transfer_byte(0x12);
//! let _ = interface.write_pin(Pin::CsMaster, PinState::High);
//!
//! // Wait for display ready
//! let _ = interface.wait_until_ready();
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState, StatefulOutputPin};
use embedded_hal::spi::SpiBus;

use crate::busy::{BusyPoll, BusyState, Step};
use crate::config::{Config, Pin, SPI_HOST, pins};

#[cfg(feature = "async")]
mod asynch;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Output levels applied by [`HardwareInterface::init`]
const INIT_LEVELS: [(Pin, PinState); 5] = [
    (Pin::DataCommand, PinState::Low),
    (Pin::CsMaster, PinState::High),
    (Pin::CsSlave, PinState::High),
    (Pin::Reset, PinState::High),
    (Pin::Power, PinState::High),
];

/// Output levels applied by [`Interface::shutdown`]
const SHUTDOWN_LEVELS: [(Pin, PinState); 4] = [
    (Pin::Power, PinState::Low),
    (Pin::Reset, PinState::Low),
    (Pin::CsMaster, PinState::High),
    (Pin::CsSlave, PinState::High),
];

/// Primitive operations the display protocol driver is written against
///
/// Five forwarding operations plus the busy-wait. Implementations hold no
/// protocol state; the caller sequences commands and chip selects.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement this
/// trait on your own type for boards where the pins are not plain
/// embedded-hal GPIOs (port expanders, shared buses).
pub trait HardwareInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Bring GPIOs and the SPI bus into driver-ready state
    ///
    /// Safe to call again; the same levels are re-applied.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the display session.
    fn init(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Drive an output pin
    fn write_pin(&mut self, pin: Pin, level: PinState) -> InterfaceResult<(), Self::Error>;

    /// Sample a pin
    ///
    /// Returns the input level for [`Pin::Busy`] and the driven level for outputs.
    fn read_pin(&mut self, pin: Pin) -> InterfaceResult<PinState, Self::Error>;

    /// Suspend the caller for at least `ms` milliseconds
    ///
    /// Yields to the scheduler when the platform delay does.
    fn delay_ms(&mut self, ms: u32);

    /// Send one byte over SPI, unchanged
    ///
    /// The byte is on the wire when this returns.
    fn transfer_byte(&mut self, byte: u8) -> InterfaceResult<(), Self::Error>;

    /// Send a run of bytes over SPI
    fn transfer_bytes(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        for &byte in data {
            self.transfer_byte(byte)?;
        }
        Ok(())
    }

    /// Block until the busy line reports ready
    ///
    /// Each busy sample is followed by one yield of the poll interval.
    /// Unbounded unless a timeout is configured.
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::Timeout`] from [`Interface`] only when a
    /// busy timeout is configured.
    fn wait_until_ready(&mut self) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug, PartialEq, Eq)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Write to a pin that is not an output
    Direction(Pin),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Direction(pin) => write!(f, "Pin {pin} is not an output"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// GPIOs wired to the panel, one field per [`Pin`] role
#[derive(Debug)]
pub struct Pins<CSM, CSS, RST, DC, BUSY, PWR> {
    /// Master controller chip select
    pub cs_master: CSM,
    /// Slave controller chip select
    pub cs_slave: CSS,
    /// Reset (active low)
    pub reset: RST,
    /// Data/Command select (low=command, high=data)
    pub data_command: DC,
    /// Busy input
    pub busy: BUSY,
    /// Panel power switch
    pub power: PWR,
}

/// Hardware interface implementation
///
/// Implements [`HardwareInterface`] for embedded-hal v1.0 traits. Owns the
/// peripheral handles and the [`Config`], nothing else.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`] (chip select is a GPIO here)
/// * `CSM`, `CSS`, `RST`, `DC`, `PWR` - Outputs implementing [`StatefulOutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
/// * `D` - Platform delay implementing [`DelayNs`]; use a yielding one
///   such as `esp_idf_hal::delay::FreeRtos` or `embassy_time::Delay`
pub struct Interface<SPI, CSM, CSS, RST, DC, BUSY, PWR, D> {
    /// SPI bus for communication
    spi: SPI,
    /// GPIO pins
    pins: Pins<CSM, CSS, RST, DC, BUSY, PWR>,
    /// Platform delay
    delay: D,
    /// Busy-wait configuration
    config: Config,
}

impl<SPI, CSM, CSS, RST, DC, BUSY, PWR, D> Interface<SPI, CSM, CSS, RST, DC, BUSY, PWR, D> {
    /// Create a new Interface
    ///
    /// Pins are expected to be configured for their direction already;
    /// call [`HardwareInterface::init`] before use.
    pub fn new(
        spi: SPI,
        pins: Pins<CSM, CSS, RST, DC, BUSY, PWR>,
        delay: D,
        config: Config,
    ) -> Self {
        Self {
            spi,
            pins,
            delay,
            config,
        }
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Consume the interface and return the underlying peripherals
    pub fn release(self) -> (SPI, Pins<CSM, CSS, RST, DC, BUSY, PWR>, D) {
        (self.spi, self.pins, self.delay)
    }
}

impl<SPI, CSM, CSS, RST, DC, BUSY, PWR, D, PinErr> Interface<SPI, CSM, CSS, RST, DC, BUSY, PWR, D>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CSM: StatefulOutputPin<Error = PinErr>,
    CSS: StatefulOutputPin<Error = PinErr>,
    RST: StatefulOutputPin<Error = PinErr>,
    DC: StatefulOutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PWR: StatefulOutputPin<Error = PinErr>,
    PinErr: Debug,
{
    /// Sample the busy line once, applying the configured polarity
    pub fn is_busy(&mut self) -> InterfaceResult<bool, InterfaceError<SPI::Error, PinErr>> {
        let level = sample(&mut self.pins.busy)?;
        Ok(self.config.busy_polarity.state(level) == BusyState::Busy)
    }

    /// Cut panel power and hold the controllers in reset
    ///
    /// Chip selects are left deselected. Call [`HardwareInterface::init`] to
    /// power up again.
    pub fn shutdown(&mut self) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>> {
        log::debug!("EPD interface shutdown");
        for (pin, level) in SHUTDOWN_LEVELS {
            self.set_output(pin, level)?;
        }
        Ok(())
    }

    fn set_output(
        &mut self,
        pin: Pin,
        level: PinState,
    ) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>> {
        let result = match pin {
            Pin::CsMaster => self.pins.cs_master.set_state(level),
            Pin::CsSlave => self.pins.cs_slave.set_state(level),
            Pin::Reset => self.pins.reset.set_state(level),
            Pin::DataCommand => self.pins.data_command.set_state(level),
            Pin::Power => self.pins.power.set_state(level),
            Pin::Busy => return Err(InterfaceError::Direction(pin)),
        };
        result.map_err(InterfaceError::Pin)
    }
}

/// Read the raw busy-line level
fn sample<P: InputPin, SpiErr>(
    pin: &mut P,
) -> InterfaceResult<PinState, InterfaceError<SpiErr, P::Error>> {
    pin.is_high().map(PinState::from).map_err(InterfaceError::Pin)
}

impl<SPI, CSM, CSS, RST, DC, BUSY, PWR, D, PinErr> HardwareInterface
    for Interface<SPI, CSM, CSS, RST, DC, BUSY, PWR, D>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CSM: StatefulOutputPin<Error = PinErr>,
    CSS: StatefulOutputPin<Error = PinErr>,
    RST: StatefulOutputPin<Error = PinErr>,
    DC: StatefulOutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PWR: StatefulOutputPin<Error = PinErr>,
    D: DelayNs,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn init(&mut self) -> InterfaceResult<(), Self::Error> {
        log::debug!(
            "EPD interface init: SPI{} SCK=GPIO{} MOSI=GPIO{}",
            SPI_HOST,
            pins::SCK,
            pins::MOSI
        );
        self.spi.flush().map_err(InterfaceError::Spi)?;
        for (pin, level) in INIT_LEVELS {
            self.set_output(pin, level)?;
        }
        Ok(())
    }

    #[inline]
    fn write_pin(&mut self, pin: Pin, level: PinState) -> InterfaceResult<(), Self::Error> {
        self.set_output(pin, level)
    }

    #[inline]
    fn read_pin(&mut self, pin: Pin) -> InterfaceResult<PinState, Self::Error> {
        let high = match pin {
            Pin::CsMaster => self.pins.cs_master.is_set_high(),
            Pin::CsSlave => self.pins.cs_slave.is_set_high(),
            Pin::Reset => self.pins.reset.is_set_high(),
            Pin::DataCommand => self.pins.data_command.is_set_high(),
            Pin::Power => self.pins.power.is_set_high(),
            Pin::Busy => self.pins.busy.is_high(),
        };
        high.map(PinState::from).map_err(InterfaceError::Pin)
    }

    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    #[inline]
    fn transfer_byte(&mut self, byte: u8) -> InterfaceResult<(), Self::Error> {
        self.transfer_bytes(&[byte])
    }

    fn transfer_bytes(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        self.spi.flush().map_err(InterfaceError::Spi)
    }

    fn wait_until_ready(&mut self) -> InterfaceResult<(), Self::Error> {
        let mut poll = BusyPoll::start(&self.config);
        loop {
            let level = sample(&mut self.pins.busy)?;
            match poll.step(level) {
                Step::Ready => return Ok(()),
                Step::Yield(ms) => self.delay.delay_ms(ms),
                Step::TimedOut => return Err(InterfaceError::Timeout),
            }
        }
    }
}
