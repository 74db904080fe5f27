//! E-Paper Hardware Interface
//!
//! The primitive I/O layer underneath an e-paper protocol driver: pin writes
//! and reads, SPI byte transfer, millisecond delay, and the busy-wait that
//! keeps the driver in step with the panel's internal refresh.
//!
//! Wired for dual-controller panels (Waveshare 13.3" (E) class) with a
//! master and a slave chip select and a switched power rail.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Busy-wait that yields on every poll, unbounded or with a timeout
//! - Configurable busy polarity and poll interval
//! - `async` feature: awaitable busy-wait over `embedded-hal-async`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin, PinState, StatefulOutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epdif::{Builder, BusyPolarity, HardwareInterface, Interface, Pin, Pins};
//!
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
//! # let (spi, delay) = (MockSpi, MockDelay);
//! # let (cs_master, cs_slave, reset, data_command, busy, power) =
//! #     (MockPin, MockPin, MockPin, MockPin, MockPin, MockPin);
//! let config = match Builder::new()
//!     .busy_polarity(BusyPolarity::ActiveLow)
//!     .poll_interval_ms(10)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let pins = Pins { cs_master, cs_slave, reset, data_command, busy, power };
//! let mut epd = Interface::new(spi, pins, delay, config);
//!
//! if epd.init().is_err() {
//!     return;
//! }
//! let _ = epd.write_pin(Pin::CsMaster, PinState::Low);
//! let _ = epd.transfer_byte(0x12);
//! let _ = epd.write_pin(Pin::CsMaster, PinState::High);
//! let _ = epd.wait_until_ready();
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Busy-line polling state machine
pub mod busy;
/// Pin roles, board wiring and configuration builder
pub mod config;
/// Error types for configuration
pub mod error;
/// Hardware interface abstraction
pub mod interface;

pub use busy::BusyState;
pub use config::{
    BusyPolarity, Builder, Config, DEFAULT_POLL_INTERVAL_MS, Pin, SPI_HOST, pins,
};
pub use embedded_hal::digital::PinState;
pub use error::{BuilderError, UnknownPin};
pub use interface::{HardwareInterface, Interface, InterfaceError, Pins};
