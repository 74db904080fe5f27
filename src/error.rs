//! Error types for configuration and pin lookup
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`UnknownPin`] - A GPIO number with no pin role on this board
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use epdif::{Builder, BuilderError, Pin, UnknownPin};
//!
//! // A zero poll interval would turn the busy-wait into a spin loop
//! let result = Builder::new().poll_interval_ms(0).build();
//! assert!(matches!(result, Err(BuilderError::ZeroPollInterval)));
//!
//! // GPIO 12 is SPI clock, not a driver pin
//! assert_eq!(Pin::try_from(12_u8), Err(UnknownPin(12)));
//! ```

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Poll interval was 0
    ///
    /// Every busy poll must yield for a non-zero interval.
    ZeroPollInterval,
    /// Busy timeout was `Some(0)`
    ///
    /// Use `None` for an unbounded wait.
    ZeroTimeout,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroPollInterval => write!(f, "Poll interval must be at least 1ms"),
            Self::ZeroTimeout => {
                write!(f, "Busy timeout must be at least 1ms (use None to disable)")
            }
        }
    }
}

impl core::error::Error for BuilderError {}

/// GPIO number that is not wired to any pin role
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownPin(pub u8);

impl core::fmt::Display for UnknownPin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO{} has no pin role", self.0)
    }
}

impl core::error::Error for UnknownPin {}
