//! Pin roles, board wiring and runtime configuration
//!
//! The panel is wired through a fixed set of pin roles. [`Pin`] names each
//! role the protocol driver can address, and [`pins`] holds the default GPIO
//! numbers for the Olimex ESP32-S3-DevKit-LiPo wiring.
//!
//! Runtime behavior of the busy-wait is configured through [`Config`], built
//! with [`Builder`]:
//!
//! ```
//! use epdif::{BusyPolarity, Builder};
//!
//! let config = match Builder::new()
//!     .busy_polarity(BusyPolarity::ActiveHigh)
//!     .poll_interval_ms(5)
//!     .busy_timeout_ms(Some(30_000))
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! assert_eq!(config.poll_interval_ms, 5);
//! ```

use embedded_hal::digital::PinState;

use crate::busy::BusyState;
pub use crate::error::{BuilderError, UnknownPin};

/// Default GPIO assignments (Olimex ESP32-S3-DevKit-LiPo)
pub mod pins {
    /// SPI clock
    pub const SCK: u8 = 12;
    /// SPI data out (MOSI)
    pub const MOSI: u8 = 11;
    /// Chip select, master controller
    pub const CS_MASTER: u8 = 15;
    /// Chip select, slave controller
    pub const CS_SLAVE: u8 = 14;
    /// Reset (active low)
    pub const RESET: u8 = 9;
    /// Data/Command select
    pub const DATA_COMMAND: u8 = 18;
    /// Busy status
    pub const BUSY: u8 = 8;
    /// Panel power switch
    pub const POWER: u8 = 7;
}

/// SPI host the panel is attached to (SPI2 on ESP32-S3)
pub const SPI_HOST: u8 = 2;

/// Default interval between busy-line samples in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// GPIO-driven pin roles
///
/// SCK and MOSI belong to the SPI bus and are not addressable here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pin {
    /// Chip select for the master controller (active low)
    CsMaster,
    /// Chip select for the slave controller (active low)
    CsSlave,
    /// Reset line (active low)
    Reset,
    /// Data/Command select (low = command, high = data)
    DataCommand,
    /// Busy line driven by the panel (input)
    Busy,
    /// Panel power switch
    Power,
}

impl Pin {
    /// Every pin role, outputs first
    pub const ALL: [Self; 6] = [
        Self::CsMaster,
        Self::CsSlave,
        Self::Reset,
        Self::DataCommand,
        Self::Power,
        Self::Busy,
    ];

    /// GPIO number this role is wired to on the default board
    pub const fn gpio(self) -> u8 {
        match self {
            Self::CsMaster => pins::CS_MASTER,
            Self::CsSlave => pins::CS_SLAVE,
            Self::Reset => pins::RESET,
            Self::DataCommand => pins::DATA_COMMAND,
            Self::Busy => pins::BUSY,
            Self::Power => pins::POWER,
        }
    }

    /// Whether the role is driven by this side of the link
    pub const fn is_output(self) -> bool {
        !matches!(self, Self::Busy)
    }
}

impl TryFrom<u8> for Pin {
    type Error = UnknownPin;

    fn try_from(gpio: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|pin| pin.gpio() == gpio)
            .ok_or(UnknownPin(gpio))
    }
}

impl core::fmt::Display for Pin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::CsMaster => "CS_M",
            Self::CsSlave => "CS_S",
            Self::Reset => "RST",
            Self::DataCommand => "DC",
            Self::Busy => "BUSY",
            Self::Power => "PWR",
        };
        write!(f, "{name} (GPIO{})", self.gpio())
    }
}

/// Level on the busy line that means "still processing"
///
/// Fixed per panel. A mismatch makes the wait return immediately or never.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BusyPolarity {
    /// LOW = busy, HIGH = ready
    #[default]
    ActiveLow,
    /// HIGH = busy, LOW = ready
    ActiveHigh,
}

impl BusyPolarity {
    /// Level the panel drives while busy
    pub const fn busy_level(self) -> PinState {
        match self {
            Self::ActiveLow => PinState::Low,
            Self::ActiveHigh => PinState::High,
        }
    }

    /// Level the panel drives once ready
    pub const fn ready_level(self) -> PinState {
        match self {
            Self::ActiveLow => PinState::High,
            Self::ActiveHigh => PinState::Low,
        }
    }

    /// Interpret a sampled busy-line level
    pub fn state(self, level: PinState) -> BusyState {
        if level == self.busy_level() {
            BusyState::Busy
        } else {
            BusyState::Ready
        }
    }
}

/// Interface configuration
///
/// Use [`Builder`] to create a validated `Config`; [`Config::default`]
/// gives the unbounded 10 ms active-low wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Busy line polarity
    pub busy_polarity: BusyPolarity,
    /// Yield duration between busy samples in milliseconds (never zero)
    pub poll_interval_ms: u32,
    /// Upper bound on a single busy-wait in milliseconds, `None` waits forever
    pub busy_timeout_ms: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            busy_polarity: BusyPolarity::ActiveLow,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            busy_timeout_ms: None,
        }
    }
}

/// Builder for [`Config`]
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set busy line polarity
    pub fn busy_polarity(mut self, polarity: BusyPolarity) -> Self {
        self.config.busy_polarity = polarity;
        self
    }

    /// Set the yield interval between busy samples
    pub fn poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.config.poll_interval_ms = interval_ms;
        self
    }

    /// Bound the busy-wait, `None` restores the unbounded wait
    pub fn busy_timeout_ms(mut self, timeout_ms: Option<u32>) -> Self {
        self.config.busy_timeout_ms = timeout_ms;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - [`BuilderError::ZeroPollInterval`] if the poll interval is 0
    /// - [`BuilderError::ZeroTimeout`] if the timeout is `Some(0)`
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.config.poll_interval_ms == 0 {
            return Err(BuilderError::ZeroPollInterval);
        }
        if self.config.busy_timeout_ms == Some(0) {
            return Err(BuilderError::ZeroTimeout);
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.busy_polarity, BusyPolarity::ActiveLow);
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.busy_timeout_ms, None);
        assert_eq!(Builder::new().build().ok(), Some(config));
    }

    #[test]
    fn test_builder_rejects_zero_poll_interval() {
        let result = Builder::new().poll_interval_ms(0).build();
        assert!(matches!(result, Err(BuilderError::ZeroPollInterval)));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = Builder::new().busy_timeout_ms(Some(0)).build();
        assert!(matches!(result, Err(BuilderError::ZeroTimeout)));
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = Builder::new()
            .busy_polarity(BusyPolarity::ActiveHigh)
            .poll_interval_ms(1)
            .busy_timeout_ms(Some(500))
            .build()
            .unwrap();
        assert_eq!(config.busy_polarity, BusyPolarity::ActiveHigh);
        assert_eq!(config.poll_interval_ms, 1);
        assert_eq!(config.busy_timeout_ms, Some(500));
    }

    #[test]
    fn test_polarity_maps_levels() {
        let low = BusyPolarity::ActiveLow;
        assert_eq!(low.state(PinState::Low), BusyState::Busy);
        assert_eq!(low.state(PinState::High), BusyState::Ready);
        assert_eq!(low.state(low.ready_level()), BusyState::Ready);

        let high = BusyPolarity::ActiveHigh;
        assert_eq!(high.state(PinState::High), BusyState::Busy);
        assert_eq!(high.state(PinState::Low), BusyState::Ready);
        assert_eq!(high.state(high.ready_level()), BusyState::Ready);
    }

    #[test]
    fn test_pin_gpio_mapping_is_one_to_one() {
        for pin in Pin::ALL {
            assert_eq!(Pin::try_from(pin.gpio()), Ok(pin));
        }
        assert_eq!(Pin::try_from(pins::SCK), Err(UnknownPin(pins::SCK)));
        assert_eq!(Pin::try_from(pins::MOSI), Err(UnknownPin(pins::MOSI)));
    }

    #[test]
    fn test_only_busy_is_input() {
        assert!(!Pin::Busy.is_output());
        assert!(Pin::ALL.iter().filter(|pin| !pin.is_output()).count() == 1);
    }
}
