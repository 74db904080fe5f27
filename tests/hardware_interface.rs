//! Hardware interface tests against embedded-hal-mock transaction mocks.
//!
//! Every mock checks that the interface issues exactly the expected pin and
//! bus operations, in order.
//!
//! Run with: cargo test --test hardware_interface

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as MockLevel, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use epdif::{Config, HardwareInterface, Interface, InterfaceError, Pin, PinState, Pins};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Delay that records every millisecond request.
#[derive(Debug, Default)]
struct CountingDelay {
    ms_calls: Vec<u32>,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
    }
}

type MockInterface =
    Interface<SpiMock<u8>, PinMock, PinMock, PinMock, PinMock, PinMock, PinMock, CountingDelay>;

/// Expected pin and bus operations for one test.
#[derive(Default)]
struct Expect {
    spi: Vec<SpiTransaction<u8>>,
    cs_master: Vec<PinTransaction>,
    cs_slave: Vec<PinTransaction>,
    reset: Vec<PinTransaction>,
    data_command: Vec<PinTransaction>,
    busy: Vec<PinTransaction>,
    power: Vec<PinTransaction>,
}

impl Expect {
    fn interface(&self, config: Config) -> MockInterface {
        let pins = Pins {
            cs_master: PinMock::new(&self.cs_master),
            cs_slave: PinMock::new(&self.cs_slave),
            reset: PinMock::new(&self.reset),
            data_command: PinMock::new(&self.data_command),
            busy: PinMock::new(&self.busy),
            power: PinMock::new(&self.power),
        };
        Interface::new(SpiMock::new(&self.spi), pins, CountingDelay::default(), config)
    }
}

/// Release the interface, verify every mock, and hand back the delay.
fn finish(epd: MockInterface) -> CountingDelay {
    let (mut spi, mut pins, delay) = epd.release();
    spi.done();
    pins.cs_master.done();
    pins.cs_slave.done();
    pins.reset.done();
    pins.data_command.done();
    pins.busy.done();
    pins.power.done();
    delay
}

fn set(level: MockLevel) -> Vec<PinTransaction> {
    vec![PinTransaction::set(level)]
}

/// BUSY pin reading LOW (busy) for `busy_count` polls, then HIGH once.
fn busy_pin_sequence(busy_count: usize) -> Vec<PinTransaction> {
    let mut txns: Vec<PinTransaction> = (0..busy_count)
        .map(|_| PinTransaction::get(MockLevel::Low))
        .collect();
    txns.push(PinTransaction::get(MockLevel::High));
    txns
}

// ---------------------------------------------------------------------------
// Test: init drives driver-ready levels
// ---------------------------------------------------------------------------

#[test]
fn test_init_drives_driver_ready_levels() {
    let expect = Expect {
        spi: vec![SpiTransaction::flush()],
        data_command: set(MockLevel::Low),
        cs_master: set(MockLevel::High),
        cs_slave: set(MockLevel::High),
        reset: set(MockLevel::High),
        power: set(MockLevel::High),
        ..Expect::default()
    };

    let mut epd = expect.interface(Config::default());
    assert!(epd.init().is_ok(), "init must succeed on a working platform");

    finish(epd);
}

// ---------------------------------------------------------------------------
// Test: transfer_byte relays the byte unchanged
// ---------------------------------------------------------------------------

#[test]
fn test_transfer_byte_relays_exact_value() {
    let expect = Expect {
        spi: vec![
            SpiTransaction::write_vec(vec![0xA5]),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![0x00]),
            SpiTransaction::flush(),
        ],
        ..Expect::default()
    };

    let mut epd = expect.interface(Config::default());
    epd.transfer_byte(0xA5).unwrap();
    epd.transfer_byte(0x00).unwrap();

    finish(epd);
}

// ---------------------------------------------------------------------------
// Test: busy then ready after three polls
// ---------------------------------------------------------------------------

/// BUSY reads 0 three times, then 1: the wait returns after exactly three
/// polling iterations with three 10ms yields.
#[test]
fn test_wait_until_ready_three_iterations() {
    let expect = Expect {
        busy: busy_pin_sequence(3),
        ..Expect::default()
    };

    let mut epd = expect.interface(Config::default());
    epd.wait_until_ready().unwrap();

    let delay = finish(epd);
    assert_eq!(delay.ms_calls, [10, 10, 10]);
}

// ---------------------------------------------------------------------------
// Test: a command cycle as the protocol driver issues it
// ---------------------------------------------------------------------------

#[test]
fn test_command_cycle_with_busy_wait() {
    let expect = Expect {
        cs_master: vec![
            PinTransaction::set(MockLevel::Low),
            PinTransaction::set(MockLevel::High),
        ],
        data_command: vec![
            PinTransaction::set(MockLevel::Low),
            PinTransaction::set(MockLevel::High),
        ],
        spi: vec![
            SpiTransaction::write_vec(vec![0x12]),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![0x01, 0x02]),
            SpiTransaction::flush(),
        ],
        busy: busy_pin_sequence(1),
        ..Expect::default()
    };

    let mut epd = expect.interface(Config::default());
    epd.write_pin(Pin::CsMaster, PinState::Low).unwrap();
    epd.write_pin(Pin::DataCommand, PinState::Low).unwrap();
    epd.transfer_byte(0x12).unwrap();
    epd.write_pin(Pin::DataCommand, PinState::High).unwrap();
    epd.transfer_bytes(&[0x01, 0x02]).unwrap();
    epd.write_pin(Pin::CsMaster, PinState::High).unwrap();
    epd.wait_until_ready().unwrap();

    let delay = finish(epd);
    assert_eq!(delay.ms_calls, [10]);
}

// ---------------------------------------------------------------------------
// Test: read_pin samples BUSY
// ---------------------------------------------------------------------------

#[test]
fn test_read_busy_pin() {
    let expect = Expect {
        busy: vec![
            PinTransaction::get(MockLevel::Low),
            PinTransaction::get(MockLevel::High),
        ],
        ..Expect::default()
    };

    let mut epd = expect.interface(Config::default());
    assert!(matches!(epd.read_pin(Pin::Busy), Ok(PinState::Low)));
    assert!(matches!(epd.read_pin(Pin::Busy), Ok(PinState::High)));

    finish(epd);
}

// ---------------------------------------------------------------------------
// Test: BUSY is never written
// ---------------------------------------------------------------------------

#[test]
fn test_write_to_busy_pin_touches_nothing() {
    let mut epd = Expect::default().interface(Config::default());
    let result = epd.write_pin(Pin::Busy, PinState::Low);
    assert!(matches!(result, Err(InterfaceError::Direction(Pin::Busy))));

    finish(epd);
}
