//! Async busy-wait over `embedded-hal-async` delays
//!
//! On an async executor (Embassy, or `esp-idf-svc` with its time driver)
//! each poll interval is an `.await`, so the task gives the executor back
//! instead of blocking the thread. Dropping the future abandons the wait at
//! the next yield point.

use core::fmt::Debug;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use super::{Interface, InterfaceError, sample};
use crate::busy::{BusyPoll, Step};

impl<SPI, CSM, CSS, RST, DC, BUSY, PWR, D, PinErr> Interface<SPI, CSM, CSS, RST, DC, BUSY, PWR, D>
where
    SPI: embedded_hal::spi::ErrorType,
    BUSY: InputPin<Error = PinErr>,
    D: DelayNs,
    PinErr: Debug,
{
    /// Suspend the calling task for at least `ms` milliseconds
    pub async fn delay_ms_async(&mut self, ms: u32) {
        DelayNs::delay_ms(&mut self.delay, ms).await;
    }

    /// Wait until the busy line reports ready, awaiting between polls
    ///
    /// Same polling and timeout rules as
    /// [`HardwareInterface::wait_until_ready`](crate::HardwareInterface::wait_until_ready).
    pub async fn wait_until_ready_async(
        &mut self,
    ) -> Result<(), InterfaceError<SPI::Error, PinErr>> {
        let mut poll = BusyPoll::start(&self.config);
        loop {
            let level = sample(&mut self.pins.busy)?;
            match poll.step(level) {
                Step::Ready => return Ok(()),
                Step::Yield(ms) => DelayNs::delay_ms(&mut self.delay, ms).await,
                Step::TimedOut => return Err(InterfaceError::Timeout),
            }
        }
    }
}
