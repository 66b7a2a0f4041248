//! # PT2313 Bus Transport
//!
//! The PT2313 driver talks to the chip through
//! [`embedded_hal::blocking::i2c::Write`], so any HAL I²C implementation will
//! do. This module provides [`PolledBus`], an implementation of that trait for
//! bare I²C peripherals that only offer start/stop/byte primitives and status
//! flags (as found on small microcontrollers such as the STM8).
//!
//! A transaction is:
//!
//! 1. Generate a start condition
//! 2. Send the address byte with the write bit, wait for the address phase
//! 3. Send the data byte(s), waiting for each to be transferred
//! 4. Generate a stop condition
//! 5. Wait for the bus to go idle
//!
//! How long to wait is up to the [`WaitPolicy`]. The default, [`Blocking`],
//! waits forever.

//
// Public Types
//

/// The low-level primitives of an I²C peripheral which has already been
/// configured (clock, rise time, etc) and enabled.
pub trait RawBus {
    /// Turn on acknowledge generation.
    fn enable_acknowledge(&mut self);
    /// Generate a start condition.
    fn generate_start(&mut self);
    /// Put a byte in the data register.
    fn write_byte(&mut self, byte: u8);
    /// Generate a stop condition.
    fn generate_stop(&mut self);
    /// Has the address phase completed?
    fn address_sent(&self) -> bool;
    /// Has the last data byte been transferred?
    fn byte_transferred(&self) -> bool;
    /// Is the bus in the middle of a transaction?
    fn is_busy(&self) -> bool;
}

/// Decides how long to keep polling a status flag.
pub trait WaitPolicy {
    /// Called before waiting on a new flag.
    fn restart(&mut self);
    /// Called once per unsuccessful poll. Return `false` to give up.
    fn keep_waiting(&mut self) -> bool;
}

/// Wait forever. A missing acknowledge or a stuck bus hangs the caller.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Blocking;

/// Give up after a fixed number of polls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpinLimit {
    limit: u32,
    remaining: u32,
}

/// The part of the transaction we were waiting on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Address byte
    Address,
    /// Data byte
    Data,
    /// Return to idle after the stop condition
    Stop,
}

/// Things that can go wrong on a [`PolledBus`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The [`WaitPolicy`] gave up.
    Timeout(Phase),
}

/// An [`embedded_hal::blocking::i2c::Write`] implementation built on a
/// [`RawBus`].
pub struct PolledBus<R, W = Blocking> {
    raw: R,
    wait: W,
}

//
// impls on Public Types
//

impl WaitPolicy for Blocking {
    fn restart(&mut self) {}

    fn keep_waiting(&mut self) -> bool {
        true
    }
}

impl SpinLimit {
    /// Allow up to `limit` polls per flag.
    pub fn new(limit: u32) -> SpinLimit {
        SpinLimit {
            limit,
            remaining: limit,
        }
    }
}

impl WaitPolicy for SpinLimit {
    fn restart(&mut self) {
        self.remaining = self.limit;
    }

    fn keep_waiting(&mut self) -> bool {
        if self.remaining == 0 {
            false
        } else {
            self.remaining -= 1;
            true
        }
    }
}

impl<R> PolledBus<R, Blocking>
where
    R: RawBus,
{
    /// Wrap a peripheral. Waits on it will never time out.
    pub fn new(raw: R) -> PolledBus<R, Blocking> {
        PolledBus::with_policy(raw, Blocking)
    }
}

impl<R, W> PolledBus<R, W>
where
    R: RawBus,
    W: WaitPolicy,
{
    /// Wrap a peripheral, using the given policy for every wait.
    pub fn with_policy(raw: R, wait: W) -> PolledBus<R, W> {
        PolledBus { raw, wait }
    }

    /// Give back the peripheral.
    pub fn release(self) -> R {
        self.raw
    }

    /// Poll until `ready` says so, or the policy gives up.
    fn wait_for<F>(&mut self, phase: Phase, ready: F) -> Result<(), BusError>
    where
        F: Fn(&R) -> bool,
    {
        self.wait.restart();
        while !ready(&self.raw) {
            if !self.wait.keep_waiting() {
                #[cfg(feature = "defmt")]
                defmt::warn!("PT2313 bus timeout in {} phase", phase);
                return Err(BusError::Timeout(phase));
            }
        }
        Ok(())
    }

    fn transfer(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.raw.generate_start();
        self.raw.write_byte(address << 1);
        self.wait_for(Phase::Address, |raw| raw.address_sent())?;
        for byte in bytes {
            self.raw.write_byte(*byte);
            self.wait_for(Phase::Data, |raw| raw.byte_transferred())?;
        }
        Ok(())
    }
}

impl<R, W> embedded_hal::blocking::i2c::Write for PolledBus<R, W>
where
    R: RawBus,
    W: WaitPolicy,
{
    type Error = BusError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.raw.enable_acknowledge();
        let result = self.transfer(address, bytes);
        // Always release the bus, even if a phase timed out
        self.raw.generate_stop();
        let idle = self.wait_for(Phase::Stop, |raw| !raw.is_busy());
        result.and(idle)
    }
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::blocking::i2c::Write;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Event {
        Ack,
        Start,
        Byte(u8),
        Stop,
    }

    /// Records what the driver did. Each flag reads false `delay` times
    /// before it reads true; `stuck` flags never become true.
    #[derive(Default)]
    struct FakeBus {
        events: Vec<Event>,
        delay: u32,
        polls: core::cell::Cell<u32>,
        stuck_address: bool,
        stuck_idle: bool,
    }

    impl FakeBus {
        fn flag(&self, stuck: bool) -> bool {
            if stuck {
                return false;
            }
            let polls = self.polls.get() + 1;
            if polls > self.delay {
                self.polls.set(0);
                true
            } else {
                self.polls.set(polls);
                false
            }
        }
    }

    impl RawBus for FakeBus {
        fn enable_acknowledge(&mut self) {
            self.events.push(Event::Ack);
        }
        fn generate_start(&mut self) {
            self.events.push(Event::Start);
        }
        fn write_byte(&mut self, byte: u8) {
            self.events.push(Event::Byte(byte));
        }
        fn generate_stop(&mut self) {
            self.events.push(Event::Stop);
        }
        fn address_sent(&self) -> bool {
            self.flag(self.stuck_address)
        }
        fn byte_transferred(&self) -> bool {
            self.flag(false)
        }
        fn is_busy(&self) -> bool {
            !self.flag(self.stuck_idle)
        }
    }

    #[test]
    fn single_byte_transaction() {
        let mut bus = PolledBus::new(FakeBus {
            delay: 3,
            ..Default::default()
        });
        bus.write(0x44, &[0x67]).unwrap();
        let raw = bus.release();
        assert_eq!(
            raw.events,
            [
                Event::Ack,
                Event::Start,
                Event::Byte(0x88),
                Event::Byte(0x67),
                Event::Stop
            ]
        );
    }

    #[test]
    fn spin_limit_is_enough_for_slow_bus() {
        let mut bus = PolledBus::with_policy(
            FakeBus {
                delay: 5,
                ..Default::default()
            },
            SpinLimit::new(5),
        );
        assert_eq!(bus.write(0x44, &[0x00]), Ok(()));
    }

    #[test]
    fn spin_limit_times_out_on_missing_ack() {
        let mut bus = PolledBus::with_policy(
            FakeBus {
                stuck_address: true,
                ..Default::default()
            },
            SpinLimit::new(10),
        );
        assert_eq!(
            bus.write(0x44, &[0x5F]),
            Err(BusError::Timeout(Phase::Address))
        );
        let raw = bus.release();
        // Data byte never sent, but the bus is still released
        assert_eq!(
            raw.events,
            [Event::Ack, Event::Start, Event::Byte(0x88), Event::Stop]
        );
    }

    #[test]
    fn spin_limit_times_out_on_stuck_bus() {
        let mut bus = PolledBus::with_policy(
            FakeBus {
                stuck_idle: true,
                ..Default::default()
            },
            SpinLimit::new(10),
        );
        assert_eq!(bus.write(0x44, &[0x5F]), Err(BusError::Timeout(Phase::Stop)));
    }

    #[test]
    fn spin_limit_restarts_per_flag() {
        let mut policy = SpinLimit::new(2);
        assert!(policy.keep_waiting());
        assert!(policy.keep_waiting());
        assert!(!policy.keep_waiting());
        policy.restart();
        assert!(policy.keep_waiting());
    }
}

//
// End of file
//
