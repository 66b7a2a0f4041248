//! # PT2313 Driver
//!
//! This is a driver for the Princeton Technology PT2313 audio processor: a
//! four-input, four-speaker volume, tone and balance controller.
//!
//! The PT2313 is controlled over I²C. Every setting is one byte written in
//! its own bus transaction, and the top bits of the byte select which register
//! it lands in.
//!
//! The [`Pt2313`] object must cache some register contents because the PT2313
//! only has a *write-only* interface and you cannot read back any register
//! contents. In particular, input select, gain and loudness share a single
//! "Switch" register, so changing one of them means sending the whole byte
//! again with the other fields preserved.
//!
//! Out-of-range settings are clamped to the nearest valid value.
//!
//! # Example
//!
//! You might setup the PT2313 like this:
//!
//! ```rust
//! # use embedded_hal::blocking::i2c::Write;
//! # struct I2c;
//! # impl embedded_hal::blocking::i2c::Write for I2c {
//! #     type Error = ();
//! #     fn write(&mut self, address: embedded_hal::blocking::i2c::SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # let mut i2c = I2c;
//! let config = pt2313::Config::default().default_volume(30).default_input(2);
//! let mut pt2313 = pt2313::Pt2313::new(config);
//! if let Err(e) = pt2313.reset(&mut i2c) {
//!     // PT2313 didn't respond
//! }
//! pt2313.set_loudness(&mut i2c, true).ok();
//! pt2313.set_gain(&mut i2c, 1).ok();
//! pt2313.set_bass(&mut i2c, 3).ok();
//! pt2313.set_balance(&mut i2c, -2).ok();
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod encoder;
pub mod transport;

use embedded_hal::blocking::i2c::Write;

//
// Public Types
//

/// The 7-bit I²C address of a PT2313.
///
/// Some firmware quotes the address as `0x88`, which is the same device with
/// the write bit already shifted in. Use [`BusAddress::from_write_byte`] for
/// those.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

/// Settings for a [`Pt2313`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Where the chip lives on the bus
    pub bus_address: BusAddress,
    /// Volume applied by [`Pt2313::reset`]
    pub default_volume: i8,
    /// Input channel applied by [`Pt2313::reset`]
    pub default_input: i8,
}

/// Represents the state inside our PT2313 chip.
pub struct Pt2313 {
    config: Config,
    switch_register: u8,
    attenuation_register: u8,
}

//
// impls on Public Types
//

impl BusAddress {
    /// The usual address.
    pub const DEFAULT: BusAddress = BusAddress(0x44);

    /// Use a 7-bit address.
    pub const fn new(address: u8) -> BusAddress {
        BusAddress(address & 0x7F)
    }

    /// Use an 8-bit address+write byte, such as `0x88`.
    pub const fn from_write_byte(byte: u8) -> BusAddress {
        BusAddress(byte >> 1)
    }
}

impl Default for BusAddress {
    fn default() -> BusAddress {
        BusAddress::DEFAULT
    }
}

impl From<BusAddress> for u8 {
    fn from(addr: BusAddress) -> u8 {
        addr.0
    }
}

impl Config {
    /// Set the bus address.
    pub fn bus_address(mut self, bus_address: BusAddress) -> Config {
        self.bus_address = bus_address;
        self
    }

    /// Set the volume used on reset (0..=63).
    pub fn default_volume(mut self, volume: i8) -> Config {
        self.default_volume = volume;
        self
    }

    /// Set the input used on reset (1..=4).
    pub fn default_input(mut self, input: i8) -> Config {
        self.default_input = input;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bus_address: BusAddress::DEFAULT,
            default_volume: 20,
            default_input: 1,
        }
    }
}

impl Pt2313 {
    /// Create a new PT2313 proxy object.
    ///
    /// Nothing is sent to the chip. The cached registers start at their
    /// power-on values: not muted, input 4, 0 dB gain, loudness off.
    pub fn new(config: Config) -> Pt2313 {
        Pt2313 {
            config,
            switch_register: encoder::SWITCH_DEFAULT,
            attenuation_register: encoder::ATTENUATION_UNMUTED,
        }
    }

    /// The settings this object was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The address we write to.
    pub fn bus_address(&self) -> BusAddress {
        self.config.bus_address
    }

    /// Send one byte in its own transaction.
    fn send<B>(&self, bus: &mut B, byte: u8) -> Result<(), B::Error>
    where
        B: Write,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Sending 0x{:02x} to PT2313 at 0x{:02x}",
            byte,
            self.config.bus_address.0
        );
        bus.write(self.config.bus_address.into(), &[byte])
    }

    /// Update the cached Switch register and send all of it.
    fn set_switch_register<B>(&mut self, bus: &mut B, value: u8) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.switch_register = value;
        self.send(bus, self.switch_register)
    }

    /// Set the master volume.
    ///
    /// * A value of 0 is maximum attenuation
    /// * A value of 63 is 0 dB
    ///
    /// There is 1.25 dB per step.
    pub fn set_volume<B>(&mut self, bus: &mut B, volume: i8) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.send(bus, encoder::volume(volume))
    }

    /// Set the bass, from -7 (-14 dB) to +7 (+14 dB). Zero is flat.
    pub fn set_bass<B>(&mut self, bus: &mut B, bass: i8) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.send(bus, encoder::bass(bass))
    }

    /// Set the treble, from -7 (-14 dB) to +7 (+14 dB). Zero is flat.
    pub fn set_treble<B>(&mut self, bus: &mut B, treble: i8) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.send(bus, encoder::treble(treble))
    }

    /// Set the left/right balance, from -7 to +7.
    ///
    /// Negative values turn down the right-hand speakers, positive values turn
    /// down the left-hand speakers. All four speaker attenuators are written,
    /// so this takes four transactions. If one fails, the rest are not sent.
    pub fn set_balance<B>(&mut self, bus: &mut B, balance: i8) -> Result<(), B::Error>
    where
        B: Write,
    {
        for byte in encoder::balance(balance) {
            self.send(bus, byte)?;
        }
        Ok(())
    }

    /// Mute or unmute the output.
    ///
    /// Unmuting always goes back to the default attenuation, whatever was
    /// there before muting.
    pub fn set_mute<B>(&mut self, bus: &mut B, muted: bool) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.attenuation_register = encoder::mute(muted);
        self.send(bus, self.attenuation_register)
    }

    /// Get whether we muted the output.
    ///
    /// See [`Pt2313::set_mute`].
    pub fn is_muted(&self) -> bool {
        self.attenuation_register == encoder::ATTENUATION_MUTED
    }

    /// Select input channel 1 to 4.
    pub fn set_input<B>(&mut self, bus: &mut B, input: i8) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.set_switch_register(bus, encoder::with_input(self.switch_register, input))
    }

    /// Get the selected input channel.
    ///
    /// See [`Pt2313::set_input`].
    pub fn input(&self) -> i8 {
        encoder::input_from(self.switch_register)
    }

    /// Set the input gain boost.
    ///
    /// * A value of 0 is 0 dB
    /// * A value of 3 is +11.25 dB
    ///
    /// There is 3.75 dB per step.
    pub fn set_gain<B>(&mut self, bus: &mut B, gain: i8) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.set_switch_register(bus, encoder::with_gain(self.switch_register, gain))
    }

    /// Get the input gain boost.
    ///
    /// See [`Pt2313::set_gain`].
    pub fn gain(&self) -> i8 {
        encoder::gain_from(self.switch_register)
    }

    /// Turn loudness compensation on or off.
    pub fn set_loudness<B>(&mut self, bus: &mut B, enabled: bool) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.set_switch_register(bus, encoder::with_loudness(self.switch_register, enabled))
    }

    /// Get whether loudness compensation is on.
    pub fn loudness(&self) -> bool {
        encoder::loudness_from(self.switch_register)
    }

    /// The cached Switch register (input, gain and loudness).
    pub fn switch_register(&self) -> u8 {
        self.switch_register
    }

    /// The cached Attenuation/Mute register.
    pub fn attenuation_register(&self) -> u8 {
        self.attenuation_register
    }

    /// Go back to the configured volume and input, with balance, bass and
    /// treble centred.
    ///
    /// Mute, gain and loudness are left alone.
    pub fn reset<B>(&mut self, bus: &mut B) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.set_volume(bus, self.config.default_volume)?;
        self.set_input(bus, self.config.default_input)?;
        self.set_balance(bus, 0)?;
        self.set_bass(bus, 0)?;
        self.set_treble(bus, 0)?;
        Ok(())
    }

    /// Send the cached Switch and Attenuation/Mute registers to the chip
    /// again, e.g. after it has lost power.
    pub fn resend<B>(&mut self, bus: &mut B) -> Result<(), B::Error>
    where
        B: Write,
    {
        self.send(bus, self.switch_register)?;
        self.send(bus, self.attenuation_register)
    }
}

//
// Tests
//


//
// End of file
//
