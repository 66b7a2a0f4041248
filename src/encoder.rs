//! # PT2313 Register Encoder
//!
//! Pure functions which turn logical audio parameters into the raw bytes the
//! PT2313 expects on the wire. Nothing in here touches the bus.
//!
//! Every function clamps its input to the valid range first, so out-of-range
//! values are pulled to the nearest bound rather than rejected.

//
// Public Data
//

/// Highest volume step. Volume zero is silent(ish), 63 is loudest.
pub const VOLUME_MAX: i8 = 63;

/// Largest boost or cut for bass, treble and balance.
pub const TONE_MAX: i8 = 7;

/// Lowest numbered input channel.
pub const INPUT_MIN: i8 = 1;

/// Highest numbered input channel.
pub const INPUT_MAX: i8 = 4;

/// Highest gain boost step.
pub const GAIN_MAX: i8 = 3;

/// The Switch register contents after power-on: input 4, loudness off, 0 dB
/// gain.
pub const SWITCH_DEFAULT: u8 = 0b0101_1111;

/// Attenuation/Mute register value used when muted.
pub const ATTENUATION_MUTED: u8 = 0xFF;

/// Attenuation/Mute register value used when not muted.
pub const ATTENUATION_UNMUTED: u8 = 0xE0;

/// Bits in the Switch register which select the input channel.
pub const INPUT_MASK: u8 = 0b0000_0011;

/// Bits in the Switch register which hold the gain code.
pub const GAIN_MASK: u8 = 0b0001_1000;

/// Bit in the Switch register which turns loudness *off* when set.
pub const LOUDNESS_MASK: u8 = 0b0000_0100;

const GAIN_SHIFT: u8 = 3;

//
// Public Types
//

/// The byte-class prefixes the PT2313 uses to tell registers apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Master volume, 6-bit attenuation in the low bits
    Volume = 0x00,
    /// Bass, 4-bit code in the low nibble
    Bass = 0x60,
    /// Treble, 4-bit code in the low nibble
    Treble = 0x70,
    /// Front left speaker attenuator, 5-bit
    FrontLeft = 0x80,
    /// Front right speaker attenuator, 5-bit
    FrontRight = 0xA0,
    /// Rear left speaker attenuator, 5-bit
    RearLeft = 0xC0,
    /// Rear right speaker attenuator, 5-bit
    RearRight = 0xE0,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

//
// Public Functions
//

/// Limit `value` to `min..=max`.
pub fn clamp<T: PartialOrd>(value: T, max: T, min: T) -> T {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Encode a volume step (0 = quietest, 63 = loudest).
///
/// The chip wants attenuation, so the step is inverted.
pub fn volume(volume: i8) -> u8 {
    (VOLUME_MAX - clamp(volume, VOLUME_MAX, 0)) as u8 | u8::from(Register::Volume)
}

/// Encode a bass setting from -7 (full cut) to +7 (full boost).
pub fn bass(bass: i8) -> u8 {
    u8::from(Register::Bass) | tone_code(bass)
}

/// Encode a treble setting from -7 (full cut) to +7 (full boost).
pub fn treble(treble: i8) -> u8 {
    u8::from(Register::Treble) | tone_code(treble)
}

/// The 4-bit tone code shared by bass and treble.
///
/// Cuts -7..=0 map to 0..=7, boosts 1..=7 map to 14..=8.
pub fn tone_code(value: i8) -> u8 {
    let value = clamp(value, TONE_MAX, -TONE_MAX);
    if value > 0 {
        (15 - value) as u8
    } else {
        (value + 7) as u8
    }
}

/// Encode a balance setting into the four speaker attenuator bytes.
///
/// Negative values attenuate the right-hand speakers, positive values the
/// left-hand ones. The bytes come out in the order Front Left, Front Right,
/// Rear Left, Rear Right.
pub fn balance(balance: i8) -> [u8; 4] {
    let balance = clamp(balance, TONE_MAX, -TONE_MAX);
    let magnitude = balance.unsigned_abs();
    let (left, right) = if balance < 0 {
        (0, magnitude)
    } else {
        (magnitude, 0)
    };
    [
        u8::from(Register::FrontLeft) | left,
        u8::from(Register::FrontRight) | right,
        u8::from(Register::RearLeft) | left,
        u8::from(Register::RearRight) | right,
    ]
}

/// Attenuation/Mute register value for the given mute state.
pub fn mute(muted: bool) -> u8 {
    if muted {
        ATTENUATION_MUTED
    } else {
        ATTENUATION_UNMUTED
    }
}

/// Input select bits (1..=4 becomes 0b00..=0b11).
pub fn input_bits(input: i8) -> u8 {
    (clamp(input, INPUT_MAX, INPUT_MIN) - INPUT_MIN) as u8
}

/// Gain bits, already shifted into place. Gain 0 is 0 dB, 3 is the biggest
/// boost, which the chip encodes as zero.
pub fn gain_bits(gain: i8) -> u8 {
    ((GAIN_MAX - clamp(gain, GAIN_MAX, 0)) as u8) << GAIN_SHIFT
}

/// Loudness bit. The chip uses a clear bit to mean "on".
pub fn loudness_bits(enabled: bool) -> u8 {
    if enabled {
        0
    } else {
        LOUDNESS_MASK
    }
}

/// Replace only the bits under `mask` in `register`.
pub fn merge_bits(register: u8, value: u8, mask: u8) -> u8 {
    (register & !mask) | (value & mask)
}

/// Switch register with the input channel replaced.
pub fn with_input(switch: u8, input: i8) -> u8 {
    merge_bits(switch, input_bits(input), INPUT_MASK)
}

/// Switch register with the gain replaced.
pub fn with_gain(switch: u8, gain: i8) -> u8 {
    merge_bits(switch, gain_bits(gain), GAIN_MASK)
}

/// Switch register with the loudness bit replaced.
pub fn with_loudness(switch: u8, enabled: bool) -> u8 {
    merge_bits(switch, loudness_bits(enabled), LOUDNESS_MASK)
}

/// Decode the input channel (1..=4) from a Switch register value.
pub fn input_from(switch: u8) -> i8 {
    (switch & INPUT_MASK) as i8 + INPUT_MIN
}

/// Decode the gain step (0..=3) from a Switch register value.
pub fn gain_from(switch: u8) -> i8 {
    GAIN_MAX - ((switch & GAIN_MASK) >> GAIN_SHIFT) as i8
}

/// Decode whether loudness is on from a Switch register value.
pub fn loudness_from(switch: u8) -> bool {
    switch & LOUDNESS_MASK == 0
}

//
// Tests
//


//
// End of file
//
