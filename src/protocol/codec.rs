//! Conversions between the mount's fixed point wire values and engineering units.
//!
//! Angles travel on the bus as a 24-bit big-endian fraction of a full rotation.
//! Small signed quantities use a 16-bit big-endian integer.

use std::fmt;

use byteorder::{ByteOrder, BE};

use crate::DomainError;

/// One full rotation in 24-bit wire units.
const TURN: f64 = (1u32 << 24) as f64;

/// An angle split into degrees, minutes and seconds, with the sign carried separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    /// True for angles below zero
    pub negative: bool,
    /// Whole degrees, 0..360
    pub degrees: u16,
    /// Whole minutes, 0..60
    pub minutes: u8,
    /// Seconds, 0..60
    pub seconds: f64,
}

impl Dms {
    /// Creates a validated [`Dms`].
    pub fn new(negative: bool, degrees: u16, minutes: u8, seconds: f64) -> Result<Self, DomainError> {
        if degrees >= 360 {
            return Err(DomainError::Degrees(degrees));
        }
        if minutes >= 60 {
            return Err(DomainError::Minutes(minutes));
        }
        if !(0.0..60.0).contains(&seconds) {
            return Err(DomainError::Seconds(seconds));
        }
        Ok(Self {
            negative,
            degrees,
            minutes,
            seconds,
        })
    }

    /// Converts to a signed fraction of a full rotation.
    pub fn to_fraction(&self) -> f64 {
        let f = self.degrees as f64 / 360.0
            + self.minutes as f64 / (360.0 * 60.0)
            + self.seconds / (360.0 * 3600.0);
        if self.negative {
            -f
        } else {
            f
        }
    }
}

impl fmt::Display for Dms {
    /// Seconds are truncated, not rounded, to one decimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = (self.seconds * 10.0).floor() / 10.0;
        write!(
            f,
            "{}{:03}°{:02}'{:04.1}\"",
            if self.negative { "-" } else { "" },
            self.degrees,
            self.minutes,
            tenths
        )
    }
}

/// Splits a signed fraction of a rotation into degrees, minutes and seconds.
///
/// The fraction must be finite and strictly within (-1, 1).
pub fn fraction_to_dms(f: f64) -> Result<Dms, DomainError> {
    if !f.is_finite() || f.abs() >= 1.0 {
        return Err(DomainError::Fraction(f));
    }
    let d = 360.0 * f.abs();
    let degrees = d.floor();
    let minutes = ((d - degrees) * 60.0).floor();
    let seconds = ((d - degrees) * 3600.0 - minutes * 60.0).max(0.0);
    Ok(Dms {
        negative: f < 0.0,
        degrees: degrees as u16,
        minutes: minutes as u8,
        seconds,
    })
}

/// Converts degrees, minutes and seconds into a signed fraction of a rotation.
pub fn dms_to_fraction(negative: bool, degrees: u16, minutes: u8, seconds: f64) -> Result<f64, DomainError> {
    Dms::new(negative, degrees, minutes, seconds).map(|dms| dms.to_fraction())
}

/// Encodes a fraction of a rotation as 3 big-endian bytes of `round(f * 2^24)`.
///
/// Negative fractions wrap around, so `-0.25` is sent as `0.75`.
pub fn encode_angle24(f: f64) -> Result<[u8; 3], DomainError> {
    if !f.is_finite() || f.abs() > 1.0 {
        return Err(DomainError::Fraction(f));
    }
    let raw = (f * TURN).round() as i64;
    let mut buf = [0u8; 3];
    BE::write_u24(&mut buf, (raw & 0xff_ffff) as u32);
    Ok(buf)
}

/// Decodes 3 big-endian bytes into a fraction of a rotation in `[0, 1)`.
pub fn decode_angle24(bytes: [u8; 3]) -> f64 {
    BE::read_u24(&bytes) as f64 / TURN
}

/// Encodes a signed integer as 2 big-endian bytes.
///
/// None of the [`crate::HandController`] commands carry a 2 byte field. This is for raw
/// commands sent through [`crate::Session::send_named`].
///
/// ```rust
/// let data = auxstar::protocol::codec::encode_int2(-2)?;
/// assert_eq!(data, [0xff, 0xfe]);
/// # Ok::<(), auxstar::DomainError>(())
/// ```
pub fn encode_int2(value: i32) -> Result<[u8; 2], DomainError> {
    let value = i16::try_from(value).map_err(|_| DomainError::Int2(value))?;
    let mut buf = [0u8; 2];
    BE::write_i16(&mut buf, value);
    Ok(buf)
}

/// Decodes 2 big-endian bytes into a signed integer.
pub fn decode_int2(bytes: [u8; 2]) -> i32 {
    BE::read_i16(&bytes) as i32
}
