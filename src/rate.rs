//! Validated arguments for the motion commands of [`crate::HandController`].
//!
//! Each type checks its range when it is built, so an invalid value never reaches the wire.

use crate::protocol::{codec, Command, Target};
use crate::Error;

/// Steps of the fixed slew rates, in fractions of a rotation per second.
/// Step 0 stops the axis, steps 1 to 5 are 1, 2, 5, 15 and 30 arcmin/s, steps 6 to 9 are 1, 2, 5 and 10 deg/s.
const SLEW_RATES: [f64; 10] = [
    0.0,
    1.0 / (360.0 * 60.0),
    2.0 / (360.0 * 60.0),
    5.0 / (360.0 * 60.0),
    15.0 / (360.0 * 60.0),
    30.0 / (360.0 * 60.0),
    1.0 / 360.0,
    2.0 / 360.0,
    5.0 / 360.0,
    10.0 / 360.0,
];

/// A motorized axis of an alt-azimuth mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Altitude (declination on an equatorial wedge)
    Altitude,
    /// Azimuth (right ascension on an equatorial wedge)
    Azimuth,
}

impl Axis {
    /// The motor controller driving this axis.
    pub fn target(self) -> Target {
        match self {
            Axis::Altitude => Target::Alt,
            Axis::Azimuth => Target::Azm,
        }
    }

    /// The axis driven by `target`, if it is a motor controller.
    pub fn from_target(target: Target) -> Option<Self> {
        match target {
            Target::Alt => Some(Axis::Altitude),
            Target::Azm => Some(Axis::Azimuth),
            _ => None,
        }
    }
}

/// Direction of travel, selected on the wire by the choice of opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increasing position
    Positive,
    /// Decreasing position
    Negative,
}

/// A fixed slew rate step in `-9..=9`. The sign selects the direction, zero stops the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlewRate(i8);

impl SlewRate {
    /// Fastest step.
    pub const MAX: i8 = 9;
    /// Stops the axis.
    pub const STOP: SlewRate = SlewRate(0);

    /// Creates a slew rate, rejecting steps outside `-9..=9`.
    pub fn new(step: i32) -> Result<Self, Error> {
        let max = i32::from(Self::MAX);
        if !(-max..=max).contains(&step) {
            return Err(Error::ArgumentRange {
                name: "slew rate",
                value: step as f64,
                min: -max as f64,
                max: max as f64,
            });
        }
        Ok(SlewRate(step as i8))
    }

    /// The signed step.
    pub fn step(self) -> i8 {
        self.0
    }

    /// Approximate angular speed of this step, in signed fractions of a rotation per second.
    pub fn turns_per_second(self) -> f64 {
        SLEW_RATES[self.0.unsigned_abs() as usize].copysign(f64::from(self.0))
    }

    pub(crate) fn command(self) -> (Command, [u8; 1]) {
        let command = if self.0 >= 0 {
            Command::MovePos
        } else {
            Command::MoveNeg
        };
        (command, [self.0.unsigned_abs()])
    }
}

/// Wire patterns selecting a celestial tracking rate instead of a numeric one.
const SIDEREAL: [u8; 3] = [0xff, 0xff, 0x00];
const SOLAR: [u8; 3] = [0xff, 0xfe, 0x00];
const LUNAR: [u8; 3] = [0xff, 0xfd, 0x00];

/// A guide rate: either one of the celestial references or a numeric rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuideRate {
    /// Track at the sidereal rate
    Sidereal,
    /// Track the sun
    Solar,
    /// Track the moon
    Lunar,
    /// Track at a fixed rate, in fractions of a rotation per second. Must be within `0..1`.
    Rate(f64),
}

impl GuideRate {
    /// Builds a guide rate from a signed rate and celestial reference flags.
    ///
    /// The sign of `rate` picks the direction, zero counting as positive. Setting more
    /// than one flag, or a flag together with a rate other than `±1` or `0`, is rejected
    /// rather than guessing which one was meant.
    pub fn from_flags(rate: f64, sidereal: bool, solar: bool, lunar: bool) -> Result<(Direction, Self), Error> {
        let direction = if rate >= 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        };
        let flags = [sidereal, solar, lunar].iter().filter(|f| **f).count();
        if flags == 0 {
            let guide = GuideRate::Rate(rate.abs());
            guide.validate()?;
            return Ok((direction, guide));
        }
        if flags > 1 || !(rate == 0.0 || rate.abs() == 1.0) {
            return Err(Error::ArgumentRange {
                name: "guide rate with celestial reference",
                value: rate,
                min: -1.0,
                max: 1.0,
            });
        }
        let guide = if sidereal {
            GuideRate::Sidereal
        } else if solar {
            GuideRate::Solar
        } else {
            GuideRate::Lunar
        };
        Ok((direction, guide))
    }

    pub(crate) fn validate(self) -> Result<(), Error> {
        match self {
            GuideRate::Rate(r) if !(0.0..1.0).contains(&r) => Err(Error::ArgumentRange {
                name: "guide rate",
                value: r,
                min: 0.0,
                max: 1.0,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn encode(self) -> Result<[u8; 3], Error> {
        self.validate()?;
        Ok(match self {
            GuideRate::Sidereal => SIDEREAL,
            GuideRate::Solar => SOLAR,
            GuideRate::Lunar => LUNAR,
            GuideRate::Rate(r) => codec::encode_angle24(r)?,
        })
    }
}

/// Backlash compensation in `-99..=99`. The sign selects which direction's backlash is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backlash(i8);

impl Backlash {
    /// Largest compensation value.
    pub const MAX: i8 = 99;

    /// Creates a backlash value, rejecting values outside `-99..=99`.
    pub fn new(value: i32) -> Result<Self, Error> {
        let max = i32::from(Self::MAX);
        if !(-max..=max).contains(&value) {
            return Err(Error::ArgumentRange {
                name: "backlash",
                value: value as f64,
                min: -max as f64,
                max: max as f64,
            });
        }
        Ok(Backlash(value as i8))
    }

    /// The signed value.
    pub fn value(self) -> i8 {
        self.0
    }

    pub(crate) fn command(self) -> (Command, [u8; 1]) {
        let command = if self.0 >= 0 {
            Command::SetPosBacklash
        } else {
            Command::SetNegBacklash
        };
        (command, [self.0.unsigned_abs()])
    }
}

/// The direction from which a goto finally approaches its target, to take up backlash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    /// Approach from below
    Positive,
    /// Approach from above
    Negative,
}

impl Approach {
    pub(crate) fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            Approach::Positive
        } else {
            Approach::Negative
        }
    }

    pub(crate) fn byte(self) -> u8 {
        match self {
            Approach::Positive => 0,
            Approach::Negative => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn slew_rate_range() {
        assert_eq!(SlewRate::new(9).unwrap().step(), 9);
        assert_eq!(SlewRate::new(-9).unwrap().step(), -9);
        assert!(matches!(
            SlewRate::new(15),
            Err(Error::ArgumentRange { value, .. }) if value == 15.0
        ));
        assert!(SlewRate::new(-10).is_err());
    }

    #[test]
    fn slew_rate_commands() {
        assert_eq!(SlewRate::new(9).unwrap().command(), (Command::MovePos, [9]));
        assert_eq!(SlewRate::new(-4).unwrap().command(), (Command::MoveNeg, [4]));
        assert_eq!(SlewRate::STOP.command(), (Command::MovePos, [0]));
    }

    #[test]
    fn slew_rate_speeds() {
        assert_eq!(SlewRate::STOP.turns_per_second(), 0.0);
        assert_eq!(SlewRate::new(9).unwrap().turns_per_second(), 10.0 / 360.0);
        assert_eq!(SlewRate::new(-6).unwrap().turns_per_second(), -1.0 / 360.0);
    }

    #[test]
    fn guide_rate_sentinels() {
        assert_eq!(GuideRate::Sidereal.encode().unwrap(), [0xff, 0xff, 0x00]);
        assert_eq!(GuideRate::Solar.encode().unwrap(), [0xff, 0xfe, 0x00]);
        assert_eq!(GuideRate::Lunar.encode().unwrap(), [0xff, 0xfd, 0x00]);
        assert_eq!(GuideRate::Rate(0.5).encode().unwrap(), [0x80, 0x00, 0x00]);
        assert!(GuideRate::Rate(1.5).encode().is_err());
        assert!(GuideRate::Rate(f64::NAN).encode().is_err());
    }

    #[test]
    fn guide_rate_flags_are_exclusive() {
        assert_eq!(
            GuideRate::from_flags(1.0, true, false, false).unwrap(),
            (Direction::Positive, GuideRate::Sidereal)
        );
        assert_eq!(
            GuideRate::from_flags(-1.0, false, false, true).unwrap(),
            (Direction::Negative, GuideRate::Lunar)
        );
        assert_eq!(
            GuideRate::from_flags(0.0, false, true, false).unwrap(),
            (Direction::Positive, GuideRate::Solar)
        );
        assert_eq!(
            GuideRate::from_flags(-0.25, false, false, false).unwrap(),
            (Direction::Negative, GuideRate::Rate(0.25))
        );
        // a reference and an explicit rate at once
        assert!(GuideRate::from_flags(0.25, true, false, false).is_err());
        // two references at once
        assert!(GuideRate::from_flags(1.0, true, true, false).is_err());
    }

    #[test]
    fn backlash_range() {
        assert_eq!(Backlash::new(99).unwrap().command(), (Command::SetPosBacklash, [99]));
        assert_eq!(Backlash::new(-5).unwrap().command(), (Command::SetNegBacklash, [5]));
        assert_eq!(Backlash::new(0).unwrap().command(), (Command::SetPosBacklash, [0]));
        assert!(Backlash::new(100).is_err());
        assert!(Backlash::new(-100).is_err());
    }

    #[test]
    fn axis_targets() {
        assert_eq!(Axis::Altitude.target(), Target::Alt);
        assert_eq!(Axis::from_target(Target::Azm), Some(Axis::Azimuth));
        assert_eq!(Axis::from_target(Target::HandController), None);
    }
}
