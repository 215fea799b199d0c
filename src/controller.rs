use std::fmt;

use crate::bus::{Session, SessionConfig, SessionState};
use crate::protocol::codec::{self, Dms};
use crate::protocol::{Command, Target};
use crate::rate::{Approach, Axis, Backlash, Direction, GuideRate, SlewRate};
use crate::transport::Transport;
use crate::Error;

/// Firmware version of a device on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl Version {
    /// The version as the raw reply bytes in hex, e.g. `060d`.
    pub fn hex(&self) -> String {
        hex::encode([self.major, self.minor])
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A snapshot of the mount, as gathered by [`HandController::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// Altitude motor controller firmware
    pub alt_version: Version,
    /// Azimuth motor controller firmware
    pub azm_version: Version,
    /// Hand controller firmware
    pub hc_version: Version,
    /// Altitude position, as a fraction of a rotation
    pub altitude: f64,
    /// Azimuth position, as a fraction of a rotation
    pub azimuth: f64,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let angle = |turns: f64| {
            codec::fraction_to_dms(turns)
                .map(|dms| dms.to_string())
                .unwrap_or_else(|_| format!("{turns}"))
        };
        writeln!(f, "ALT version ............................. : {}", self.alt_version.hex())?;
        writeln!(f, "AZM version ............................. : {}", self.azm_version.hex())?;
        writeln!(f, "HC version .............................. : {}", self.hc_version.hex())?;
        writeln!(f, "ALT ..................................... : {}", angle(self.altitude))?;
        write!(f, "AZM ..................................... : {}", angle(self.azimuth))
    }
}

/// Typed commands for the motor controllers of an alt-azimuth mount.
///
/// Every method validates its arguments before anything is written and performs exactly one
/// exchange on the bus (or none, if validation fails). Nothing is retried: a goto or set command
/// that timed out should only be repeated after re-reading the position.
///
/// ```rust
/// # fn main() -> Result<(), auxstar::Error> {
/// use auxstar::{HandController, MockTransport, Target};
///
/// let mut transport = MockTransport::new();
/// transport.queue(&[0x07, 0x0b, b'#']);
/// let mut controller = HandController::new(transport);
/// let version = controller.get_version(Target::Alt)?;
/// assert_eq!(version.hex(), "070b");
/// # Ok(())
/// # }
/// ```
pub struct HandController<T: Transport> {
    session: Session<T>,
}

#[cfg(feature = "serial2")]
impl HandController<crate::SerialTransport> {
    /// Opens the hand controller on the serial port at `path`.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        Ok(Self::new(crate::SerialTransport::open(path)?))
    }
}

impl<T: Transport> HandController<T> {
    /// Creates a controller talking through the hand controller's passthrough command.
    pub fn new(transport: T) -> Self {
        Self {
            session: Session::new(transport),
        }
    }

    /// Creates a controller with custom session settings.
    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            session: Session::with_config(transport, config),
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// The underlying session, mutably. Useful to send commands without a typed wrapper.
    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    /// Returns the session to idle after a timeout or corrupted reply.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.session.reset()
    }

    /// The current exchange state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Closes the controller and releases the transport.
    pub fn close(self) -> Result<(), Error> {
        self.session.close()
    }

    /// The last position read from `axis`, as a fraction of a rotation. See [`Session::last_position`].
    pub fn last_position(&self, axis: Axis) -> Option<f64> {
        self.session.last_position(axis)
    }

    /// Reads the firmware version of `target`.
    pub fn get_version(&mut self, target: Target) -> Result<Version, Error> {
        let [major, minor] = self.query::<2>(target, Command::GetVer)?;
        Ok(Version { major, minor })
    }

    /// Reads the position of `target` as a fraction of a rotation in `[0, 1)`.
    pub fn get_position(&mut self, target: Target) -> Result<f64, Error> {
        self.query::<3>(target, Command::GetPosition)
            .map(codec::decode_angle24)
    }

    /// Slews `target` to `position` at the fast goto rate.
    pub fn goto_fast(&mut self, target: Target, position: Dms) -> Result<(), Error> {
        self.send_angle(target, Command::GotoFast, position.to_fraction())
    }

    /// Slews `target` to `position` at the slow goto rate, used for the final approach.
    pub fn goto_slow(&mut self, target: Target, position: Dms) -> Result<(), Error> {
        self.send_angle(target, Command::GotoSlow, position.to_fraction())
    }

    /// Tells `target` that it is currently at `position`, without moving it.
    pub fn set_position(&mut self, target: Target, position: Dms) -> Result<(), Error> {
        self.send_angle(target, Command::SetPosition, position.to_fraction())
    }

    /// Sets the guide rate of `target`.
    pub fn set_guide_rate(&mut self, target: Target, direction: Direction, rate: GuideRate) -> Result<(), Error> {
        let data = rate.encode()?;
        let command = match direction {
            Direction::Positive => Command::SetPosGuiderate,
            Direction::Negative => Command::SetNegGuiderate,
        };
        self.session.send_command(target, command, &data).map(drop)
    }

    /// Moves `target` at a fixed rate step in `-9..=9`. The axis keeps moving until a
    /// step of zero is sent, see [`HandController::stop`].
    pub fn slew_fixed(&mut self, target: Target, rate: i32) -> Result<(), Error> {
        let (command, data) = SlewRate::new(rate)?.command();
        self.session.send_command(target, command, &data).map(drop)
    }

    /// Stops a fixed rate slew of `target`.
    pub fn stop(&mut self, target: Target) -> Result<(), Error> {
        let (command, data) = SlewRate::STOP.command();
        self.session.send_command(target, command, &data).map(drop)
    }

    /// Sets the backlash compensation of `target`, in `-99..=99`. Negative values set the
    /// compensation applied when reversing into the negative direction.
    pub fn set_backlash(&mut self, target: Target, backlash: i32) -> Result<(), Error> {
        let (command, data) = Backlash::new(backlash)?.command();
        self.session.send_command(target, command, &data).map(drop)
    }

    /// Reads the backlash compensation of `target` for one direction.
    pub fn get_backlash(&mut self, target: Target, direction: Direction) -> Result<u8, Error> {
        let command = match direction {
            Direction::Positive => Command::GetPosBacklash,
            Direction::Negative => Command::GetNegBacklash,
        };
        let [value] = self.query::<1>(target, command)?;
        Ok(value)
    }

    /// Reads the goto approach direction of `target`.
    pub fn get_approach(&mut self, target: Target) -> Result<Approach, Error> {
        let [byte] = self.query::<1>(target, Command::GetApproach)?;
        Ok(Approach::from_byte(byte))
    }

    /// Sets the goto approach direction of `target`.
    pub fn set_approach(&mut self, target: Target, approach: Approach) -> Result<(), Error> {
        self.session
            .send_command(target, Command::SetApproach, &[approach.byte()])
            .map(drop)
    }

    /// Returns true when the cordwrap limit of `target` is enabled.
    pub fn poll_cordwrap(&mut self, target: Target) -> Result<bool, Error> {
        let [byte] = self.query::<1>(target, Command::PollCordwrap)?;
        Ok(byte != 0)
    }

    /// Enables the cordwrap limit of `target`.
    pub fn enable_cordwrap(&mut self, target: Target) -> Result<(), Error> {
        self.session.send_command(target, Command::EnableCordwrap, &[]).map(drop)
    }

    /// Disables the cordwrap limit of `target`.
    pub fn disable_cordwrap(&mut self, target: Target) -> Result<(), Error> {
        self.session.send_command(target, Command::DisableCordwrap, &[]).map(drop)
    }

    /// Reads the cordwrap limit position of `target` as a fraction of a rotation.
    pub fn get_cordwrap_position(&mut self, target: Target) -> Result<f64, Error> {
        self.query::<3>(target, Command::GetCordwrapPos)
            .map(codec::decode_angle24)
    }

    /// Sets the cordwrap limit position of `target`.
    pub fn set_cordwrap_position(&mut self, target: Target, position: Dms) -> Result<(), Error> {
        self.send_angle(target, Command::SetCordwrapPos, position.to_fraction())
    }

    /// Returns true once the last goto of `target` has finished.
    pub fn slew_done(&mut self, target: Target) -> Result<bool, Error> {
        let [byte] = self.query::<1>(target, Command::SlewDone)?;
        Ok(byte != 0)
    }

    /// Reads the autoguide rate of `target` as a percentage of the sidereal rate.
    pub fn get_autoguide_rate(&mut self, target: Target) -> Result<u8, Error> {
        let [byte] = self.query::<1>(target, Command::GetAutoguideRate)?;
        Ok(((u16::from(byte) * 100) / 256) as u8)
    }

    /// Sets the autoguide rate of `target` as a percentage of the sidereal rate, in `0..=99`.
    pub fn set_autoguide_rate(&mut self, target: Target, percent: u8) -> Result<(), Error> {
        if percent > 99 {
            return Err(Error::ArgumentRange {
                name: "autoguide rate",
                value: f64::from(percent),
                min: 0.0,
                max: 99.0,
            });
        }
        let byte = ((u16::from(percent) * 256) / 100) as u8;
        self.session
            .send_command(target, Command::SetAutoguideRate, &[byte])
            .map(drop)
    }

    /// Starts a search for the index mark of `target`.
    pub fn seek_index(&mut self, target: Target) -> Result<(), Error> {
        self.session.send_command(target, Command::SeekIndex, &[]).map(drop)
    }

    /// Returns true when `target` is at its index mark.
    pub fn at_index(&mut self, target: Target) -> Result<bool, Error> {
        let [byte] = self.query::<1>(target, Command::AtIndex)?;
        Ok(byte != 0)
    }

    /// Starts levelling `target`.
    pub fn level_start(&mut self, target: Target) -> Result<(), Error> {
        self.session.send_command(target, Command::LevelStart, &[]).map(drop)
    }

    /// Returns true once levelling of `target` has finished.
    pub fn level_done(&mut self, target: Target) -> Result<bool, Error> {
        let [byte] = self.query::<1>(target, Command::LevelDone)?;
        Ok(byte != 0)
    }

    /// Reads the firmware versions and both axis positions.
    pub fn status(&mut self) -> Result<Status, Error> {
        Ok(Status {
            alt_version: self.get_version(Target::Alt)?,
            azm_version: self.get_version(Target::Azm)?,
            hc_version: self.get_version(Target::HandController)?,
            altitude: self.get_position(Target::Alt)?,
            azimuth: self.get_position(Target::Azm)?,
        })
    }

    fn send_angle(&mut self, target: Target, command: Command, fraction: f64) -> Result<(), Error> {
        let data = codec::encode_angle24(fraction)?;
        self.session.send_command(target, command, &data).map(drop)
    }

    fn query<const N: usize>(&mut self, target: Target, command: Command) -> Result<[u8; N], Error> {
        let payload = self.session.send_command(target, command, &[])?;
        <[u8; N]>::try_from(payload.as_slice()).map_err(|_| Error::UnexpectedResponse {
            expected: format!("{N} bytes"),
            actual: format!("{} bytes", payload.len()),
        })
    }
}
