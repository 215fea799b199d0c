//! Wire formats of the AUX bus: device addresses, the command catalog, frames and the
//! numeric encodings carried inside them.

pub mod codec;
pub mod commands;
mod frame;
pub mod passthrough;

pub use commands::{Command, Descriptor};
pub use frame::{checksum, Frame, PREAMBLE};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::FrameError;

/// A device address on the AUX bus. Used as both the source and destination of a [`Frame`].
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Target {
    /// Broadcast
    Any = 0x00,
    /// Main board
    MainBoard = 0x01,
    /// Hand controller
    HandController = 0x04,
    /// Unidentified device seen at 0x05
    Unknown1 = 0x05,
    /// NexStar+ hand controller
    HandControllerPlus = 0x0d,
    /// Azimuth / right ascension motor controller
    Azm = 0x10,
    /// Altitude / declination motor controller
    Alt = 0x11,
    /// Application (computer or phone) attached to the bus
    App = 0x20,
    /// GPS unit
    Gps = 0xb0,
    /// Unidentified device seen at 0xb4
    Unknown2 = 0xb4,
    /// WiFi module
    Wifi = 0xb5,
    /// Battery
    Battery = 0xb6,
    /// Charger
    Charger = 0xb7,
    /// Lights
    Light = 0xbf,
}

impl Target {
    /// The device id byte.
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Target {
    type Error = FrameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Target::from_u8(id).ok_or(FrameError::UnknownDevice(id))
    }
}

/// Formats bytes the way bus sniffers print them, e.g. `3b:03:0d:11:05:da`.
pub(crate) fn dump(bytes: &[u8]) -> String {
    use itertools::Itertools;
    bytes.iter().map(|b| format!("{b:02x}")).join(":")
}
