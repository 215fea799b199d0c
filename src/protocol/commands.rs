//! The motor controller command catalog.
//!
//! Every command has a fixed request and response length. Request lengths count the
//! opcode (message id) byte, so a command with `request_len == 1` carries no data.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::Error;

/// Motor controller commands, keyed by their opcode.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    GetPosition = 0x01,
    GotoFast = 0x02,
    SetPosition = 0x04,
    Unknown1 = 0x05,
    SetPosGuiderate = 0x06,
    SetNegGuiderate = 0x07,
    LevelStart = 0x0b,
    PecRecordStart = 0x0c,
    PecPlayback = 0x0d,
    SetPosBacklash = 0x10,
    SetNegBacklash = 0x11,
    LevelDone = 0x12,
    SlewDone = 0x13,
    Unknown2 = 0x14,
    PecRecordDone = 0x15,
    PecRecordStop = 0x16,
    GotoSlow = 0x17,
    AtIndex = 0x18,
    SeekIndex = 0x19,
    SetMaxrate = 0x20,
    GetMaxrate = 0x21,
    EnableMaxrate = 0x22,
    MaxrateEnabled = 0x23,
    MovePos = 0x24,
    MoveNeg = 0x25,
    EnableCordwrap = 0x38,
    DisableCordwrap = 0x39,
    SetCordwrapPos = 0x3a,
    PollCordwrap = 0x3b,
    GetCordwrapPos = 0x3c,
    GetPosBacklash = 0x40,
    GetNegBacklash = 0x41,
    SetAutoguideRate = 0x46,
    GetAutoguideRate = 0x47,
    GetApproach = 0xfc,
    SetApproach = 0xfd,
    GetVer = 0xfe,
}

/// The shape of a command on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// The command this descriptor belongs to
    pub command: Command,
    /// Catalog name, e.g. `MC_GET_POSITION`
    pub name: &'static str,
    /// Request length including the opcode byte
    pub request_len: usize,
    /// Number of payload bytes in the reply
    pub response_len: usize,
}

macro_rules! catalog {
    ($($cmd:ident : $name:literal, $req:expr, $resp:expr;)*) => {
        /// Every known command, in opcode order.
        pub static CATALOG: &[Descriptor] = &[
            $(Descriptor {
                command: Command::$cmd,
                name: $name,
                request_len: $req,
                response_len: $resp,
            },)*
        ];

        impl Command {
            /// Returns the catalog entry for this command.
            pub fn descriptor(self) -> &'static Descriptor {
                match self {
                    $(Command::$cmd => &Descriptor {
                        command: Command::$cmd,
                        name: $name,
                        request_len: $req,
                        response_len: $resp,
                    },)*
                }
            }
        }
    };
}

catalog! {
    GetPosition: "MC_GET_POSITION", 1, 3;
    GotoFast: "MC_GOTO_FAST", 4, 0;
    SetPosition: "MC_SET_POSITION", 4, 0;
    Unknown1: "MC_UNKNOWN_1", 1, 0;
    SetPosGuiderate: "MC_SET_POS_GUIDERATE", 4, 0;
    SetNegGuiderate: "MC_SET_NEG_GUIDERATE", 4, 0;
    LevelStart: "MC_LEVEL_START", 1, 0;
    PecRecordStart: "MC_PEC_RECORD_START", 1, 0;
    PecPlayback: "MC_PEC_PLAYBACK", 2, 0;
    SetPosBacklash: "MC_SET_POS_BACKLASH", 2, 0;
    SetNegBacklash: "MC_SET_NEG_BACKLASH", 2, 0;
    LevelDone: "MC_LEVEL_DONE", 1, 1;
    SlewDone: "MC_SLEW_DONE", 1, 1;
    Unknown2: "MC_UNKNOWN_2", 1, 0;
    PecRecordDone: "MC_PEC_RECORD_DONE", 1, 1;
    PecRecordStop: "MC_PEC_RECORD_STOP", 1, 0;
    GotoSlow: "MC_GOTO_SLOW", 4, 0;
    AtIndex: "MC_AT_INDEX", 1, 1;
    SeekIndex: "MC_SEEK_INDEX", 1, 0;
    SetMaxrate: "MC_SET_MAXRATE", 2, 0;
    GetMaxrate: "MC_GET_MAXRATE", 1, 1;
    EnableMaxrate: "MC_ENABLE_MAXRATE", 1, 0;
    MaxrateEnabled: "MC_MAXRATE_ENABLED", 1, 0;
    MovePos: "MC_MOVE_POS", 2, 0;
    MoveNeg: "MC_MOVE_NEG", 2, 0;
    EnableCordwrap: "MC_ENABLE_CORDWRAP", 1, 0;
    DisableCordwrap: "MC_DISABLE_CORDWRAP", 1, 0;
    SetCordwrapPos: "MC_SET_CORDWRAP_POS", 4, 0;
    PollCordwrap: "MC_POLL_CORDWRAP", 1, 1;
    GetCordwrapPos: "MC_GET_CORDWRAP_POS", 1, 3;
    GetPosBacklash: "MC_GET_POS_BACKLASH", 1, 1;
    GetNegBacklash: "MC_GET_NEG_BACKLASH", 1, 1;
    SetAutoguideRate: "MC_SET_AUTOGUIDE_RATE", 2, 0;
    GetAutoguideRate: "MC_GET_AUTOGUIDE_RATE", 1, 1;
    GetApproach: "MC_GET_APPROACH", 1, 1;
    SetApproach: "MC_SET_APPROACH", 2, 1;
    GetVer: "MC_GET_VER", 1, 2;
}

impl Command {
    /// The opcode byte sent on the wire.
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

impl Descriptor {
    /// Looks a descriptor up by its opcode.
    pub fn from_opcode(opcode: u8) -> Option<&'static Descriptor> {
        Command::from_u8(opcode).map(Command::descriptor)
    }

    /// The opcode byte sent on the wire.
    pub fn opcode(&self) -> u8 {
        self.command.opcode()
    }

    /// Number of data bytes following the opcode in a request.
    pub fn data_len(&self) -> usize {
        self.request_len - 1
    }

    /// Checks that a request of `request_len` bytes (data plus the opcode byte) matches the catalog.
    pub fn validate_request(&self, request_len: usize) -> Result<(), Error> {
        if request_len != self.request_len {
            return Err(Error::RequestLength {
                command: self.name,
                expected: self.request_len,
                actual: request_len,
            });
        }
        Ok(())
    }
}

/// Looks a descriptor up by its catalog name, e.g. `MC_GET_VER`.
pub fn lookup(name: &str) -> Result<&'static Descriptor, Error> {
    CATALOG
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| Error::UnknownCommand(name.to_owned()))
}
