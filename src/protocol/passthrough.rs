//! The hand controller's passthrough command.
//!
//! When the mount is driven through the hand controller's serial port, motor controller
//! commands are wrapped in an 8-byte `P` request. The hand controller forwards the command
//! onto the AUX bus and answers with the reply payload followed by `#`.

use crate::protocol::{Descriptor, Target};
use crate::{Error, FrameError};

/// First byte of a passthrough request (`P`).
pub const PASSTHROUGH: u8 = 0x50;
/// Byte terminating every passthrough reply (`#`).
pub const TERMINATOR: u8 = 0x23;
/// A passthrough request always carries 3 data bytes, padded with zeros.
const DATA_LEN: usize = 3;

/// Builds the request `[0x50][request_len][target][opcode][d0][d1][d2][response_len]`.
///
/// `data` is checked against the catalog; its length plus the opcode byte must equal
/// [`Descriptor::request_len`].
pub fn encode_request(target: Target, descriptor: &Descriptor, data: &[u8]) -> Result<[u8; 8], Error> {
    descriptor.validate_request(data.len() + 1)?;
    if data.len() > DATA_LEN {
        return Err(Error::RequestLength {
            command: descriptor.name,
            expected: DATA_LEN + 1,
            actual: data.len() + 1,
        });
    }
    let mut request = [0u8; 8];
    request[0] = PASSTHROUGH;
    request[1] = descriptor.request_len as u8;
    request[2] = target.id();
    request[3] = descriptor.opcode();
    request[4..4 + data.len()].copy_from_slice(data);
    request[7] = descriptor.response_len as u8;
    Ok(request)
}

/// Number of bytes in the reply to `descriptor`: the payload plus the terminator.
pub fn reply_len(descriptor: &Descriptor) -> usize {
    descriptor.response_len + 1
}

/// Strips the terminator from a reply, returning the payload.
pub fn decode_reply(descriptor: &Descriptor, reply: &[u8]) -> Result<Vec<u8>, FrameError> {
    let expected = reply_len(descriptor);
    if reply.len() < expected {
        return Err(FrameError::TooShort {
            expected,
            actual: reply.len(),
        });
    }
    let (payload, rest) = reply.split_at(descriptor.response_len);
    if rest[0] != TERMINATOR {
        return Err(FrameError::Terminator(rest[0]));
    }
    Ok(payload.to_vec())
}
