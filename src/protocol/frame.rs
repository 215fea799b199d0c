use crate::protocol::Target;
use crate::FrameError;

/// First byte of every AUX frame. It is not covered by the checksum.
pub const PREAMBLE: u8 = 0x3b;

/// Bytes in a frame that carry no payload: preamble, length, source, destination, opcode, checksum.
const OVERHEAD: usize = 6;

/// Computes the two's complement checksum of `bytes`, so that the bytes plus the checksum sum to zero.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b))
        .wrapping_neg()
}

/// A single message on the AUX bus.
///
/// On the wire a frame is `[0x3b][len][source][destination][opcode][payload..][checksum]`,
/// where `len` counts the source, destination, opcode and payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Device the frame is addressed to
    pub destination: Target,
    /// Device that sent the frame
    pub source: Target,
    /// Command opcode
    pub opcode: u8,
    /// Command data
    pub payload: Vec<u8>,
}

impl Frame {
    /// Creates a new frame.
    pub fn new(destination: Target, source: Target, opcode: u8, payload: &[u8]) -> Self {
        Self {
            destination,
            source,
            opcode,
            payload: payload.to_vec(),
        }
    }

    /// Number of bytes this frame occupies on the wire.
    pub fn wire_len(&self) -> usize {
        OVERHEAD + self.payload.len()
    }

    /// Serializes the frame, byte for byte as the motor controllers expect it.
    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        let len = u8::try_from(3 + self.payload.len())
            .map_err(|_| FrameError::PayloadTooLong(self.payload.len()))?;
        let mut buf = Vec::with_capacity(self.wire_len());
        buf.push(PREAMBLE);
        buf.push(len);
        buf.push(self.source.id());
        buf.push(self.destination.id());
        buf.push(self.opcode);
        buf.extend_from_slice(&self.payload);
        buf.push(checksum(&buf[1..]));
        Ok(buf)
    }

    /// Parses a single complete frame.
    ///
    /// The checksum is verified before the length byte is trusted, so any corruption
    /// after the preamble is reported as [`FrameError::Checksum`].
    pub fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() < OVERHEAD {
            return Err(FrameError::TooShort {
                expected: OVERHEAD,
                actual: buf.len(),
            });
        }
        if buf[0] != PREAMBLE {
            return Err(FrameError::Preamble(buf[0]));
        }
        let (body, received) = buf[1..].split_at(buf.len() - 2);
        let received = received[0];
        let computed = checksum(body);
        if computed != received {
            return Err(FrameError::Checksum { computed, received });
        }
        let declared = body[0];
        let actual = body.len() - 1;
        if declared as usize != actual {
            return Err(FrameError::Length { declared, actual });
        }
        let source = Target::try_from(body[1])?;
        let destination = Target::try_from(body[2])?;
        Ok(Self {
            destination,
            source,
            opcode: body[3],
            payload: body[4..].to_vec(),
        })
    }
}
