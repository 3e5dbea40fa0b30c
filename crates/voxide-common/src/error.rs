use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum VoxideError {
    /// Tag byte at the start of a packet matched no known variant.
    UnknownPacketTag(u8),
    /// Payload-kind byte inside a text packet matched no known payload.
    UnknownPayloadKind(u8),
    /// The packet variant has no codec path in the requested direction.
    UnimplementedDirection(&'static str),
    /// Buffer ran out in the middle of a field.
    Underrun { needed: usize, remaining: usize },
    /// VarInt kept its continuation bit past the 32-bit range.
    VarIntTooLong,
    /// Length-prefixed string bytes were not valid UTF-8.
    InvalidUtf8,
    /// Batch packets nested past the decode depth limit.
    BatchTooDeep(usize),
    /// The chunk blob was not a valid compressed stream.
    DecompressionFailed(std::io::Error),
    /// A chunk palette entry named a block the lookup does not know.
    UnknownBlockName(String),
    /// A grid cell referenced a palette slot that was never built.
    PaletteIndexOutOfRange { index: usize, palette_len: usize },
    /// A required registry lookup came back empty.
    RegistryLookupMiss(String),
}

impl fmt::Display for VoxideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoxideError::UnknownPacketTag(tag) => write!(f, "unknown packet tag: {}", tag),
            VoxideError::UnknownPayloadKind(kind) => {
                write!(f, "unknown text payload kind: {}", kind)
            }
            VoxideError::UnimplementedDirection(packet) => {
                write!(f, "{} has no codec for this direction", packet)
            }
            VoxideError::Underrun { needed, remaining } => write!(
                f,
                "buffer underrun: needed {} bytes, {} remaining",
                needed, remaining
            ),
            VoxideError::VarIntTooLong => write!(f, "VarInt too long"),
            VoxideError::InvalidUtf8 => write!(f, "string bytes are not valid UTF-8"),
            VoxideError::BatchTooDeep(depth) => {
                write!(f, "batch packets nested too deep: {}", depth)
            }
            VoxideError::DecompressionFailed(err) => {
                write!(f, "chunk decompression failed: {}", err)
            }
            VoxideError::UnknownBlockName(name) => write!(f, "unknown block name: {}", name),
            VoxideError::PaletteIndexOutOfRange { index, palette_len } => write!(
                f,
                "palette index {} out of range for palette of {}",
                index, palette_len
            ),
            VoxideError::RegistryLookupMiss(name) => {
                write!(f, "block registry has no entry for: {}", name)
            }
        }
    }
}

impl Error for VoxideError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VoxideError::DecompressionFailed(err) => Some(err),
            _ => None,
        }
    }
}
