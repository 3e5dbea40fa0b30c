use crate::buffer::PacketBuffer;
use crate::chunk_data::decode_chunk;
use bitflags::bitflags;
use voxide_common::error::VoxideError;
use voxide_common::types::{ChunkPos, Result};
use voxide_world::block::{BlockAttributes, BlockLookup};
use voxide_world::chunk::Chunk;

/// Wire tags, one unsigned byte at the start of every packet.
mod tag {
    pub const BATCH: u8 = 0;
    pub const LOGIN: u8 = 1;
    pub const DISCONNECT: u8 = 2;
    pub const GAME_START: u8 = 3;
    pub const CHAT: u8 = 4;
    pub const TEXT: u8 = 5;
    pub const CHUNK_REQUEST: u8 = 6;
    pub const CHUNK_DATA: u8 = 7;
}

/// Batches may nest at most this many levels; decode rejects anything
/// deeper so corrupt input cannot recurse unboundedly.
pub const MAX_BATCH_DEPTH: usize = 16;

bitflags! {
    /// Presentation bits carried by text packets.
    pub struct TextFlags: u8 {
        const FROM_SYSTEM = 0x1;
        const SHOW_SENDER = 0x2;
    }
}

/// Kind-dispatched payload of a text packet. Kind 0 is plain text; other
/// kinds are rejected at decode time.
#[derive(Debug, Clone, PartialEq)]
pub enum TextPayload {
    Plain { content: String },
}

impl TextPayload {
    pub fn kind(&self) -> u8 {
        match self {
            TextPayload::Plain { .. } => 0,
        }
    }
}

/// Fields of the game-start packet. The block map seeds the registry; its
/// wire order is the registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStart {
    pub username: String,
    pub label: String,
    pub motd: String,
    pub max_view_distance: u32,
    pub pos: ChunkPos,
    pub blocks: Vec<(String, BlockAttributes)>,
    pub components: Vec<String>,
}

/// The closed set of packets. The tag is structural: each variant knows its
/// own byte, there is no stored tag field to drift out of sync.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Batch(Vec<Packet>),
    Login,
    Disconnect { message: String },
    GameStart(GameStart),
    Chat { message: String },
    Text { flags: TextFlags, sender: String, payload: TextPayload },
    ChunkRequest { pos: ChunkPos },
    ChunkData { pos: ChunkPos, chunk: Chunk },
}

impl Packet {
    pub fn tag(&self) -> u8 {
        match self {
            Packet::Batch(_) => tag::BATCH,
            Packet::Login => tag::LOGIN,
            Packet::Disconnect { .. } => tag::DISCONNECT,
            Packet::GameStart(_) => tag::GAME_START,
            Packet::Chat { .. } => tag::CHAT,
            Packet::Text { .. } => tag::TEXT,
            Packet::ChunkRequest { .. } => tag::CHUNK_REQUEST,
            Packet::ChunkData { .. } => tag::CHUNK_DATA,
        }
    }
}

/// Decodes one packet from a whole frame. Chunk-data payloads resolve block
/// names through `lookup`; the codec never touches a registry directly.
pub fn decode_packet(bytes: &[u8], lookup: &dyn BlockLookup) -> Result<Packet> {
    let mut buffer = PacketBuffer::from_bytes(bytes.to_vec());
    read_packet(&mut buffer, lookup, 0)
}

/// Encodes one packet into a frame.
pub fn encode_packet(packet: &Packet) -> Result<Vec<u8>> {
    let mut buffer = PacketBuffer::new();
    write_packet(&mut buffer, packet)?;
    Ok(buffer.into_bytes())
}

fn read_packet(buffer: &mut PacketBuffer, lookup: &dyn BlockLookup, depth: usize) -> Result<Packet> {
    if depth >= MAX_BATCH_DEPTH {
        return Err(VoxideError::BatchTooDeep(depth));
    }

    match buffer.read_u8()? {
        tag::BATCH => {
            let length = buffer.read_varint()?;
            let mut packets = Vec::new();
            for _ in 0..length {
                packets.push(read_packet(buffer, lookup, depth + 1)?);
            }
            Ok(Packet::Batch(packets))
        }
        tag::LOGIN => Err(VoxideError::UnimplementedDirection("Login")),
        tag::DISCONNECT => Ok(Packet::Disconnect {
            message: buffer.read_string()?,
        }),
        tag::GAME_START => {
            let username = buffer.read_string()?;
            let label = buffer.read_string()?;
            let motd = buffer.read_string()?;
            let max_view_distance = buffer.read_varint()?;
            let pos = ChunkPos::new(buffer.read_i32()?, buffer.read_i32()?);

            let block_count = buffer.read_varint()?;
            let mut blocks = Vec::new();
            for _ in 0..block_count {
                let name = buffer.read_string()?;
                let attributes = BlockAttributes::from_bits_truncate(buffer.read_u8()?);
                blocks.push((name, attributes));
            }

            let component_count = buffer.read_varint()?;
            let mut components = Vec::new();
            for _ in 0..component_count {
                components.push(buffer.read_string()?);
            }

            Ok(Packet::GameStart(GameStart {
                username,
                label,
                motd,
                max_view_distance,
                pos,
                blocks,
                components,
            }))
        }
        tag::CHAT => Ok(Packet::Chat {
            message: buffer.read_string()?,
        }),
        tag::TEXT => {
            let flags = TextFlags::from_bits_truncate(buffer.read_u8()?);
            let sender = buffer.read_string()?;
            let payload = match buffer.read_u8()? {
                0 => TextPayload::Plain {
                    content: buffer.read_string()?,
                },
                kind => return Err(VoxideError::UnknownPayloadKind(kind)),
            };
            Ok(Packet::Text {
                flags,
                sender,
                payload,
            })
        }
        tag::CHUNK_REQUEST => Err(VoxideError::UnimplementedDirection("ChunkRequest")),
        tag::CHUNK_DATA => {
            let pos = ChunkPos::new(buffer.read_i32()?, buffer.read_i32()?);
            let compressed = buffer.read_bytes()?;
            let chunk = decode_chunk(pos, &compressed, lookup)?;
            Ok(Packet::ChunkData { pos, chunk })
        }
        unknown => Err(VoxideError::UnknownPacketTag(unknown)),
    }
}

fn write_packet(buffer: &mut PacketBuffer, packet: &Packet) -> Result<()> {
    buffer.write_u8(packet.tag());
    match packet {
        Packet::Batch(packets) => {
            buffer.write_varint(packets.len() as u32);
            for packet in packets {
                write_packet(buffer, packet)?;
            }
            Ok(())
        }
        Packet::Login => Err(VoxideError::UnimplementedDirection("Login")),
        Packet::Disconnect { message } => {
            buffer.write_string(message);
            Ok(())
        }
        Packet::GameStart(_) => Err(VoxideError::UnimplementedDirection("GameStart")),
        Packet::Chat { message } => {
            buffer.write_string(message);
            Ok(())
        }
        Packet::Text {
            flags,
            sender,
            payload,
        } => {
            buffer.write_u8(flags.bits());
            buffer.write_string(sender);
            buffer.write_u8(payload.kind());
            match payload {
                TextPayload::Plain { content } => buffer.write_string(content),
            }
            Ok(())
        }
        Packet::ChunkRequest { pos } => {
            buffer.write_i32(pos.x);
            buffer.write_i32(pos.y);
            Ok(())
        }
        Packet::ChunkData { .. } => Err(VoxideError::UnimplementedDirection("ChunkData")),
    }
}
