use voxide_common::types::{ChunkPos, Result};
use voxide_protocol::packet::{encode_packet, Packet};

/// Encodes a chat message frame.
pub fn chat_frame(text: &str) -> Result<Vec<u8>> {
    encode_packet(&Packet::Chat {
        message: text.to_owned(),
    })
}

/// Encodes a request for one chunk.
pub fn chunk_request_frame(pos: ChunkPos) -> Result<Vec<u8>> {
    encode_packet(&Packet::ChunkRequest { pos })
}

/// Encodes one batch frame requesting every chunk in the inclusive
/// rectangle from `start` to `end`, row-major.
pub fn chunk_request_batch_frame(start: ChunkPos, end: ChunkPos) -> Result<Vec<u8>> {
    let mut packets = Vec::new();
    for x in start.x..=end.x {
        for y in start.y..=end.y {
            packets.push(Packet::ChunkRequest {
                pos: ChunkPos::new(x, y),
            });
        }
    }
    encode_packet(&Packet::Batch(packets))
}
