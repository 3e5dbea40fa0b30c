pub mod buffer;
pub mod chunk_data;
pub mod packet;
pub mod stream;

pub use buffer::PacketBuffer;
pub use chunk_data::decode_chunk;
pub use packet::{decode_packet, encode_packet, GameStart, Packet, TextFlags, TextPayload};
pub use stream::flatten_packets;
