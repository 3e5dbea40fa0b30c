use voxide_common::types::Result;
use voxide_protocol::packet::{decode_packet, Packet, TextPayload};
use voxide_protocol::stream::flatten_packets;
use voxide_world::block::BlockRegistry;
use voxide_world::chunk::Chunk;

/// Connection stage. The session starts `Closed`; the host advances it to
/// `Initial` once the transport is open and the ticket has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Closed,
    Initial,
    Starting,
}

/// Host callbacks. Every method has a no-op default so hosts only wire up
/// what they care about.
pub trait SessionEvents {
    fn on_closed(&mut self) {}
    fn on_initial(&mut self) {}
    fn on_starting(&mut self) {}
    fn on_text(&mut self, sender: &str, content: &str) {
        let _ = (sender, content);
    }
    fn on_chunk(&mut self, chunk: &Chunk) {
        let _ = chunk;
    }
    fn on_disconnect(&mut self, message: &str) {
        let _ = message;
    }
}

/// Transport-agnostic protocol session. The host feeds it whole inbound
/// frames; each frame is decoded and flattened, and every leaf packet is
/// applied to the current stage. The session owns the block registry seeded
/// by the game-start packet.
pub struct Session<E: SessionEvents> {
    stage: Stage,
    registry: BlockRegistry,
    events: E,
}

impl<E: SessionEvents> Session<E> {
    pub fn new(events: E) -> Self {
        Self {
            stage: Stage::Closed,
            registry: BlockRegistry::new(),
            events,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// The transport opened and the ticket went out.
    pub fn begin(&mut self) {
        self.set_stage(Stage::Initial);
    }

    /// The transport closed.
    pub fn close(&mut self) {
        self.set_stage(Stage::Closed);
    }

    /// Processes one complete inbound frame. Decode failures surface to the
    /// caller; packets that are merely unexpected for the current stage are
    /// logged and skipped.
    pub fn handle_frame(&mut self, bytes: &[u8]) -> Result<()> {
        let root = decode_packet(bytes, &self.registry)?;
        for packet in flatten_packets(&root) {
            tracing::debug!(tag = packet.tag(), "received packet");
            self.apply(packet);
        }
        Ok(())
    }

    fn apply(&mut self, packet: &Packet) {
        match self.stage {
            Stage::Initial => match packet {
                Packet::GameStart(start) => {
                    for (name, attributes) in &start.blocks {
                        self.registry.register(name, *attributes);
                    }
                    self.set_stage(Stage::Starting);
                }
                Packet::Disconnect { message } => self.disconnect(message),
                other => {
                    tracing::error!(tag = other.tag(), "unexpected packet in initial stage");
                }
            },
            Stage::Starting => match packet {
                Packet::Text {
                    sender,
                    payload: TextPayload::Plain { content },
                    ..
                } => self.events.on_text(sender, content),
                Packet::ChunkData { chunk, .. } => self.events.on_chunk(chunk),
                Packet::Disconnect { message } => self.disconnect(message),
                other => {
                    tracing::error!(tag = other.tag(), "unexpected packet in starting stage");
                }
            },
            Stage::Closed => {
                tracing::error!(tag = packet.tag(), "packet received while closed");
            }
        }
    }

    fn disconnect(&mut self, message: &str) {
        tracing::warn!(message, "disconnected by server");
        self.events.on_disconnect(message);
        self.set_stage(Stage::Closed);
    }

    fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
        match stage {
            Stage::Closed => self.events.on_closed(),
            Stage::Initial => self.events.on_initial(),
            Stage::Starting => self.events.on_starting(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;
    use voxide_common::error::VoxideError;
    use voxide_common::types::ChunkPos;
    use voxide_protocol::buffer::PacketBuffer;
    use voxide_protocol::packet::encode_packet;
    use voxide_protocol::packet::TextFlags;
    use voxide_world::block::BlockAttributes;
    use voxide_world::chunk::CELLS_PER_LAYER;

    #[derive(Default)]
    struct Recorder {
        stages: Vec<&'static str>,
        texts: Vec<(String, String)>,
        chunks: Vec<ChunkPos>,
        disconnects: Vec<String>,
    }

    impl SessionEvents for Recorder {
        fn on_closed(&mut self) {
            self.stages.push("closed");
        }
        fn on_initial(&mut self) {
            self.stages.push("initial");
        }
        fn on_starting(&mut self) {
            self.stages.push("starting");
        }
        fn on_text(&mut self, sender: &str, content: &str) {
            self.texts.push((sender.to_owned(), content.to_owned()));
        }
        fn on_chunk(&mut self, chunk: &Chunk) {
            self.chunks.push(chunk.pos());
        }
        fn on_disconnect(&mut self, message: &str) {
            self.disconnects.push(message.to_owned());
        }
    }

    fn game_start_frame() -> Vec<u8> {
        let mut buffer = PacketBuffer::new();
        buffer.write_u8(3);
        buffer.write_string("guest");
        buffer.write_string("overworld");
        buffer.write_string("welcome");
        buffer.write_varint(8);
        buffer.write_i32(0);
        buffer.write_i32(0);
        buffer.write_varint(2);
        buffer.write_string("core:air");
        buffer.write_u8(0);
        buffer.write_string("core:stone");
        buffer.write_u8(BlockAttributes::SOLID.bits());
        buffer.write_varint(0);
        buffer.into_bytes()
    }

    fn chunk_data_frame(pos: ChunkPos) -> Vec<u8> {
        let mut payload = PacketBuffer::new();
        payload.write_varint(2);
        payload.write_string("core:air");
        payload.write_string("core:stone");
        for cell in 0..CELLS_PER_LAYER {
            payload.write_varint(if cell == 1 { 1 } else { 0 });
        }
        for _ in 0..CELLS_PER_LAYER {
            payload.write_varint(0);
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut frame = PacketBuffer::new();
        frame.write_u8(7);
        frame.write_i32(pos.x);
        frame.write_i32(pos.y);
        frame.write_bytes(&compressed);
        frame.into_bytes()
    }

    fn started_session() -> Session<Recorder> {
        let mut session = Session::new(Recorder::default());
        session.begin();
        session.handle_frame(&game_start_frame()).unwrap();
        session
    }

    #[test]
    fn test_game_start_seeds_registry_and_advances() {
        let session = started_session();

        assert_eq!(session.stage(), Stage::Starting);
        assert_eq!(session.events.stages, vec!["initial", "starting"]);
        assert_eq!(session.registry().len(), 2);
        assert!(session.registry().lookup("core:stone").unwrap().is_solid());
    }

    #[test]
    fn test_disconnect_closes_from_either_stage() {
        let frame = encode_packet(&Packet::Disconnect {
            message: "kicked".to_owned(),
        })
        .unwrap();

        let mut session = Session::new(Recorder::default());
        session.begin();
        session.handle_frame(&frame).unwrap();
        assert_eq!(session.stage(), Stage::Closed);
        assert_eq!(session.events.disconnects, vec!["kicked"]);

        let mut session = started_session();
        session.handle_frame(&frame).unwrap();
        assert_eq!(session.stage(), Stage::Closed);
    }

    #[test]
    fn test_text_surfaces_in_starting_stage() {
        let mut session = started_session();
        let frame = encode_packet(&Packet::Text {
            flags: TextFlags::SHOW_SENDER,
            sender: "amy".to_owned(),
            payload: TextPayload::Plain {
                content: "hello".to_owned(),
            },
        })
        .unwrap();

        session.handle_frame(&frame).unwrap();
        assert_eq!(
            session.events.texts,
            vec![("amy".to_owned(), "hello".to_owned())]
        );
    }

    #[test]
    fn test_chunk_data_surfaces_after_registry_seed() {
        let mut session = started_session();
        session
            .handle_frame(&chunk_data_frame(ChunkPos::new(5, 6)))
            .unwrap();

        assert_eq!(session.events.chunks, vec![ChunkPos::new(5, 6)]);
    }

    #[test]
    fn test_chunk_data_before_game_start_fails_decode() {
        // The registry is empty until game start, so the palette cannot
        // resolve and the whole frame is rejected.
        let mut session = Session::new(Recorder::default());
        session.begin();

        assert_matches!(
            session.handle_frame(&chunk_data_frame(ChunkPos::new(0, 0))),
            Err(VoxideError::UnknownBlockName(_))
        );
        assert_eq!(session.stage(), Stage::Initial);
    }

    #[test]
    fn test_unexpected_packet_is_skipped_not_fatal() {
        let mut session = Session::new(Recorder::default());
        session.begin();
        let frame = encode_packet(&Packet::Chat {
            message: "too early".to_owned(),
        })
        .unwrap();

        session.handle_frame(&frame).unwrap();
        assert_eq!(session.stage(), Stage::Initial);
    }

    #[test]
    fn test_batched_frame_applies_in_order() {
        let mut session = Session::new(Recorder::default());
        session.begin();

        // Game start followed by a text message, in one frame. The text
        // lands after the stage advance, so it is surfaced.
        let mut frame = PacketBuffer::new();
        frame.write_u8(0);
        frame.write_varint(2);
        for byte in game_start_frame() {
            frame.write_u8(byte);
        }
        for byte in encode_packet(&Packet::Text {
            flags: TextFlags::empty(),
            sender: "server".to_owned(),
            payload: TextPayload::Plain {
                content: "day 1".to_owned(),
            },
        })
        .unwrap()
        {
            frame.write_u8(byte);
        }

        session.handle_frame(frame.as_bytes()).unwrap();
        assert_eq!(session.stage(), Stage::Starting);
        assert_eq!(
            session.events.texts,
            vec![("server".to_owned(), "day 1".to_owned())]
        );
    }
}
