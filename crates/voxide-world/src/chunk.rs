use crate::block::{air_instance, BlockInstance};
use voxide_common::types::ChunkPos;

/// Cells in one subchunk.
pub const SUBCHUNK_VOLUME: usize = 4096;
/// Subchunks stacked per layer.
pub const SUBCHUNKS_PER_LAYER: usize = 16;
/// Cells addressed by one layer of a chunk.
pub const CELLS_PER_LAYER: usize = SUBCHUNK_VOLUME * SUBCHUNKS_PER_LAYER;

/// The two independent block grids of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

/// Fixed 4096-cell block storage. Stays `Empty` (zero cells allocated) until
/// the first non-air write promotes it to `Populated`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubChunk {
    Empty,
    Populated(Vec<BlockInstance>),
}

impl SubChunk {
    pub fn get(&self, local: usize) -> &BlockInstance {
        match self {
            SubChunk::Empty => air_instance(),
            SubChunk::Populated(cells) => &cells[local],
        }
    }

    /// Writes one cell. An air write into an `Empty` subchunk is a no-op;
    /// a non-air write promotes it to `Populated` first.
    pub fn set(&mut self, local: usize, instance: BlockInstance) {
        match self {
            SubChunk::Populated(cells) => cells[local] = instance,
            SubChunk::Empty => {
                if instance.is_air() {
                    return;
                }
                let mut cells = vec![air_instance().clone(); SUBCHUNK_VOLUME];
                cells[local] = instance;
                *self = SubChunk::Populated(cells);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SubChunk::Empty)
    }
}

/// An immutable-after-decode snapshot of one chunk: a position and two
/// stacks of 16 subchunk slots. Writes go through the slot arena, so an
/// `Empty` slot is replaced in place when it gets promoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pos: ChunkPos,
    foreground: [SubChunk; SUBCHUNKS_PER_LAYER],
    background: [SubChunk; SUBCHUNKS_PER_LAYER],
}

impl Chunk {
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            foreground: std::array::from_fn(|_| SubChunk::Empty),
            background: std::array::from_fn(|_| SubChunk::Empty),
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    fn stack(&self, layer: Layer) -> &[SubChunk; SUBCHUNKS_PER_LAYER] {
        match layer {
            Layer::Foreground => &self.foreground,
            Layer::Background => &self.background,
        }
    }

    fn stack_mut(&mut self, layer: Layer) -> &mut [SubChunk; SUBCHUNKS_PER_LAYER] {
        match layer {
            Layer::Foreground => &mut self.foreground,
            Layer::Background => &mut self.background,
        }
    }

    pub fn subchunk(&self, layer: Layer, index: usize) -> &SubChunk {
        &self.stack(layer)[index]
    }

    /// Reads the cell at a layer-wide index in `0..CELLS_PER_LAYER`.
    pub fn block_at(&self, layer: Layer, cell: usize) -> &BlockInstance {
        self.stack(layer)[cell / SUBCHUNK_VOLUME].get(cell % SUBCHUNK_VOLUME)
    }

    /// Writes the cell at a layer-wide index in `0..CELLS_PER_LAYER`.
    pub fn set_block(&mut self, layer: Layer, cell: usize, instance: BlockInstance) {
        self.stack_mut(layer)[cell / SUBCHUNK_VOLUME].set(cell % SUBCHUNK_VOLUME, instance);
    }
}
