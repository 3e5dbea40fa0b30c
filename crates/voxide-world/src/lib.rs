pub mod block;
pub mod chunk;

pub use block::{
    air_instance, Block, BlockAttributes, BlockInstance, BlockLookup, BlockRegistry,
    AIR_BLOCK_NAME,
};
pub use chunk::{Chunk, Layer, SubChunk};
