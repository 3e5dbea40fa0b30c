use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use voxide_common::error::VoxideError;
use voxide_common::types::Result;

/// Well-known name of the block that means "no block here".
pub const AIR_BLOCK_NAME: &str = "core:air";

bitflags! {
    /// Per-block attribute bits, as carried on the wire in the game-start
    /// block map.
    pub struct BlockAttributes: u8 {
        const HAS_AUX = 1 << 0;
        const HAS_COLOR = 1 << 1;
        const SOLID = 1 << 2;
        const FLUID = 1 << 3;
    }
}

/// A block definition. Owned by the registry; everything else holds an
/// `Arc<Block>` handle.
#[derive(Debug, PartialEq, Eq)]
pub struct Block {
    name: String,
    attributes: BlockAttributes,
}

impl Block {
    pub fn new(name: impl Into<String>, attributes: BlockAttributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> BlockAttributes {
        self.attributes
    }

    pub fn has_aux(&self) -> bool {
        self.attributes.contains(BlockAttributes::HAS_AUX)
    }

    pub fn has_color(&self) -> bool {
        self.attributes.contains(BlockAttributes::HAS_COLOR)
    }

    pub fn is_solid(&self) -> bool {
        self.attributes.contains(BlockAttributes::SOLID)
    }

    pub fn is_fluid(&self) -> bool {
        self.attributes.contains(BlockAttributes::FLUID)
    }

    pub fn is_air(&self) -> bool {
        self.name == AIR_BLOCK_NAME
    }
}

/// A placed occurrence of a block. Cheap to clone; the block itself is
/// shared.
///
/// `aux` and `color` are independent slots: the wire carries at most one of
/// them per palette entry (aux when the block declares `HAS_AUX`, otherwise
/// color when it declares `HAS_COLOR`).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInstance {
    pub block: Arc<Block>,
    pub aux: Option<u32>,
    pub color: Option<u32>,
}

impl BlockInstance {
    pub fn new(block: Arc<Block>) -> Self {
        Self {
            block,
            aux: None,
            color: None,
        }
    }

    pub fn is_air(&self) -> bool {
        self.block.is_air()
    }
}

static AIR: Lazy<BlockInstance> = Lazy::new(|| {
    BlockInstance::new(Arc::new(Block::new(AIR_BLOCK_NAME, BlockAttributes::empty())))
});

/// The shared air instance that empty cells read back as.
pub fn air_instance() -> &'static BlockInstance {
    &AIR
}

/// Name-to-block lookup capability. The packet codec and chunk decoder only
/// ever see this trait, never a concrete registry.
pub trait BlockLookup {
    fn block_by_name(&self, name: &str) -> Option<Arc<Block>>;
}

/// Append-only table of block definitions, populated once per session from
/// the game-start packet.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: Vec<Arc<Block>>,
    index: HashMap<String, Arc<Block>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a block definition. Registering a name twice is a bug on
    /// the server side; the newer entry shadows the older one in lookups.
    pub fn register(&mut self, name: &str, attributes: BlockAttributes) {
        if self.index.contains_key(name) {
            tracing::warn!(name, "block registered twice, newer entry shadows the older");
        }
        let block = Arc::new(Block::new(name, attributes));
        self.blocks.push(Arc::clone(&block));
        self.index.insert(name.to_owned(), block);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Block>> {
        self.index.get(name).cloned()
    }

    /// Like [`lookup`](Self::lookup) but a miss is an error.
    pub fn get(&self, name: &str) -> Result<Arc<Block>> {
        self.lookup(name)
            .ok_or_else(|| VoxideError::RegistryLookupMiss(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockLookup for BlockRegistry {
    fn block_by_name(&self, name: &str) -> Option<Arc<Block>> {
        self.lookup(name)
    }
}
