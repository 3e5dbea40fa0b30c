use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, crate::error::VoxideError>;

/// 2-D coordinate of a chunk in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
