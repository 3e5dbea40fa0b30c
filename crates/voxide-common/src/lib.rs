pub mod error;
pub mod types;

pub use error::VoxideError;
pub use types::{ChunkPos, Result};
