use crate::buffer::PacketBuffer;
use flate2::read::ZlibDecoder;
use std::io::Read;
use std::sync::Arc;
use voxide_common::error::VoxideError;
use voxide_common::types::{ChunkPos, Result};
use voxide_world::block::{Block, BlockInstance, BlockLookup};
use voxide_world::chunk::{Chunk, Layer, CELLS_PER_LAYER};

/// One resolved slot of the per-payload palette. Lives only for the duration
/// of a decode call.
struct PaletteEntry {
    block: Arc<Block>,
    aux: Option<u32>,
    color: Option<u32>,
}

impl PaletteEntry {
    fn instance(&self) -> BlockInstance {
        BlockInstance {
            block: Arc::clone(&self.block),
            aux: self.aux,
            color: self.color,
        }
    }
}

/// Decodes one compressed chunk payload into a two-layer chunk.
///
/// The payload is a zlib-wrapped deflate stream holding a length-prefixed
/// palette followed by two full grids of varint palette indices, foreground
/// first. Cells carrying the air-marker index are skipped, which is what
/// keeps untouched subchunks in their zero-storage empty state.
pub fn decode_chunk(pos: ChunkPos, compressed: &[u8], lookup: &dyn BlockLookup) -> Result<Chunk> {
    let mut raw = Vec::new();
    ZlibDecoder::new(compressed)
        .read_to_end(&mut raw)
        .map_err(VoxideError::DecompressionFailed)?;
    let mut buffer = PacketBuffer::from_bytes(raw);

    let (palette, air_marker) = read_palette(&mut buffer, lookup)?;

    let mut chunk = Chunk::new(pos);
    fill_layer(&mut buffer, &mut chunk, Layer::Foreground, &palette, air_marker)?;
    fill_layer(&mut buffer, &mut chunk, Layer::Background, &palette, air_marker)?;
    Ok(chunk)
}

/// Reads the local palette and finds the air marker: the first slot whose
/// resolved block is air. A palette entry naming an unknown block fails the
/// whole decode; air is never substituted.
fn read_palette(
    buffer: &mut PacketBuffer,
    lookup: &dyn BlockLookup,
) -> Result<(Vec<PaletteEntry>, Option<usize>)> {
    let length = buffer.read_varint()?;
    let mut palette = Vec::new();
    let mut air_marker = None;

    for slot in 0..length as usize {
        let name = buffer.read_string()?;
        let block = lookup
            .block_by_name(&name)
            .ok_or(VoxideError::UnknownBlockName(name))?;

        let mut entry = PaletteEntry {
            block,
            aux: None,
            color: None,
        };
        // The wire carries at most one extra value per entry: aux wins when
        // a block declares both attribute bits.
        if entry.block.has_aux() {
            entry.aux = Some(buffer.read_u32()?);
        } else if entry.block.has_color() {
            entry.color = Some(buffer.read_u32()?);
        }

        if air_marker.is_none() && entry.block.is_air() {
            air_marker = Some(slot);
        }
        palette.push(entry);
    }

    Ok((palette, air_marker))
}

fn fill_layer(
    buffer: &mut PacketBuffer,
    chunk: &mut Chunk,
    layer: Layer,
    palette: &[PaletteEntry],
    air_marker: Option<usize>,
) -> Result<()> {
    for cell in 0..CELLS_PER_LAYER {
        let index = buffer.read_varint()? as usize;
        if Some(index) == air_marker {
            continue;
        }
        let entry = palette
            .get(index)
            .ok_or(VoxideError::PaletteIndexOutOfRange {
                index,
                palette_len: palette.len(),
            })?;
        chunk.set_block(layer, cell, entry.instance());
    }
    Ok(())
}
