use byteorder::{BigEndian, ByteOrder};
use voxide_common::error::VoxideError;
use voxide_common::types::Result;

/// Sequential reader/writer over a byte buffer. The cursor tracks the read
/// position; writes always append. Fixed-width integers are big-endian and
/// variable-length integers are unsigned LEB128; strings and blobs carry a
/// varint length prefix.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    buffer: Vec<u8>,
    cursor: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buffer: bytes,
            cursor: 0,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        if count > self.remaining() {
            return Err(VoxideError::Underrun {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buffer[self.cursor..self.cursor + count];
        self.cursor += count;
        Ok(slice)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn write_i32(&mut self, value: i32) {
        let mut raw = [0u8; 4];
        BigEndian::write_i32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut raw = [0u8; 4];
        BigEndian::write_u32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Writes an unsigned VarInt: 7 bits per byte, continuation bit set on
    /// every byte but the last.
    pub fn write_varint(&mut self, mut value: u32) {
        while (value & !0x7F) != 0 {
            self.buffer.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    pub fn read_varint(&mut self) -> Result<u32> {
        let mut result: u32 = 0;
        let mut shift = 0;

        loop {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7F) as u32) << shift;
            shift += 7;

            if byte & 0x80 == 0 {
                break;
            }
            if shift >= 35 {
                return Err(VoxideError::VarIntTooLong);
            }
        }

        Ok(result)
    }

    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.write_varint(bytes.len() as u32);
        self.buffer.extend_from_slice(bytes);
    }

    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_varint()? as usize;
        let bytes = self.take(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| VoxideError::InvalidUtf8)
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.write_varint(value.len() as u32);
        self.buffer.extend_from_slice(value);
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let length = self.read_varint()? as usize;
        Ok(self.take(length)?.to_vec())
    }
}
