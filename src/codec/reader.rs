use crate::error::{Error, Result};

/// Byte cursor over one region of a level file
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        if self.remaining() < 1 {
            return Err(Error::UnexpectedEof);
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Read a coordinate byte stored with a fixed bias.
    pub fn read_biased(&mut self, bias: i32) -> Result<i32> {
        Ok(self.read_u8()? as i32 - bias)
    }

    /// Read up to the next `\n`, consuming it. The final line may be
    /// unterminated.
    pub fn read_line(&mut self) -> Result<&'a [u8]> {
        if self.is_empty() {
            return Err(Error::UnexpectedEof);
        }
        let rest = self.remaining_slice();
        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pos += end + 1;
                Ok(&rest[..end])
            }
            None => {
                self.pos = self.data.len();
                Ok(rest)
            }
        }
    }
}

/// Little-endian bit cursor for the packed tile stream
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Read `width` bits (at most 24) starting at the current bit offset.
    pub fn read_bits(&mut self, width: u32) -> Result<u32> {
        debug_assert!(width <= 24);
        let start = self.bit_pos / 8;
        let shift = (self.bit_pos % 8) as u32;
        let span = (shift + width).div_ceil(8) as usize;
        let bytes = self.data.get(start..start + span).ok_or(Error::UnexpectedEof)?;

        let word = bytes
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &b)| acc | (b as u32) << (8 * i));
        self.bit_pos += width as usize;
        Ok((word >> shift) & ((1 << width) - 1))
    }
}

/// Decode Latin-1 bytes; level files predate any multi-byte encoding.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
