/// Canonical byte serializer used to feed the content digests
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity) }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(if v { 1 } else { 0 });
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, v: i32) {
        self.write_u32_le(v as u32);
    }

    pub fn write_f64_le(&mut self, v: f64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Length-prefixed string
    pub fn write_string(&mut self, s: &str) {
        self.write_u32_le(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    pub fn write_string_opt(&mut self, s: Option<&str>) {
        match s {
            None => self.write_bool(false),
            Some(s) => {
                self.write_bool(true);
                self.write_string(s);
            }
        }
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Little-endian bit packer, the inverse of `BitReader`
pub struct BitWriter {
    data: Vec<u8>,
    bit_pos: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { data: Vec::new(), bit_pos: 0 }
    }

    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    pub fn write_bits(&mut self, value: u32, width: u32) {
        for i in 0..width as usize {
            let bit = self.bit_pos + i;
            if bit / 8 >= self.data.len() {
                self.data.push(0);
            }
            if value >> i & 1 == 1 {
                self.data[bit / 8] |= 1 << (bit % 8);
            }
        }
        self.bit_pos += width as usize;
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::reader::{BinaryReader, BitReader};

    #[test]
    fn test_roundtrip_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0x42);
        writer.write_string("abc");
        writer.write_string_opt(None);

        let data = writer.into_vec();
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_bytes(4).unwrap(), &3u32.to_le_bytes());
        assert_eq!(reader.read_bytes(3).unwrap(), b"abc");
        assert_eq!(reader.read_u8().unwrap(), 0);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_bit_writer_matches_reader() {
        let mut bits = BitWriter::new();
        bits.write_bits(0x1ABC, 13);
        bits.write_bits(0x5, 3);
        bits.write_bits(0xFFF, 12);
        assert_eq!(bits.bit_position(), 28);

        let data = bits.into_vec();
        assert_eq!(data.len(), 4);
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(13).unwrap(), 0x1ABC);
        assert_eq!(reader.read_bits(3).unwrap(), 0x5);
        assert_eq!(reader.read_bits(12).unwrap(), 0xFFF);
    }
}
