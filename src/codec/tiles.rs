//! Bit-packed tile stream of binary levels
//!
//! Each packet is `bits` wide. With the top bit clear the rest of the packet
//! is a tile index. With it set the low byte is a repeat count, bit 8 selects
//! pair mode, and the next one (or two) plain packets give the repeated tile
//! (or tile pair).

use crate::codec::reader::BitReader;
use crate::codec::writer::BitWriter;
use crate::error::{Error, Result};
use crate::level::board::BOARD_TILES;

const DOUBLE_FLAG: u32 = 0x100;
const COUNT_MASK: u32 = 0xFF;

/// One decoded packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet {
    Tile(u16),
    Repeat { count: u8, double: bool },
}

impl Packet {
    pub fn from_bits(raw: u32, bits: u32) -> Self {
        let repeat_flag = 1 << (bits - 1);
        if raw & repeat_flag == 0 {
            Packet::Tile((raw & !repeat_flag) as u16)
        } else {
            Packet::Repeat {
                count: (raw & COUNT_MASK) as u8,
                double: raw & DOUBLE_FLAG != 0,
            }
        }
    }

    pub fn to_bits(self, bits: u32) -> u32 {
        match self {
            Packet::Tile(t) => t as u32,
            Packet::Repeat { count, double } => {
                let double = if double { DOUBLE_FLAG } else { 0 };
                (1 << (bits - 1)) | double | count as u32
            }
        }
    }
}

/// Result of decoding a full board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileStream {
    /// Linear tile indices, row-major
    pub tiles: Vec<u16>,
    /// Bits consumed from the start of the stream
    pub bits_read: usize,
}

impl TileStream {
    /// Bytes spanned by the stream, counting a partial last byte.
    pub fn byte_len(&self) -> usize {
        self.bits_read.div_ceil(8)
    }
}

fn read_plain(reader: &mut BitReader<'_>, bits: u32) -> Result<u16> {
    match Packet::from_bits(reader.read_bits(bits)?, bits) {
        Packet::Tile(t) => Ok(t),
        Packet::Repeat { .. } => Err(Error::BitStream(format!(
            "nested repeat packet at bit {}",
            reader.bit_position() - bits as usize
        ))),
    }
}

/// Decode exactly one board of tiles from `data`, which starts right after
/// the file header.
pub fn decode_tiles(data: &[u8], bits: u32) -> Result<TileStream> {
    let mut reader = BitReader::new(data);
    let mut tiles = Vec::with_capacity(BOARD_TILES);

    while tiles.len() < BOARD_TILES {
        match Packet::from_bits(reader.read_bits(bits)?, bits) {
            Packet::Tile(t) => tiles.push(t),
            Packet::Repeat { count, double } => {
                let run: Vec<u16> = if double {
                    vec![read_plain(&mut reader, bits)?, read_plain(&mut reader, bits)?]
                } else {
                    vec![read_plain(&mut reader, bits)?]
                };
                let emitted = count as usize * run.len();
                if tiles.len() + emitted > BOARD_TILES {
                    return Err(Error::BitStream(format!(
                        "repeat of {emitted} tiles overruns the board at tile {}",
                        tiles.len()
                    )));
                }
                for _ in 0..count {
                    tiles.extend_from_slice(&run);
                }
            }
        }
    }

    Ok(TileStream { tiles, bits_read: reader.bit_position() })
}

/// Pack tiles with the run-length scheme `decode_tiles` reads.
pub fn encode_tiles(tiles: &[u16], bits: u32) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let mut i = 0;

    while i < tiles.len() {
        let single_run = tiles[i..]
            .iter()
            .take(COUNT_MASK as usize)
            .take_while(|&&t| t == tiles[i])
            .count();
        let pair_run = if i + 1 < tiles.len() && tiles[i] != tiles[i + 1] {
            tiles[i..]
                .chunks_exact(2)
                .take(COUNT_MASK as usize)
                .take_while(|pair| pair[0] == tiles[i] && pair[1] == tiles[i + 1])
                .count()
        } else {
            0
        };

        if pair_run >= 2 {
            writer.write_bits(Packet::Repeat { count: pair_run as u8, double: true }.to_bits(bits), bits);
            writer.write_bits(tiles[i] as u32, bits);
            writer.write_bits(tiles[i + 1] as u32, bits);
            i += pair_run * 2;
        } else if single_run >= 3 {
            writer.write_bits(Packet::Repeat { count: single_run as u8, double: false }.to_bits(bits), bits);
            writer.write_bits(tiles[i] as u32, bits);
            i += single_run;
        } else {
            writer.write_bits(tiles[i] as u32, bits);
            i += 1;
        }
    }

    writer.into_vec()
}
