//! Binary level format (`GR-V1.0n` / `Z3-V1.0n`)
//!
//! An 8-byte header, the bit-packed tile stream, then `\n`-delimited entity
//! regions whose presence depends on the revision.

use tracing::debug;

use crate::codec::records::{parse_actors, parse_hostiles, parse_links, parse_signs, parse_treasure};
use crate::codec::revision::{LevelFormat, HEADER_LEN};
use crate::codec::sections::segment;
use crate::codec::tiles::decode_tiles;
use crate::codec::DecodedLevel;
use crate::error::{Error, Result};
use crate::level::board::Board;

fn mismatch(reason: impl Into<String>) -> Error {
    Error::FormatMismatch { codec: "binary", reason: reason.into() }
}

pub fn decode(data: &[u8]) -> Result<DecodedLevel> {
    let header = data.get(..HEADER_LEN).ok_or_else(|| mismatch("file shorter than header"))?;
    let format = LevelFormat::parse_binary_header(header)
        .ok_or_else(|| mismatch(format!("unknown header {:?}", String::from_utf8_lossy(header))))?;
    let Some(revision) = format.revision() else {
        return Err(mismatch("not a binary header"));
    };
    let traits = revision.traits();

    let stream = decode_tiles(&data[HEADER_LEN..], traits.packet_bits)?;
    let board = Board::from_indices(&stream.tiles)
        .ok_or_else(|| Error::BitStream(format!("decoded {} tiles", stream.tiles.len())))?;
    let rest = data.get(HEADER_LEN + stream.byte_len()..).unwrap_or_default();
    debug!(%format, tile_bits = stream.bits_read, remaining = rest.len(), "decoded tile stream");

    let sections = segment(rest, traits.regions);
    let bias = traits.coord_bias;

    let mut level = DecodedLevel::new(format);
    level.board = board;
    level.links = sections.links.map(parse_links).unwrap_or_default();
    level.baddies = sections.hostiles.map(parse_hostiles).unwrap_or_default();
    level.actors = sections.actors.map(|r| parse_actors(r, &traits)).unwrap_or_default();
    level.treasures = sections.treasure.map(|r| parse_treasure(r, bias)).unwrap_or_default();
    level.signs = sections.signs.map(|r| parse_signs(r, bias)).unwrap_or_default();

    debug!(
        links = level.links.len(),
        actors = level.actors.len(),
        baddies = level.baddies.len(),
        treasures = level.treasures.len(),
        signs = level.signs.len(),
        "decoded binary level"
    );
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::revision::{Family, Revision};
    use crate::codec::tiles::encode_tiles;
    use crate::level::board::{TileRef, BOARD_TILES};

    fn level_bytes(header: &[u8], tiles: &[u16], bits: u32, tail: &[u8]) -> Vec<u8> {
        let mut data = header.to_vec();
        data.extend(encode_tiles(tiles, bits));
        data.extend_from_slice(tail);
        data
    }

    fn sample_tiles() -> Vec<u16> {
        (0..BOARD_TILES).map(|i| ((i / 7) % 900) as u16).collect()
    }

    #[test]
    fn test_full_v103_level() {
        let tiles = sample_tiles();
        let tail = b"cave.graal 0 0 2 2 30 30\n#\n\
                     \x04\x05\x01hey\n\xFF\xFF\xFF\
                     *+chest.png#hide;\n#\n\
                     !!!!\n#\n\
                     \x2a\x2b\x27\x42\n";
        let data = level_bytes(b"GR-V1.03", &tiles, 13, tail);
        let level = decode(&data).unwrap();

        assert_eq!(
            level.format,
            LevelFormat::Binary { family: Family::Graal, revision: Revision::V103 }
        );
        assert_eq!(level.board.get(0, 1), Some(TileRef::from_index(tiles[64])));
        assert_eq!(level.links.len(), 1);
        assert_eq!(level.baddies.len(), 1);
        assert_eq!(level.actors.len(), 1);
        assert_eq!((level.actors[0].x, level.actors[0].y), (10.0, 11.0));
        assert_eq!(level.treasures.len(), 1);
        assert_eq!(level.signs[0].text, "Hi");
    }

    #[test]
    fn test_v100_uses_12_bit_packets_and_no_actors() {
        let tiles: Vec<u16> = (0..BOARD_TILES).map(|i| (i % 2000) as u16).collect();
        let data = level_bytes(b"Z3-V1.00", &tiles, 12, b"#\n\xFF\xFF\xFF*+x#y\n#\n");
        let level = decode(&data).unwrap();
        assert_eq!(level.board, Board::from_indices(&tiles).unwrap());
        assert!(level.actors.is_empty());
        assert!(level.signs.is_empty());
    }

    #[test]
    fn test_truncated_regions_still_decode() {
        let tiles = sample_tiles();
        let data = level_bytes(b"GR-V1.04", &tiles, 13, b"a.graal 0 0 1 1 1 1\n");
        let level = decode(&data).unwrap();
        assert!(level.links.is_empty());
        assert_eq!(level.board, Board::from_indices(&tiles).unwrap());
    }

    #[test]
    fn test_truncated_tile_stream_is_a_mismatch() {
        let tiles: Vec<u16> = (0..BOARD_TILES).map(|i| (i % 4000) as u16).collect();
        let mut data = level_bytes(b"GR-V1.02", &tiles, 13, b"");
        data.truncate(HEADER_LEN + 100);
        let err = decode(&data).unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn test_header_rejections() {
        assert!(decode(b"GLEVNW01rest").unwrap_err().is_format_mismatch());
        assert!(decode(b"GR-V").unwrap_err().is_format_mismatch());
        assert!(matches!(decode(b"GR-V1.01"), Err(Error::UnexpectedEof)));
    }
}
