//! Content digests for finding duplicate levels across large collections.
//!
//! Each digest is BLAKE3 over a canonical little-endian serialization.
//! Links and treasure never contribute; actors contribute the inputs
//! stored in the file, in file order, not the resolved appearance.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::codec::writer::BinaryWriter;
use crate::level::actor::Actor;
use crate::level::board::{Board, TileRef};
use crate::level::Level;

/// 256-bit content digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(blake3::Hash);

impl Digest {
    fn of(data: &[u8]) -> Self {
        Self(blake3::hash(data))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// All four digests of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelHashes {
    pub tile: Digest,
    pub palette: Digest,
    pub content: Digest,
    pub level: Digest,
}

fn write_tile(w: &mut BinaryWriter, tile: TileRef) {
    w.write_u16_le(tile.column);
    w.write_u16_le(tile.row);
}

fn write_board(w: &mut BinaryWriter, board: &Board) {
    for &tile in board.tiles() {
        write_tile(w, tile);
    }
}

fn write_entities(w: &mut BinaryWriter, level: &Level) {
    let mut actors: Vec<&Actor> = level.actors.iter().collect();
    actors.sort_by_key(|a| a.file_index);
    for actor in actors {
        let src = &actor.source;
        w.write_u8(b'A');
        w.write_f64_le(src.x);
        w.write_f64_le(src.y);
        w.write_string_opt(src.image.as_deref());
        w.write_string(&src.script);
    }
    for baddy in &level.baddies {
        w.write_u8(b'B');
        w.write_i32_le(baddy.x);
        w.write_i32_le(baddy.y);
        w.write_u8(baddy.kind);
        for msg in &baddy.messages {
            w.write_string(msg);
        }
    }
    for sign in &level.signs {
        w.write_u8(b'S');
        w.write_i32_le(sign.x);
        w.write_i32_le(sign.y);
        w.write_string(&sign.text);
    }
}

/// Board arrangement only
pub fn tile_hash(board: &Board) -> Digest {
    let mut w = BinaryWriter::with_capacity(board.tiles().len() * 4);
    write_board(&mut w, board);
    Digest::of(w.as_slice())
}

/// Distinct tiles used, ignoring arrangement
pub fn palette_hash(board: &Board) -> Digest {
    let palette: BTreeSet<TileRef> = board.tiles().iter().copied().collect();
    let mut w = BinaryWriter::new();
    for tile in palette {
        write_tile(&mut w, tile);
    }
    Digest::of(w.as_slice())
}

/// Actors, hostiles and signs as stored in the file
pub fn content_hash(level: &Level) -> Digest {
    let mut w = BinaryWriter::new();
    write_entities(&mut w, level);
    Digest::of(w.as_slice())
}

/// Board plus the content of `content_hash`
pub fn level_hash(level: &Level) -> Digest {
    let mut w = BinaryWriter::new();
    write_board(&mut w, &level.board);
    write_entities(&mut w, level);
    Digest::of(w.as_slice())
}

pub fn all_hashes(level: &Level) -> LevelHashes {
    LevelHashes {
        tile: tile_hash(&level.board),
        palette: palette_hash(&level.board),
        content: content_hash(level),
        level: level_hash(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::revision::LevelFormat;
    use crate::level::actor::ActorSource;
    use crate::level::entity::{Baddy, Link, LinkCoord, Sign, Treasure};

    fn sample() -> Level {
        let mut level = Level::empty("a.nw", LevelFormat::Text);
        level.board.set(3, 4, TileRef::new(5, 6));
        level.actors.push(Actor::unresolved(ActorSource::new(1.0, 2.0, None, "hide;")));
        level.baddies.push(Baddy::new(4, 4, 1, vec!["hi".to_string()]));
        level.signs.push(Sign { x: 1, y: 1, text: "welcome".into() });
        level
    }

    #[test]
    fn test_links_and_treasure_are_ignored() {
        let a = sample();
        let mut b = sample();
        b.links.push(Link {
            target: "b.nw".into(),
            x: 0,
            y: 0,
            width: 64,
            height: 1,
            dest_x: LinkCoord::Keep,
            dest_y: LinkCoord::At(62.0),
        });
        b.treasures.push(Treasure { x: 1, y: 1, kind: 0, sign_index: -1 });

        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(level_hash(&a), level_hash(&b));
    }

    #[test]
    fn test_entities_change_content_hash() {
        let a = sample();
        let mut b = sample();
        b.signs[0].text.push('!');
        assert_ne!(content_hash(&a), content_hash(&b));
        assert_ne!(level_hash(&a), level_hash(&b));
        assert_eq!(tile_hash(&a.board), tile_hash(&b.board));
    }

    #[test]
    fn test_resolved_appearance_is_ignored() {
        let a = sample();
        let mut b = sample();
        b.actors[0].x = 40.0;
        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_draw_order_is_ignored() {
        let mut a = sample();
        a.actors.push(Actor::unresolved(ActorSource::new(0.0, 9.0, None, "")).with_file_index(1));
        let mut b = a.clone();
        b.actors.reverse();
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(level_hash(&a), level_hash(&b));
    }

    #[test]
    fn test_palette_ignores_arrangement() {
        let mut a = Board::new();
        a.set(0, 0, TileRef::new(1, 1));
        let mut b = Board::new();
        b.set(9, 9, TileRef::new(1, 1));

        assert_ne!(tile_hash(&a), tile_hash(&b));
        assert_eq!(palette_hash(&a), palette_hash(&b));
        assert_eq!(tile_hash(&a).to_hex().len(), 64);
    }

    #[test]
    fn test_board_changes_level_hash_only() {
        let a = sample();
        let mut b = sample();
        b.board.set(0, 0, TileRef::new(7, 7));
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_ne!(level_hash(&a), level_hash(&b));
    }
}
