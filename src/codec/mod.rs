pub mod binary;
pub mod glyphs;
pub mod reader;
pub mod records;
pub mod revision;
pub mod sections;
pub mod text;
pub mod tiles;
pub mod writer;

pub use reader::{BinaryReader, BitReader};
pub use revision::{Family, LevelFormat, Regions, Revision, RevisionTraits};
pub use tiles::{decode_tiles, encode_tiles, Packet, TileStream};
pub use writer::{BinaryWriter, BitWriter};

use crate::level::actor::ActorSource;
use crate::level::board::Board;
use crate::level::entity::{Baddy, Link, Sign, Treasure};

/// Everything a codec reads from one file, before actors are resolved
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLevel {
    pub format: LevelFormat,
    pub board: Board,
    pub links: Vec<Link>,
    pub baddies: Vec<Baddy>,
    pub actors: Vec<ActorSource>,
    pub treasures: Vec<Treasure>,
    pub signs: Vec<Sign>,
}

impl DecodedLevel {
    pub fn new(format: LevelFormat) -> Self {
        Self {
            format,
            board: Board::new(),
            links: Vec::new(),
            baddies: Vec::new(),
            actors: Vec::new(),
            treasures: Vec::new(),
            signs: Vec::new(),
        }
    }
}

/// A codec entry point: raw file bytes to decoded records
pub type DecodeFn = fn(&[u8]) -> crate::error::Result<DecodedLevel>;
