//! Graal level decoder
//!
//! Reads both level file formats (the `GLEVNW01` text format and the
//! bit-packed `GR`/`Z3` binary revisions) into one object model: a 64x64
//! tile board plus actors, links, hostiles, treasure and signs. Actor
//! appearance is derived statically from each actor's script.

pub mod codec;
pub mod config;
pub mod error;
pub mod level;
pub mod loader;
pub mod resolve;

pub use level_script as script;

pub use codec::{DecodedLevel, Family, LevelFormat, Revision};
pub use config::{LoadOptions, ResolverConfig};
pub use error::{Error, Result};
pub use level::{
    Actor, ActorSource, Baddy, Board, Digest, Level, LevelHashes, Link, LinkCoord, Sign, TileRef,
    Treasure,
};
pub use loader::{decode_level, load_level};
pub use resolve::{SpriteResolver, SpriteSource};
