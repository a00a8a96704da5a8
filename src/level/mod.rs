//! Decoded level object model

pub mod actor;
pub mod board;
pub mod entity;
pub mod hash;
pub mod order;

use std::fmt;
use std::path::{Path, PathBuf};

use level_script::{area_effect, NoResources};
use serde::Serialize;
use tracing::debug;

pub use actor::{Actor, ActorSource};
pub use board::{Board, TileRef, BOARD_SIZE, BOARD_TILES};
pub use entity::{Baddy, Link, LinkCoord, Sign, StandIn, Treasure, TREASURE_ITEMS};
pub use hash::{Digest, LevelHashes};
pub use order::{sort_actors, z_order};

use crate::codec::revision::LevelFormat;
use crate::codec::DecodedLevel;
use crate::config::LoadOptions;

/// One level file, fully decoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub path: PathBuf,
    pub format: LevelFormat,
    pub board: Board,
    /// In draw order
    pub actors: Vec<Actor>,
    pub links: Vec<Link>,
    pub baddies: Vec<Baddy>,
    pub treasures: Vec<Treasure>,
    pub signs: Vec<Sign>,
    /// Level-wide colour effects requested by actor scripts
    pub effects: Vec<[f64; 4]>,
}

impl Level {
    pub fn empty(path: impl Into<PathBuf>, format: LevelFormat) -> Self {
        Self {
            path: path.into(),
            format,
            board: Board::new(),
            actors: Vec::new(),
            links: Vec::new(),
            baddies: Vec::new(),
            treasures: Vec::new(),
            signs: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Build actors from their stored inputs, sort them into draw order and
    /// collect area effects.
    pub fn populate(decoded: DecodedLevel, path: &Path, options: &LoadOptions) -> Self {
        let mut actors: Vec<Actor> = decoded
            .actors
            .into_iter()
            .enumerate()
            .map(|(i, source)| {
                let actor = match (&options.resolver, options.fast) {
                    (_, true) => Actor::unresolved(source),
                    (Some(resolver), false) => Actor::new(source, resolver),
                    (None, false) => Actor::new(source, &NoResources),
                };
                actor.with_file_index(i)
            })
            .collect();
        sort_actors(&mut actors);

        let effects: Vec<[f64; 4]> = actors.iter().filter_map(|a| area_effect(a.script())).collect();
        debug!(
            path = %path.display(),
            actors = actors.len(),
            effects = effects.len(),
            "populated level"
        );

        Self {
            path: path.to_path_buf(),
            format: decoded.format,
            board: decoded.board,
            actors,
            links: decoded.links,
            baddies: decoded.baddies,
            treasures: decoded.treasures,
            signs: decoded.signs,
            effects,
        }
    }

    pub fn sign_texts(&self) -> Vec<&str> {
        self.signs.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn tile_hash(&self) -> Digest {
        hash::tile_hash(&self.board)
    }

    pub fn palette_hash(&self) -> Digest {
        hash::palette_hash(&self.board)
    }

    pub fn content_hash(&self) -> Digest {
        hash::content_hash(self)
    }

    pub fn level_hash(&self) -> Digest {
        hash::level_hash(self)
    }

    pub fn hashes(&self) -> LevelHashes {
        hash::all_hashes(self)
    }

    /// Human-readable listing of every entity, for diagnostics.
    pub fn debug_dump(&self) -> LevelDump<'_> {
        LevelDump(self)
    }
}

/// `Display` adapter returned by [`Level::debug_dump`]
pub struct LevelDump<'a>(&'a Level);

impl fmt::Display for LevelDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self.0;
        writeln!(f, "FILE HEADER:\n - {}\n", level.format)?;

        writeln!(f, "LEVEL LINKS:")?;
        for link in &level.links {
            writeln!(
                f,
                " - ({}, {}, {}, {}) -> {} ({}, {})",
                link.x, link.y, link.width, link.height, link.target, link.dest_x, link.dest_y
            )?;
        }

        writeln!(f, "\nBADDIES:")?;
        for baddy in &level.baddies {
            writeln!(f, " - ({}, {}) {}", baddy.x, baddy.y, baddy.kind)?;
        }

        writeln!(f, "\nACTORS:")?;
        for actor in &level.actors {
            let image = actor.image.as_ref().map(|p| p.display().to_string());
            writeln!(f, " - ({}, {}) {:?}", actor.x, actor.y, image)?;
            writeln!(f, "{}", actor.script())?;
        }

        writeln!(f, "\nTREASURES:")?;
        for t in &level.treasures {
            writeln!(f, " - ({}, {}) {} {}", t.x, t.y, t.kind, t.sign_index)?;
        }

        writeln!(f, "\nSIGNS:")?;
        for sign in &level.signs {
            writeln!(f, " - {:?}", sign.area())?;
            writeln!(f, "{}", sign.text)?;
        }
        Ok(())
    }
}
