use std::fmt;

use level_script::Clip;
use serde::Serialize;

/// Link rectangles wider or taller than this span a whole board edge.
pub const EDGE_LINK_SPAN: u32 = 60;

/// Sprite sheet holding every hostile stand-in
pub const HOSTILE_SPRITE: &str = "opps.png";

/// Treasure item names, by kind code
pub const TREASURE_ITEMS: [&str; 25] = [
    "greenrupee",
    "bluerupee",
    "redrupee",
    "bombs",
    "darts",
    "heart",
    "glove1",
    "bow",
    "bomb",
    "shield",
    "sword",
    "fullheart",
    "superbomb",
    "battleaxe",
    "goldensword",
    "mirrorshield",
    "glove2",
    "lizardshield",
    "lizardsword",
    "goldrupee",
    "fireball",
    "fireblast",
    "nukeshot",
    "joltbomb",
    "spinattack",
];

/// Destination coordinate of a link
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LinkCoord {
    At(f64),
    /// Keep the player's current coordinate on this axis
    Keep,
}

impl LinkCoord {
    /// Parse a destination token: a number, or `playerx` / `playery`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "playerx" | "playery" => Some(LinkCoord::Keep),
            _ => token.parse().ok().map(LinkCoord::At),
        }
    }
}

impl fmt::Display for LinkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkCoord::At(v) => write!(f, "{v}"),
            LinkCoord::Keep => f.write_str("keep"),
        }
    }
}

/// Rectangular warp to another level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub target: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub dest_x: LinkCoord,
    pub dest_y: LinkCoord,
}

impl Link {
    /// Edge links join neighbouring levels of a map.
    pub fn is_edge_link(&self) -> bool {
        self.width > EDGE_LINK_SPAN || self.height > EDGE_LINK_SPAN
    }
}

/// Hostile creature placed on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Baddy {
    pub x: i32,
    pub y: i32,
    /// Creature kind, 0 to 9
    pub kind: u8,
    pub messages: [String; 3],
}

/// Sprite placement a renderer can use in place of a hostile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandIn {
    pub sprite: &'static str,
    pub x: f64,
    pub y: f64,
    pub clip: Clip,
}

impl Baddy {
    pub const MAX_KIND: u8 = 9;

    /// Build a hostile, padding or truncating `messages` to three.
    pub fn new(x: i32, y: i32, kind: u8, messages: impl IntoIterator<Item = String>) -> Self {
        let mut fixed: [String; 3] = Default::default();
        for (slot, msg) in fixed.iter_mut().zip(messages) {
            *slot = msg;
        }
        Self { x, y, kind, messages: fixed }
    }

    /// Where and how to draw this hostile from the shared sprite sheet.
    pub fn stand_in(&self) -> Option<StandIn> {
        let mut x = self.x as f64 - 0.5;
        let y = self.y as f64 - 1.0;
        let clip = match self.kind {
            // grey, blue, red
            0..=2 => Clip::new(self.kind as i32 * 44, 0, 44, 64),
            3 => Clip::new(132, 0, 44, 50),
            4 => {
                x -= 1.0;
                Clip::new(0, 66, 52, 58)
            }
            // frog
            5 => Clip::new(52, 66, 24, 26),
            // spider
            6 => Clip::new(52, 100, 32, 34),
            7 => Clip::new(84, 64, 44, 66),
            8 => Clip::new(132, 50, 44, 65),
            9 => Clip::new(132, 115, 44, 56),
            _ => return None,
        };
        Some(StandIn { sprite: HOSTILE_SPRITE, x, y, clip })
    }
}

/// Treasure chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Treasure {
    pub x: i32,
    pub y: i32,
    pub kind: i32,
    /// Index into the level's signs, or `NO_SIGN`
    pub sign_index: i32,
}

impl Treasure {
    pub const NO_SIGN: i32 = -1;

    pub fn item_name(&self) -> Option<&'static str> {
        usize::try_from(self.kind).ok().and_then(|k| TREASURE_ITEMS.get(k).copied())
    }

    /// Whether every field is within the range real files use.
    pub fn is_plausible(&self) -> bool {
        let on_board = |v: i32| (0..64).contains(&v);
        on_board(self.x)
            && on_board(self.y)
            && (0..TREASURE_ITEMS.len() as i32).contains(&self.kind)
            && (Self::NO_SIGN..=95).contains(&self.sign_index)
    }
}

/// Sign text placed on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sign {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

impl Sign {
    /// Trigger area in tiles: x, y, width, height
    pub fn area(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, 2, 1)
    }
}
