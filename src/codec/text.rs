//! Text level format (`GLEVNW01`)
//!
//! Line-oriented: `BOARD` lines carry base64 tile pairs, other keywords open
//! entity records. Unknown lines are ignored.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::codec::reader::latin1;
use crate::codec::records::parse_link_line;
use crate::codec::revision::{LevelFormat, HEADER_LEN, TEXT_HEADER};
use crate::codec::DecodedLevel;
use crate::error::{Error, Result};
use crate::level::actor::ActorSource;
use crate::level::board::{Board, TileRef};
use crate::level::entity::{Baddy, Sign, Treasure, TREASURE_ITEMS};

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

static BOARD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BOARD (\d+) (\d+) (\d+) (\d+) ([A-Za-z0-9+/]+)").unwrap());
static NPC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NPC (\S+) (-?\d+(?:\.\d+)?) (-?\d+(?:\.\d+)?)\s*$").unwrap());
static BADDY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BADDY (-?\d+) (-?\d+) (\d+)\s*$").unwrap());
static CHEST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CHEST (-?\d+) (-?\d+) (\S+) (-?\d+)\s*$").unwrap());
static SIGN_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^SIGN (-?\d+) (-?\d+)\s*$").unwrap());

fn base64_value(c: u8) -> Option<u16> {
    BASE64.iter().position(|&b| b == c).map(|i| i as u16)
}

/// Decode one two-character tile code to its linear index.
pub fn decode_tile_pair(pair: &[u8]) -> Option<u16> {
    match pair {
        [hi, lo] => Some(base64_value(*hi)? * 64 + base64_value(*lo)?),
        _ => None,
    }
}

/// Apply one `BOARD x y run layer data` line. Returns false if the line is
/// not a board line.
pub fn apply_board_line(board: &mut Board, line: &str) -> bool {
    let Some(caps) = BOARD_LINE.captures(line) else { return false };
    let (Ok(x), Ok(y), Ok(run)) = (
        caps[1].parse::<usize>(),
        caps[2].parse::<usize>(),
        caps[3].parse::<usize>(),
    ) else {
        return false;
    };

    for (i, pair) in caps[5].as_bytes().chunks_exact(2).take(run).enumerate() {
        if let Some(t) = decode_tile_pair(pair) {
            board.set(x + i, y, TileRef::from_index(t));
        }
    }
    true
}

/// Lines up to (not including) `end`, or `None` if `end` never appears.
fn block_body<'a>(lines: &mut impl Iterator<Item = &'a str>, end: &str) -> Option<Vec<&'a str>> {
    let mut body = Vec::new();
    while let Some(line) = lines.next() {
        if line.trim_end() == end {
            return Some(body);
        }
        body.push(line);
    }
    None
}

fn treasure_kind(item: &str) -> Option<i32> {
    item.parse().ok().or_else(|| {
        TREASURE_ITEMS.iter().position(|&name| name == item).map(|i| i as i32)
    })
}

pub fn decode(data: &[u8]) -> Result<DecodedLevel> {
    if data.get(..HEADER_LEN) != Some(&TEXT_HEADER[..]) {
        return Err(Error::FormatMismatch {
            codec: "text",
            reason: format!("header is not {}", LevelFormat::Text),
        });
    }

    let text = latin1(&data[HEADER_LEN..]).replace("\r\n", "\n");
    let mut level = DecodedLevel::new(LevelFormat::Text);
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if apply_board_line(&mut level.board, line) {
            continue;
        }

        if let Some(rest) = line.strip_prefix("LINK ") {
            match parse_link_line(rest) {
                Some(link) => level.links.push(link),
                None => debug!(line, "skipping malformed link"),
            }
        } else if let Some(caps) = NPC_LINE.captures(line) {
            let Some(body) = block_body(&mut lines, "NPCEND") else {
                debug!(line, "unterminated actor record");
                break;
            };
            let image = (&caps[1] != "-").then(|| caps[1].to_string());
            let (Ok(x), Ok(y)) = (caps[2].parse::<f64>(), caps[3].parse::<f64>()) else { continue };
            level.actors.push(ActorSource::new(x, y, image, body.join("\n").trim()));
        } else if let Some(caps) = BADDY_LINE.captures(line) {
            let Some(body) = block_body(&mut lines, "BADDYEND") else {
                debug!(line, "unterminated hostile record");
                break;
            };
            let (Ok(x), Ok(y), Ok(kind)) = (
                caps[1].parse::<i32>(),
                caps[2].parse::<i32>(),
                caps[3].parse::<u8>(),
            ) else {
                continue;
            };
            if kind > Baddy::MAX_KIND {
                debug!(x, y, kind, "hostile kind out of range");
                continue;
            }
            level.baddies.push(Baddy::new(x, y, kind, body.into_iter().map(str::to_string)));
        } else if let Some(caps) = CHEST_LINE.captures(line) {
            let parsed = (
                caps[1].parse::<i32>(),
                caps[2].parse::<i32>(),
                treasure_kind(&caps[3]),
                caps[4].parse::<i32>(),
            );
            let (Ok(x), Ok(y), Some(kind), Ok(sign_index)) = parsed else {
                debug!(line, "skipping malformed chest");
                continue;
            };
            level.treasures.push(Treasure { x, y, kind, sign_index });
        } else if let Some(caps) = SIGN_LINE.captures(line) {
            let Some(body) = block_body(&mut lines, "SIGNEND") else {
                debug!(line, "unterminated sign record");
                break;
            };
            let (Ok(x), Ok(y)) = (caps[1].parse::<i32>(), caps[2].parse::<i32>()) else { continue };
            level.signs.push(Sign { x, y, text: body.join("\n") });
        }
    }

    debug!(
        links = level.links.len(),
        actors = level.actors.len(),
        baddies = level.baddies.len(),
        signs = level.signs.len(),
        "decoded text level"
    );
    Ok(level)
}
