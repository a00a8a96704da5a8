//! Record parsers for the regions of binary levels

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::codec::glyphs::decode_sign_text;
use crate::codec::reader::{latin1, BinaryReader};
use crate::codec::revision::RevisionTraits;
use crate::level::actor::ActorSource;
use crate::level::entity::{Baddy, Link, LinkCoord, Sign, Treasure};

static LINK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(-?\d+)\s+(-?\d+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s*$").unwrap()
});

/// Script bytes use the section sign for line breaks.
const SCRIPT_NEWLINE: u8 = 0xA7;

/// Parse one `target x y w h dest_x dest_y` line.
pub fn parse_link_line(line: &str) -> Option<Link> {
    let caps = LINK_LINE.captures(line)?;
    Some(Link {
        target: caps[1].to_string(),
        x: caps[2].parse().ok()?,
        y: caps[3].parse().ok()?,
        width: caps[4].parse().ok()?,
        height: caps[5].parse().ok()?,
        dest_x: LinkCoord::parse(&caps[6])?,
        dest_y: LinkCoord::parse(&caps[7])?,
    })
}

pub fn parse_links(region: &[u8]) -> Vec<Link> {
    let mut reader = BinaryReader::new(region);
    let mut links = Vec::new();
    while let Ok(line) = reader.read_line() {
        let line = latin1(line);
        match parse_link_line(&line) {
            Some(link) => links.push(link),
            None => debug!(line = %line, "skipping malformed link"),
        }
    }
    links
}

/// Three raw bytes (x, y, kind) then a `\`-separated message line, repeated.
pub fn parse_hostiles(region: &[u8]) -> Vec<Baddy> {
    let mut reader = BinaryReader::new(region);
    let mut baddies = Vec::new();

    while !reader.is_empty() {
        let Ok(head) = reader.read_bytes(3) else {
            debug!(remaining = reader.remaining(), "trailing bytes in hostile region");
            break;
        };
        let messages = reader.read_line().map(latin1).unwrap_or_default();
        let (x, y, kind) = (head[0], head[1], head[2]);
        if kind > Baddy::MAX_KIND {
            debug!(x, y, kind, "hostile kind out of range");
            continue;
        }
        let messages = messages.split('\\').map(str::to_string);
        baddies.push(Baddy::new(x as i32, y as i32, kind, messages));
    }
    baddies
}

fn is_garbage_script(script: &[u8]) -> bool {
    script.iter().any(|&b| b < 0x20 && b != b'\t')
}

/// Biased `x y` bytes, an image name, `#`, then the script.
pub fn parse_actors(region: &[u8], traits: &RevisionTraits) -> Vec<ActorSource> {
    let mut reader = BinaryReader::new(region);
    let mut actors = Vec::new();

    while !reader.is_empty() {
        let Ok(x) = reader.read_biased(traits.coord_bias) else { break };
        let Ok(y) = reader.read_biased(traits.coord_bias) else { break };
        let Ok(line) = reader.read_line() else { break };
        let (image, script) = match line.iter().position(|&b| b == b'#') {
            Some(split) => (&line[..split], &line[split + 1..]),
            None => (line, &[][..]),
        };

        if traits.drops_garbage_actors && image.is_empty() && is_garbage_script(script) {
            debug!(x, y, len = script.len(), "dropping actor with binary script");
            continue;
        }

        let script: Vec<u8> = script
            .iter()
            .map(|&b| if b == SCRIPT_NEWLINE { b'\n' } else { b })
            .collect();
        let image = (!image.is_empty()).then(|| latin1(image));
        actors.push(ActorSource::new(x as f64, y as f64, image, latin1(&script)));
    }
    actors
}

/// Four biased bytes per line. The first implausible record ends the region.
pub fn parse_treasure(region: &[u8], bias: i32) -> Vec<Treasure> {
    let mut reader = BinaryReader::new(region);
    let mut treasures = Vec::new();

    while let Ok(line) = reader.read_line() {
        let [x, y, kind, sign_index] = line else {
            warn!(len = line.len(), "malformed treasure record, abandoning region");
            break;
        };
        let treasure = Treasure {
            x: *x as i32 - bias,
            y: *y as i32 - bias,
            kind: *kind as i32 - bias,
            sign_index: *sign_index as i32 - bias,
        };
        if !treasure.is_plausible() {
            warn!(?treasure, "implausible treasure record, abandoning region");
            break;
        }
        treasures.push(treasure);
    }
    treasures
}

/// Biased `x y` bytes then glyph-coded text per line, up to an empty line.
pub fn parse_signs(region: &[u8], bias: i32) -> Vec<Sign> {
    let mut reader = BinaryReader::new(region);
    let mut signs = Vec::new();

    while let Ok(line) = reader.read_line() {
        if line.is_empty() {
            break;
        }
        let [x, y, text @ ..] = line else {
            debug!(len = line.len(), "sign record too short");
            continue;
        };
        signs.push(Sign {
            x: *x as i32 - bias,
            y: *y as i32 - bias,
            text: decode_sign_text(text),
        });
    }
    signs
}
