//! Carves the bytes after a binary tile stream into entity regions.

use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::codec::revision::Regions;

/// Lines up to and including a line holding only `#`
static HASH_TERMINATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s-u)\A((?:[^\n]*\n)*?)#\n").unwrap());

/// Hostile records end at three 0xFF bytes
static SENTINEL_TERMINATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s-u)\A(.*?)\xFF\xFF\xFF").unwrap());

/// Byte regions of one binary level, in file order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sections<'a> {
    pub links: Option<&'a [u8]>,
    pub hostiles: Option<&'a [u8]>,
    pub actors: Option<&'a [u8]>,
    pub mystery: Option<&'a [u8]>,
    pub treasure: Option<&'a [u8]>,
    pub signs: Option<&'a [u8]>,
}

impl<'a> Sections<'a> {
    fn slot(&mut self, region: Regions) -> Option<&mut Option<&'a [u8]>> {
        [
            (Regions::LINKS, &mut self.links),
            (Regions::HOSTILES, &mut self.hostiles),
            (Regions::ACTORS, &mut self.actors),
            (Regions::MYSTERY, &mut self.mystery),
            (Regions::TREASURE, &mut self.treasure),
            (Regions::SIGNS, &mut self.signs),
        ]
        .into_iter()
        .find(|(flag, _)| *flag == region)
        .map(|(_, slot)| slot)
    }
}

#[derive(Clone, Copy)]
enum Terminator {
    HashLine,
    Sentinel,
    EndOfData,
}

const LAYOUT: [(Regions, &str, Terminator); 6] = [
    (Regions::LINKS, "links", Terminator::HashLine),
    (Regions::HOSTILES, "hostiles", Terminator::Sentinel),
    (Regions::ACTORS, "actors", Terminator::HashLine),
    (Regions::MYSTERY, "mystery", Terminator::HashLine),
    (Regions::TREASURE, "treasure", Terminator::HashLine),
    (Regions::SIGNS, "signs", Terminator::EndOfData),
];

/// Returns the region body and the total length including its terminator.
fn cut(data: &[u8], terminator: Terminator) -> Option<(&[u8], usize)> {
    let re = match terminator {
        Terminator::HashLine => &*HASH_TERMINATED,
        Terminator::Sentinel => &*SENTINEL_TERMINATED,
        Terminator::EndOfData => return Some((data, data.len())),
    };
    let caps = re.captures(data)?;
    let body = caps.get(1)?.as_bytes();
    let whole = caps.get(0)?.end();
    Some((body, whole))
}

/// Split `data` into the regions `present` says this revision carries.
///
/// A region whose terminator is missing is abandoned together with every
/// region after it.
pub fn segment(data: &[u8], present: Regions) -> Sections<'_> {
    let mut sections = Sections::default();
    let mut rest = data;

    for (region, name, terminator) in LAYOUT {
        if !present.contains(region) {
            continue;
        }
        let Some((body, used)) = cut(rest, terminator) else {
            warn!(region = name, remaining = rest.len(), "unterminated region, skipping the rest");
            break;
        };
        if region == Regions::MYSTERY && !body.is_empty() {
            debug!(len = body.len(), "skipping unidentified region");
        }
        if let Some(slot) = sections.slot(region) {
            *slot = Some(body);
        }
        rest = &rest[used..];
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const V103: Regions = Regions::LINKS
        .union(Regions::HOSTILES)
        .union(Regions::ACTORS)
        .union(Regions::TREASURE)
        .union(Regions::SIGNS);

    #[test]
    fn test_full_layout() {
        let data = b"a.graal 0 0 1 1 2 2\n#\n\x01\x02\x03hi\\\\\n\xFF\xFF\xFF  img#x\n#\n  !!\n#\n  S\n";
        let s = segment(data, V103);
        assert_eq!(s.links, Some(&b"a.graal 0 0 1 1 2 2\n"[..]));
        assert_eq!(s.hostiles, Some(&b"\x01\x02\x03hi\\\\\n"[..]));
        assert_eq!(s.actors, Some(&b"  img#x\n"[..]));
        assert_eq!(s.mystery, None);
        assert_eq!(s.treasure, Some(&b"  !!\n"[..]));
        assert_eq!(s.signs, Some(&b"  S\n"[..]));
    }

    #[test]
    fn test_empty_regions() {
        let data = b"#\n\xFF\xFF\xFF#\n#\n";
        let s = segment(data, V103);
        assert_eq!(s.links, Some(&b""[..]));
        assert_eq!(s.hostiles, Some(&b""[..]));
        assert_eq!(s.actors, Some(&b""[..]));
        assert_eq!(s.treasure, Some(&b""[..]));
        assert_eq!(s.signs, Some(&b""[..]));
    }

    #[test]
    fn test_hash_inside_line_does_not_terminate() {
        let data = b"x#y 1 2 3 4 5 6\n#\n";
        let s = segment(data, Regions::LINKS);
        assert_eq!(s.links, Some(&b"x#y 1 2 3 4 5 6\n"[..]));
    }

    #[test]
    fn test_gated_regions_are_absent() {
        let data = b"#\n\xFF\xFF\xFFtrailing";
        let s = segment(data, Regions::LINKS | Regions::HOSTILES);
        assert!(s.links.is_some());
        assert!(s.hostiles.is_some());
        assert_eq!(s.actors, None);
        assert_eq!(s.signs, None);
    }

    #[test]
    fn test_unterminated_region_abandons_the_rest() {
        let data = b"#\n\xFF\xFF\xFF  img#script with no end\n";
        let s = segment(data, V103);
        assert!(s.links.is_some());
        assert!(s.hostiles.is_some());
        assert_eq!(s.actors, None);
        assert_eq!(s.treasure, None);
        assert_eq!(s.signs, None);
    }

    #[test]
    fn test_mystery_region_is_cut() {
        let present = Regions::LINKS
            | Regions::HOSTILES
            | Regions::ACTORS
            | Regions::MYSTERY
            | Regions::SIGNS;
        let data = b"#\n\xFF\xFF\xFF#\n\x10\x11\n#\n  S";
        let s = segment(data, present);
        assert_eq!(s.mystery, Some(&b"\x10\x11\n"[..]));
        assert_eq!(s.signs, Some(&b"  S"[..]));
    }
}
