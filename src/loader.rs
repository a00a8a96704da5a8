//! Format detection: every codec is tried in a fixed order and the first
//! one that accepts the file wins.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::codec::{binary, text, DecodeFn, DecodedLevel};
use crate::config::LoadOptions;
use crate::error::{Error, Result};
use crate::level::Level;

/// Codecs in priority order
pub const CODECS: [(&str, DecodeFn); 2] = [("text", text::decode), ("binary", binary::decode)];

/// Decode raw bytes with the first codec that accepts them. `name` is only
/// used for the error when none does.
pub fn decode_level(data: &[u8], name: &str) -> Result<DecodedLevel> {
    for (codec, decode) in CODECS {
        match decode(data) {
            Ok(level) => {
                trace!(codec, name, "codec accepted level");
                return Ok(level);
            }
            Err(err) if err.is_format_mismatch() => {
                debug!(codec, name, %err, "codec rejected level");
            }
            Err(err) => return Err(err),
        }
    }
    Err(Error::UnknownFormat { path: name.to_string() })
}

/// Read, decode and populate the level at `path`.
pub fn load_level(path: &Path, options: &LoadOptions) -> Result<Level> {
    let data = fs::read(path)?;
    let decoded = decode_level(&data, &path.display().to_string())?;
    Ok(Level::populate(decoded, path, options))
}
