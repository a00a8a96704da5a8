//! Sprite and script lookup under a configured root directory

use std::fs;
use std::path::{Path, PathBuf};

use level_script::{NoResources, Resources, ScriptLoader};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::codec::reader::latin1;
use crate::config::ResolverConfig;

/// Resources that can also report sprite dimensions
pub trait SpriteSource: Resources {
    /// Width and height of the image at `path`.
    fn sprite_size(&self, path: &Path) -> Option<(u32, u32)>;
}

impl SpriteSource for NoResources {
    fn sprite_size(&self, _path: &Path) -> Option<(u32, u32)> {
        None
    }
}

/// Recursive, first-match resource search. Directory entries are visited in
/// file-name order so results do not depend on the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteResolver {
    config: ResolverConfig,
}

impl SpriteResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(ResolverConfig { root: root.into(), ..ResolverConfig::default() })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// First file named `<stem>.<ext>` for any of `extensions`.
    pub fn find(&self, stem: &str, extensions: &[String]) -> Option<PathBuf> {
        if stem.is_empty() {
            return None;
        }
        let found = WalkDir::new(&self.config.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| {
                let Some(name) = entry.file_name().to_str() else { return false };
                extensions.iter().any(|ext| {
                    name.strip_prefix(stem)
                        .and_then(|rest| rest.strip_prefix('.'))
                        .is_some_and(|rest| rest == ext)
                })
            })
            .map(|entry| entry.into_path());
        trace!(stem, found = ?found, "resource search");
        found
    }
}

/// Image names are matched without their extension.
fn image_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

impl ScriptLoader for SpriteResolver {
    fn load_script(&self, name: &str) -> Option<String> {
        let path = self.find(name, &self.config.script_extensions)?;
        match fs::read(&path) {
            Ok(bytes) => Some(latin1(&bytes)),
            Err(err) => {
                debug!(path = %path.display(), %err, "cannot read script");
                None
            }
        }
    }
}

impl Resources for SpriteResolver {
    fn find_image(&self, name: &str) -> Option<PathBuf> {
        // a script name in the image slot never has a sprite
        if name.ends_with(".txt") {
            return None;
        }
        self.find(image_stem(name), &self.config.image_extensions)
    }
}

impl SpriteSource for SpriteResolver {
    fn sprite_size(&self, path: &Path) -> Option<(u32, u32)> {
        match image::image_dimensions(path) {
            Ok(size) => Some(size),
            Err(err) => {
                debug!(path = %path.display(), %err, "cannot read sprite dimensions");
                None
            }
        }
    }
}
