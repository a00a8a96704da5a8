use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolve::SpriteResolver;

/// Where sprite and script resources are searched for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub root: PathBuf,
    /// Tried in order for sprite names
    pub image_extensions: Vec<String>,
    /// Tried in order for `join`ed script names
    pub script_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("sprites"),
            image_extensions: vec!["png".into(), "gif".into()],
            script_extensions: vec!["txt".into()],
        }
    }
}

impl ResolverConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// `~/.graal-levels/resolver.json`, used by the CLI when present.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".graal-levels")
            .join("resolver.json")
    }
}

/// Options threaded through a level decode
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Resource search; without one no actor gets a sprite or joined script
    pub resolver: Option<SpriteResolver>,
    /// Skip sprite lookup and script directives entirely
    pub fast: bool,
}

impl LoadOptions {
    pub fn with_resolver(config: ResolverConfig) -> Self {
        Self { resolver: Some(SpriteResolver::new(config)), fast: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.root, PathBuf::from("sprites"));
        assert_eq!(config.image_extensions, vec!["png", "gif"]);
        assert_eq!(config.script_extensions, vec!["txt"]);
        assert!(ResolverConfig::default_path().ends_with(".graal-levels/resolver.json"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"root": "/srv/sprites"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/sprites"));
        assert_eq!(config.image_extensions, vec!["png", "gif"]);
    }

    #[test]
    fn test_from_json_file_errors() {
        let dir = std::env::temp_dir().join(format!("graal-levels-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(ResolverConfig::from_json_file(&path), Err(Error::Config(_))));
        assert!(matches!(
            ResolverConfig::from_json_file(&dir.join("missing.json")),
            Err(Error::Io(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
