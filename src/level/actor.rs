use std::path::PathBuf;

use level_script::{extract_appearance, Appearance, Clip, DrawLayer, Zoom, TILE_SIZE};
use serde::Serialize;
use tracing::{debug, warn};

use crate::resolve::SpriteSource;

/// Actor fields exactly as stored in the level file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSource {
    pub x: f64,
    pub y: f64,
    /// Sprite name, if the file assigns one
    pub image: Option<String>,
    pub script: String,
}

impl ActorSource {
    pub fn new(x: f64, y: f64, image: Option<String>, script: impl Into<String>) -> Self {
        Self { x, y, image, script: script.into() }
    }
}

/// Placed interactive object with its starting appearance resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    pub source: ActorSource,
    /// Position of the record in the file
    pub file_index: usize,
    pub x: f64,
    pub y: f64,
    /// Resolved sprite path; `None` when hidden or not found
    pub image: Option<PathBuf>,
    pub clip: Clip,
    pub zoom: Option<Zoom>,
    pub effect: Option<[f64; 4]>,
    pub layer: DrawLayer,
}

impl Actor {
    /// Resolve the actor's sprite and apply the directives of its script.
    pub fn new<S: SpriteSource + ?Sized>(source: ActorSource, sprites: &S) -> Self {
        let mut start = Appearance::new(source.x, source.y, None, Clip::default());

        if let Some(name) = source.image.as_deref() {
            match sprites.find_image(name) {
                Some(path) => match sprites.sprite_size(&path) {
                    Some((width, height)) => {
                        start.clip = Clip::full(width, height);
                        start.image = Some(path);
                    }
                    None => warn!(path = %path.display(), "cannot read sprite"),
                },
                None => debug!(image = name, "sprite not found"),
            }
        }

        let appearance = extract_appearance(&source.script, start, sprites);
        Self::with_appearance(source, appearance)
    }

    /// Actor placed at its stored position, with no sprite or script applied.
    pub fn unresolved(source: ActorSource) -> Self {
        let appearance = Appearance::new(source.x, source.y, None, Clip::default());
        Self::with_appearance(source, appearance)
    }

    fn with_appearance(source: ActorSource, app: Appearance) -> Self {
        Self {
            source,
            file_index: 0,
            x: app.x,
            y: app.y,
            image: app.image,
            clip: app.clip,
            zoom: app.zoom,
            effect: app.effect,
            layer: app.layer,
        }
    }

    pub fn with_file_index(mut self, index: usize) -> Self {
        self.file_index = index;
        self
    }

    pub fn script(&self) -> &str {
        &self.source.script
    }

    /// Drawn position, after zoom
    pub fn draw_position(&self) -> (f64, f64) {
        match &self.zoom {
            Some(zoom) => (zoom.x, zoom.y),
            None => (self.x, self.y),
        }
    }

    /// Drawn height in pixels, after zoom
    pub fn draw_height(&self) -> i32 {
        match &self.zoom {
            Some(zoom) => zoom.height,
            None => self.clip.height,
        }
    }

    /// Bottom edge of the drawn sprite, in tiles. The height counts whole
    /// tiles only.
    pub fn bottom(&self) -> f64 {
        self.draw_position().1 + (self.draw_height() as f64 / TILE_SIZE).floor()
    }
}
