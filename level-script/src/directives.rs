//! Directive extraction
//!
//! Applies the directives found in an actor's immediate statements to its
//! starting appearance: position, sprite sub-region, draw layer, colour tint
//! and zoom. Nothing is executed; directives are matched as literal,
//! case-sensitive keywords on the reduced script text.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::expression::{evaluate, evaluate_with, ExprError};
use crate::reduce::{reduce_script, NoResources, ScriptLoader};

/// Pixels per board tile
pub const TILE_SIZE: f64 = 16.0;

static X_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*x[ \t]*(=|\+=|-=)[ \t]*([^;\n]*);").unwrap());
static Y_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*y[ \t]*(=|\+=|-=)[ \t]*([^;\n]*);").unwrap());
static HIDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bhide;").unwrap());
static IMAGE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bset(?:img|gif)part[ \t]+([^\s,;]+)[ \t]*,([^;\n]*);").unwrap()
});
static DRAW_AS_LIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bdrawaslight;").unwrap());
static DRAW_UNDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bdrawunderplayer;").unwrap());
static DRAW_OVER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bdrawoverplayer;").unwrap());
static COLOR_EFFECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsetcoloreffect\b[ \t]*([^;\n]*);").unwrap());
static ZOOM_EFFECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsetzoomeffect\b[ \t]*([^;\n]*);").unwrap());
static AREA_EFFECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bseteffect\b[ \t]*([^;]*);").unwrap());

/// Resources a script can refer to by name.
pub trait Resources: ScriptLoader {
    /// Path of the first sprite image matching `name`, if any.
    fn find_image(&self, name: &str) -> Option<PathBuf>;
}

impl Resources for NoResources {
    fn find_image(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

/// Sprite crop rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Clip {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Clip {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Clip covering a whole image
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }
}

/// Scaled placement of a zoomed sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zoom {
    pub x: f64,
    pub y: f64,
    pub width: i32,
    pub height: i32,
    pub factor: f64,
}

impl Zoom {
    /// Scale `clip` by `factor`, moving the origin so the sprite keeps its
    /// visual centre.
    pub fn from_clip(x: f64, y: f64, clip: Clip, factor: f64) -> Self {
        let width = (clip.width as f64 * factor) as i32;
        let height = (clip.height as f64 * factor) as i32;
        let recentre =
            |pos: f64, old: i32, new: i32| pos + (((new - old) as f64 / 2.0) * -1.0) / TILE_SIZE;
        Self {
            x: recentre(x, clip.width, width),
            y: recentre(y, clip.height, height),
            width,
            height,
            factor,
        }
    }
}

/// Draw order bucket, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum DrawLayer {
    UnderPlayer,
    #[default]
    Normal,
    OverPlayer,
    Light,
}

impl DrawLayer {
    pub fn code(self) -> i8 {
        match self {
            DrawLayer::UnderPlayer => -1,
            DrawLayer::Normal => 0,
            DrawLayer::OverPlayer => 1,
            DrawLayer::Light => 2,
        }
    }
}

/// Rendering parameters of an actor
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub x: f64,
    pub y: f64,
    pub image: Option<PathBuf>,
    pub clip: Clip,
    pub zoom: Option<Zoom>,
    pub effect: Option<[f64; 4]>,
    pub layer: DrawLayer,
}

impl Appearance {
    pub fn new(x: f64, y: f64, image: Option<PathBuf>, clip: Clip) -> Self {
        Self {
            x,
            y,
            image,
            clip,
            zoom: None,
            effect: None,
            layer: DrawLayer::Normal,
        }
    }
}

/// Reduce `src` to its immediate statements and apply their directives to
/// `start`.
pub fn extract_appearance<R: Resources + ?Sized>(
    src: &str,
    start: Appearance,
    resources: &R,
) -> Appearance {
    let reduced = reduce_script(src, resources);
    apply_directives(&reduced.text(), start, resources)
}

/// Apply the directives in already-reduced script text.
pub fn apply_directives<R: Resources + ?Sized>(
    text: &str,
    start: Appearance,
    resources: &R,
) -> Appearance {
    let mut app = start;

    let (old_x, old_y) = (app.x, app.y);
    if let Some(x) = assigned_position(&X_ASSIGN, text, "x", app.x) {
        app.x = x;
    }
    if let Some(y) = assigned_position(&Y_ASSIGN, text, "y", app.y) {
        app.y = y;
    }
    if (app.x, app.y) != (old_x, old_y) {
        debug!(from = ?(old_x, old_y), to = ?(app.x, app.y), "script moved actor");
    }

    // Runs before the image part, which shows the actor again.
    if HIDE.is_match(text) {
        app.image = None;
    }

    if let Some(caps) = IMAGE_PART.captures(text) {
        let name = &caps[1];
        match parse_clip(&caps[2]) {
            Ok(clip) => {
                app.image = resources.find_image(name);
                app.clip = clip;
                if app.image.is_none() {
                    debug!(image = name, "sprite for image part not found");
                }
            }
            Err(err) => warn!(image = name, args = &caps[2], %err, "bad image part arguments"),
        }
    }

    if DRAW_AS_LIGHT.is_match(text) {
        app.layer = DrawLayer::Light;
    } else if DRAW_UNDER.is_match(text) {
        app.layer = DrawLayer::UnderPlayer;
    } else if DRAW_OVER.is_match(text) {
        app.layer = DrawLayer::OverPlayer;
    }

    if let Some(caps) = COLOR_EFFECT.captures(text) {
        match parse_effect_args(&caps[1]) {
            Ok(effect) => app.effect = Some(effect),
            Err(err) => {
                warn!(args = &caps[1], %err, "error parsing colour effect, hiding actor");
                app.image = None;
            }
        }
    }

    if let Some(caps) = ZOOM_EFFECT.captures(text) {
        match evaluate(caps[1].trim()) {
            Ok(factor) => app.zoom = Some(Zoom::from_clip(app.x, app.y, app.clip, factor)),
            Err(err) => warn!(args = &caps[1], %err, "bad zoom factor"),
        }
    }

    app
}

/// Level-wide colour effect requested by `seteffect` anywhere in a script.
pub fn area_effect(src: &str) -> Option<[f64; 4]> {
    let caps = AREA_EFFECT.captures(src)?;
    match parse_effect_args(&caps[1]) {
        Ok(effect) => Some(effect),
        Err(err) => {
            warn!(args = &caps[1], %err, "error parsing area effect");
            None
        }
    }
}

/// Parse up to four comma-separated components; missing ones are `0.0`.
pub fn parse_effect_args(args: &str) -> Result<[f64; 4], ExprError> {
    let parts: Vec<&str> = args.split(',').collect();
    if parts.len() > 4 {
        return Err(ExprError::UnexpectedToken("','".into()));
    }
    let mut effect = [0.0; 4];
    for (slot, part) in effect.iter_mut().zip(parts) {
        let part = part.trim();
        if !part.is_empty() {
            *slot = evaluate(part)?;
        }
    }
    Ok(effect)
}

fn parse_clip(args: &str) -> Result<Clip, ExprError> {
    let parts: Vec<&str> = args.split(',').collect();
    if parts.len() != 4 {
        return Err(ExprError::UnexpectedEnd);
    }
    let mut values = [0i32; 4];
    for (slot, part) in values.iter_mut().zip(parts) {
        *slot = evaluate(part.trim())? as i32;
    }
    Ok(Clip::new(values[0], values[1], values[2], values[3]))
}

fn assigned_position(pattern: &Regex, text: &str, axis: &str, current: f64) -> Option<f64> {
    for caps in pattern.captures_iter(text) {
        let rhs = caps[2].trim();
        match evaluate_with(rhs, axis, current) {
            Ok(value) => {
                return Some(match &caps[1] {
                    "+=" => current + value,
                    "-=" => current - value,
                    _ => value,
                })
            }
            Err(err) => trace!(axis, rhs, %err, "position statement not static"),
        }
    }
    None
}
