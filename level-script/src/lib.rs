//! Static directive extraction for level actor scripts
//!
//! Architecture:
//! 1. `blocks` - Brace-aware tokenizer and immediate-statement selection
//! 2. `reduce` - Follows `join` directives into other scripts
//! 3. `expression` - Closed arithmetic grammar for directive arguments
//! 4. `directives` - Applies position, sprite, layer, colour and zoom directives
//!
//! Scripts are never executed. Only statements that run unconditionally when a
//! level opens are considered, and only a fixed set of directives is read.

mod blocks;
mod directives;
mod expression;
mod reduce;

pub use blocks::{find_blocks, find_immediates, is_immediate_guard, Block};
pub use directives::{
    apply_directives, area_effect, extract_appearance, parse_effect_args, Appearance, Clip,
    DrawLayer, Resources, Zoom, TILE_SIZE,
};
pub use expression::{evaluate, evaluate_with, parse_expression, BinOp, Expr, ExprError, Parser};
pub use reduce::{reduce_script, NoResources, ReducedScript, ScriptLoader};
