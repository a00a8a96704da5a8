//! Canonical draw order of actors

use std::cmp::Ordering;

use crate::level::actor::Actor;

/// Layer first, then bottom edge, then x. Float keys use a total order so
/// the comparison is consistent even for NaN positions.
pub fn z_order(a: &Actor, b: &Actor) -> Ordering {
    a.layer
        .cmp(&b.layer)
        .then_with(|| a.bottom().total_cmp(&b.bottom()))
        .then_with(|| a.draw_position().0.total_cmp(&b.draw_position().0))
}

/// Stable sort into draw order.
pub fn sort_actors(actors: &mut [Actor]) {
    actors.sort_by(z_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::actor::ActorSource;
    use level_script::{Clip, DrawLayer};

    fn actor(x: f64, y: f64, height: i32, layer: DrawLayer, tag: &str) -> Actor {
        let mut a = Actor::unresolved(ActorSource::new(x, y, None, tag));
        a.clip = Clip::new(0, 0, 16, height);
        a.layer = layer;
        a
    }

    fn tags(actors: &[Actor]) -> Vec<&str> {
        actors.iter().map(|a| a.script()).collect()
    }

    #[test]
    fn test_layer_dominates() {
        let mut actors = vec![
            actor(0.0, 0.0, 16, DrawLayer::Light, "light"),
            actor(0.0, 50.0, 16, DrawLayer::Normal, "normal"),
            actor(0.0, 60.0, 16, DrawLayer::UnderPlayer, "under"),
            actor(0.0, 1.0, 16, DrawLayer::OverPlayer, "over"),
        ];
        sort_actors(&mut actors);
        assert_eq!(tags(&actors), vec!["under", "normal", "over", "light"]);
    }

    #[test]
    fn test_bottom_edge_then_x() {
        let mut actors = vec![
            // bottom 12
            actor(5.0, 10.0, 32, DrawLayer::Normal, "tall"),
            // bottom 11, an 8-px sprite adds no whole tile
            actor(9.0, 11.0, 8, DrawLayer::Normal, "low"),
            // bottom 12, further left
            actor(1.0, 11.0, 16, DrawLayer::Normal, "left"),
        ];
        sort_actors(&mut actors);
        assert_eq!(tags(&actors), vec!["low", "left", "tall"]);
    }

    #[test]
    fn test_partial_tile_height_is_dropped() {
        let mut actors = vec![
            // bottom 11.25
            actor(0.0, 10.25, 16, DrawLayer::Normal, "b"),
            // 24 px is one whole tile: bottom 11
            actor(0.0, 10.0, 24, DrawLayer::Normal, "a"),
        ];
        sort_actors(&mut actors);
        assert_eq!(tags(&actors), vec!["a", "b"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let mut actors = vec![
            actor(2.0, 2.0, 16, DrawLayer::Normal, "first"),
            actor(2.0, 2.0, 16, DrawLayer::Normal, "second"),
            actor(1.0, 1.0, 16, DrawLayer::Normal, "front"),
            actor(2.0, 2.0, 16, DrawLayer::Normal, "third"),
        ];
        sort_actors(&mut actors);
        assert_eq!(tags(&actors), vec!["front", "first", "second", "third"]);
    }

    #[test]
    fn test_comparator_is_a_strict_weak_order() {
        let actors: Vec<Actor> = (0..24)
            .map(|i| {
                let layer = [DrawLayer::Normal, DrawLayer::Light, DrawLayer::UnderPlayer][i % 3];
                actor((i % 5) as f64, (i % 4) as f64 * 0.5, 16 * (1 + (i % 2) as i32), layer, "")
            })
            .collect();

        for a in &actors {
            assert_eq!(z_order(a, a), Ordering::Equal);
            for b in &actors {
                assert_eq!(z_order(a, b), z_order(b, a).reverse());
                for c in &actors {
                    if z_order(a, b) == Ordering::Less && z_order(b, c) == Ordering::Less {
                        assert_eq!(z_order(a, c), Ordering::Less);
                    }
                }
            }
        }
    }
}
