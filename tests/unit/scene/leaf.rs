use super::*;

fn calm_frame(layers: usize) -> LeafFrame {
    LeafFrame {
        wind_t: 12.5,
        wind_speed: 0.15,
        wind_strength: 1.8,
        disturbance: 0.0,
        night: false,
        layers,
    }
}

#[test]
fn unfurl_draws_attributes_within_configured_ranges() {
    let mut cfg = CanopyConfig::default();
    cfg.layers = 3;
    cfg.leaf_size = [10.0, 10.0];
    cfg.leaf_aspect = [0.8, 0.8];
    cfg.leaf_alpha = [200.0, 200.0];
    let mut sampler = Sampler::seed_from(5);

    // Back layer: depth 1/3 scales size down toward 0.75.
    let back = Leaf::unfurl(Vec2::new(1.0, 2.0), 0, &cfg, &mut sampler);
    let expected = 10.0 * (0.75 + 0.5 * (1.0 / 3.0));
    assert!((back.size - expected).abs() < 1e-9);
    assert_eq!(back.layer(), 0);
    assert_eq!(back.offset(), Vec2::new(1.0, 2.0));
    assert_eq!(back.alpha, 200.0);
    assert!((0.0..1000.0).contains(&back.seed));

    // Front layer: depth 1 scales size up to 1.25.
    let front = Leaf::unfurl(Vec2::ZERO, 2, &cfg, &mut sampler);
    assert!((front.size - 12.5).abs() < 1e-9);
}

#[test]
fn rest_position_is_crown_plus_offset() {
    let mut sampler = Sampler::seed_from(1);
    let leaf = Leaf::unfurl(Vec2::new(10.0, -4.0), 1, &CanopyConfig::default(), &mut sampler);
    assert_eq!(
        leaf.rest_position(Point::new(100.0, 200.0)),
        Point::new(110.0, 196.0)
    );
}

#[test]
fn sway_is_bounded_by_layer_and_wind() {
    let cfg = CanopyConfig::default();
    let mut sampler = Sampler::seed_from(2);
    let wind = NoiseField::new(3);
    let crown = Point::new(300.0, 200.0);
    let frame = calm_frame(cfg.layers);

    for layer in 0..cfg.layers {
        let leaf = Leaf::unfurl(Vec2::ZERO, layer, &cfg, &mut sampler);
        for step in 0..50 {
            let f = LeafFrame {
                wind_t: step as f64 * 0.7,
                ..frame
            };
            let sprite = leaf.sprite(crown, &wind, &f);
            let max_sway = (4.0 + layer as f64 * 1.8) * frame.wind_strength;
            let max_bob = 1.2 + layer as f64 * 0.6;
            assert!((sprite.center.x - crown.x).abs() <= max_sway + 1e-9);
            assert!((sprite.center.y - crown.y).abs() <= max_bob + 1e-9);
        }
    }
}

#[test]
fn disturbance_boosts_the_sway_envelope() {
    let cfg = CanopyConfig::default();
    let mut sampler = Sampler::seed_from(4);
    let wind = NoiseField::new(6);
    let leaf = Leaf::unfurl(Vec2::ZERO, 2, &cfg, &mut sampler);
    let crown = Point::new(0.0, 0.0);

    let calm = calm_frame(cfg.layers);
    let stormy = LeafFrame {
        disturbance: 1.0,
        ..calm
    };

    // Same noise sample either way, so the offsets scale exactly by the
    // disturbance wind factor.
    let a = leaf.sprite(crown, &wind, &calm).center.x;
    let b = leaf.sprite(crown, &wind, &stormy).center.x;
    if a.abs() > 1e-12 {
        assert!((b / a - 1.9).abs() < 1e-9);
    }
}

#[test]
fn night_dims_the_body_color() {
    let cfg = CanopyConfig::default();
    let mut sampler = Sampler::seed_from(8);
    let wind = NoiseField::new(9);
    let leaf = Leaf::unfurl(Vec2::ZERO, 1, &cfg, &mut sampler);
    let crown = Point::new(0.0, 0.0);

    let day = calm_frame(cfg.layers);
    let night = LeafFrame { night: true, ..day };

    let d = leaf.sprite(crown, &wind, &day).body;
    let n = leaf.sprite(crown, &wind, &night).body;
    assert!(n.r <= d.r && n.g <= d.g && n.b <= d.b);
    assert!(n.g < d.g);
}

#[test]
fn glint_scales_both_axes_together() {
    let cfg = CanopyConfig::default();
    let mut sampler = Sampler::seed_from(10);
    let wind = NoiseField::new(12);
    let leaf = Leaf::unfurl(Vec2::ZERO, 0, &cfg, &mut sampler);
    let crown = Point::new(0.0, 0.0);
    let frame = calm_frame(cfg.layers);

    for step in 0..400 {
        let f = LeafFrame {
            wind_t: step as f64 * 0.41,
            ..frame
        };
        let sprite = leaf.sprite(crown, &wind, &f);
        let ratio = sprite.ry / sprite.rx;
        assert!((ratio - leaf.aspect).abs() < 1e-9);
        let base_rx = leaf.size * 0.5;
        assert!(
            (sprite.rx - base_rx).abs() < 1e-9 || (sprite.rx - base_rx * 1.35).abs() < 1e-9
        );
    }
}
