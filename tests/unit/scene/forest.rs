use super::*;

#[test]
fn generates_the_configured_tree_count_for_any_viewport() {
    let cfg = CanopyConfig::default();
    for (w, h) in [(1280, 720), (320, 240), (1, 1)] {
        let mut sampler = Sampler::seed_from(1);
        let forest = Forest::generate(&cfg, Viewport::clamped(w, h), &mut sampler);
        assert_eq!(forest.trees().len(), cfg.num_trees);
        assert_eq!(forest.layers(), cfg.layers);
        for tree in forest.trees() {
            let n = tree.leaves().len() as u32;
            assert!(n >= cfg.leaves_per_tree[0]);
            assert!(n <= cfg.leaves_per_tree[1]);
        }
    }
}

#[test]
fn trees_spread_across_the_viewport_width() {
    let cfg = CanopyConfig::default();
    let mut sampler = Sampler::seed_from(2);
    let forest = Forest::generate(&cfg, Viewport::clamped(1000, 600), &mut sampler);
    for tree in forest.trees() {
        // Slot jitter of 0.2 around the 0.06..0.94 band.
        assert!(tree.base().x > 0.0);
        assert!(tree.base().x < 1000.0);
    }
    let first = forest.trees().first().unwrap().base().x;
    let last = forest.trees().last().unwrap().base().x;
    assert!(last - first > 500.0);
}

#[test]
fn leaves_by_layer_yields_back_to_front_order() {
    let mut cfg = CanopyConfig::default();
    cfg.num_trees = 3;
    cfg.leaves_per_tree = [30, 40];
    let mut sampler = Sampler::seed_from(3);
    let forest = Forest::generate(&cfg, Viewport::clamped(640, 480), &mut sampler);

    let layers: Vec<usize> = forest.leaves_by_layer().map(|(_, l)| l.layer()).collect();
    let total: usize = forest.trees().iter().map(|t| t.leaves().len()).sum();
    assert_eq!(layers.len(), total);
    assert!(layers.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn same_seed_grows_the_same_forest() {
    let cfg = CanopyConfig::default();
    let viewport = Viewport::clamped(800, 600);
    let mut a = Sampler::seed_from(9);
    let mut b = Sampler::seed_from(9);
    let fa = Forest::generate(&cfg, viewport, &mut a);
    let fb = Forest::generate(&cfg, viewport, &mut b);
    for (ta, tb) in fa.trees().iter().zip(fb.trees()) {
        assert_eq!(ta.base(), tb.base());
        assert_eq!(ta.crown_center(), tb.crown_center());
        assert_eq!(ta.leaves().len(), tb.leaves().len());
    }
}
