use super::*;

fn clock() -> EnvClock {
    EnvClock::new(&CanopyConfig::default())
}

#[test]
fn phase_wraps_every_cycle() {
    let mut c = clock();
    c.advance(90.0);
    assert!((c.cycle_phase() - 0.5).abs() < 1e-9);
    c.advance(90.0);
    assert!(c.cycle_phase() < 1e-9);
    assert!((c.elapsed() - 180.0).abs() < 1e-9);

    c.advance(270.0);
    assert!((c.cycle_phase() - 0.5).abs() < 1e-9);
}

#[test]
fn negative_dt_is_ignored() {
    let mut c = clock();
    c.advance(10.0);
    let before = c.elapsed();
    c.advance(-5.0);
    assert_eq!(c.elapsed(), before);
}

#[test]
fn disturbance_decays_and_clamps() {
    let mut c = clock();
    assert_eq!(c.disturbance(), 0.0);

    c.register_disturbance(0.5);
    assert_eq!(c.disturbance(), 0.5);
    c.advance(1.0);
    assert!((c.disturbance() - 0.25).abs() < 1e-9);
    c.advance(10.0);
    assert_eq!(c.disturbance(), 0.0);

    for _ in 0..100 {
        c.register_disturbance(0.08);
    }
    assert_eq!(c.disturbance(), 1.0);
    c.register_disturbance(-5.0);
    assert_eq!(c.disturbance(), 1.0);
}

#[test]
fn night_window_is_inclusive() {
    let mut c = clock();
    c.advance(180.0 * 0.44);
    assert!(!c.is_night());
    c.advance(180.0 * 0.01);
    assert!(c.is_night());
    let mut c = clock();
    c.advance(180.0 * 0.70);
    assert!(c.is_night());
    c.advance(180.0 * 0.01);
    assert!(!c.is_night());
}

#[test]
fn sky_is_continuous_at_segment_boundaries() {
    let sky = CanopyConfig::default().sky;
    let eps = 1e-7;
    for boundary in [0.25, 0.50, 0.75] {
        for t in [0.0, 0.5, 1.0] {
            let a = sky_color(&sky, boundary - eps, t);
            let b = sky_color(&sky, boundary, t);
            assert!((a.r - b.r).abs() < 0.01, "r jump at phase {boundary}");
            assert!((a.g - b.g).abs() < 0.01, "g jump at phase {boundary}");
            assert!((a.b - b.b).abs() < 0.01, "b jump at phase {boundary}");
        }
    }
}

#[test]
fn sky_wraps_seamlessly_at_cycle_end() {
    let sky = CanopyConfig::default().sky;
    let end = sky_color(&sky, 1.0 - 1e-7, 0.0);
    let start = sky_color(&sky, 0.0, 0.0);
    assert!((end.r - start.r).abs() < 0.01);
    assert!((end.g - start.g).abs() < 0.01);
    assert!((end.b - start.b).abs() < 0.01);

    // Out-of-range phases fold back into the cycle.
    let folded = sky_color(&sky, 2.5, 0.3);
    let base = sky_color(&sky, 0.5, 0.3);
    assert_eq!(folded, base);
}

#[test]
fn sky_anchors_land_on_palette_stops() {
    let sky = CanopyConfig::default().sky;
    assert_eq!(sky_color(&sky, 0.0, 0.0), sky.day.top);
    assert_eq!(sky_color(&sky, 0.0, 1.0), sky.day.bottom);
    assert_eq!(sky_color(&sky, 0.5, 0.0), sky.night.top);
    assert_eq!(sky_color(&sky, 0.75, 1.0), sky.dawn.bottom);
}
