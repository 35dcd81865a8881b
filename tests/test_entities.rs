use space_invaders::entities::*;

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_centered_spans_half_extents() {
    let rect = Rect::centered(100.0, 50.0, 20.0, 10.0);
    assert_eq!(rect, Rect::new(90.0, 45.0, 110.0, 55.0));
    assert_eq!(rect.width(), 20.0);
    assert_eq!(rect.height(), 10.0);
}

#[test]
fn rect_contains_is_inclusive_on_edges() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(rect.contains(5.0, 5.0));
    assert!(rect.contains(0.0, 0.0));
    assert!(rect.contains(10.0, 10.0));
    assert!(!rect.contains(10.1, 5.0));
    assert!(!rect.contains(5.0, -0.1));
}

#[test]
fn rect_intersects_on_overlap_only() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 15.0, 15.0)));
    assert!(a.intersects(&Rect::new(-5.0, -5.0, 1.0, 1.0)));
    assert!(!a.intersects(&Rect::new(20.0, 0.0, 30.0, 10.0)));
    // Touching edges do not count as overlap
    assert!(!a.intersects(&Rect::new(10.0, 0.0, 20.0, 10.0)));
}

// ── Entity boxes ──────────────────────────────────────────────────────────────

#[test]
fn ship_box_is_centered_on_position() {
    let ship = Ship::new(240.0, 330.0);
    assert_eq!(ship.bounds(), Rect::new(230.0, 322.0, 250.0, 338.0));
}

#[test]
fn invader_box_is_centered_on_position() {
    let invader = Invader::new(100.0, 60.0, 2, 4);
    assert_eq!(invader.bounds(), Rect::new(91.0, 53.0, 109.0, 67.0));
    assert_eq!(invader.rank, 2);
    assert_eq!(invader.file, 4);
}

#[test]
fn bomb_box_is_centered_on_position() {
    let bomb = Bomb::new(50.0, 80.0, 60.0);
    assert_eq!(bomb.bounds(), Rect::new(48.0, 78.0, 52.0, 82.0));
    assert_eq!(bomb.velocity, 60.0);
}

#[test]
fn entity_clones_are_independent() {
    let original = Invader::new(10.0, 20.0, 1, 2);
    let mut cloned = original.clone();
    cloned.x = 99.0;
    assert_eq!(original.x, 10.0);
    assert_ne!(original, cloned);
}

#[test]
fn vec2_equality() {
    assert_eq!(Vec2::new(1.0, 2.0), Vec2::new(1.0, 2.0));
    assert_ne!(Vec2::new(1.0, 2.0), Vec2::new(2.0, 1.0));
}
