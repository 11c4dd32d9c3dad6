use super::*;

#[test]
fn arrow_angle_snaps_vertical_directions() {
    assert_eq!(arrow_angle(5.0, 0.0), 90.0);
    assert_eq!(arrow_angle(-5.0, 0.0), -90.0);
    assert_eq!(arrow_angle(0.0, 0.0), -90.0);
}

#[test]
fn arrow_angle_matches_atan2_in_degrees() {
    assert!((arrow_angle(1.0, 1.0) - 45.0).abs() < 1e-9);
    assert!((arrow_angle(0.0, -1.0) - 180.0).abs() < 1e-9);
    assert!((deg_to_rad(180.0) - PI).abs() < 1e-12);
}

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    a.write_bytes(b"undulate");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_bytes(b"undu");
    b.write_bytes(b"late");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn hash_sequence_is_deterministic_and_bounded() {
    let mut a = HashSequence::new(7);
    let mut b = HashSequence::new(7);
    for _ in 0..64 {
        let v = a.next_unit();
        assert_eq!(v, b.next_unit());
        assert!((0.0..1.0).contains(&v));
    }
    let mut c = HashSequence::new(8);
    assert_ne!(HashSequence::new(7).next_unit(), c.next_unit());
}
