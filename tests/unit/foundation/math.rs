use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"loopbrush");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_bytes(b"loop");
    b.write_bytes(b"brush");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn clamp_finite_rejects_nan() {
    assert_eq!(clamp_finite(5.0, 0.0, 1.0), Some(1.0));
    assert_eq!(clamp_finite(f64::NAN, 0.0, 1.0), None);
    assert_eq!(clamp_finite(f64::INFINITY, 0.0, 1.0), None);
}
